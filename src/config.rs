//! Runtime configuration.
//!
//! Values come from `PAC_*` environment variables, optionally loaded from a
//! `.env` file by `main`. The engine never reads the environment itself, the
//! service receives a [`PacConfig`] instead.

use crate::error::{PacError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

/// HTTP request timeout in seconds.
pub const HTTP_TIMEOUT_SEC: u64 = 30;

/// Sub directory of the temp dir used for output when requested.
pub const TEMP_OUTPUT_DIR: &str = "PacUtil";

static GUID_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_guid_regex() -> &'static Regex {
    GUID_REGEX.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("Invalid Regex")
    })
}

/// Settings for the endpoint web service, persistence and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacConfig {
    pub web_service_root_url: String,
    /// Version file, relative to the temp dir.
    pub version_path: String,
    /// Raw endpoint payload file, relative to the temp dir.
    pub data_path: String,
    pub instance: String,
    pub include_ipv6: bool,
    /// GUID sent as `clientrequestid` on every call.
    pub client_request_id: String,
    pub template_start_marker: String,
    pub template_end_marker: String,
    pub output_path: PathBuf,
    /// Write output to `{temp}/PacUtil` instead of `output_path`.
    pub output_to_temp: bool,
}

impl Default for PacConfig {
    fn default() -> Self {
        PacConfig {
            web_service_root_url: "https://endpoints.office.com".to_string(),
            version_path: "PacUtil/version.json".to_string(),
            data_path: "PacUtil/endpoints.json".to_string(),
            instance: "Worldwide".to_string(),
            include_ipv6: false,
            client_request_id: String::new(),
            template_start_marker: "// PAC-RULES-START".to_string(),
            template_end_marker: "// PAC-RULES-END".to_string(),
            output_path: PathBuf::from("."),
            output_to_temp: true,
        }
    }
}

impl PacConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<PacConfig> {
        PacConfig::from_vars(std::env::vars().collect())
    }

    /// Build the configuration from a map of `PAC_*` variables, missing
    /// entries keep their defaults.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<PacConfig> {
        let mut config = PacConfig::default();
        let get = |key: &str| vars.get(key).map(|v| v.trim().to_string());

        if let Some(v) = get("PAC_WEB_SERVICE_ROOT_URL") {
            config.web_service_root_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("PAC_VERSION_PATH") {
            config.version_path = v;
        }
        if let Some(v) = get("PAC_DATA_PATH") {
            config.data_path = v;
        }
        if let Some(v) = get("PAC_INSTANCE") {
            config.instance = v;
        }
        if let Some(v) = get("PAC_INCLUDE_IPV6") {
            config.include_ipv6 = parse_bool("PAC_INCLUDE_IPV6", &v)?;
        }
        if let Some(v) = get("PAC_CLIENT_REQUEST_ID") {
            config.client_request_id = v;
        }
        if let Some(v) = vars.get("PAC_TEMPLATE_START_MARKER") {
            config.template_start_marker = v.clone();
        }
        if let Some(v) = vars.get("PAC_TEMPLATE_END_MARKER") {
            config.template_end_marker = v.clone();
        }
        if let Some(v) = get("PAC_OUTPUT_PATH") {
            config.output_path = PathBuf::from(v);
        }
        if let Some(v) = get("PAC_OUTPUT_TO_TEMP") {
            config.output_to_temp = parse_bool("PAC_OUTPUT_TO_TEMP", &v)?;
        }

        log::debug!("config={config:?}");
        Ok(config)
    }

    /// Check required values before any web service call.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("PAC_CLIENT_REQUEST_ID", &self.client_request_id),
            ("PAC_WEB_SERVICE_ROOT_URL", &self.web_service_root_url),
            ("PAC_VERSION_PATH", &self.version_path),
            ("PAC_DATA_PATH", &self.data_path),
            ("PAC_INSTANCE", &self.instance),
            ("PAC_TEMPLATE_START_MARKER", &self.template_start_marker),
            ("PAC_TEMPLATE_END_MARKER", &self.template_end_marker),
        ];
        for (key, value) in required {
            if value.is_empty() {
                return Err(PacError::Config(format!("missing configuration for '{key}'")));
            }
        }

        if !get_guid_regex().is_match(&self.client_request_id) {
            return Err(PacError::Config(format!(
                "PAC_CLIENT_REQUEST_ID is not a GUID: '{}'",
                self.client_request_id
            )));
        }
        Ok(())
    }

    /// Directory the generated PAC file is written to.
    pub fn output_dir(&self) -> PathBuf {
        if self.output_to_temp {
            std::env::temp_dir().join(TEMP_OUTPUT_DIR)
        } else {
            self.output_path.clone()
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(PacError::Config(format!("{key} is not a boolean: '{value}'"))),
    }
}
