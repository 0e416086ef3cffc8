//! PAC file actions: update check and generation.

use crate::build_pac_file;
use crate::config::PacConfig;
use crate::endpoints::{EndpointClient, PayloadStore};
use crate::models::{VersionInfo, DEFAULT_VERSION};
use crate::output::{console, OptimizationReport};
use crate::output_file_name;
use crate::processing::{optimize, RenderOptions, VersionHeader};
use std::error::Error;
use std::path::PathBuf;

/// Options of the `generate` action.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// PAC template containing the start and end markers.
    pub file: PathBuf,
    /// Generate even when the version did not change.
    pub force: bool,
    /// Factor rules shared by several events into a common section.
    pub optimize: bool,
    /// Print an optimization summary.
    pub report: bool,
}

pub struct PacFileService {
    config: PacConfig,
    client: EndpointClient,
    store: PayloadStore,
    latest_version: String,
}

impl PacFileService {
    /// Validate the configuration and set up the client and payload store.
    pub fn new(config: PacConfig) -> Result<PacFileService, Box<dyn Error>> {
        config.validate()?;
        let client = EndpointClient::new(&config)?;
        let store = PayloadStore::in_temp_dir(&config.version_path, &config.data_path);
        Ok(PacFileService {
            config,
            client,
            store,
            latest_version: DEFAULT_VERSION.to_string(),
        })
    }

    /// Use another payload store, e.g. a test directory.
    pub fn with_store(mut self, store: PayloadStore) -> PacFileService {
        self.store = store;
        self
    }

    /// Latest version seen by [`Self::check_for_updates`].
    pub fn latest_version(&self) -> &str {
        &self.latest_version
    }

    /// Fetch the version document and store it. Returns `true` when a new
    /// version is available.
    pub async fn check_for_updates(&mut self) -> Result<bool, Box<dyn Error>> {
        let (raw, update_available) = self.compare_version().await?;
        if update_available {
            self.store.commit_version(&raw)?;
        }
        Ok(update_available)
    }

    /// Fetch the version document and compare it with the stored one,
    /// without recording it.
    async fn compare_version(&mut self) -> Result<(String, bool), Box<dyn Error>> {
        console::message("Checking for Office 365 IP Address and URL updates...");

        let fetched = self.client.fetch_version().await?;
        let VersionInfo { latest, instance } = fetched.parsed;
        log::debug!("instance={instance} latest={latest}");
        self.latest_version = latest;

        let update_available = self.store.is_new_version(&fetched.raw)?;
        if update_available {
            console::info(format!(
                "A new version is available - '{}'.",
                self.latest_version
            ));
        } else {
            console::info(format!(
                "You already have the current version - '{}'.",
                self.latest_version
            ));
        }
        Ok((fetched.raw, update_available))
    }

    /// Generate the PAC file from the template. Returns the written path, or
    /// `None` when the version is unchanged and `force` is not set.
    ///
    /// The version is only recorded once the file is written, so a failed run
    /// is retried on the next call.
    pub async fn generate(
        &mut self,
        options: &GenerateOptions,
    ) -> Result<Option<PathBuf>, Box<dyn Error>> {
        console::message("Generating PAC file...");

        let (version_raw, update_available) = self.compare_version().await?;
        if !update_available && !options.force {
            console::info("Nothing to generate, use --force to regenerate the current version.");
            return Ok(None);
        }

        console::message("Downloading updated Office 365 IP Address and URLs...");
        let fetched = self.client.fetch_endpoints().await?;
        self.store.store_data(&fetched.raw)?;
        let events = fetched.parsed;

        console::message("Processing data for Office 365 IP Address and URLs...");
        let template = std::fs::read_to_string(&options.file).map_err(|e| {
            format!(
                "Error reading template file {}: {e}",
                options.file.display()
            )
        })?;

        if options.report {
            let optimized = optimize(&events)?;
            OptimizationReport::new(&events, &optimized).print();
        }

        let render = RenderOptions {
            optimize: options.optimize,
            header: Some(VersionHeader {
                version: self.latest_version.clone(),
                changes_url: self.client.changes_url(&self.latest_version),
            }),
        };
        let document = build_pac_file(
            &events,
            &template,
            &self.config.template_start_marker,
            &self.config.template_end_marker,
            &render,
        )?;

        let output_dir = self.config.output_dir();
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Error creating directory {}: {e}", output_dir.display()))?;
        let output_file = output_dir.join(output_file_name(&self.latest_version));
        std::fs::write(&output_file, document)
            .map_err(|e| format!("Error writing {}: {e}", output_file.display()))?;
        self.store.commit_version(&version_raw)?;

        console::info(format!(
            "Successfully generated new proxy PAC file: {}",
            output_file.display()
        ));
        Ok(Some(output_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::path::Path;

    const REQUEST_ID: &str = "b10c5ed1-bad1-445f-b386-b919946339a7";
    const TEMPLATE: &str = "src/tests/test_data/template.pac";
    const NOT_FOUND: &str =
        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

    fn config() -> PacConfig {
        PacConfig {
            // Nothing listens on port 1.
            web_service_root_url: "http://127.0.0.1:1".to_string(),
            client_request_id: REQUEST_ID.to_string(),
            ..Default::default()
        }
    }

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("pac-file-util-tests")
            .join(format!("svc-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    /// Serve the sample version and endpoint documents over plain HTTP.
    /// Returns the root URL.
    fn serve_samples() -> String {
        let version = std::fs::read_to_string("src/tests/test_data/version_sample.json")
            .expect("Error reading test data");
        let endpoints = std::fs::read_to_string("src/tests/test_data/endpoints_sample.json")
            .expect("Error reading test data");
        let listener = TcpListener::bind("127.0.0.1:0").expect("Error binding listener");
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                loop {
                    let mut header = String::new();
                    match reader.read_line(&mut header) {
                        Ok(0) | Err(_) => break,
                        Ok(_) if header == "\r\n" => break,
                        Ok(_) => {}
                    }
                }

                let path = request_line.split_whitespace().nth(1).unwrap_or("");
                let response = match path {
                    p if p.starts_with("/version/Worldwide") => ok_response(&version),
                    p if p.starts_with("/endpoints/Worldwide") => ok_response(&endpoints),
                    _ => NOT_FOUND.to_string(),
                };
                let _ = stream.write_all(response.as_bytes());
            }
        });

        format!("http://{addr}")
    }

    fn ok_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn service(root_url: &str, dir: &Path) -> (PacFileService, PayloadStore) {
        let config = PacConfig {
            web_service_root_url: root_url.to_string(),
            client_request_id: REQUEST_ID.to_string(),
            output_path: dir.join("out"),
            output_to_temp: false,
            ..Default::default()
        };
        let store = PayloadStore::new(dir, "PacUtil/version.json", "PacUtil/endpoints.json");
        let service = PacFileService::new(config).unwrap().with_store(store.clone());
        (service, store)
    }

    #[test]
    fn test_new_validates_config() {
        let bad = PacConfig::default();
        assert!(PacFileService::new(bad).is_err());

        let service = PacFileService::new(config()).unwrap();
        assert_eq!(service.latest_version(), "0000000000");
    }

    #[tokio::test]
    async fn test_update_check_unreachable() {
        let dir = test_dir("unreachable");
        let store = PayloadStore::new(&dir, "version.json", "data.json");
        let mut service = PacFileService::new(config()).unwrap().with_store(store.clone());

        assert!(service.check_for_updates().await.is_err());
        assert_eq!(service.latest_version(), "0000000000");
        assert!(!store.version_file().exists());
    }

    #[tokio::test]
    async fn test_update_check_records_version() {
        let root = serve_samples();
        let dir = test_dir("update-check");
        let (mut service, store) = service(&root, &dir);

        assert!(service.check_for_updates().await.unwrap());
        assert_eq!(service.latest_version(), "2024103000");
        assert!(store.version_file().exists());
        assert!(!service.check_for_updates().await.unwrap());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_generate() {
        let root = serve_samples();
        let dir = test_dir("generate");
        let (mut service, store) = service(&root, &dir);
        let options = GenerateOptions {
            file: PathBuf::from(TEMPLATE),
            ..Default::default()
        };

        let path = service.generate(&options).await.unwrap().expect("file written");
        assert_eq!(path, dir.join("out").join("proxy-2024103000.pac"));
        let document = std::fs::read_to_string(&path).unwrap();
        assert!(document.contains("                // Office 365 endpoints version 2024103000\n"));
        assert!(document.contains(&format!(
            "// See changes: {root}/changes/Worldwide/2024103000?clientrequestid={REQUEST_ID}\n"
        )));
        assert!(document.contains("// Event ID 5 - Common"));
        assert!(!document.contains("2603:1006"));
        assert!(store.version_file().exists());
        assert!(store.read_data().unwrap().contains("outlook.office365.com"));

        // Same version, no force: nothing generated.
        std::fs::remove_file(&path).unwrap();
        assert_eq!(service.generate(&options).await.unwrap(), None);
        assert!(!path.exists());

        // Forced, optimized and reported.
        let forced = GenerateOptions {
            file: PathBuf::from(TEMPLATE),
            force: true,
            optimize: true,
            report: true,
        };
        assert_eq!(service.generate(&forced).await.unwrap(), Some(path.clone()));
        let document = std::fs::read_to_string(&path).unwrap();
        assert!(document.contains("// Common rules shared by multiple events"));
        assert!(!document.contains("See changes"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_failed_generate_keeps_version_new() {
        let root = serve_samples();
        let dir = test_dir("generate-retry");
        let (mut service, store) = service(&root, &dir);

        std::fs::create_dir_all(&dir).unwrap();
        let bad_template = dir.join("no-markers.pac");
        std::fs::write(&bad_template, "function FindProxyForURL(url, host) {}\n").unwrap();
        let bad = GenerateOptions {
            file: bad_template,
            ..Default::default()
        };
        assert!(service.generate(&bad).await.is_err());
        assert!(!store.version_file().exists());

        // The retry without --force still sees the version as new.
        let good = GenerateOptions {
            file: PathBuf::from(TEMPLATE),
            ..Default::default()
        };
        let path = service.generate(&good).await.unwrap();
        assert!(path.is_some_and(|p| p.exists()));
        assert!(store.version_file().exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
