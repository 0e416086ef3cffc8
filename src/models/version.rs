//! Web service version document.

use serde::{Deserialize, Serialize};

/// Version reported before any update check has run.
pub const DEFAULT_VERSION: &str = "0000000000";

/// Response of the `/version/{instance}` call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Service instance, e.g. "Worldwide".
    pub instance: String,
    /// Latest published version, e.g. "2024103000".
    pub latest: String,
}

impl Default for VersionInfo {
    fn default() -> Self {
        VersionInfo {
            instance: "Worldwide".to_string(),
            latest: DEFAULT_VERSION.to_string(),
        }
    }
}
