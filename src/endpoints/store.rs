//! Local copies of the last version document and endpoint payload.
//!
//! Files live below a base directory, the system temp dir by default.

use std::error::Error;
use std::path::{Path, PathBuf};

/// Version and data files of the last successful run.
#[derive(Debug, Clone)]
pub struct PayloadStore {
    version_file: PathBuf,
    data_file: PathBuf,
}

impl PayloadStore {
    /// Store with files relative to `base_dir`.
    pub fn new(base_dir: &Path, version_path: &str, data_path: &str) -> PayloadStore {
        PayloadStore {
            version_file: base_dir.join(version_path),
            data_file: base_dir.join(data_path),
        }
    }

    /// Store with files relative to the system temp dir.
    pub fn in_temp_dir(version_path: &str, data_path: &str) -> PayloadStore {
        PayloadStore::new(&std::env::temp_dir(), version_path, data_path)
    }

    pub fn version_file(&self) -> &Path {
        &self.version_file
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Whether `content` differs from the stored version document.
    ///
    /// `true` when no version was stored yet or the stored one differs,
    /// ignoring spaces and letter case. Nothing is written.
    pub fn is_new_version(&self, content: &str) -> Result<bool, Box<dyn Error>> {
        if !self.version_file.exists() {
            return Ok(true);
        }
        let stored = std::fs::read_to_string(&self.version_file).map_err(|e| {
            format!(
                "Error reading version file {}: {e}",
                self.version_file.display()
            )
        })?;
        if same_version(&stored, content) {
            log::debug!("Version unchanged in {}", self.version_file.display());
            return Ok(false);
        }
        Ok(true)
    }

    /// Record `content` as the current version document.
    pub fn commit_version(&self, content: &str) -> Result<(), Box<dyn Error>> {
        write_file(&self.version_file, content)
    }

    /// Save the raw endpoint payload.
    pub fn store_data(&self, content: &str) -> Result<(), Box<dyn Error>> {
        write_file(&self.data_file, content)
    }

    /// Read the last stored endpoint payload.
    pub fn read_data(&self) -> Result<String, Box<dyn Error>> {
        let data = std::fs::read_to_string(&self.data_file)
            .map_err(|e| format!("Error reading data file {}: {e}", self.data_file.display()))?;
        Ok(data)
    }
}

fn same_version(stored: &str, fetched: &str) -> bool {
    let strip = |s: &str| s.replace(' ', "").to_lowercase();
    strip(stored) == strip(fetched)
}

fn write_file(path: &Path, content: &str) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Error creating directory {}: {e}", dir.display()))?;
    }
    log::info!("Writing file: {}", path.display());
    std::fs::write(path, content)
        .map_err(|e| format!("Error writing file {}: {e}", path.display()))?;
    Ok(())
}
