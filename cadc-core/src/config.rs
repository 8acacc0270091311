use crate::error::{CadcError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Process configuration, built once by the front-end and handed to the
/// record store and the archive engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub root: PathBuf,
    /// Directory holding parameter records, relative to `root`.
    pub records_dir: PathBuf,
    pub record_extension: String,
    pub archive_extension: String,
    /// Prefix for directories created when extracting multi-entry archives.
    pub extract_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            records_dir: PathBuf::from("records"),
            record_extension: "txt".to_string(),
            archive_extension: "cp".to_string(),
            extract_prefix: "CADC_".to_string(),
        }
    }
}

impl Config {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Read a JSON config file; absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CadcError::from_io(e, format!("config file {}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| CadcError::Format(format!("config {}: {e}", path.display())))
    }

    pub fn records_path(&self) -> PathBuf {
        self.root.join(&self.records_dir)
    }
}
