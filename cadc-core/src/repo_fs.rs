use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::{CadcError, Result};
use crate::record::ParameterRecord;
use crate::repo::RecordReader;

/// Records stored as `<records dir>/<name>.<extension>` text files.
pub struct FsRecordStore {
    dir: PathBuf,
    extension: String,
}

impl FsRecordStore {
    pub fn new(config: &Config) -> Self {
        Self {
            dir: config.records_path(),
            extension: config.record_extension.clone(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        let suffix = format!(".{}", self.extension);
        if name.ends_with(&suffix) {
            self.dir.join(name)
        } else {
            self.dir.join(format!("{name}{suffix}"))
        }
    }

    /// Write (or overwrite) a record, creating the directory when missing.
    pub fn create(&self, name: &str, record: &ParameterRecord) -> Result<PathBuf> {
        check_name(name)?;
        record.validate()?;
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(name);
        fs::write(&path, record.to_text()?)?;
        debug!(path = %path.display(), "parameter record written");
        Ok(path)
    }
}

/// Record names are plain file names inside the records directory.
fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(CadcError::Validation(format!(
            "invalid record name {name:?}"
        )));
    }
    Ok(())
}

impl RecordReader for FsRecordStore {
    fn list(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            let matches = path
                .extension()
                .is_some_and(|ext| ext == self.extension.as_str());
            if !matches || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<ParameterRecord> {
        check_name(name)?;
        let path = self.path_for(name);
        let text = fs::read_to_string(&path)
            .map_err(|e| CadcError::from_io(e, format!("parameter record {}", path.display())))?;
        ParameterRecord::parse(&text)
    }
}
