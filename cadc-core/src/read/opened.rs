use crate::error::{CadcError, Result};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

const WRONG_KEY: &str = "wrong key or corrupted archive";

fn wrong_key(err: impl std::fmt::Display) -> CadcError {
    debug!(error = %err, "archive rejected");
    CadcError::Crypto(WRONG_KEY.to_string())
}

/// An archive opened with a candidate password.
pub struct OpenedArchive<'k> {
    zip: ZipArchive<BufReader<File>>,
    password: &'k [u8],
}

impl<'k> OpenedArchive<'k> {
    pub fn open(path: &Path, password: &'k str) -> Result<Self> {
        let f = File::open(path)
            .map_err(|e| CadcError::from_io(e, format!("archive {}", path.display())))?;
        let zip = ZipArchive::new(BufReader::new(f)).map_err(wrong_key)?;
        Ok(Self {
            zip,
            password: password.as_bytes(),
        })
    }

    pub fn len(&self) -> usize {
        self.zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zip.is_empty()
    }

    /// Decrypt every entry into a sink. Both the password check and the
    /// authentication code of each entry run before anything is written.
    pub fn verify(&mut self) -> Result<()> {
        if self.zip.is_empty() {
            return Err(CadcError::Format("archive has no entries".to_string()));
        }
        for index in 0..self.zip.len() {
            let mut entry = self
                .zip
                .by_index_decrypt(index, self.password)
                .map_err(wrong_key)?;
            io::copy(&mut entry, &mut io::sink()).map_err(wrong_key)?;
        }
        Ok(())
    }

    /// Write entry `index` below `dest`, returning the path created.
    /// Names that would escape `dest` are rejected.
    pub fn extract_entry(&mut self, index: usize, dest: &Path) -> Result<PathBuf> {
        let mut entry = self
            .zip
            .by_index_decrypt(index, self.password)
            .map_err(wrong_key)?;
        let rel = entry
            .enclosed_name()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| CadcError::Format(format!("unsafe entry name {:?}", entry.name())))?;
        let out = dest.join(rel);
        if entry.is_dir() {
            fs::create_dir_all(&out)?;
            return Ok(out);
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut f = File::create(&out)?;
        io::copy(&mut entry, &mut f)?;
        Ok(out)
    }
}
