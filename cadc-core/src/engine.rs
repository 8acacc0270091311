use crate::codec::codec;
use crate::config::Config;
use crate::crypto::exponent::Exponent;
use crate::crypto::kdf::{self, DerivedKey};
use crate::error::{CadcError, Result};
use crate::events::{Event, Phase, StatusSink};
use crate::pack::writer::pack;
use crate::read::extract::extract;
use crate::record::ParameterRecord;
use crate::util::paths::parent_dir;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct EncryptReport {
    pub archive: PathBuf,
    pub exponent: Exponent,
    pub entries: usize,
    pub skipped: usize,
}

impl EncryptReport {
    pub fn message(&self) -> String {
        let mut msg = format!(
            "created {} ({} entries)",
            self.archive.display(),
            self.entries
        );
        if self.skipped > 0 {
            msg.push_str(&format!(", {} skipped", self.skipped));
        }
        msg
    }
}

#[derive(Debug)]
pub struct DecryptReport {
    pub target: PathBuf,
    pub exponent: Exponent,
    pub entries: usize,
    pub created_dir: bool,
}

impl DecryptReport {
    pub fn message(&self) -> String {
        format!(
            "extracted {} entries into {}",
            self.entries,
            self.target.display()
        )
    }
}

#[derive(Debug)]
pub struct KeyReport {
    pub exponent: Exponent,
    pub key: DerivedKey,
    pub encoded: String,
}

/// Encrypts and decrypts archives whose password comes from a parameter
/// record and an exponent hidden in the archive's file name.
pub struct ArchiveCryptoEngine {
    config: Config,
}

/// One run's phase tracker; every event goes through it to the caller's sink.
struct Operation<'s> {
    phase: Phase,
    sink: &'s mut dyn StatusSink,
}

impl<'s> Operation<'s> {
    fn start(sink: &'s mut dyn StatusSink) -> Self {
        let mut op = Self {
            phase: Phase::Idle,
            sink,
        };
        op.enter(Phase::Preparing);
        op
    }

    fn enter(&mut self, next: Phase) {
        if next <= self.phase {
            debug!(from = %self.phase, to = %next, "ignoring backward phase change");
            return;
        }
        debug!(from = %self.phase, to = %next, "phase change");
        self.phase = next;
        self.sink.emit(Event::Phase(next));
    }

    fn settle<T>(mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.enter(Phase::Done),
            Err(e) => {
                warn!(error = %e, "operation failed");
                self.enter(Phase::Failed);
            }
        }
        result
    }

    fn status(&mut self, msg: impl Into<String>) {
        self.sink.emit(Event::Status(msg.into()));
    }
}

impl StatusSink for Operation<'_> {
    fn emit(&mut self, event: Event) {
        self.sink.emit(event);
    }
}

fn existing(path: &Path, what: &str) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| CadcError::from_io(e, format!("{what} {}", path.display())))
}

impl ArchiveCryptoEngine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Archive name for an exponent, e.g. `BbXx...{ext}`.
    pub fn archive_name(&self, exponent: &Exponent) -> String {
        format!(
            "{}.{}",
            codec().encode(&exponent.digits()),
            self.config.archive_extension
        )
    }

    /// Recover the exponent from an archive path's stem.
    pub fn exponent_from_name(&self, archive: &Path) -> Result<Exponent> {
        let ext_ok = archive
            .extension()
            .is_some_and(|e| e == self.config.archive_extension.as_str());
        if !ext_ok {
            return Err(CadcError::Format(format!(
                "{} is not a .{} archive",
                archive.display(),
                self.config.archive_extension
            )));
        }
        let stem = archive
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| CadcError::Format(format!("unreadable name {}", archive.display())))?;
        let digits = codec().decode(stem);
        if digits.is_empty() {
            return Err(CadcError::Format(format!(
                "no exponent could be decoded from {stem:?}"
            )));
        }
        Exponent::from_digits(&digits)
    }

    /// Pack `source` into `<encoded exponent>.<ext>` next to it. Draws a
    /// random exponent unless one is given.
    pub fn encrypt(
        &self,
        source: &Path,
        record: &ParameterRecord,
        exponent: Option<Exponent>,
        sink: &mut dyn StatusSink,
    ) -> Result<EncryptReport> {
        let mut op = Operation::start(sink);
        let result = self.run_encrypt(&mut op, source, record, exponent);
        op.settle(result)
    }

    fn run_encrypt(
        &self,
        op: &mut Operation<'_>,
        source: &Path,
        record: &ParameterRecord,
        exponent: Option<Exponent>,
    ) -> Result<EncryptReport> {
        let source = existing(source, "source")?;
        record.validate()?;
        let exponent = match exponent {
            Some(e) => e,
            None => Exponent::random()?,
        };
        op.status(format!("exponent: {exponent}"));
        op.status("deriving key");
        let key = kdf::derive_for(record, &exponent)?;

        let name = self.archive_name(&exponent);
        let archive = parent_dir(&source).join(&name);
        if archive.exists() {
            info!(archive = %archive.display(), "replacing existing archive");
            fs::remove_file(&archive)?;
        }

        op.enter(Phase::Encrypting);
        op.status(format!("creating {name}"));
        let summary = pack(&source, &archive, key.as_str(), &mut *op)?;
        info!(
            archive = %archive.display(),
            entries = summary.entries,
            skipped = summary.skipped,
            "archive created"
        );
        Ok(EncryptReport {
            archive,
            exponent,
            entries: summary.entries,
            skipped: summary.skipped,
        })
    }

    /// Verify and unpack an archive produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(
        &self,
        archive: &Path,
        record: &ParameterRecord,
        sink: &mut dyn StatusSink,
    ) -> Result<DecryptReport> {
        let mut op = Operation::start(sink);
        let result = self.run_decrypt(&mut op, archive, record);
        op.settle(result)
    }

    fn run_decrypt(
        &self,
        op: &mut Operation<'_>,
        archive: &Path,
        record: &ParameterRecord,
    ) -> Result<DecryptReport> {
        let archive = existing(archive, "archive")?;
        if !archive.is_file() {
            return Err(CadcError::Format(format!(
                "{} is not a file",
                archive.display()
            )));
        }
        let exponent = self.exponent_from_name(&archive)?;
        op.status(format!("exponent: {exponent}"));
        record.validate()?;
        op.status("deriving key");
        let key = kdf::derive_for(record, &exponent)?;

        op.enter(Phase::Decrypting);
        let summary = extract(
            &archive,
            key.as_str(),
            &self.config.extract_prefix,
            &mut *op,
        )?;
        info!(
            target = %summary.target.display(),
            entries = summary.entries,
            "archive extracted"
        );
        Ok(DecryptReport {
            target: summary.target,
            exponent,
            entries: summary.entries,
            created_dir: summary.created_dir,
        })
    }

    /// Derive a key without touching any files.
    pub fn generate_key(
        &self,
        record: &ParameterRecord,
        exponent: Option<Exponent>,
        sink: &mut dyn StatusSink,
    ) -> Result<KeyReport> {
        let mut op = Operation::start(sink);
        let result = self.run_generate_key(&mut op, record, exponent);
        op.settle(result)
    }

    fn run_generate_key(
        &self,
        op: &mut Operation<'_>,
        record: &ParameterRecord,
        exponent: Option<Exponent>,
    ) -> Result<KeyReport> {
        record.validate()?;
        let exponent = match exponent {
            Some(e) => e,
            None => Exponent::random()?,
        };
        let key = kdf::derive_for(record, &exponent)?;
        let encoded = codec().encode(key.as_str());
        op.emit(Event::Key {
            exponent: exponent.to_string(),
            key: key.as_str().to_string(),
            encoded: encoded.clone(),
        });
        Ok(KeyReport {
            exponent,
            key,
            encoded,
        })
    }
}
