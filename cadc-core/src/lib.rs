#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod events;

pub mod util {
    pub mod paths;
}

pub mod codec;

pub mod crypto {
    pub mod exponent;
    pub mod kdf;
    pub mod random;
}

pub mod record;
pub mod repo;
pub mod repo_fs;

pub mod pack {
    pub mod walker;
    pub mod writer;
}

pub mod read {
    pub mod extract;
    pub mod opened;
}

pub mod engine;
pub mod task;

// Re-exports: stable API surface
pub use codec::{Codec, codec};
pub use config::Config;
pub use crypto::exponent::Exponent;
pub use crypto::kdf::{DerivedKey, derive};
pub use engine::{ArchiveCryptoEngine, DecryptReport, EncryptReport, KeyReport};
pub use error::{CadcError, Result};
pub use events::{Event, Phase, StatusSink};
pub use record::ParameterRecord;
pub use repo::RecordReader;
pub use repo_fs::FsRecordStore;
pub use task::{Job, Outcome, TaskHandle, TaskRunner};
