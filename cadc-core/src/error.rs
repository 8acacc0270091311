use thiserror::Error;

#[derive(Error, Debug)]
pub enum CadcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Parameter error: {0}")]
    Parameter(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Format error: {0}")]
    Format(String),

    /// Wrong derived password and a corrupted container look the same from here.
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error(
        "Truncation error: derived digit string has {available} digits, precision requires {required}"
    )]
    Truncation { available: usize, required: usize },
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, CadcError>;

impl CadcError {
    /// `NotFound` I/O failures become `CadcError::NotFound` naming `what`.
    pub fn from_io(err: std::io::Error, what: impl std::fmt::Display) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CadcError::NotFound(what.to_string()),
            _ => CadcError::Io(err),
        }
    }
}
