// cadc_core/src/repo.rs
use crate::error::Result;
use crate::record::ParameterRecord;

/// Source of parameter records, looked up by name.
pub trait RecordReader: Send + Sync {
    /// Names as accepted by [`read`](Self::read), sorted.
    fn list(&self) -> Result<Vec<String>>;

    /// Returns a validated record, or `CadcError::NotFound`.
    fn read(&self, name: &str) -> Result<ParameterRecord>;
}
