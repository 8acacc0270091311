use crate::crypto::kdf::{parse_decimal, validate_lengths};
use crate::crypto::random::uniform_inclusive;
use crate::error::{CadcError, Result};
use dashu_float::DBig;
use serde::{Deserialize, Serialize};

/// Stored inputs for key derivation. Built through [`ParameterRecord::new`]
/// or [`ParameterRecord::parse`], both of which validate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterRecord {
    pub base: String,
    pub offset: String,
    pub precision: usize,
    pub key_length: usize,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
        }
    }

    fn integer(self, field: &str) -> Result<i64> {
        let parsed = match &self {
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Number(n) => n.as_i64(),
        };
        parsed.ok_or_else(|| {
            CadcError::Format(format!("{field} must be an integer, got {}", self.into_text()))
        })
    }
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(alias = "PK")]
    base: Scalar,
    #[serde(alias = "PK2")]
    offset: Scalar,
    #[serde(alias = "prec")]
    precision: Scalar,
    #[serde(rename = "keyLength", alias = "key_len", alias = "key_length")]
    key_length: Scalar,
}

#[derive(Serialize)]
struct StoredRecord<'a> {
    base: &'a str,
    offset: &'a str,
    precision: String,
    #[serde(rename = "keyLength")]
    key_length: String,
}

impl ParameterRecord {
    pub fn new(
        base: impl Into<String>,
        offset: impl Into<String>,
        precision: i64,
        key_length: i64,
    ) -> Result<Self> {
        let (precision, key_length) = validate_lengths(precision, key_length)?;
        let base = base.into().trim().to_string();
        let offset = offset.into().trim().to_string();
        if parse_decimal("base", &base)? <= DBig::ZERO {
            return Err(CadcError::Validation(
                "base must be greater than zero".to_string(),
            ));
        }
        parse_decimal("offset", &offset)?;
        Ok(Self {
            base,
            offset,
            precision,
            key_length,
        })
    }

    pub fn validate(&self) -> Result<()> {
        Self::new(
            self.base.as_str(),
            self.offset.as_str(),
            self.precision as i64,
            self.key_length as i64,
        )
        .map(|_| ())
    }

    /// Parse a key/value literal. Single- and double-quoted strings are both
    /// accepted, as are the short field names `PK`, `PK2`, `prec`, `key_len`.
    pub fn parse(text: &str) -> Result<Self> {
        let normalized = text.trim().replace('\'', "\"");
        let raw: RawRecord = serde_json::from_str(&normalized)
            .map_err(|e| CadcError::Format(format!("parameter record: {e}")))?;
        let precision = raw.precision.integer("precision")?;
        let key_length = raw.key_length.integer("keyLength")?;
        Self::new(
            raw.base.into_text(),
            raw.offset.into_text(),
            precision,
            key_length,
        )
    }

    pub fn to_text(&self) -> Result<String> {
        let stored = StoredRecord {
            base: &self.base,
            offset: &self.offset,
            precision: self.precision.to_string(),
            key_length: self.key_length.to_string(),
        };
        serde_json::to_string_pretty(&stored)
            .map_err(|e| CadcError::Format(format!("parameter record: {e}")))
    }

    /// Fresh random record: base and offset in `[999, 99999.99999]`,
    /// precision in `[4000, 5000]`, key length in `[30, 40]`.
    pub fn random() -> Result<Self> {
        let decimal = || -> Result<String> {
            let units = uniform_inclusive(99_900_000, 9_999_999_999)?;
            Ok(format!("{}.{:05}", units / 100_000, units % 100_000))
        };
        let base = decimal()?;
        let offset = decimal()?;
        let precision = uniform_inclusive(4000, 5000)? as i64;
        let key_length = uniform_inclusive(30, 40)? as i64;
        Self::new(base, offset, precision, key_length)
    }
}
