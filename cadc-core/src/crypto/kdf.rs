//! Deterministic key derivation: `base ^ (exponent + offset)` in base-10
//! arbitrary precision, then a fixed window of the resulting digits.

use crate::crypto::exponent::Exponent;
use crate::error::{CadcError, Result};
use crate::record::ParameterRecord;
use dashu_float::DBig;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

pub const MAX_KEY_LENGTH: usize = 99;

// Beyond this many result digits the exact integer-power path hands over to powf.
const EXACT_POWER_DIGIT_LIMIT: usize = 1_000_000;

/// Digit string used as the archive password. Wiped on drop.
pub struct DerivedKey(Zeroizing<String>);

impl DerivedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerivedKey(<{} digits>)", self.0.len())
    }
}

/// Checks `0 < key_length < precision` and `key_length <= 99`.
pub fn validate_lengths(precision: i64, key_length: i64) -> Result<(usize, usize)> {
    if precision <= 0 {
        return Err(CadcError::Validation(format!(
            "precision must be positive, got {precision}"
        )));
    }
    if key_length <= 0 {
        return Err(CadcError::Validation(format!(
            "key length must be positive, got {key_length}"
        )));
    }
    if key_length >= precision {
        return Err(CadcError::Validation(format!(
            "key length {key_length} must be smaller than precision {precision}"
        )));
    }
    if key_length > MAX_KEY_LENGTH as i64 {
        return Err(CadcError::Validation(format!(
            "key length {key_length} exceeds {MAX_KEY_LENGTH}"
        )));
    }
    Ok((precision as usize, key_length as usize))
}

pub fn parse_decimal(field: &str, text: &str) -> Result<DBig> {
    DBig::from_str(text.trim())
        .map_err(|e| CadcError::Parameter(format!("{field} {text:?} is not a decimal number: {e}")))
}

pub fn derive_for(record: &ParameterRecord, exponent: &Exponent) -> Result<DerivedKey> {
    derive(
        &record.base,
        &record.offset,
        record.precision as i64,
        record.key_length as i64,
        exponent,
    )
}

pub fn derive(
    base: &str,
    offset: &str,
    precision: i64,
    key_length: i64,
    exponent: &Exponent,
) -> Result<DerivedKey> {
    let (precision, key_length) = validate_lengths(precision, key_length)?;

    let base = parse_decimal("base", base)?.with_precision(precision).value();
    let offset = parse_decimal("offset", offset)?
        .with_precision(precision)
        .value();
    if base <= DBig::ZERO {
        return Err(CadcError::Validation(
            "base must be greater than zero".to_string(),
        ));
    }
    let exponent = parse_decimal("exponent", &exponent.to_string())?
        .with_precision(precision)
        .value();

    let power = exponent + offset;
    let digits = Zeroizing::new(match raise(&base, &power, precision) {
        Power::Exact(sig, exp) => render_digits(&sig, exp, precision),
        Power::Rounded(value) => {
            let (sig, exp) = padded_parts(&value, precision);
            render_digits(&sig, exp, precision)
        }
    });

    if digits.len() < precision {
        return Err(CadcError::Truncation {
            available: digits.len(),
            required: precision,
        });
    }
    Ok(DerivedKey(Zeroizing::new(
        digits[precision - key_length..precision].to_string(),
    )))
}

enum Power {
    /// Exact result that fits the precision; keeps its natural digits.
    Exact(String, isize),
    Rounded(DBig),
}

fn raise(base: &DBig, power: &DBig, precision: usize) -> Power {
    if let Some(n) = natural_value(power) {
        let base_sig = base.repr().significand();
        let base_digits = base_sig.to_string().len();
        if base_digits.saturating_mul(n) <= EXACT_POWER_DIGIT_LIMIT {
            let sig = base_sig.pow(n);
            let exp = base.repr().exponent() * n as isize;
            let text = sig.to_string();
            if text.trim_end_matches('0').len() <= precision {
                return Power::Exact(text, exp);
            }
            let rounded = DBig::from_parts(sig, exp)
                .with_precision(precision)
                .value();
            return Power::Rounded(rounded);
        }
    }
    Power::Rounded(base.powf(power))
}

/// `Some(n)` when the value is a non-negative integer that fits in usize.
fn natural_value(value: &DBig) -> Option<usize> {
    let sig = value.repr().significand().to_string();
    if sig.starts_with('-') {
        return None;
    }
    let exp = value.repr().exponent();
    let int_text = if exp >= 0 {
        let mut s = sig;
        s.extend(std::iter::repeat_n('0', exp as usize));
        s
    } else {
        let frac = exp.unsigned_abs();
        if sig == "0" {
            return Some(0);
        }
        if sig.len() <= frac {
            return None;
        }
        let (int, tail) = sig.split_at(sig.len() - frac);
        if !tail.bytes().all(|b| b == b'0') {
            return None;
        }
        int.to_string()
    };
    int_text.parse().ok()
}

/// Inexact results always carry exactly `precision` significant digits.
fn padded_parts(value: &DBig, precision: usize) -> (String, isize) {
    let mut sig = value.repr().significand().to_string();
    let mut exp = value.repr().exponent();
    if sig.len() < precision {
        let pad = precision - sig.len();
        sig.extend(std::iter::repeat_n('0', pad));
        exp -= pad as isize;
    }
    (sig, exp)
}

/// Integer digits followed by fractional digits, decimal point dropped,
/// cut off after `limit` digits. Values below one render as `0` plus the
/// fractional digits.
fn render_digits(significand: &str, exponent: isize, limit: usize) -> String {
    let mut s = String::with_capacity(limit);
    if exponent >= 0 {
        s.push_str(&significand[..significand.len().min(limit)]);
        let zeros = exponent.unsigned_abs().min(limit - s.len());
        s.extend(std::iter::repeat_n('0', zeros));
        return s;
    }
    let frac = exponent.unsigned_abs();
    if significand.len() > frac {
        s.push_str(&significand[..significand.len().min(limit)]);
        return s;
    }
    s.push('0');
    let zeros = (frac - significand.len()).min(limit.saturating_sub(1));
    s.extend(std::iter::repeat_n('0', zeros));
    let room = limit.saturating_sub(s.len());
    s.push_str(&significand[..significand.len().min(room)]);
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn exp(s: &str) -> Exponent {
        s.parse().unwrap()
    }

    #[test]
    fn reference_example_is_stable() {
        let e = exp("123.45678");
        let a = derive("12345.6789", "0.001", 50, 20, &e).unwrap();
        let b = derive("12345.6789", "0.001", 50, 20, &e).unwrap();
        assert_eq!(a.len(), 20);
        assert!(a.as_str().bytes().all(|c| c.is_ascii_digit()));
        assert_eq!(a.as_str(), b.as_str());
    }

    #[test]
    fn offset_changes_key() {
        let e = exp("123.45678");
        let a = derive("12345.6789", "0.001", 50, 20, &e).unwrap();
        let b = derive("12345.6789", "0.002", 50, 20, &e).unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn value_below_one_keeps_leading_zeros() {
        let k = derive("0.5", "0.1", 40, 10, &exp("3")).unwrap();
        assert_eq!(k.len(), 10);
    }

    #[test]
    fn short_exact_result_is_truncation() {
        // 10 ^ (2.5 + 0.5) = 1000, four digits against a precision of 50
        let err = derive("10", "0.5", 50, 20, &exp("2.5")).unwrap_err();
        match err {
            CadcError::Truncation {
                available,
                required,
            } => {
                assert_eq!(available, 4);
                assert_eq!(required, 50);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn exact_integer_power_window() {
        // 12^20 = 3833759992447475122176 (22 digits)
        let k = derive("12", "0", 22, 5, &exp("20")).unwrap();
        assert_eq!(k.as_str(), "22176");
    }

    #[test]
    fn length_rules_are_checked_first() {
        for (p, k) in [(0, 1), (10, 0), (10, 10), (10, 12), (200, 100), (-3, 1)] {
            assert!(
                matches!(
                    derive("not a number", "0", p, k, &exp("1")),
                    Err(CadcError::Validation(_))
                ),
                "precision {p} key {k}"
            );
        }
    }

    #[test]
    fn bad_decimals_are_parameter_errors() {
        assert!(matches!(
            derive("12a", "0", 50, 20, &exp("1")),
            Err(CadcError::Parameter(_))
        ));
        assert!(matches!(
            derive("12", "zero", 50, 20, &exp("1")),
            Err(CadcError::Parameter(_))
        ));
    }

    #[test]
    fn non_positive_base_is_rejected() {
        assert!(matches!(
            derive("-2", "0", 50, 20, &exp("1.5")),
            Err(CadcError::Validation(_))
        ));
        assert!(matches!(
            derive("0", "0", 50, 20, &exp("1.5")),
            Err(CadcError::Validation(_))
        ));
    }

    #[test]
    fn debug_output_hides_digits() {
        let k = derive("12345.6789", "0.001", 50, 20, &exp("123.45678")).unwrap();
        let shown = format!("{k:?}");
        assert!(!shown.contains(k.as_str()));
    }

    #[test]
    fn render_digits_layouts() {
        assert_eq!(render_digits("12345", -2, 10), "12345");
        assert_eq!(render_digits("12", 3, 10), "12000");
        assert_eq!(render_digits("12", -4, 10), "00012");
    }

    #[test]
    fn render_digits_stops_at_limit() {
        assert_eq!(render_digits("12", isize::MAX, 6), "120000");
        assert_eq!(render_digits("123456789", 2, 4), "1234");
        assert_eq!(render_digits("12", isize::MIN + 1, 5), "00000");
        assert_eq!(render_digits("12", -5, 5), "00001");
    }

    #[test]
    fn huge_exponent_only_renders_the_window() {
        // 10^12 as exponent: the integer part has trillions of digits
        let e = Exponent::from_units(100_000_000_000_000_000).unwrap();
        let k = derive("12345.6789", "0.001", 50, 20, &e).unwrap();
        assert_eq!(k.len(), 20);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn key_has_requested_length(key_len in 1i64..=99, extra in 1i64..=30, units in 100_000u64..=99_999_999) {
            let e = Exponent::from_units(units).unwrap();
            let k = derive("12345.6789", "0.001", key_len + extra, key_len, &e).unwrap();
            prop_assert_eq!(k.len(), key_len as usize);
        }
    }
}
