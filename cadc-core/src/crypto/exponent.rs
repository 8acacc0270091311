use crate::crypto::random::uniform_inclusive;
use crate::error::{CadcError, Result};
use std::fmt;
use std::str::FromStr;

pub const FRACTION_DIGITS: usize = 5;
const SCALE: u64 = 100_000;

/// Smallest accepted exponent, 1.00000. Anything below would encode to a
/// digit string with a leading zero, which the file-name codec cannot carry.
pub const MIN_UNITS: u64 = SCALE;
/// Upper end of the random draw, 999.99999.
pub const RANDOM_MAX_UNITS: u64 = 1000 * SCALE - 1;

/// Exponent with exactly five fractional digits, stored as a count of
/// 10^-5 units so its text form is fixed the moment it exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Exponent {
    units: u64,
}

impl Exponent {
    pub fn from_units(units: u64) -> Result<Self> {
        if units < MIN_UNITS {
            return Err(CadcError::Validation(format!(
                "exponent {}.{:05} is below 1.00000",
                units / SCALE,
                units % SCALE
            )));
        }
        Ok(Self { units })
    }

    /// Uniform draw from `[1.00000, 999.99999]`.
    pub fn random() -> Result<Self> {
        Self::from_units(uniform_inclusive(MIN_UNITS, RANDOM_MAX_UNITS)?)
    }

    pub fn units(&self) -> u64 {
        self.units
    }

    /// The text form with the decimal point removed.
    pub fn digits(&self) -> String {
        format!("{}{:05}", self.units / SCALE, self.units % SCALE)
    }

    /// Inverse of [`Exponent::digits`]: the point goes five digits from the end.
    pub fn from_digits(digits: &str) -> Result<Self> {
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CadcError::Format(format!(
                "exponent digits contain non-digit characters: {digits:?}"
            )));
        }
        if digits.len() <= FRACTION_DIGITS {
            return Err(CadcError::Format(format!(
                "exponent digits too short ({} < {})",
                digits.len(),
                FRACTION_DIGITS + 1
            )));
        }
        let (int, frac) = digits.split_at(digits.len() - FRACTION_DIGITS);
        from_parts(int, frac)
    }
}

fn from_parts(int: &str, frac: &str) -> Result<Exponent> {
    let whole: u64 = int
        .parse()
        .map_err(|e| CadcError::Format(format!("exponent integer part {int:?}: {e}")))?;
    let mut frac_units = 0u64;
    for (i, b) in frac.bytes().enumerate() {
        frac_units += u64::from(b - b'0') * 10u64.pow((FRACTION_DIGITS - 1 - i) as u32);
    }
    let units = whole
        .checked_mul(SCALE)
        .and_then(|u| u.checked_add(frac_units))
        .ok_or_else(|| CadcError::Format(format!("exponent {int}.{frac} out of range")))?;
    Exponent::from_units(units)
}

impl FromStr for Exponent {
    type Err = CadcError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (int, frac) = s.split_once('.').unwrap_or((s, ""));
        let digits_only = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if int.is_empty() || !digits_only(int) || !digits_only(frac) {
            return Err(CadcError::Format(format!("invalid exponent {s:?}")));
        }
        if frac.len() > FRACTION_DIGITS {
            return Err(CadcError::Format(format!(
                "exponent {s:?} has more than {FRACTION_DIGITS} fractional digits"
            )));
        }
        from_parts(int, frac)
    }
}

impl fmt::Display for Exponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:05}", self.units / SCALE, self.units % SCALE)
    }
}
