use crate::error::{CadcError, Result};
use rand::Rng;

/// Uniform integer in `lo..=hi` from the thread-local CSPRNG.
pub fn uniform_inclusive(lo: u64, hi: u64) -> Result<u64> {
    if hi < lo {
        return Err(CadcError::Validation(format!("empty range {lo}..={hi}")));
    }
    Ok(rand::thread_rng().gen_range(lo..=hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_range() {
        for _ in 0..1000 {
            let v = uniform_inclusive(30, 40).unwrap();
            assert!((30..=40).contains(&v));
        }
    }

    #[test]
    fn full_range_is_accepted() {
        assert!(uniform_inclusive(0, u64::MAX).is_ok());
    }

    #[test]
    fn single_value_range() {
        assert_eq!(uniform_inclusive(7, 7).unwrap(), 7);
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            uniform_inclusive(5, 4),
            Err(CadcError::Validation(_))
        ));
    }
}
