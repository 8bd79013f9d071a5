use crate::{EqError, EqResult};

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparisons.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Purely relative comparison (abs = 0).
    pub fn relative(rel: Real) -> Self {
        Self { abs: 0.0, rel }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// |value - reference| / |reference|. Infinite when the reference is zero
/// and the values differ.
pub fn relative_error(value: Real, reference: Real) -> Real {
    let diff = (value - reference).abs();
    if diff == 0.0 {
        return 0.0;
    }
    diff / reference.abs()
}

pub fn ensure_finite(v: Real, what: &'static str) -> EqResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(EqError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> EqResult<Real> {
    ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(EqError::InvalidArg { what })
    }
}

pub fn ensure_same_len(what: &'static str, expected: usize, actual: usize) -> EqResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(EqError::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn relative_tolerance_ignores_abs() {
        let tol = Tolerances::relative(1e-9);
        assert_eq!(tol.abs, 0.0);
        assert!(nearly_equal(12.0, 12.0 + 1e-9, tol));
        assert!(!nearly_equal(0.0, 1e-13, tol));
    }

    #[test]
    fn relative_error_basic() {
        assert_eq!(relative_error(12.0, 12.0), 0.0);
        assert!((relative_error(12.12, 12.0) - 0.01).abs() < 1e-12);
        assert!(relative_error(1.0, 0.0).is_infinite());
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert!(ensure_positive(1e-3, "dc").is_ok());
        assert_eq!(
            ensure_positive(0.0, "dc").unwrap_err(),
            EqError::InvalidArg { what: "dc" }
        );
        assert!(ensure_positive(-1.0, "dc").is_err());
        assert!(matches!(
            ensure_positive(Real::INFINITY, "dc"),
            Err(EqError::NonFinite { .. })
        ));
    }

    #[test]
    fn ensure_same_len_reports_both_lengths() {
        assert!(ensure_same_len("stoichiometry", 2, 2).is_ok());
        let msg = ensure_same_len("stoichiometry", 2, 3).unwrap_err().to_string();
        assert!(msg.contains("expected=2"));
        assert!(msg.contains("actual=3"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn nearly_equal_is_symmetric(a in -1e6_f64..1e6, b in -1e6_f64..1e6) {
            let tol = Tolerances::default();
            prop_assert_eq!(nearly_equal(a, b, tol), nearly_equal(b, a, tol));
        }
    }
}
