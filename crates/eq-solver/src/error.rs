//! Error types for solver operations.

use eq_core::ensure_same_len;
use eq_core::error::EqError;
use thiserror::Error;

/// Errors raised at the solver boundary.
///
/// Non-convergence is not an error: it is reported through
/// [`crate::EquilibriumResult::converged`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    #[error(
        "Length mismatch: {concentrations} concentrations vs {stoichiometry} stoichiometric coefficients"
    )]
    LengthMismatch {
        concentrations: usize,
        stoichiometry: usize,
    },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: String },

    #[error("Core error: {0}")]
    Core(#[from] EqError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for EqError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::InvalidInput { what: _ } => EqError::InvalidArg { what: "input" },
            SolverError::LengthMismatch {
                concentrations,
                stoichiometry,
            } => EqError::LengthMismatch {
                what: "stoichiometry",
                expected: concentrations,
                actual: stoichiometry,
            },
            SolverError::NonPhysical { what: _ } => EqError::Invariant {
                what: "non-physical",
            },
            SolverError::Core(inner) => inner,
        }
    }
}

pub(crate) fn check_lengths(concentrations: &[f64], stoichiometry: &[f64]) -> SolverResult<()> {
    ensure_same_len("stoichiometry", concentrations.len(), stoichiometry.len()).map_err(|_| {
        SolverError::LengthMismatch {
            concentrations: concentrations.len(),
            stoichiometry: stoichiometry.len(),
        }
    })?;
    if concentrations.is_empty() {
        return Err(SolverError::InvalidInput {
            what: "at least one species is required".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_mismatch_converts_to_core_error() {
        let err: EqError = SolverError::LengthMismatch {
            concentrations: 2,
            stoichiometry: 3,
        }
        .into();
        assert_eq!(
            err,
            EqError::LengthMismatch {
                what: "stoichiometry",
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn check_lengths_reports_both_lengths() {
        assert_eq!(
            check_lengths(&[0.2, 0.1], &[-2.0]),
            Err(SolverError::LengthMismatch {
                concentrations: 2,
                stoichiometry: 1
            })
        );
    }

    #[test]
    fn check_lengths_rejects_empty() {
        assert!(matches!(
            check_lengths(&[], &[]),
            Err(SolverError::InvalidInput { .. })
        ));
        assert!(check_lengths(&[0.1], &[-1.0]).is_ok());
    }
}
