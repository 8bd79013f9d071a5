//! One relaxation step: c_i <- c_i + dc * nu_i * force.

use crate::error::{SolverError, SolverResult, check_lengths};
use crate::policy::MAX_HALVING_ATTEMPTS;
use eq_core::ensure_positive;

/// Concentrations after one update and the step size actually used.
#[derive(Clone, Debug, PartialEq)]
pub struct StepUpdate {
    pub concentrations: Vec<f64>,
    /// Step size applied. Smaller than the requested one when positivity
    /// enforcement had to halve it; this value carries into later iterations.
    pub step_size: f64,
    /// Number of halvings performed (at most [`MAX_HALVING_ATTEMPTS`]).
    pub halvings: usize,
}

/// Apply one relaxation step.
///
/// With `ensure_positive`, a trial update that leaves any concentration at or
/// below zero halves the step and retries, for up to
/// [`MAX_HALVING_ATTEMPTS`] attempts. If every attempt fails, the update is
/// applied with the step halved that many times; positivity is not guaranteed.
pub fn update_concentrations(
    concentrations: &[f64],
    stoichiometry: &[f64],
    force: f64,
    step_size: f64,
    ensure_positive_conc: bool,
) -> SolverResult<StepUpdate> {
    check_lengths(concentrations, stoichiometry)?;
    ensure_positive(step_size, "step size must be positive")?;
    if !force.is_finite() {
        return Err(SolverError::InvalidInput {
            what: format!("force must be finite, got {force}"),
        });
    }
    Ok(relax(
        concentrations,
        stoichiometry,
        force,
        step_size,
        ensure_positive_conc,
    ))
}

/// Unchecked form used by the driver once inputs are validated.
pub(crate) fn relax(
    concentrations: &[f64],
    stoichiometry: &[f64],
    force: f64,
    step_size: f64,
    ensure_positive_conc: bool,
) -> StepUpdate {
    let mut dc = step_size;
    let mut halvings = 0;

    if ensure_positive_conc {
        for _ in 0..MAX_HALVING_ATTEMPTS {
            let trial = step(concentrations, stoichiometry, force, dc);
            if trial.iter().all(|&c| c > 0.0) {
                return StepUpdate {
                    concentrations: trial,
                    step_size: dc,
                    halvings,
                };
            }
            dc /= 2.0;
            halvings += 1;
        }
    }

    StepUpdate {
        concentrations: step(concentrations, stoichiometry, force, dc),
        step_size: dc,
        halvings,
    }
}

fn step(concentrations: &[f64], stoichiometry: &[f64], force: f64, dc: f64) -> Vec<f64> {
    concentrations
        .iter()
        .zip(stoichiometry)
        .map(|(&c, &nu)| c + dc * nu * force)
        .collect()
}
