//! Closed-form solution of 2A <=> B, used to cross-check the iterative solver.
//!
//! With initial concentrations a, b and extent x, mass action gives
//! (b + x) / (a - 2x)^2 = Keq, i.e. 4 Keq x^2 - (4 a Keq + 1) x + (Keq a^2 - b) = 0.

use crate::error::{SolverError, SolverResult};
use eq_core::{ensure_finite, ensure_positive};

/// Both roots of the extent equation, x0 <= x1.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicAnalyticRoots {
    pub x0: f64,
    pub x1: f64,
}

impl BasicAnalyticRoots {
    /// First root whose concentrations `[a - 2x, b + x]` are both non-negative.
    pub fn physical_root(&self, a: f64, b: f64) -> Option<f64> {
        [self.x0, self.x1]
            .into_iter()
            .find(|&x| concentrations_for(a, b, x).iter().all(|&c| c >= 0.0))
    }
}

/// Concentrations `[A, B]` after extent `x` from initial `a`, `b`.
pub fn concentrations_for(a: f64, b: f64, x: f64) -> [f64; 2] {
    [a - 2.0 * x, b + x]
}

/// Solve 2A <=> B for the reaction extent.
///
/// A negative discriminant has no real extent and is rejected with
/// [`SolverError::NonPhysical`].
pub fn solve_basic_analytic(
    conc_a: f64,
    conc_b: f64,
    keq: f64,
) -> SolverResult<BasicAnalyticRoots> {
    let a = ensure_finite(conc_a, "initial concentration of A")?;
    let b = ensure_finite(conc_b, "initial concentration of B")?;
    let k = ensure_positive(keq, "equilibrium constant must be positive")?;

    let discriminant = 8.0 * a * k + 16.0 * b * k + 1.0;
    if discriminant < 0.0 {
        return Err(SolverError::NonPhysical {
            what: format!(
                "negative discriminant {discriminant} for a={a}, b={b}, Keq={k}; no real extent"
            ),
        });
    }

    let sqrt_disc = discriminant.sqrt();
    let x0 = (-sqrt_disc + 4.0 * a * k + 1.0) / (8.0 * k);
    let x1 = (sqrt_disc + 4.0 * a * k + 1.0) / (8.0 * k);

    Ok(BasicAnalyticRoots { x0, x1 })
}
