//! Displacement from equilibrium in log-quotient space.

use crate::quotient::{Quotient, compute_q};

/// Force used when a reactant has vanished: run the reaction backward.
pub const UNDEFINED_REACTANT_FORCE: f64 = -1.0;

/// Force used when a product has vanished (Q = 0): run the reaction forward.
pub const VANISHED_PRODUCT_FORCE: f64 = 1.0;

/// pKeq = -log10(Keq).
#[inline]
pub fn p_keq(keq: f64) -> f64 {
    -keq.log10()
}

/// Force = -log10(Q) - pKeq.
///
/// Zero at equilibrium, positive when Q < Keq (proceed forward) and negative
/// when Q > Keq. Undefined quotients map to the finite sentinels
/// [`UNDEFINED_REACTANT_FORCE`] and [`VANISHED_PRODUCT_FORCE`] so the
/// relaxation step stays bounded.
pub fn compute_force(concentrations: &[f64], stoichiometry: &[f64], pkeq: f64) -> f64 {
    match compute_q(concentrations, stoichiometry) {
        Quotient::UndefinedReactant => UNDEFINED_REACTANT_FORCE,
        Quotient::Value(q) if q == 0.0 => VANISHED_PRODUCT_FORCE,
        Quotient::Value(q) => -q.log10() - pkeq,
    }
}
