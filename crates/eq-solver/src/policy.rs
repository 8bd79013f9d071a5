//! Step-size adaptation rules.
//!
//! The two adaptation rules are independent predicates on consecutive forces,
//! evaluated in a fixed order: decrease on sign change, then increase on same
//! sign. A sign change and a same-sign pair are mutually exclusive, so at most
//! one rule fires per iteration.

/// Halving attempts the updater makes while enforcing positivity.
pub const MAX_HALVING_ATTEMPTS: usize = 5;

/// Step multiplier after the force changes sign (overshoot).
pub const SIGN_CHANGE_FACTOR: f64 = 0.5;

/// Step multiplier while the force keeps its sign (monotone approach).
pub const SAME_SIGN_FACTOR: f64 = 1.5;

/// Which adaptive behaviours are enabled for a solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepPolicy {
    /// Halve the step when the force changes sign.
    pub decrease_on_sign_change: bool,
    /// Grow the step by 1.5x when the force keeps its sign.
    pub increase_on_same_sign: bool,
    /// Shrink the step inside the updater to keep concentrations positive.
    pub ensure_positive: bool,
}

impl StepPolicy {
    /// Fixed step size, no positivity enforcement.
    pub fn fixed() -> Self {
        Self::default()
    }

    /// Every adaptive behaviour enabled.
    pub fn adaptive() -> Self {
        Self {
            decrease_on_sign_change: true,
            increase_on_same_sign: true,
            ensure_positive: true,
        }
    }

    /// Step size for the next iteration given the previous and new force.
    pub fn adapt(&self, step_size: f64, prev_force: f64, new_force: f64) -> f64 {
        let mut step = step_size;
        if self.decrease_on_sign_change && is_overshoot(prev_force, new_force) {
            step *= SIGN_CHANGE_FACTOR;
        }
        if self.increase_on_same_sign && is_monotone(prev_force, new_force) {
            step *= SAME_SIGN_FACTOR;
        }
        step
    }
}

/// The force flipped sign between iterations.
#[inline]
pub fn is_overshoot(prev_force: f64, new_force: f64) -> bool {
    prev_force * new_force < 0.0
}

/// The force kept a strict sign between iterations.
#[inline]
pub fn is_monotone(prev_force: f64, new_force: f64) -> bool {
    prev_force * new_force > 0.0
}
