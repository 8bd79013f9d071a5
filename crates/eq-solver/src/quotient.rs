//! Reaction quotient Q = prod(c_i ^ nu_i).

/// Outcome of evaluating the reaction quotient.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quotient {
    /// Finite, non-negative quotient. Zero when a product has vanished.
    Value(f64),
    /// A reactant concentration is exactly zero, so Q would divide by zero.
    UndefinedReactant,
}

impl Quotient {
    pub fn value(self) -> Option<f64> {
        match self {
            Quotient::Value(q) => Some(q),
            Quotient::UndefinedReactant => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Quotient::UndefinedReactant)
    }
}

/// Compute Q from index-aligned concentrations and stoichiometric coefficients.
///
/// Negative coefficients mark reactants, positive mark products. A reactant at
/// exactly zero yields [`Quotient::UndefinedReactant`]; a product at exactly
/// zero yields `Quotient::Value(0.0)`.
pub fn compute_q(concentrations: &[f64], stoichiometry: &[f64]) -> Quotient {
    debug_assert_eq!(concentrations.len(), stoichiometry.len());

    let mut q = 1.0;
    for (&c, &nu) in concentrations.iter().zip(stoichiometry) {
        if c == 0.0 && nu < 0.0 {
            return Quotient::UndefinedReactant;
        }
        q *= c.powf(nu);
    }
    Quotient::Value(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eq_core::{Tolerances, nearly_equal};

    #[test]
    fn two_a_to_b() {
        // Q = [B] / [A]^2 = 0.1 / 0.04
        let q = compute_q(&[0.2, 0.1], &[-2.0, 1.0]).value().unwrap();
        assert!((q - 2.5).abs() < 1e-10);
    }

    #[test]
    fn a_plus_b_to_c() {
        // Q = [C] / ([A][B]) = 0.05 / 0.02
        let q = compute_q(&[0.1, 0.2, 0.05], &[-1.0, -1.0, 1.0])
            .value()
            .unwrap();
        assert!(nearly_equal(q, 2.5, Tolerances::default()));
    }

    #[test]
    fn vanished_reactant_is_undefined() {
        let q = compute_q(&[0.0, 0.1], &[-2.0, 1.0]);
        assert_eq!(q, Quotient::UndefinedReactant);
        assert!(q.is_undefined());
        assert_eq!(q.value(), None);
    }

    #[test]
    fn vanished_product_gives_zero() {
        assert_eq!(compute_q(&[0.2, 0.0], &[-2.0, 1.0]), Quotient::Value(0.0));
    }

    #[test]
    fn vanished_reactant_wins_over_vanished_product() {
        assert!(compute_q(&[0.0, 0.0], &[1.0, -1.0]).is_undefined());
        assert!(compute_q(&[0.0, 0.0], &[-1.0, 1.0]).is_undefined());
    }
}
