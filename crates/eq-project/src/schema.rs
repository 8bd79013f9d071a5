//! Problem file schema definitions.

use eq_solver::{EquilibriumProblem, SolverConfig, StepPolicy};
use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProblemFile {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub reactions: Vec<ReactionDef>,
}

impl ProblemFile {
    pub fn reaction(&self, id: &str) -> Option<&ReactionDef> {
        self.reactions.iter().find(|r| r.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactionDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub species: Vec<SpeciesDef>,
    pub keq: f64,
    #[serde(default)]
    pub solver: SolverDef,
}

impl ReactionDef {
    pub fn species_names(&self) -> Vec<&str> {
        self.species.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn stoichiometry(&self) -> Vec<f64> {
        self.species.iter().map(|s| s.stoichiometry).collect()
    }

    pub fn initial_concentrations(&self) -> Vec<f64> {
        self.species.iter().map(|s| s.concentration).collect()
    }

    pub fn to_problem(&self) -> EquilibriumProblem {
        EquilibriumProblem::new(self.initial_concentrations(), self.stoichiometry(), self.keq)
            .with_config(self.solver.to_config())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeciesDef {
    pub name: String,
    /// Negative for reactants, positive for products
    pub stoichiometry: f64,
    /// Initial concentration
    pub concentration: f64,
}

/// Per-reaction solver overrides; unset fields fall back to [`SolverConfig::default`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_tolerance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(default)]
    pub decrease_step_on_sign_change: bool,
    #[serde(default)]
    pub increase_step_on_same_sign: bool,
    #[serde(default)]
    pub ensure_positive: bool,
}

impl SolverDef {
    pub fn to_config(&self) -> SolverConfig {
        let defaults = SolverConfig::default();
        SolverConfig {
            step_size: self.step_size.unwrap_or(defaults.step_size),
            relative_tolerance: self
                .relative_tolerance
                .unwrap_or(defaults.relative_tolerance),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            policy: StepPolicy {
                decrease_on_sign_change: self.decrease_step_on_sign_change,
                increase_on_same_sign: self.increase_step_on_same_sign,
                ensure_positive: self.ensure_positive,
            },
        }
    }
}
