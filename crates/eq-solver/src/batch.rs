//! Independent solves fanned out over the rayon thread pool.

use crate::error::SolverResult;
use crate::solve::{EquilibriumResult, SolverConfig, solve_with_config};
use rayon::prelude::*;
use tracing::{debug, info};

/// One self-contained equilibrium problem.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquilibriumProblem {
    pub initial_concentrations: Vec<f64>,
    pub stoichiometry: Vec<f64>,
    pub keq: f64,
    pub config: SolverConfig,
}

impl EquilibriumProblem {
    pub fn new(initial_concentrations: Vec<f64>, stoichiometry: Vec<f64>, keq: f64) -> Self {
        Self {
            initial_concentrations,
            stoichiometry,
            keq,
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn solve(&self) -> SolverResult<EquilibriumResult> {
        solve_with_config(
            &self.initial_concentrations,
            &self.stoichiometry,
            self.keq,
            &self.config,
        )
    }
}

/// Solve every problem in parallel. Results keep the input order; one
/// invalid problem does not affect the others.
pub fn solve_batch(problems: &[EquilibriumProblem]) -> Vec<SolverResult<EquilibriumResult>> {
    let results: Vec<_> = problems
        .par_iter()
        .enumerate()
        .map(|(i, problem)| {
            debug!(index = i, species = problem.stoichiometry.len(), "batch solve");
            problem.solve()
        })
        .collect();

    let converged = results
        .iter()
        .filter(|r| matches!(r, Ok(res) if res.converged))
        .count();
    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(
        total = results.len(),
        converged,
        failed,
        "batch solve finished"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch() {
        assert!(solve_batch(&[]).is_empty());
    }

    #[test]
    fn keeps_order_and_isolates_errors() {
        let cfg = SolverConfig {
            step_size: 0.01,
            relative_tolerance: 1e-6,
            max_iterations: 10_000,
            ..SolverConfig::default()
        };
        let problems = vec![
            EquilibriumProblem::new(vec![0.2, 0.1], vec![-2.0, 1.0], 12.0).with_config(cfg),
            EquilibriumProblem::new(vec![0.2], vec![-2.0, 1.0], 12.0).with_config(cfg),
            EquilibriumProblem::new(vec![0.15, 0.05], vec![-2.0, 1.0], 12.0).with_config(cfg),
        ];

        let results = solve_batch(&problems);
        assert_eq!(results.len(), 3);
        assert!(results[1].is_err());

        for idx in [0, 2] {
            let res = results[idx].as_ref().unwrap();
            assert!(res.converged);
            assert_eq!(res.trace.concentrations[0], problems[idx].initial_concentrations);
        }
    }
}
