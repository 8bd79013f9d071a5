//! Iterative equilibrium driver.
//!
//! State machine: initialized -> iterating -> {converged, exhausted}.
//! Iteration 0 of the trace is the initial state. Every later iteration:
//! 1. relax concentrations (possibly halving the step for positivity)
//! 2. recompute the force
//! 3. adapt the step size from the previous and new force
//! 4. record concentrations, force and step size
//! 5. stop when |force| < relative tolerance
//!
//! Running out of iterations is a reported outcome, not an error.

use crate::error::{SolverError, SolverResult, check_lengths};
use crate::force::{compute_force, p_keq};
use crate::policy::StepPolicy;
use crate::quotient::{Quotient, compute_q};
use crate::update::relax;
use eq_core::{ensure_finite, ensure_positive, relative_error};
use tracing::{debug, info, trace, warn};

/// Solver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Initial step size dc
    pub step_size: f64,
    /// Convergence threshold on |force|
    pub relative_tolerance: f64,
    /// Maximum number of update steps
    pub max_iterations: usize,
    /// Step adaptation and positivity enforcement
    pub policy: StepPolicy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            step_size: 1e-3,
            relative_tolerance: 1e-5,
            max_iterations: 1000,
            policy: StepPolicy::default(),
        }
    }
}

/// Per-iteration history, index 0 being the initial state.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationTrace {
    pub concentrations: Vec<Vec<f64>>,
    pub forces: Vec<f64>,
    pub step_sizes: Vec<f64>,
}

impl IterationTrace {
    fn with_capacity(n: usize) -> Self {
        Self {
            concentrations: Vec::with_capacity(n),
            forces: Vec::with_capacity(n),
            step_sizes: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, concentrations: &[f64], force: f64, step_size: f64) {
        self.concentrations.push(concentrations.to_vec());
        self.forces.push(force);
        self.step_sizes.push(step_size);
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    pub fn last_force(&self) -> Option<f64> {
        self.forces.last().copied()
    }

    /// Records as `(concentrations, force, step_size)`.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64], f64, f64)> + '_ {
        self.concentrations
            .iter()
            .zip(&self.forces)
            .zip(&self.step_sizes)
            .map(|((c, &f), &dc)| (c.as_slice(), f, dc))
    }
}

/// Terminal state of a solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveOutcome {
    Converged,
    Exhausted,
}

/// Result of an equilibrium solve.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquilibriumResult {
    pub trace: IterationTrace,
    pub final_concentrations: Vec<f64>,
    /// Q recomputed from the final concentrations
    pub final_q: Quotient,
    pub converged: bool,
    /// Update steps taken, excluding the initial state
    pub iterations: usize,
}

impl EquilibriumResult {
    pub fn outcome(&self) -> SolveOutcome {
        if self.converged {
            SolveOutcome::Converged
        } else {
            SolveOutcome::Exhausted
        }
    }

    /// Relative error of the final Q against `keq`; None when Q is undefined.
    pub fn relative_error(&self, keq: f64) -> Option<f64> {
        self.final_q.value().map(|q| relative_error(q, keq))
    }
}

/// Snapshot handed to a progress observer after each update step.
#[derive(Clone, Debug)]
pub struct IterationEvent<'a> {
    /// 1-based update step
    pub iteration: usize,
    pub max_iterations: usize,
    pub concentrations: &'a [f64],
    pub force: f64,
    /// Step size carried into the next iteration
    pub step_size: f64,
    /// Halvings the updater needed this iteration
    pub halvings: usize,
}

/// Solve for equilibrium with positional parameters.
pub fn solve_equilibrium(
    initial_concentrations: &[f64],
    stoichiometry: &[f64],
    keq: f64,
    step_size: f64,
    relative_tolerance: f64,
    max_iterations: usize,
    policy: StepPolicy,
) -> SolverResult<EquilibriumResult> {
    let config = SolverConfig {
        step_size,
        relative_tolerance,
        max_iterations,
        policy,
    };
    solve_internal(initial_concentrations, stoichiometry, keq, &config, None)
}

/// Solve for equilibrium with a [`SolverConfig`].
pub fn solve_with_config(
    initial_concentrations: &[f64],
    stoichiometry: &[f64],
    keq: f64,
    config: &SolverConfig,
) -> SolverResult<EquilibriumResult> {
    solve_internal(initial_concentrations, stoichiometry, keq, config, None)
}

/// Solve for equilibrium, reporting every update step to `observer`.
pub fn solve_with_progress(
    initial_concentrations: &[f64],
    stoichiometry: &[f64],
    keq: f64,
    config: &SolverConfig,
    observer: Option<&mut dyn FnMut(&IterationEvent<'_>)>,
) -> SolverResult<EquilibriumResult> {
    solve_internal(initial_concentrations, stoichiometry, keq, config, observer)
}

fn validate(
    initial_concentrations: &[f64],
    stoichiometry: &[f64],
    keq: f64,
    config: &SolverConfig,
) -> SolverResult<()> {
    check_lengths(initial_concentrations, stoichiometry)?;

    for (i, &c) in initial_concentrations.iter().enumerate() {
        if !c.is_finite() || c < 0.0 {
            return Err(SolverError::InvalidInput {
                what: format!("concentration {i} must be finite and non-negative, got {c}"),
            });
        }
    }
    for (i, &nu) in stoichiometry.iter().enumerate() {
        ensure_finite(nu, "stoichiometric coefficient").map_err(|_| {
            SolverError::InvalidInput {
                what: format!("stoichiometric coefficient {i} must be finite, got {nu}"),
            }
        })?;
    }

    ensure_positive(keq, "equilibrium constant must be positive")?;
    ensure_positive(config.step_size, "step size must be positive")?;
    ensure_positive(
        config.relative_tolerance,
        "relative tolerance must be positive",
    )?;
    if config.max_iterations == 0 {
        return Err(SolverError::InvalidInput {
            what: "max_iterations must be positive".to_string(),
        });
    }
    Ok(())
}

fn solve_internal(
    initial_concentrations: &[f64],
    stoichiometry: &[f64],
    keq: f64,
    config: &SolverConfig,
    mut observer: Option<&mut dyn FnMut(&IterationEvent<'_>)>,
) -> SolverResult<EquilibriumResult> {
    validate(initial_concentrations, stoichiometry, keq, config)?;

    let pkeq = p_keq(keq);
    let policy = config.policy;

    let mut conc = initial_concentrations.to_vec();
    let mut dc = config.step_size;
    let mut force = compute_force(&conc, stoichiometry, pkeq);

    debug!(
        species = conc.len(),
        keq,
        pkeq,
        step_size = dc,
        initial_force = force,
        "starting equilibrium solve"
    );

    let mut history = IterationTrace::with_capacity(config.max_iterations.min(4096) + 1);
    history.push(&conc, force, dc);

    for iter in 1..=config.max_iterations {
        let update = relax(&conc, stoichiometry, force, dc, policy.ensure_positive);
        if update.halvings > 0 {
            debug!(
                iteration = iter,
                halvings = update.halvings,
                from = dc,
                to = update.step_size,
                "step reduced to keep concentrations positive"
            );
        }
        conc = update.concentrations;
        dc = update.step_size;

        let prev_force = force;
        force = compute_force(&conc, stoichiometry, pkeq);
        dc = policy.adapt(dc, prev_force, force);

        history.push(&conc, force, dc);
        trace!(iteration = iter, force, step_size = dc, "iteration");

        if let Some(obs) = observer.as_deref_mut() {
            obs(&IterationEvent {
                iteration: iter,
                max_iterations: config.max_iterations,
                concentrations: &conc,
                force,
                step_size: dc,
                halvings: update.halvings,
            });
        }

        if force.abs() < config.relative_tolerance {
            let final_q = compute_q(&conc, stoichiometry);
            info!(iterations = iter, force, ?final_q, "equilibrium converged");
            return Ok(EquilibriumResult {
                trace: history,
                final_concentrations: conc,
                final_q,
                converged: true,
                iterations: iter,
            });
        }
    }

    let final_q = compute_q(&conc, stoichiometry);
    warn!(
        max_iterations = config.max_iterations,
        force,
        ?final_q,
        "equilibrium solve exhausted iteration budget"
    );
    Ok(EquilibriumResult {
        trace: history,
        final_concentrations: conc,
        final_q,
        converged: false,
        iterations: config.max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STOICH: [f64; 2] = [-2.0, 1.0];

    #[test]
    fn config_defaults() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.step_size, 1e-3);
        assert_eq!(cfg.relative_tolerance, 1e-5);
        assert_eq!(cfg.max_iterations, 1000);
        assert_eq!(cfg.policy, StepPolicy::fixed());
    }

    #[test]
    fn reference_case_converges() {
        let result = solve_equilibrium(
            &[0.2, 0.1],
            &STOICH,
            12.0,
            0.001,
            1e-5,
            1000,
            StepPolicy::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert_eq!(result.outcome(), SolveOutcome::Converged);
        assert!(result.iterations < 1000);
        assert!(result.trace.last_force().unwrap().abs() < 1e-5);
        assert!(result.relative_error(12.0).unwrap() < 0.01);
    }

    #[test]
    fn trace_includes_initial_state() {
        let result = solve_equilibrium(
            &[0.2, 0.1],
            &STOICH,
            12.0,
            0.001,
            1e-5,
            1000,
            StepPolicy::default(),
        )
        .unwrap();

        assert_eq!(result.trace.len(), result.iterations + 1);
        assert_eq!(result.trace.concentrations[0], vec![0.2, 0.1]);
        assert_eq!(result.trace.step_sizes[0], 0.001);
        assert_eq!(
            result.trace.concentrations.last().unwrap(),
            &result.final_concentrations
        );
        let (first_conc, first_force, _) = result.trace.iter().next().unwrap();
        assert_eq!(first_conc, &[0.2, 0.1]);
        assert!((first_force - 0.68124).abs() < 1e-4);
    }

    #[test]
    fn exhaustion_is_reported_not_raised() {
        let result = solve_equilibrium(
            &[0.2, 0.1],
            &STOICH,
            12.0,
            0.001,
            1e-5,
            10,
            StepPolicy::default(),
        )
        .unwrap();

        assert!(!result.converged);
        assert_eq!(result.outcome(), SolveOutcome::Exhausted);
        assert_eq!(result.iterations, 10);
        assert_eq!(result.trace.len(), 11);
    }

    #[test]
    fn fixed_step_never_changes() {
        let result = solve_equilibrium(
            &[0.2, 0.1],
            &STOICH,
            12.0,
            0.01,
            1e-6,
            10_000,
            StepPolicy::fixed(),
        )
        .unwrap();
        assert!(result.trace.step_sizes.iter().all(|&dc| dc == 0.01));
    }

    #[test]
    fn observer_sees_every_update() {
        let mut seen = Vec::new();
        let mut observer = |e: &IterationEvent<'_>| seen.push((e.iteration, e.force));
        let cfg = SolverConfig {
            step_size: 0.01,
            relative_tolerance: 1e-6,
            max_iterations: 10_000,
            policy: StepPolicy::default(),
        };
        let result =
            solve_with_progress(&[0.2, 0.1], &STOICH, 12.0, &cfg, Some(&mut observer)).unwrap();

        assert_eq!(seen.len(), result.iterations);
        assert_eq!(seen[0].0, 1);
        assert_eq!(seen.last().unwrap().1, result.trace.last_force().unwrap());
    }

    #[test]
    fn rejects_invalid_inputs() {
        let cfg = SolverConfig::default();
        assert!(matches!(
            solve_with_config(&[0.2, 0.1], &[-2.0], 12.0, &cfg),
            Err(SolverError::LengthMismatch {
                concentrations: 2,
                stoichiometry: 1
            })
        ));
        assert!(solve_with_config(&[], &[], 12.0, &cfg).is_err());
        assert!(solve_with_config(&[-0.1, 0.1], &STOICH, 12.0, &cfg).is_err());
        assert!(solve_with_config(&[0.2, f64::NAN], &STOICH, 12.0, &cfg).is_err());
        assert!(solve_with_config(&[0.2, 0.1], &[-2.0, f64::INFINITY], 12.0, &cfg).is_err());
        assert!(solve_with_config(&[0.2, 0.1], &STOICH, 0.0, &cfg).is_err());
        assert!(solve_with_config(&[0.2, 0.1], &STOICH, -3.0, &cfg).is_err());

        let zero_step = SolverConfig {
            step_size: 0.0,
            ..cfg
        };
        assert!(solve_with_config(&[0.2, 0.1], &STOICH, 12.0, &zero_step).is_err());

        let no_budget = SolverConfig {
            max_iterations: 0,
            ..cfg
        };
        assert!(matches!(
            solve_with_config(&[0.2, 0.1], &STOICH, 12.0, &no_budget),
            Err(SolverError::InvalidInput { .. })
        ));
    }
}
