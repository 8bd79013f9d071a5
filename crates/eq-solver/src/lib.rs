//! Iterative chemical equilibrium solver for a single reaction.
//!
//! The solver relaxes a concentration vector toward the point where the
//! reaction quotient Q equals the equilibrium constant Keq. Each step moves
//! every species along its stoichiometric coefficient by `dc * force`, where
//! the force is `-log10(Q) - pKeq`. Step size can be adapted on overshoot or
//! monotone approach, and optionally shrunk to keep concentrations positive.
//!
//! A closed-form solution of `2A <=> B` is provided to cross-check the
//! iterative result.

pub mod analytic;
pub mod batch;
pub mod equation;
pub mod error;
pub mod force;
pub mod policy;
pub mod quotient;
pub mod solve;
pub mod update;

pub use analytic::{BasicAnalyticRoots, concentrations_for, solve_basic_analytic};
pub use batch::{EquilibriumProblem, solve_batch};
pub use equation::{format_equation, format_equation_latex};
pub use error::{SolverError, SolverResult};
pub use force::{UNDEFINED_REACTANT_FORCE, VANISHED_PRODUCT_FORCE, compute_force, p_keq};
pub use policy::{
    MAX_HALVING_ATTEMPTS, SAME_SIGN_FACTOR, SIGN_CHANGE_FACTOR, StepPolicy, is_monotone,
    is_overshoot,
};
pub use quotient::{Quotient, compute_q};
pub use solve::{
    EquilibriumResult, IterationEvent, IterationTrace, SolveOutcome, SolverConfig,
    solve_equilibrium, solve_with_config, solve_with_progress,
};
pub use update::{StepUpdate, update_concentrations};
