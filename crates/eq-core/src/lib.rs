//! eq-core: shared foundation for the equilibrium workspace.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{EqError, EqResult};
pub use numeric::*;
