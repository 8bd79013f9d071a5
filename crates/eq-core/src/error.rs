use thiserror::Error;

pub type EqResult<T> = Result<T, EqError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EqError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Length mismatch: {what} (expected={expected}, actual={actual})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
