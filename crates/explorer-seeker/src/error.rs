//! Error types for the seeker crate.

use thiserror::Error;

use crate::op::FilterOp;

/// Errors that can occur when building records, configs or filter values.
///
/// Filter *evaluation* never fails: anomalies there count as "no match".
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeekerError {
    /// Operator name is not one of the supported operators.
    #[error("unknown filter operator '{0}'")]
    UnknownOperator(String),

    /// A record was built from a JSON value that is not an object.
    #[error("record must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// Filter value shape does not fit the declared operator.
    #[error("operator '{op}' on field '{field}' expects {expected}")]
    ValueMismatch {
        field: String,
        op: FilterOp,
        expected: &'static str,
    },

    /// Range filter whose lower bound exceeds its upper bound.
    #[error("invalid range for '{field}': {min} > {max}")]
    InvalidRange { field: String, min: f64, max: f64 },

    /// Text that could not be turned into a filter value.
    #[error("cannot parse '{input}' for field '{field}': {reason}")]
    InvalidInput {
        field: String,
        input: String,
        reason: String,
    },
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;
