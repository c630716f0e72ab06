//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur while building or evaluating IR values.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum IrError {
    /// Division by an expression that is the constant zero.
    #[error("Division by zero: '{numerator}' divided by a zero denominator")]
    DivisionByZero {
        /// Rendered numerator, for context.
        numerator: String,
    },

    /// Parameter is unbound.
    #[error("Parameter '{0}' is unbound")]
    UnboundParameter(String),

    /// Role was never set on this parameter map.
    #[error("Parameter map has no entry for role '{0}'")]
    MissingRole(String),

    /// Role name is not one of the known roles.
    #[error("Unknown parameter role '{0}'")]
    UnknownRole(String),

    /// Evaluation produced NaN or infinity.
    #[error("Expression '{0}' does not evaluate to a finite value")]
    NonFinite(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
