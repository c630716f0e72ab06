//! Error types for analog operations.

use rydra_ir::{IrError, QubitId};
use thiserror::Error;

/// Errors that can occur while building analog operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalogError {
    /// Amplitude and detuning are both the literal constant zero.
    #[error("Parameters omega and delta cannot both be 0.")]
    InvalidDrive,

    /// An explicit qubit support with no qubits.
    #[error("Qubit support is empty for a register with {register_size} qubits")]
    EmptySupport {
        /// Number of nodes in the register.
        register_size: usize,
    },

    /// Qubit support names a qubit the register does not have.
    #[error("Qubit {0} is not a node of the register")]
    QubitNotInRegister(QubitId),

    /// Register geometry is not usable.
    #[error("Invalid register geometry: {0}")]
    Geometry(String),

    /// A deserialized operation is inconsistent.
    #[error("Malformed operation: {0}")]
    Malformed(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parameter algebra error.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for analog operations.
pub type AnalogResult<T> = Result<T, AnalogError>;
