//! Rydra Intermediate Representation
//!
//! Core value types for analog (Hamiltonian-evolution) quantum operations:
//! symbolic parameters, the operator terms they weight, and the named
//! parameter records operations expose.
//!
//! # Core Components
//!
//! - **Parameters**: [`ParameterExpression`], an immutable expression tree over
//!   constants, π and named symbols. Division is fallible
//!   ([`ParameterExpression::checked_div`]) and rejects literal-zero denominators.
//! - **Evaluation**: [`eval::evaluate`] and [`eval::substitute`], explicit tree
//!   walks kept apart from the expression type.
//! - **Operators**: [`PauliOp`], [`OperatorTerm`], [`OperatorBlock`] and the
//!   additive [`Generator`].
//! - **Parameter maps**: [`ParamMap`] keyed by [`ParamRole`].
//! - **Qubits**: [`QubitId`] and [`QubitSupport`].
//!
//! # Example: Building a drive coefficient
//!
//! ```rust
//! use rydra_ir::{ParameterExpression, eval};
//!
//! let omega = ParameterExpression::symbol("omega");
//! let phase = ParameterExpression::symbol("phase");
//!
//! // (omega / 2) * cos(phase)
//! let coeff = omega.checked_div(2).unwrap() * phase.cos();
//! assert!(coeff.is_symbolic());
//!
//! let values = eval::bindings([("omega", 2.0), ("phase", 0.0)]);
//! assert_eq!(eval::evaluate(&coeff, &values).unwrap(), 1.0);
//! ```
//!
//! # Example: Zero detection
//!
//! ```rust
//! use rydra_ir::ParameterExpression;
//!
//! assert_eq!(ParameterExpression::zero().is_zero(), Some(true));
//! // symbolic expressions are never assumed zero or nonzero
//! assert_eq!(ParameterExpression::symbol("delta").is_zero(), None);
//! assert!(ParameterExpression::pi().checked_div(0).is_err());
//! ```

pub mod error;
pub mod eval;
pub mod operator;
pub mod param_map;
pub mod parameter;
pub mod qubit;

pub use error::{IrError, IrResult};
pub use eval::Bindings;
pub use operator::{Factor, Generator, GeneratorTerm, OperatorBlock, OperatorTerm, PauliOp};
pub use param_map::{ParamMap, ParamRole};
pub use parameter::ParameterExpression;
pub use qubit::{QubitId, QubitSupport};
