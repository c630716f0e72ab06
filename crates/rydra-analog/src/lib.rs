//! Rydra Analog Operations
//!
//! Hamiltonian-evolution ("analog") operations for arrays of Rydberg atoms.
//! Each operation composes a [`rydra_ir::Generator`] from local drive terms
//! and the register's interaction and pattern blocks, pairs it with a scaled
//! duration in a [`HamEvo`], and records every symbolic quantity in a
//! [`rydra_ir::ParamMap`].
//!
//! # Architecture
//!
//! ```text
//! Register ──► compose ──► Generator ──► HamEvo(generator, duration / 1000)
//!    │            ▲                              │
//!    │            │                              ▼
//!    └── nodes ───┘        ParamMap ◄──── AnalogOperation
//! ```
//!
//! # Operations
//!
//! | Operation | Constructor | Parameter map |
//! |-----------|-------------|---------------|
//! | `AnalogInteraction` | [`AnalogOperation::interaction`] | parameter, duration |
//! | `AnalogDrive` | [`AnalogOperation::drive`] → [`DriveBuilder`] | parameter, duration, alpha, omega, delta, phase, h_norm |
//! | `AnalogRX` / `AnalogRY` / `AnalogRZ` | [`AnalogOperation::rx`], [`AnalogOperation::ry`], [`AnalogOperation::rz`] | as `AnalogDrive` |
//!
//! # Example: A symbolic X rotation
//!
//! ```rust
//! use rydra_analog::{AnalogOperation, Register};
//! use rydra_ir::{eval, ParamRole};
//!
//! let register = Register::line(3, 5.0).unwrap();
//! let rx = AnalogOperation::rx(&register, "theta", None, true).unwrap();
//!
//! assert_eq!(rx.name(), "AnalogRX");
//! assert!(rx.symbols().contains("theta"));
//!
//! // the evolution time is theta / π
//! let t = eval::evaluate(rx.parameter(), &eval::bindings([("theta", std::f64::consts::PI)]))
//!     .unwrap();
//! assert!((t - 1.0).abs() < 1e-12);
//! assert!(rx.parameters().get(ParamRole::HNorm).is_ok());
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod evolution;
pub mod operation;
pub mod register;

pub use compose::DURATION_SCALE;
pub use config::AnalogConfig;
pub use error::{AnalogError, AnalogResult};
pub use evolution::HamEvo;
pub use operation::{AnalogKind, AnalogOperation, Axis, DriveBuilder};
pub use register::{DrivePattern, Register, RegisterGeometry};
