//! Generator composition for the interaction and drive Hamiltonians.

use tracing::debug;

use rydra_ir::{Generator, ParameterExpression, PauliOp, QubitSupport};

use crate::error::{AnalogError, AnalogResult};
use crate::register::RegisterGeometry;

/// Durations are given in ns; the evolution primitive takes µs.
pub const DURATION_SCALE: f64 = 1000.0;

/// `duration / 1000`, the time handed to the evolution primitive.
pub fn scaled_duration(duration: &ParameterExpression) -> AnalogResult<ParameterExpression> {
    Ok(duration.checked_div(DURATION_SCALE)?)
}

/// Append the pattern block when it is requested and the register has one.
fn with_pattern<R>(generator: Generator, register: &R, add_pattern: bool) -> Generator
where
    R: RegisterGeometry + ?Sized,
{
    match (add_pattern, register.pattern_hamiltonian()) {
        (true, Some(pattern)) => {
            debug!("Adding pattern block");
            generator + pattern
        }
        (true, None) => {
            debug!("Pattern requested but register has none");
            generator
        }
        (false, _) => generator,
    }
}

/// `H_int [+ H_pattern]`.
pub fn interaction_generator<R>(register: &R, add_pattern: bool) -> Generator
where
    R: RegisterGeometry + ?Sized,
{
    with_pattern(register.interaction_hamiltonian(), register, add_pattern)
}

/// Symbolic drive settings consumed by [`drive_generator`].
#[derive(Debug, Clone, PartialEq)]
pub struct DriveTerms<'a> {
    /// Amplitude Ω.
    pub omega: &'a ParameterExpression,
    /// Detuning Δ.
    pub delta: &'a ParameterExpression,
    /// Phase φ.
    pub phase: &'a ParameterExpression,
}

/// Reject a drive whose amplitude and detuning are both the literal zero.
///
/// Symbolic values are never assumed to be zero.
pub fn check_drive(omega: &ParameterExpression, delta: &ParameterExpression) -> AnalogResult<()> {
    if omega.is_zero() == Some(true) && delta.is_zero() == Some(true) {
        return Err(AnalogError::InvalidDrive);
    }
    Ok(())
}

/// `(Ω/2)(cos φ · X − sin φ · Y) − Δ · N` over `support`, then `H_int`, then
/// optionally `H_pattern`.
///
/// Terms are emitted qubit by qubit as `X(i)`, `Y(i)`, `N(i)`.
pub fn drive_generator<R>(
    register: &R,
    support: &QubitSupport,
    drive: &DriveTerms<'_>,
    add_pattern: bool,
) -> AnalogResult<Generator>
where
    R: RegisterGeometry + ?Sized,
{
    check_drive(drive.omega, drive.delta)?;

    let half_omega = drive.omega.checked_div(2)?;
    let x_coeff = half_omega.clone() * drive.phase.cos();
    let y_coeff = -(half_omega * drive.phase.sin());
    let n_coeff = -drive.delta.clone();

    let mut generator = Generator::new();
    for qubit in support.iter() {
        generator.push_local(x_coeff.clone(), PauliOp::X, qubit);
        generator.push_local(y_coeff.clone(), PauliOp::Y, qubit);
        generator.push_local(n_coeff.clone(), PauliOp::N, qubit);
    }
    debug!(
        "Drive terms on {} qubits: {} local terms",
        support.len(),
        generator.num_terms()
    );

    let generator = generator + register.interaction_hamiltonian();
    Ok(with_pattern(generator, register, add_pattern))
}
