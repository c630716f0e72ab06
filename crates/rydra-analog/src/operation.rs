//! Analog operations: interaction, generic drive, and drive-derived rotations.
//!
//! Every operation is an [`AnalogOperation`] value tagged with its
//! [`AnalogKind`]. The generic drive is built by [`DriveBuilder`]; the
//! rotations are presets that fix Ω, Δ and φ and back-solve the duration from
//! a rotation angle.
//!
//! | Kind | Ω | Δ | φ | duration |
//! |------|---|---|---|----------|
//! | `AnalogRX` | π | 0 | 0 | `angle / Ω · 1000` |
//! | `AnalogRY` | π | 0 | −π/2 | `angle / Ω · 1000` |
//! | `AnalogRZ` | 0 | π | 0 | `angle / Δ · 1000` |

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, instrument};

use rydra_ir::eval::substitute;
use rydra_ir::{Generator, ParamMap, ParamRole, ParameterExpression, QubitSupport};

use crate::compose::{
    DURATION_SCALE, DriveTerms, check_drive, drive_generator, interaction_generator,
    scaled_duration,
};
use crate::error::{AnalogError, AnalogResult};
use crate::evolution::HamEvo;
use crate::register::RegisterGeometry;

/// The kind of analog operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalogKind {
    /// Free evolution under the interaction Hamiltonian.
    Interaction,
    /// Generic global drive.
    Drive,
    /// Rotation about X.
    Rx,
    /// Rotation about Y.
    Ry,
    /// Rotation about Z.
    Rz,
}

impl AnalogKind {
    /// Get the operation name.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            AnalogKind::Interaction => "AnalogInteraction",
            AnalogKind::Drive => "AnalogDrive",
            AnalogKind::Rx => "AnalogRX",
            AnalogKind::Ry => "AnalogRY",
            AnalogKind::Rz => "AnalogRZ",
        }
    }

    /// Check if this kind is one of the rotation presets.
    pub fn is_rotation(&self) -> bool {
        matches!(self, AnalogKind::Rx | AnalogKind::Ry | AnalogKind::Rz)
    }
}

impl fmt::Display for AnalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rotation axis of a drive-derived rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    fn kind(self) -> AnalogKind {
        match self {
            Axis::X => AnalogKind::Rx,
            Axis::Y => AnalogKind::Ry,
            Axis::Z => AnalogKind::Rz,
        }
    }

    /// Fixed `(omega, delta, phase)` realizing a rotation about this axis.
    fn drive_settings(
        self,
    ) -> AnalogResult<(ParameterExpression, ParameterExpression, ParameterExpression)> {
        let pi = ParameterExpression::pi();
        let zero = ParameterExpression::zero();
        Ok(match self {
            Axis::X => (pi, zero.clone(), zero),
            Axis::Y => (pi.clone(), zero, (-pi).checked_div(2)?),
            Axis::Z => (zero.clone(), pi, zero),
        })
    }
}

/// A fully built analog operation.
///
/// Instances are immutable; [`AnalogOperation::bind`] returns a new one.
/// Deserialized values are checked for a complete parameter map, a valid
/// drive and a parameter that matches the evolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOperation")]
pub struct AnalogOperation {
    kind: AnalogKind,
    evolution: HamEvo,
    parameters: ParamMap,
    qubit_support: QubitSupport,
    add_pattern: bool,
    /// Caller-supplied angle of a rotation. Kept apart from the parameter
    /// map's `alpha`, which is derived from duration and drive norm.
    rotation_angle: Option<ParameterExpression>,
}

/// Unvalidated wire form of an [`AnalogOperation`].
#[derive(Deserialize)]
struct RawOperation {
    kind: AnalogKind,
    evolution: HamEvo,
    parameters: ParamMap,
    qubit_support: QubitSupport,
    add_pattern: bool,
    #[serde(default)]
    rotation_angle: Option<ParameterExpression>,
}

const INTERACTION_ROLES: [ParamRole; 2] = [ParamRole::Parameter, ParamRole::Duration];

impl TryFrom<RawOperation> for AnalogOperation {
    type Error = AnalogError;

    fn try_from(raw: RawOperation) -> AnalogResult<Self> {
        let kind = raw.kind;
        let expected: &[ParamRole] = match kind {
            AnalogKind::Interaction => &INTERACTION_ROLES,
            _ => &ParamRole::ALL,
        };
        if let Some(role) = expected.iter().find(|r| !raw.parameters.contains(**r)) {
            return Err(AnalogError::Malformed(format!("{kind} is missing parameter '{role}'")));
        }
        if raw.parameters.len() != expected.len() {
            return Err(AnalogError::Malformed(format!(
                "{kind} takes {} parameters, got {}",
                expected.len(),
                raw.parameters.len()
            )));
        }
        if raw.rotation_angle.is_some() != kind.is_rotation() {
            return Err(AnalogError::Malformed(format!(
                "rotation angle does not match kind {kind}"
            )));
        }
        if kind != AnalogKind::Interaction {
            check_drive(
                raw.parameters.get(ParamRole::Omega)?,
                raw.parameters.get(ParamRole::Delta)?,
            )?;
        }

        let parameter = raw.parameters.get(ParamRole::Parameter)?;
        if parameter != raw.evolution.parameter() {
            return Err(AnalogError::Malformed(format!(
                "parameter {parameter} does not match evolution parameter {}",
                raw.evolution.parameter()
            )));
        }
        let duration = raw.parameters.get(ParamRole::Duration)?;
        if let (Some(d), Some(p)) = (duration.as_f64(), parameter.as_f64()) {
            let expected = d / DURATION_SCALE;
            if (p - expected).abs() > 1e-12 * expected.abs().max(1.0) {
                return Err(AnalogError::Malformed(format!(
                    "parameter {p} does not match duration {d}"
                )));
            }
        }

        Ok(Self {
            kind,
            evolution: raw.evolution,
            parameters: raw.parameters,
            qubit_support: raw.qubit_support,
            add_pattern: raw.add_pattern,
            rotation_angle: raw.rotation_angle,
        })
    }
}

impl AnalogOperation {
    /// Evolution of the interaction Hamiltonian (plus pattern, if requested
    /// and present) for `duration`.
    #[instrument(skip(register, duration))]
    pub fn interaction<R>(
        register: &R,
        duration: impl Into<ParameterExpression>,
        add_pattern: bool,
    ) -> AnalogResult<Self>
    where
        R: RegisterGeometry + ?Sized,
    {
        let duration = duration.into();
        let parameter = scaled_duration(&duration)?;
        let generator = interaction_generator(register, add_pattern);

        debug!(
            "Built {} with {} generator terms",
            AnalogKind::Interaction,
            generator.num_terms()
        );

        Ok(Self {
            kind: AnalogKind::Interaction,
            evolution: HamEvo::new(generator, parameter.clone()),
            parameters: ParamMap::new([
                (ParamRole::Parameter, parameter),
                (ParamRole::Duration, duration),
            ]),
            qubit_support: register.nodes(),
            add_pattern,
            rotation_angle: None,
        })
    }

    /// Start building a generic drive.
    pub fn drive(
        duration: impl Into<ParameterExpression>,
        omega: impl Into<ParameterExpression>,
        delta: impl Into<ParameterExpression>,
    ) -> DriveBuilder {
        DriveBuilder::new(duration, omega, delta)
    }

    /// Rotation by `angle` about `axis`, realized as a drive with fixed
    /// settings. `qubit_support` defaults to the whole register.
    #[instrument(skip(register, angle, qubit_support))]
    pub fn rotation<R>(
        register: &R,
        axis: Axis,
        angle: impl Into<ParameterExpression>,
        qubit_support: Option<QubitSupport>,
        add_pattern: bool,
    ) -> AnalogResult<Self>
    where
        R: RegisterGeometry + ?Sized,
    {
        let angle = angle.into();
        let (omega, delta, phase) = axis.drive_settings()?;

        // Z rotations have no amplitude and are normalized by the detuning.
        let rate = match axis {
            Axis::X | Axis::Y => &omega,
            Axis::Z => &delta,
        };
        let duration =
            angle.checked_div(rate.clone())? * ParameterExpression::constant(DURATION_SCALE);

        let builder = DriveBuilder {
            duration,
            omega,
            delta,
            phase,
            qubit_support,
            add_pattern,
        };
        builder.build_as(register, axis.kind(), Some(angle))
    }

    /// Rotation about X: `Ω = π, Δ = 0, φ = 0`.
    pub fn rx<R>(
        register: &R,
        angle: impl Into<ParameterExpression>,
        qubit_support: Option<QubitSupport>,
        add_pattern: bool,
    ) -> AnalogResult<Self>
    where
        R: RegisterGeometry + ?Sized,
    {
        Self::rotation(register, Axis::X, angle, qubit_support, add_pattern)
    }

    /// Rotation about Y: `Ω = π, Δ = 0, φ = −π/2`.
    pub fn ry<R>(
        register: &R,
        angle: impl Into<ParameterExpression>,
        qubit_support: Option<QubitSupport>,
        add_pattern: bool,
    ) -> AnalogResult<Self>
    where
        R: RegisterGeometry + ?Sized,
    {
        Self::rotation(register, Axis::Y, angle, qubit_support, add_pattern)
    }

    /// Rotation about Z: `Ω = 0, Δ = π, φ = 0`.
    pub fn rz<R>(
        register: &R,
        angle: impl Into<ParameterExpression>,
        qubit_support: Option<QubitSupport>,
        add_pattern: bool,
    ) -> AnalogResult<Self>
    where
        R: RegisterGeometry + ?Sized,
    {
        Self::rotation(register, Axis::Z, angle, qubit_support, add_pattern)
    }

    /// The kind of operation.
    pub fn kind(&self) -> AnalogKind {
        self.kind
    }

    /// The operation name, e.g. `"AnalogRX"`.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The Hamiltonian generator.
    pub fn generator(&self) -> &Generator {
        self.evolution.generator()
    }

    /// The scaled duration handed to the evolution primitive.
    pub fn parameter(&self) -> &ParameterExpression {
        self.evolution.parameter()
    }

    /// The underlying evolution.
    pub fn evolution(&self) -> &HamEvo {
        &self.evolution
    }

    /// The named parameters of this operation.
    pub fn parameters(&self) -> &ParamMap {
        &self.parameters
    }

    /// Qubits driven by this operation (all nodes for an interaction).
    pub fn qubit_support(&self) -> &QubitSupport {
        &self.qubit_support
    }

    /// Whether the pattern block was requested.
    pub fn add_pattern(&self) -> bool {
        self.add_pattern
    }

    /// The caller-supplied rotation angle, for rotation kinds.
    pub fn rotation_angle(&self) -> Option<&ParameterExpression> {
        self.rotation_angle.as_ref()
    }

    /// All free symbols in generator, parameters and rotation angle.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut set = self.generator().symbols();
        set.extend(self.parameter().symbols());
        for (_, expr) in self.parameters.iter() {
            set.extend(expr.symbols());
        }
        if let Some(angle) = &self.rotation_angle {
            set.extend(angle.symbols());
        }
        set
    }

    /// A copy of this operation with `value` substituted for symbol `name`
    /// everywhere.
    #[must_use]
    pub fn bind(&self, name: &str, value: f64) -> Self {
        Self {
            kind: self.kind,
            evolution: self.evolution.bind(name, value),
            parameters: self.parameters.bind(name, value),
            qubit_support: self.qubit_support.clone(),
            add_pattern: self.add_pattern,
            rotation_angle: self
                .rotation_angle
                .as_ref()
                .map(|angle| substitute(angle, name, value)),
        }
    }
}

impl fmt::Display for AnalogOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} t={}", self.name(), self.qubit_support, self.parameter())
    }
}

/// Builder for the generic drive.
///
/// ```rust
/// use rydra_analog::{AnalogOperation, Register};
/// use rydra_ir::{ParamRole, ParameterExpression};
///
/// let register = Register::line(2, 5.0).unwrap();
/// let op = AnalogOperation::drive(1000.0, ParameterExpression::pi(), 0.0)
///     .with_phase(0.0)
///     .build(&register)
///     .unwrap();
///
/// let t = op.parameters().get(ParamRole::Parameter).unwrap();
/// assert_eq!(t.as_f64(), Some(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct DriveBuilder {
    duration: ParameterExpression,
    omega: ParameterExpression,
    delta: ParameterExpression,
    phase: ParameterExpression,
    qubit_support: Option<QubitSupport>,
    add_pattern: bool,
}

impl DriveBuilder {
    /// Create a builder with phase 0, the whole register as support, and the
    /// pattern included.
    pub fn new(
        duration: impl Into<ParameterExpression>,
        omega: impl Into<ParameterExpression>,
        delta: impl Into<ParameterExpression>,
    ) -> Self {
        Self {
            duration: duration.into(),
            omega: omega.into(),
            delta: delta.into(),
            phase: ParameterExpression::zero(),
            qubit_support: None,
            add_pattern: true,
        }
    }

    /// Set the drive phase.
    #[must_use]
    pub fn with_phase(mut self, phase: impl Into<ParameterExpression>) -> Self {
        self.phase = phase.into();
        self
    }

    /// Restrict the drive to `support`.
    #[must_use]
    pub fn with_qubit_support(mut self, support: impl Into<QubitSupport>) -> Self {
        self.qubit_support = Some(support.into());
        self
    }

    /// Include or leave out the pattern block.
    #[must_use]
    pub fn with_pattern(mut self, add_pattern: bool) -> Self {
        self.add_pattern = add_pattern;
        self
    }

    /// Build the drive on `register`.
    #[instrument(skip(register))]
    pub fn build<R>(self, register: &R) -> AnalogResult<AnalogOperation>
    where
        R: RegisterGeometry + ?Sized,
    {
        self.build_as(register, AnalogKind::Drive, None)
    }

    fn build_as<R>(
        self,
        register: &R,
        kind: AnalogKind,
        rotation_angle: Option<ParameterExpression>,
    ) -> AnalogResult<AnalogOperation>
    where
        R: RegisterGeometry + ?Sized,
    {
        let support = resolve_support(register, self.qubit_support)?;

        let drive = DriveTerms {
            omega: &self.omega,
            delta: &self.delta,
            phase: &self.phase,
        };
        let generator = drive_generator(register, &support, &drive, self.add_pattern)?;

        let parameter = scaled_duration(&self.duration)?;
        let h_norm = (self.omega.pow(2) + self.delta.pow(2)).sqrt();
        let alpha = (self.duration.clone() * h_norm.clone()).checked_div(DURATION_SCALE)?;

        debug!(
            "Built {} on {} qubits with {} generator terms",
            kind,
            support.len(),
            generator.num_terms()
        );

        Ok(AnalogOperation {
            kind,
            evolution: HamEvo::new(generator, parameter.clone()),
            parameters: ParamMap::new([
                (ParamRole::Parameter, parameter),
                (ParamRole::Duration, self.duration),
                (ParamRole::Alpha, alpha),
                (ParamRole::Omega, self.omega),
                (ParamRole::Delta, self.delta),
                (ParamRole::Phase, self.phase),
                (ParamRole::HNorm, h_norm),
            ]),
            qubit_support: support,
            add_pattern: self.add_pattern,
            rotation_angle,
        })
    }
}

/// Default to all nodes; otherwise require a non-empty subset of them.
fn resolve_support<R>(register: &R, explicit: Option<QubitSupport>) -> AnalogResult<QubitSupport>
where
    R: RegisterGeometry + ?Sized,
{
    let nodes = register.nodes();
    let Some(support) = explicit else {
        return Ok(nodes);
    };
    if support.is_empty() && !nodes.is_empty() {
        return Err(AnalogError::EmptySupport {
            register_size: nodes.len(),
        });
    }
    if let Some(missing) = support.iter().find(|q| !nodes.contains(*q)) {
        return Err(AnalogError::QubitNotInRegister(missing));
    }
    Ok(support)
}
