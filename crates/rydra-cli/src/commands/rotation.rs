//! Rotation command implementation (rx, ry, rz).

use anyhow::Result;
use tracing::info;

use rydra_analog::{AnalogOperation, Axis};

use super::common::{OutputArgs, RegisterArgs, load_register, parse_value, report, support};

/// Execute a rotation about `axis`.
pub fn execute(
    axis: Axis,
    angle: &str,
    qubits: Option<&[u32]>,
    register: &RegisterArgs,
    output: &OutputArgs,
) -> Result<()> {
    let (register, add_pattern) = load_register(register)?;
    let angle = parse_value(angle)?;
    info!("Rotation about {axis:?} by {angle}");

    let op = AnalogOperation::rotation(&register, axis, angle, support(qubits), add_pattern)?;
    report(&op, output)
}
