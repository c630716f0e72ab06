//! Interaction command implementation.

use anyhow::Result;
use tracing::info;

use rydra_analog::AnalogOperation;

use super::common::{OutputArgs, RegisterArgs, load_register, parse_value, report};

/// Execute the interaction command.
pub fn execute(duration: &str, register: &RegisterArgs, output: &OutputArgs) -> Result<()> {
    let (register, add_pattern) = load_register(register)?;
    let duration = parse_value(duration)?;
    info!(
        "Interaction on {} atoms, pattern {}",
        register.num_qubits(),
        add_pattern
    );

    let op = AnalogOperation::interaction(&register, duration, add_pattern)?;
    report(&op, output)
}
