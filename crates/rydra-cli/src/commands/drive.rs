//! Drive command implementation.

use anyhow::Result;
use tracing::info;

use rydra_analog::AnalogOperation;

use super::common::{OutputArgs, RegisterArgs, load_register, parse_value, report};

/// Raw drive settings as given on the command line.
pub struct DriveArgs<'a> {
    pub duration: &'a str,
    pub omega: &'a str,
    pub delta: &'a str,
    pub phase: &'a str,
    pub qubits: Option<&'a [u32]>,
}

/// Execute the drive command.
pub fn execute(args: &DriveArgs<'_>, register: &RegisterArgs, output: &OutputArgs) -> Result<()> {
    let (register, add_pattern) = load_register(register)?;

    let mut builder = AnalogOperation::drive(
        parse_value(args.duration)?,
        parse_value(args.omega)?,
        parse_value(args.delta)?,
    )
    .with_phase(parse_value(args.phase)?)
    .with_pattern(add_pattern);

    if let Some(qubits) = args.qubits {
        builder = builder.with_qubit_support(qubits.to_vec());
    }
    info!("Drive on {} atoms", register.num_qubits());

    let op = builder.build(&register)?;
    report(&op, output)
}
