//! Rydra Command-Line Interface
//!
//! Builds analog Rydberg operations and prints their generator and
//! parameter map.
//!
//! ```text
//! rydra rx 1.5708 --line 3 --spacing 6.0
//! rydra drive 1000 3.14159 0 --phase phi --bind phi=0.5 --format json
//! rydra interaction 500 --config register.yaml --no-pattern
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{OutputArgs, RegisterArgs};
use commands::{drive, interaction, rotation, version};
use rydra_analog::Axis;

/// Rydra - analog operations for Rydberg atom registers
#[derive(Parser)]
#[command(name = "rydra")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Free evolution under the interaction Hamiltonian
    Interaction {
        /// Duration in ns (number or symbol name)
        duration: String,

        #[command(flatten)]
        register: RegisterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Global drive with amplitude, detuning and phase
    Drive {
        /// Duration in ns (number or symbol name)
        duration: String,

        /// Amplitude omega (number or symbol name)
        #[arg(allow_hyphen_values = true)]
        omega: String,

        /// Detuning delta (number or symbol name)
        #[arg(allow_hyphen_values = true)]
        delta: String,

        /// Phase (number or symbol name)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        phase: String,

        /// Driven qubits, comma separated (default: whole register)
        #[arg(short, long, value_delimiter = ',')]
        qubits: Option<Vec<u32>>,

        #[command(flatten)]
        register: RegisterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Rotation about X
    Rx {
        /// Rotation angle (number or symbol name)
        #[arg(allow_hyphen_values = true)]
        angle: String,

        /// Rotated qubits, comma separated (default: whole register)
        #[arg(short, long, value_delimiter = ',')]
        qubits: Option<Vec<u32>>,

        #[command(flatten)]
        register: RegisterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Rotation about Y
    Ry {
        /// Rotation angle (number or symbol name)
        #[arg(allow_hyphen_values = true)]
        angle: String,

        /// Rotated qubits, comma separated (default: whole register)
        #[arg(short, long, value_delimiter = ',')]
        qubits: Option<Vec<u32>>,

        #[command(flatten)]
        register: RegisterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Rotation about Z
    Rz {
        /// Rotation angle (number or symbol name)
        #[arg(allow_hyphen_values = true)]
        angle: String,

        /// Rotated qubits, comma separated (default: whole register)
        #[arg(short, long, value_delimiter = ',')]
        qubits: Option<Vec<u32>>,

        #[command(flatten)]
        register: RegisterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Interaction {
            duration,
            register,
            output,
        } => interaction::execute(&duration, &register, &output),

        Commands::Drive {
            duration,
            omega,
            delta,
            phase,
            qubits,
            register,
            output,
        } => drive::execute(
            &drive::DriveArgs {
                duration: &duration,
                omega: &omega,
                delta: &delta,
                phase: &phase,
                qubits: qubits.as_deref(),
            },
            &register,
            &output,
        ),

        Commands::Rx {
            angle,
            qubits,
            register,
            output,
        } => rotation::execute(Axis::X, &angle, qubits.as_deref(), &register, &output),

        Commands::Ry {
            angle,
            qubits,
            register,
            output,
        } => rotation::execute(Axis::Y, &angle, qubits.as_deref(), &register, &output),

        Commands::Rz {
            angle,
            qubits,
            register,
            output,
        } => rotation::execute(Axis::Z, &angle, qubits.as_deref(), &register, &output),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
