//! Shared helpers for CLI commands.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use serde::Serialize;
use tracing::warn;

use rydra_analog::{AnalogConfig, AnalogOperation, Register};
use rydra_ir::eval::Bindings;
use rydra_ir::{ParamRole, ParameterExpression, QubitSupport};

/// Where the register comes from.
#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// Register YAML file (overrides --line/--spacing)
    #[arg(short, long, conflicts_with_all = ["line", "spacing"])]
    pub config: Option<PathBuf>,

    /// Number of atoms on a line register
    #[arg(long, default_value = "2")]
    pub line: u32,

    /// Atom spacing in µm
    #[arg(long, default_value = "5.0")]
    pub spacing: f64,

    /// Leave out the register's pattern block
    #[arg(long)]
    pub no_pattern: bool,
}

/// How results are printed.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Bind a symbol before evaluating (repeatable)
    #[arg(short, long = "bind", value_name = "NAME=VALUE")]
    pub bindings: Vec<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

/// Load the register and the effective pattern setting.
pub fn load_register(args: &RegisterArgs) -> Result<(Register, bool)> {
    let config = match &args.config {
        Some(path) => AnalogConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AnalogConfig::new(Register::line(args.line, args.spacing)?).merge_env()?,
    };
    let add_pattern = config.add_pattern && !args.no_pattern;
    Ok((config.register, add_pattern))
}

/// Parse a number, `pi`, or a symbol name.
pub fn parse_value(s: &str) -> Result<ParameterExpression> {
    let s = s.trim();
    if let Ok(v) = s.parse::<f64>() {
        if !v.is_finite() {
            anyhow::bail!("Value must be finite: '{s}'");
        }
        return Ok(ParameterExpression::constant(v));
    }
    match s {
        "pi" | "π" => return Ok(ParameterExpression::pi()),
        "-pi" | "-π" => return Ok(-ParameterExpression::pi()),
        _ => {}
    }
    if is_symbol_name(s) {
        Ok(ParameterExpression::symbol(s))
    } else {
        anyhow::bail!("Expected a number or a symbol name, got '{s}'")
    }
}

fn is_symbol_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Parse a `name=value` binding.
pub fn parse_binding(s: &str) -> Result<(String, f64)> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Binding must look like NAME=VALUE, got '{s}'"))?;
    let name = name.trim();
    if !is_symbol_name(name) {
        anyhow::bail!("Invalid symbol name in binding: '{name}'");
    }
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value in binding '{s}'"))?;
    Ok((name.to_string(), value))
}

/// Parse all bindings, rejecting duplicates.
pub fn parse_bindings(raw: &[String]) -> Result<Bindings> {
    let mut bindings = Bindings::default();
    for entry in raw {
        let (name, value) = parse_binding(entry)?;
        if bindings.insert(name.clone(), value).is_some() {
            anyhow::bail!("Symbol '{name}' bound more than once");
        }
    }
    Ok(bindings)
}

/// Qubit list to support, `None` for the whole register.
pub fn support(qubits: Option<&[u32]>) -> Option<QubitSupport> {
    qubits.map(|q| QubitSupport::from(q.to_vec()))
}

#[derive(Serialize)]
struct Report<'a> {
    operation: &'a AnalogOperation,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<BTreeMap<ParamRole, f64>>,
}

/// Bound names that are not free symbols of `op`, sorted.
pub fn unused_bindings<'a>(op: &AnalogOperation, bindings: &'a Bindings) -> Vec<&'a str> {
    let symbols = op.symbols();
    let mut unused: Vec<_> = bindings
        .keys()
        .map(String::as_str)
        .filter(|name| !symbols.contains(*name))
        .collect();
    unused.sort_unstable();
    unused
}

/// Print an operation, evaluated under the requested bindings.
pub fn report(op: &AnalogOperation, output: &OutputArgs) -> Result<()> {
    let bindings = parse_bindings(&output.bindings)?;
    for name in unused_bindings(op, &bindings) {
        warn!("Ignoring binding {name}: not a symbol of {}", op.name());
    }
    let op = bindings
        .iter()
        .fold(op.clone(), |op, (name, value)| op.bind(name, *value));
    let values = if bindings.is_empty() {
        None
    } else {
        Some(
            op.parameters()
                .evaluate(&bindings)
                .context("Cannot evaluate parameters")?,
        )
    };

    match output.format.to_lowercase().as_str() {
        "json" => {
            let report = Report {
                operation: &op,
                values,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "text" => print_text(&op, values.as_ref()),
        other => anyhow::bail!("Unknown format: '{other}'. Available: text, json"),
    }
    Ok(())
}

fn print_text(op: &AnalogOperation, values: Option<&BTreeMap<ParamRole, f64>>) {
    println!(
        "{} {} on {}",
        style("→").cyan().bold(),
        style(op.name()).green().bold(),
        style(op.qubit_support()).yellow()
    );
    println!("  Generator: {}", op.generator());
    println!("  Evolution time: {}", op.parameter());
    if let Some(angle) = op.rotation_angle() {
        println!("  Rotation angle: {angle}");
    }
    println!("  Parameters:");
    for (role, expr) in op.parameters().iter() {
        println!("    {} {expr}", style(format!("{:<9}", role.name())).dim());
    }
    if let Some(values) = values {
        println!("  Values:");
        for (role, value) in values {
            println!("    {} {value:.6}", style(format!("{:<9}", role.name())).dim());
        }
    }
    let symbols = op.symbols();
    if !symbols.is_empty() {
        let names: Vec<_> = symbols.into_iter().collect();
        println!("  Free symbols: {}", names.join(", "));
    }
}
