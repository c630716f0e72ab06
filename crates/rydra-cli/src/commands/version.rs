//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - analog operations for Rydberg atom registers",
        style("Rydra").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  rydra-ir      Symbolic parameters, operator terms and generators");
    println!("  rydra-analog  Interaction, drive and rotation operations");
    println!("  rydra-cli     Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
