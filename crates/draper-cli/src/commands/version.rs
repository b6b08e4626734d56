//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - QFT adder laboratory with noisy simulation and error mitigation",
        style("Draper").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  draper-ir   Circuit intermediate representation and adder builder");
    println!("  draper-sim  Statevector simulator with trajectory noise");
    println!("  draper-zne  Zero-noise extrapolation");
    println!("  draper-cli  Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style("https://github.com/draper-lab/draper").underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
