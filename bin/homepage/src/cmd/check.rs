//! Check command - validates configuration and content without writing

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail};
use homepage_generator::Builder;

use super::{base_dir, load_config};

/// Run the check command.
///
/// Performs every step of a deploy except writing, then reports warnings.
/// With `strict`, warnings fail the check.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    println!("Checking configuration...");
    let config = load_config(config_path)?;
    println!("  ✓ Configuration valid");

    let builder = Builder::from_config(config, &base_dir(config_path));

    println!("\nChecking source tree {}...", builder.source_dir().display());
    let report = builder.check().wrap_err("Check failed")?;
    println!(
        "  ✓ {} pages, {} assets, {} includes",
        report.pages, report.assets, report.includes
    );

    println!();
    println!("Summary:");
    println!("  Warnings: {}", report.warnings.len());

    if !report.is_clean() {
        println!();
        println!("Warnings:");
        for warn in &report.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if strict && !report.is_clean() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            report.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}
