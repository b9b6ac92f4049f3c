//! Deploy command - renders the source tree into the output tree

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use homepage_generator::Builder;

use super::{config_relative, load_config};

/// Run the deploy command.
///
/// `source` and `output` override the configured directories; they are
/// taken as given, not relative to the configuration file.
pub fn run(config_path: &Path, source: Option<&Path>, output: Option<&Path>) -> Result<()> {
    tracing::info!(?config_path, ?source, ?output, "Starting deploy");

    let config = load_config(config_path)?;

    let source_dir = source
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config_relative(config_path, &config.build.source_dir));
    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config_relative(config_path, &config.build.output_dir));

    let builder = Builder::new(config, source_dir, output_dir);
    let stats = builder.build().wrap_err("Deploy failed")?;

    println!();
    println!("  Deploy completed successfully!");
    println!();
    println!("  Pages:      {}", stats.pages);
    println!("  Assets:     {}", stats.assets);
    println!("  Includes:   {}", stats.includes);
    println!();
    println!("  Duration:   {:.2}s", stats.duration_ms as f64 / 1000.0);
    println!("  Output:     {}", builder.output_dir().display());
    println!();

    tracing::info!(?stats, "Deploy completed successfully");

    Ok(())
}
