//! Clean command - removes the output tree

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use homepage_generator::Builder;

use super::{config_relative, load_config};

/// Run the clean command.
pub fn run(config_path: &Path, output: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let source_dir = config_relative(config_path, &config.build.source_dir);
    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config_relative(config_path, &config.build.output_dir));

    let removed = Builder::new(config, source_dir, &output_dir)
        .clean()
        .wrap_err("Clean failed")?;

    if removed {
        println!("Removed {}", output_dir.display());
    } else {
        println!("Nothing to clean at {}", output_dir.display());
    }

    Ok(())
}
