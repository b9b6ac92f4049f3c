//! Talks command - prints the list of conference presentations

use std::path::Path;

use clap::ValueEnum;
use color_eyre::eyre::{Result, WrapErr};
use homepage_generator::{ConferenceList, TalksFormat};

use super::{config_relative, load_config};

/// Output format selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Html,
    Latex,
}

impl From<Format> for TalksFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Html => TalksFormat::Html,
            Format::Latex => TalksFormat::Latex,
        }
    }
}

/// Render the talk list configured in `config_path`.
pub fn render(config_path: &Path, format: Format) -> Result<String> {
    let config = load_config(config_path)?;
    let path = config_relative(config_path, &config.build.source_dir).join(&config.data.talks);

    let talks = ConferenceList::load(&path)
        .wrap_err_with(|| format!("Failed to load talks from {}", path.display()))?;
    tracing::info!(conferences = talks.len(), ?format, "Rendering talks");

    Ok(talks.render_as(format.into(), &config.build.indent_string()))
}

/// Run the talks command.
pub fn run(config_path: &Path, format: Format) -> Result<()> {
    println!("{}", render(config_path, format)?);
    Ok(())
}
