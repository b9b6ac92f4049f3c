//! Command implementations.

pub mod check;
pub mod clean;
pub mod deploy;
pub mod talks;

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use homepage_core::Config;

/// Load the configuration, falling back to the defaults when the file does
/// not exist.
pub fn load_config(config_path: &Path) -> Result<Config> {
    let config = Config::load_or_default(config_path)
        .wrap_err_with(|| format!("Failed to load configuration from {}", config_path.display()))?;
    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Directory that relative paths in the configuration file are resolved
/// against.
pub fn base_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// A directory from the configuration, relative to the configuration file.
pub fn config_relative(config_path: &Path, dir: &str) -> PathBuf {
    base_dir(config_path).join(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_dir() {
        assert_eq!(base_dir(Path::new("site.toml")), PathBuf::from("."));
        assert_eq!(
            base_dir(Path::new("demos/homepage/site.toml")),
            PathBuf::from("demos/homepage")
        );
    }

    #[test]
    fn test_config_relative() {
        assert_eq!(
            config_relative(Path::new("demos/homepage/site.toml"), "webpage"),
            PathBuf::from("demos/homepage/webpage")
        );
    }

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = load_config(&dir.path().join("site.toml")).expect("defaults");
        assert_eq!(config.build.source_dir, "webpage");
    }
}
