//! Homepage CLI Library
//!
//! Command implementations for the `homepage` deployer. The binary entry
//! point parses the command line and dispatches here.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (deploy, check, clean, talks)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use homepage::cmd;
//!
//! // Deploy the site described by site.toml
//! cmd::deploy::run(Path::new("site.toml"), None, None).unwrap();
//! ```

pub mod cmd;

pub use homepage_core::{Config, Page};
pub use homepage_generator::{BuildStats, Builder, CheckReport};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// `RUST_LOG` directives are applied on top of the level.
///
/// # Example
///
/// ```no_run
/// homepage::init_tracing(2); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
