//! Homepage CLI
//!
//! Deployer for a personal academic home page.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use homepage::cmd::talks::Format;

/// Command-line interface for the homepage deployer.
#[derive(Parser)]
#[command(
    name = "homepage",
    version,
    about = "Render the home page source tree into a static site"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Command to run; defaults to `deploy`
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Render the source tree into the output tree
    Deploy {
        /// Source directory, overriding the configuration
        #[arg(short, long)]
        source: Option<PathBuf>,
        /// Output directory, overriding the configuration
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate configuration and content without writing anything
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Remove the output directory
    Clean {
        /// Output directory, overriding the configuration
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the list of conference presentations
    Talks {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Html)]
        format: Format,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    homepage::init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Deploy {
        source: None,
        output: None,
    });

    match command {
        Commands::Deploy { source, output } => {
            homepage::cmd::deploy::run(&cli.config, source.as_deref(), output.as_deref())?;
        }
        Commands::Check { strict } => {
            homepage::cmd::check::run(&cli.config, strict)?;
        }
        Commands::Clean { output } => {
            homepage::cmd::clean::run(&cli.config, output.as_deref())?;
        }
        Commands::Talks { format } => {
            homepage::cmd::talks::run(&cli.config, format)?;
        }
    }

    Ok(())
}
