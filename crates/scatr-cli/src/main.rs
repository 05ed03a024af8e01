//! scatr CLI tool.
//!
//! Usage:
//! ```bash
//! scatr pragmas [OPTIONS] [PATH]
//! scatr languages
//! scatr init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Inspect the expectations declared in checker test fixtures
#[derive(Parser)]
#[command(name = "scatr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the expectation table extracted from fixtures
    Pragmas {
        /// Fixture file or directory (default: `[fixtures] root` from config)
        path: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List comment syntax per language
    Languages,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for extracted expectations.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-issue compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let fixtures = match &cli.command {
        Commands::Pragmas {
            path: Some(path), ..
        } => path.as_path(),
        _ => Path::new("."),
    };
    let source = config_resolver::resolve(fixtures, cli.config.as_deref());

    match cli.command {
        Commands::Pragmas {
            path,
            format,
            exclude,
        } => commands::pragmas::run(path.as_deref(), format, exclude, &source),
        Commands::Languages => commands::languages::run(&source),
        Commands::Init { force } => commands::init::run(force),
    }
}
