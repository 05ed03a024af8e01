//! Pragmas command implementation.

use anyhow::{Context, Result};
use scatr_core::FixtureLoader;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the pragmas command.
pub fn run(
    path: Option<&Path>,
    format: OutputFormat,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = source.load()?;

    let mut builder = FixtureLoader::builder().config(config).excludes(exclude);
    if let Some(path) = path {
        builder = builder.root(path);
    }

    let loader = builder.build().context("Failed to build fixture loader")?;

    tracing::info!(
        "Loading fixtures from {} ({} languages)",
        loader.root().display(),
        loader.languages().len()
    );

    let set = loader.load().context("Failed to load fixtures")?;

    super::output::print(&set, format)
}
