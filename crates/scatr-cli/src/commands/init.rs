//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r##"# scatr configuration

[fixtures]
# Directory holding checker fixtures (default: current directory)
# root = "testdata"

# Glob patterns to exclude from discovery
exclude = [
    "**/target/**",
    "**/node_modules/**",
]

# Respect .gitignore files
respect_gitignore = true

# Language overrides
# Built-in languages can be replaced, new ones added by extension

# [languages.nix]
# extensions = ["nix"]
# comment_prefixes = ["#"]
"##;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_default(Path::new("scatr.toml"), force)?;

    println!("Created scatr.toml");
    println!("\nNext steps:");
    println!("  1. Point [fixtures] root at your checker fixtures");
    println!("  2. Run: scatr pragmas");

    Ok(())
}

fn write_default(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
