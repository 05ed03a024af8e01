//! Locating `scatr.toml` for a fixture tree.
//!
//! The nearest `scatr.toml` (or `.scatr.toml`) in the fixture directory or
//! one of its ancestors applies, so fixtures nested deep under a checker's
//! `testdata/` still pick up the repository config. `--config` skips the
//! search. `config.toml` in the global directory (`$SCATR_CONFIG_DIR` or
//! `~/.scatr/`) is the last file tried before built-in defaults.
//!
//! A relative `[fixtures] root` is read relative to the file that sets it,
//! not the working directory.

use anyhow::{Context, Result};
use scatr_core::Config;
use std::fmt;
use std::path::{Path, PathBuf};

/// Config file names searched in each directory, in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["scatr.toml", ".scatr.toml"];

/// Where the configuration for a run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed with `--config`.
    Flag(PathBuf),
    /// Nearest project config above the fixtures.
    Nearest(PathBuf),
    /// `config.toml` in the global directory.
    Global(PathBuf),
    /// Nothing found; built-in languages and defaults.
    Builtin,
}

impl ConfigSource {
    /// Returns the config file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Flag(p) | Self::Nearest(p) | Self::Global(p) => Some(p),
            Self::Builtin => None,
        }
    }

    /// Reads the config and anchors its fixture root at the file's directory.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            tracing::debug!("No config file found, using built-in defaults");
            return Ok(Config::default());
        };

        let mut config = Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;
        if let Some(dir) = path.parent() {
            anchor_root(&mut config, dir);
        }

        tracing::info!("Using {self} config: {}", path.display());
        Ok(config)
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(_) => write!(f, "explicit"),
            Self::Nearest(_) => write!(f, "project"),
            Self::Global(_) => write!(f, "global"),
            Self::Builtin => write!(f, "built-in"),
        }
    }
}

/// Finds the config that applies to `fixtures` (a fixture file or directory).
#[must_use]
pub fn resolve(fixtures: &Path, flag: Option<&Path>) -> ConfigSource {
    resolve_with(fixtures, flag, global_config_dir())
}

fn resolve_with(
    fixtures: &Path,
    flag: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(path) = flag {
        return ConfigSource::Flag(path.to_path_buf());
    }

    if let Some(found) = nearest_project_config(fixtures) {
        return ConfigSource::Nearest(found);
    }

    global_dir
        .map(|dir| dir.join("config.toml"))
        .filter(|p| p.is_file())
        .map_or(ConfigSource::Builtin, ConfigSource::Global)
}

/// Walks from the fixture directory up to the filesystem root.
fn nearest_project_config(fixtures: &Path) -> Option<PathBuf> {
    let start = if fixtures.is_file() {
        fixtures.parent().unwrap_or(Path::new(""))
    } else {
        fixtures
    };
    let start = if start.is_absolute() {
        start.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(start)
    };

    start
        .ancestors()
        .flat_map(|dir| PROJECT_CONFIG_NAMES.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

fn anchor_root(config: &mut Config, dir: &Path) {
    if config.fixtures.root.is_relative() {
        config.fixtures.root = dir.join(&config.fixtures.root);
    }
}

/// Returns the global config directory: `$SCATR_CONFIG_DIR`, else `~/.scatr/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os("SCATR_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|h| h.join(".scatr")))
}
