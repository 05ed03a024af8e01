//! Configuration types for scatr.

use crate::language::{Language, LanguageTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Top-level configuration for scatr.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Fixture discovery configuration.
    #[serde(default)]
    pub fixtures: FixturesConfig,

    /// Per-language comment syntax, overlaid on the built-in table.
    #[serde(default)]
    pub languages: BTreeMap<String, Language>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a language entry is incomplete.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks language entries and fills in their names from the table keys.
    fn validate(&mut self) -> Result<(), ConfigError> {
        for (name, language) in &mut self.languages {
            language.name.clone_from(name);
            language.comment_prefixes.retain(|p| !p.is_empty());

            if language.comment_prefixes.is_empty() {
                return Err(ConfigError::InvalidLanguage {
                    name: name.clone(),
                    reason: "no comment_prefixes".to_string(),
                });
            }
            if language.extensions.is_empty() {
                return Err(ConfigError::InvalidLanguage {
                    name: name.clone(),
                    reason: "no extensions".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the built-in language table with configured languages applied.
    #[must_use]
    pub fn languages(&self) -> LanguageTable {
        let mut table = LanguageTable::builtin();
        for language in self.languages.values() {
            table.insert(language.clone());
        }
        table
    }
}

/// Fixture discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturesConfig {
    /// Root directory holding fixtures (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from discovery.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_exclude(),
            respect_gitignore: true,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_exclude() -> Vec<String> {
    vec!["**/target/**".to_string(), "**/node_modules/**".to_string()]
}

fn default_true() -> bool {
    true
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A configured language cannot be used.
    #[error("Invalid language '{name}': {reason}")]
    InvalidLanguage {
        /// Language table key.
        name: String,
        /// What is missing.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.fixtures.respect_gitignore);
        assert_eq!(config.fixtures.root, PathBuf::from("."));
        assert!(config.languages.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml = r##"
[fixtures]
root = "./testdata"
exclude = ["**/generated/**"]

[languages.go]
extensions = ["go"]
comment_prefixes = ["//"]

[languages.jinja]
extensions = ["j2", "jinja"]
comment_prefixes = ["{#"]
"##;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.fixtures.root, PathBuf::from("./testdata"));
        assert_eq!(config.fixtures.exclude, vec!["**/generated/**"]);
        assert_eq!(config.languages["jinja"].name, "jinja");

        let table = config.languages();
        let lang = table.for_path(Path::new("page.j2")).unwrap();
        assert_eq!(lang.comment_prefixes, vec!["{#"]);
        assert!(table.get("python").is_some());
    }

    #[test]
    fn test_empty_sections_use_defaults() {
        let config = Config::parse("[fixtures]\n").expect("Failed to parse");
        assert_eq!(config.fixtures.exclude, default_exclude());
        assert!(config.fixtures.respect_gitignore);
    }

    #[test]
    fn test_language_without_prefixes_rejected() {
        let toml = r#"
[languages.odd]
extensions = ["odd"]
comment_prefixes = [""]
"#;
        let err = Config::parse(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLanguage { ref name, .. } if name == "odd"));
    }

    #[test]
    fn test_language_without_extensions_rejected() {
        let toml = r#"
[languages.odd]
comment_prefixes = [";"]
"#;
        let err = Config::parse(toml).unwrap_err();
        assert!(err.to_string().contains("no extensions"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::parse("[fixtures\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file(Path::new("/nonexistent/scatr.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
