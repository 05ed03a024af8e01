//! Fixture discovery and loading.

use crate::config::{Config, ConfigError};
use crate::fixture::File;
use crate::language::LanguageTable;

use miette::Diagnostic;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while loading fixtures.
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    /// The fixture root does not exist.
    #[error("Fixture root does not exist: {}", .path.display())]
    #[diagnostic(
        code(scatr::load::missing_root),
        help("check the path argument or `[fixtures] root` in scatr.toml")
    )]
    MissingRoot {
        /// Root that was requested.
        path: PathBuf,
    },

    /// IO error resolving the root.
    #[error("IO error: {0}")]
    #[diagnostic(code(scatr::load::io))]
    Io(#[from] std::io::Error),

    /// Error while walking the fixture tree.
    #[error("Failed to walk fixtures: {0}")]
    #[diagnostic(code(scatr::load::walk))]
    Walk(#[from] ignore::Error),

    /// Invalid exclude pattern.
    #[error("Invalid exclude pattern: {0}")]
    #[diagnostic(code(scatr::load::glob))]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    #[diagnostic(code(scatr::load::config))]
    Config(#[from] ConfigError),
}

/// A fixture found on disk.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedFixture {
    /// Path relative to the fixture root.
    pub path: PathBuf,
    /// Name of the language whose comment syntax was used.
    pub language: String,
    /// Extracted expectations.
    pub file: File,
}

/// Result of loading a fixture tree.
#[derive(Debug, Default, Serialize)]
pub struct FixtureSet {
    /// Loaded fixtures, sorted by path.
    pub fixtures: Vec<LoadedFixture>,
    /// Files skipped because no language matched or they could not be opened.
    pub skipped: usize,
}

impl FixtureSet {
    /// Number of loaded fixtures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    /// Returns true if no fixture was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// Iterates loaded fixtures.
    pub fn iter(&self) -> impl Iterator<Item = &LoadedFixture> {
        self.fixtures.iter()
    }

    /// Total number of annotated lines across all fixtures.
    #[must_use]
    pub fn pragma_count(&self) -> usize {
        self.fixtures.iter().map(|f| f.file.pragmas().len()).sum()
    }
}

/// Builder for configuring a [`FixtureLoader`].
#[derive(Default)]
pub struct FixtureLoaderBuilder {
    root: Option<PathBuf>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
}

impl FixtureLoaderBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fixture root (a directory or a single file).
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the loader.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be resolved or an
    /// exclude pattern is invalid.
    pub fn build(self) -> Result<FixtureLoader, LoadError> {
        let config = self.config.unwrap_or_default();

        let root = self.root.unwrap_or_else(|| config.fixtures.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let exclude = self
            .exclude_patterns
            .iter()
            .chain(&config.fixtures.exclude)
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FixtureLoader {
            root,
            exclude,
            languages: config.languages(),
            respect_gitignore: config.fixtures.respect_gitignore,
        })
    }
}

/// Discovers fixtures under a root and extracts their expectations.
///
/// Use [`FixtureLoader::builder()`] to construct an instance.
#[derive(Debug)]
pub struct FixtureLoader {
    root: PathBuf,
    exclude: Vec<glob::Pattern>,
    languages: LanguageTable,
    respect_gitignore: bool,
}

impl FixtureLoader {
    /// Creates a new builder for configuring a loader.
    #[must_use]
    pub fn builder() -> FixtureLoaderBuilder {
        FixtureLoaderBuilder::new()
    }

    /// Returns the fixture root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the language table used to pick comment syntax.
    #[must_use]
    pub fn languages(&self) -> &LanguageTable {
        &self.languages
    }

    /// Loads every fixture under the root.
    ///
    /// Files without a known language, or that cannot be opened, are
    /// skipped and counted.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is missing or the tree cannot be walked.
    pub fn load(&self) -> Result<FixtureSet, LoadError> {
        info!("Loading fixtures from {}", self.root.display());

        if !self.root.exists() {
            return Err(LoadError::MissingRoot {
                path: self.root.clone(),
            });
        }

        let mut set = FixtureSet::default();
        for path in self.discover()? {
            let Some(language) = self.languages.for_path(&path) else {
                debug!("No comment syntax for {}", path.display());
                set.skipped += 1;
                continue;
            };

            match File::open(&path, &language.comment_prefixes) {
                Ok(file) => set.fixtures.push(LoadedFixture {
                    path: self.relative(&path),
                    language: language.name.clone(),
                    file,
                }),
                Err(e) => {
                    warn!("Failed to open fixture {}: {}", path.display(), e);
                    set.skipped += 1;
                }
            }
        }

        set.fixtures.sort_by(|a, b| a.path.cmp(&b.path));

        info!(
            "Loaded {} fixture(s) with {} annotated line(s), skipped {}",
            set.len(),
            set.pragma_count(),
            set.skipped
        );

        Ok(set)
    }

    /// Lists candidate files under the root.
    fn discover(&self) -> Result<Vec<PathBuf>, LoadError> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let walker = ignore::WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .ignore(self.respect_gitignore)
            .require_git(false)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.into_path();
            if self.should_exclude(&path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path);
        }

        Ok(files)
    }

    /// Checks a path against the exclude patterns, absolute and relative.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = self.relative(path);
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_path(path) || pattern.matches_path(&relative))
    }

    fn relative(&self, path: &Path) -> PathBuf {
        if path == self.root {
            return path
                .file_name()
                .map_or_else(|| path.to_path_buf(), PathBuf::from);
        }
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }
}
