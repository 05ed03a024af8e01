//! Comment syntax per source language.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Comment syntax for one source language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Language name (e.g., "go").
    #[serde(default)]
    pub name: String,
    /// File extensions without the leading dot, or exact file names.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Comment-start tokens, tried in order.
    #[serde(default)]
    pub comment_prefixes: Vec<String>,
}

impl Language {
    /// Creates a new language entry.
    #[must_use]
    pub fn new(name: &str, extensions: &[&str], comment_prefixes: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|s| (*s).to_string()).collect(),
            comment_prefixes: comment_prefixes.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Returns true if this language handles `path`.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        let file_name = path.file_name().and_then(|n| n.to_str());
        let extension = path.extension().and_then(|e| e.to_str());

        self.extensions.iter().any(|ext| {
            file_name == Some(ext.as_str())
                || extension.is_some_and(|e| e.eq_ignore_ascii_case(ext))
        })
    }
}

/// Built-in languages, keyed by name.
fn builtin() -> Vec<Language> {
    vec![
        Language::new("c", &["c", "h"], &["//", "/*"]),
        Language::new("cpp", &["cc", "cpp", "cxx", "hpp", "hh"], &["//", "/*"]),
        Language::new("dockerfile", &["Dockerfile", "dockerfile"], &["#"]),
        Language::new("go", &["go"], &["//"]),
        Language::new("java", &["java"], &["//"]),
        Language::new("javascript", &["js", "jsx", "mjs", "cjs"], &["//"]),
        Language::new("kotlin", &["kt", "kts"], &["//"]),
        Language::new("lua", &["lua"], &["--"]),
        Language::new("php", &["php"], &["//", "#"]),
        Language::new("python", &["py", "pyi"], &["#"]),
        Language::new("ruby", &["rb"], &["#"]),
        Language::new("rust", &["rs"], &["//"]),
        Language::new("shell", &["sh", "bash", "zsh"], &["#"]),
        Language::new("sql", &["sql"], &["--"]),
        Language::new("terraform", &["tf", "tfvars", "hcl"], &["#", "//"]),
        Language::new("toml", &["toml"], &["#"]),
        Language::new("typescript", &["ts", "tsx", "mts", "cts"], &["//"]),
        Language::new("yaml", &["yml", "yaml"], &["#"]),
    ]
}

/// Lookup table from file paths to comment syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTable {
    languages: BTreeMap<String, Language>,
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LanguageTable {
    /// Creates a table holding only the built-in languages.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            languages: builtin()
                .into_iter()
                .map(|lang| (lang.name.clone(), lang))
                .collect(),
        }
    }

    /// Creates an empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            languages: BTreeMap::new(),
        }
    }

    /// Adds a language, replacing any existing entry with the same name.
    pub fn insert(&mut self, language: Language) {
        self.languages.insert(language.name.clone(), language);
    }

    /// Returns the language registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Language> {
        self.languages.get(name)
    }

    /// Resolves the language for a fixture path.
    ///
    /// When several languages claim the same extension, the first by name wins.
    #[must_use]
    pub fn for_path(&self, path: &Path) -> Option<&Language> {
        self.languages.values().find(|lang| lang.matches(path))
    }

    /// Iterates languages in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.languages.values()
    }

    /// Number of registered languages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Returns true if no language is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
