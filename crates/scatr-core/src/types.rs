//! Core types for fixture expectations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One expected diagnostic occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    /// Expected column, 0 when unspecified.
    pub column: usize,
    /// Expected message, empty when unconstrained.
    pub message: String,
    /// Set by the diff engine once a reported issue matched this entry.
    #[serde(default)]
    pub hit: bool,
}

impl Issue {
    /// Creates a new expected issue.
    #[must_use]
    pub fn new(column: usize, message: impl Into<String>) -> Self {
        Self {
            column,
            message: message.into(),
            hit: false,
        }
    }

    /// Returns true if a reported issue at `column` with `message` satisfies
    /// this expectation.
    ///
    /// A column of 0 and an empty message act as wildcards.
    #[must_use]
    pub fn accepts(&self, column: usize, message: &str) -> bool {
        (self.column == 0 || self.column == column)
            && (self.message.is_empty() || self.message == message)
    }
}

/// The set of expectations declared for a single source line.
///
/// A pragma may be the union of several physical annotations: a run of
/// standalone comment lines above the code line plus a trailing comment on
/// the line itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pragma {
    /// Expected issues by issue code, in declaration order.
    ///
    /// An empty sequence means the code must occur with no further constraint.
    pub issues: BTreeMap<String, Vec<Issue>>,
    /// Whether at least one issue of the code was observed.
    pub hit: BTreeMap<String, bool>,
}

impl Pragma {
    /// Creates an empty pragma.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `code` without constraining column or message.
    pub fn declare(&mut self, code: impl Into<String>) {
        let code = code.into();
        self.hit.entry(code.clone()).or_insert(false);
        self.issues.entry(code).or_default();
    }

    /// Appends an expected issue under `code`.
    pub fn push(&mut self, code: impl Into<String>, issue: Issue) {
        let code = code.into();
        self.hit.entry(code.clone()).or_insert(false);
        self.issues.entry(code).or_default().push(issue);
    }

    /// Merges a pragma declared further down the file into this one.
    ///
    /// Issues of `later` are appended after the receiver's own issues for
    /// each code, and the per-code hit flag becomes the OR of both sources.
    pub fn extend(&mut self, later: Pragma) {
        for (code, issues) in later.issues {
            self.issues.entry(code).or_default().extend(issues);
        }
        for (code, hit) in later.hit {
            *self.hit.entry(code).or_insert(false) |= hit;
        }
    }

    /// Returns true if no issue code was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns the declared issue codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.issues.keys().map(String::as_str)
    }

    /// Returns true if `code` was declared.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.issues.contains_key(code)
    }

    /// Returns the expected issues declared for `code`.
    #[must_use]
    pub fn issues(&self, code: &str) -> Option<&[Issue]> {
        self.issues.get(code).map(Vec::as_slice)
    }

    /// Returns the expected issues for `code`, mutably.
    pub fn issues_mut(&mut self, code: &str) -> Option<&mut Vec<Issue>> {
        self.issues.get_mut(code)
    }

    /// Records that `code` was observed. Returns false if it was never declared.
    pub fn mark_hit(&mut self, code: &str) -> bool {
        match self.hit.get_mut(code) {
            Some(hit) => {
                *hit = true;
                true
            }
            None => false,
        }
    }

    /// Returns true if `code` was observed.
    #[must_use]
    pub fn is_hit(&self, code: &str) -> bool {
        self.hit.get(code).copied().unwrap_or(false)
    }

    /// Total number of column/message expectations across all codes.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.issues.values().map(Vec::len).sum()
    }
}

/// File-level filter over which issue codes take part in verification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
    /// Every issue code is checked.
    #[default]
    All,
    /// Only the listed issue codes are checked.
    Include,
    /// Every issue code except the listed ones is checked.
    Exclude,
}

impl CheckMode {
    /// Returns true if `code` participates under this mode and code list.
    #[must_use]
    pub fn allows<S: AsRef<str>>(self, codes: &[S], code: &str) -> bool {
        let listed = codes.iter().any(|c| c.as_ref() == code);
        match self {
            Self::All => true,
            Self::Include => listed,
            Self::Exclude => !listed,
        }
    }
}

impl std::fmt::Display for CheckMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Include => write!(f, "include"),
            Self::Exclude => write!(f, "exclude"),
        }
    }
}

/// An issue raised by a checker run over a fixture.
///
/// This is what the diff engine compares against the extracted pragmas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportedIssue {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number.
    pub column: usize,
    /// Issue code.
    pub code: String,
    /// Diagnostic message.
    pub message: String,
}

impl ReportedIssue {
    /// Creates a new reported issue.
    #[must_use]
    pub fn new(
        line: usize,
        column: usize,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            line,
            column,
            code: code.into(),
            message: message.into(),
        }
    }
}
