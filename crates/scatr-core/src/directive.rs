//! File-level check-mode directives.
//!
//! Only the first line of a fixture is inspected:
//! ```text
//! // scatr-check: E001, E002
//! // scatr-ignore: E003
//! ```

use crate::types::CheckMode;

const CHECK_DIRECTIVE: &str = "scatr-check:";
const IGNORE_DIRECTIVE: &str = "scatr-ignore:";

/// Parsed file-level directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDirective {
    /// Mode selected by the directive, never [`CheckMode::All`].
    pub mode: CheckMode,
    /// Issue codes listed by the directive, in order.
    pub codes: Vec<String>,
}

impl FileDirective {
    /// Parses a directive from the text following a comment token.
    ///
    /// Returns `None` if the text is not a directive or lists no codes.
    #[must_use]
    pub fn parse(comment_body: &str) -> Option<Self> {
        let body = comment_body.trim();

        let (mode, list) = if let Some(rest) = body.strip_prefix(CHECK_DIRECTIVE) {
            (CheckMode::Include, rest)
        } else if let Some(rest) = body.strip_prefix(IGNORE_DIRECTIVE) {
            (CheckMode::Exclude, rest)
        } else {
            return None;
        };

        let codes: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if codes.is_empty() {
            return None;
        }

        Some(Self { mode, codes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check() {
        let directive = FileDirective::parse(" scatr-check: E001").unwrap();
        assert_eq!(directive.mode, CheckMode::Include);
        assert_eq!(directive.codes, vec!["E001"]);
    }

    #[test]
    fn test_parse_ignore_multiple() {
        let directive = FileDirective::parse(" scatr-ignore: E3, E4").unwrap();
        assert_eq!(directive.mode, CheckMode::Exclude);
        assert_eq!(directive.codes, vec!["E3", "E4"]);
    }

    #[test]
    fn test_parse_without_spaces() {
        let directive = FileDirective::parse("scatr-check:A,B,C").unwrap();
        assert_eq!(directive.codes, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_empty_entries_dropped() {
        let directive = FileDirective::parse(" scatr-check: A, , B,").unwrap();
        assert_eq!(directive.codes, vec!["A", "B"]);
    }

    #[test]
    fn test_empty_list_is_not_a_directive() {
        assert!(FileDirective::parse(" scatr-check:").is_none());
        assert!(FileDirective::parse(" scatr-ignore: , ").is_none());
    }

    #[test]
    fn test_unrelated_comment() {
        assert!(FileDirective::parse(" package main").is_none());
        assert!(FileDirective::parse(" scatr-checks: E1").is_none());
        assert!(FileDirective::parse(" [E1]: 1").is_none());
    }
}
