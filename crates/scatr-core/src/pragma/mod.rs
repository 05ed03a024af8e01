//! Expectation pragma grammar.
//!
//! A pragma is written inside an ordinary source comment:
//!
//! ```text
//! // [E001]: 5 "bad name", 9 "also bad"; [E002]
//! ```
//!
//! Grammar:
//!
//! ```text
//! pragma      := clause (';' clause)*        ; '\;' is a literal ';'
//! clause      := ws* '[' code ']' (':' ws* issue-list)?
//! code        := [A-Za-z0-9_-]+
//! issue-list  := issue (',' issue)*
//! issue       := ws* column? ws* message?
//! column      := digits
//! message     := '"' chars '"'
//! ```
//!
//! Clauses that do not have this shape are ignored, so regular comments
//! never produce a pragma.

mod scanner;

pub use scanner::{ScanError, Scanner};

use crate::types::{Issue, Pragma};
use tracing::debug;

/// Parses the text following a comment token into a [`Pragma`].
///
/// Returns `None` when no clause declares an issue code.
///
/// # Example
///
/// ```
/// use scatr_core::parse_pragma;
///
/// let pragma = parse_pragma(r#" [E001]: 5 "bad""#).unwrap();
/// let issues = pragma.issues("E001").unwrap();
/// assert_eq!(issues[0].column, 5);
/// assert_eq!(issues[0].message, "bad");
/// ```
#[must_use]
pub fn parse_pragma(body: &str) -> Option<Pragma> {
    let mut pragma = Pragma::new();

    for clause in split_clauses(body) {
        let Some((code, rest)) = match_clause(&clause) else {
            continue;
        };

        if rest.trim().is_empty() {
            pragma.declare(code);
            continue;
        }

        let issues = parse_issue_list(rest);
        if issues.is_empty() {
            debug!("Ignoring clause for {code} with unparseable issue list: {rest:?}");
            continue;
        }
        for issue in issues {
            pragma.push(code, issue);
        }
    }

    if pragma.is_empty() {
        None
    } else {
        Some(pragma)
    }
}

/// Splits `body` on `;`, treating `\;` as a literal semicolon.
fn split_clauses(body: &str) -> Vec<String> {
    let mut clauses = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&';') => {
                chars.next();
                current.push(';');
            }
            ';' => clauses.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    clauses.push(current);
    clauses
}

/// Matches `ws* '[' code ']' (':' rest)?`, returning the code and the rest.
fn match_clause(clause: &str) -> Option<(&str, &str)> {
    let inner = clause.trim_start().strip_prefix('[')?;
    let end = inner.find(']')?;
    let code = &inner[..end];
    if code.is_empty() || !code.chars().all(is_code_char) {
        return None;
    }

    let rest = inner[end + 1..].strip_prefix(':').unwrap_or("");
    Some((code, rest))
}

fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Reads `issue (',' issue)*`, stopping at the first piece that does not fit.
fn parse_issue_list(rest: &str) -> Vec<Issue> {
    let mut scanner = Scanner::new(rest);
    let mut issues = Vec::new();

    loop {
        match scan_issue(&mut scanner) {
            Ok(Some(issue)) => issues.push(issue),
            Ok(None) => break,
            Err(e) => {
                debug!("Stopping issue list at {:?}: {e}", scanner.rest());
                break;
            }
        }

        scanner.skip_whitespace();
        if !scanner.eat(',') {
            break;
        }
    }

    issues
}

fn scan_issue(scanner: &mut Scanner<'_>) -> Result<Option<Issue>, ScanError> {
    scanner.skip_whitespace();
    let column = scanner.digits()?;
    scanner.skip_whitespace();
    let message = scanner.quoted()?;

    if column.is_none() && message.is_none() {
        return Ok(None);
    }
    Ok(Some(Issue::new(
        column.unwrap_or(0),
        message.unwrap_or_default(),
    )))
}
