//! Output formatting for extracted expectations.

use anyhow::Result;
use scatr_core::{CheckMode, FixtureSet, LoadedFixture};
use std::fmt::Write;

use crate::OutputFormat;

/// Print a fixture set in the specified format.
pub fn print(set: &FixtureSet, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => render_text(set),
        OutputFormat::Json => serde_json::to_string_pretty(set)?,
        OutputFormat::Compact => render_compact(set),
    };
    println!("{rendered}");
    Ok(())
}

fn render_text(set: &FixtureSet) -> String {
    let mut out = String::new();

    for fixture in set.iter() {
        let _ = writeln!(
            out,
            "\x1b[1m{}\x1b[0m ({}{})",
            fixture.path.display(),
            fixture.language,
            mode_suffix(fixture)
        );
        for (line, pragma) in fixture.file.pragmas() {
            for (code, issues) in &pragma.issues {
                if issues.is_empty() {
                    let _ = writeln!(out, "  {line:>4}: [{code}] any");
                }
                for issue in issues {
                    let _ = writeln!(
                        out,
                        "  {line:>4}: [{code}] {}",
                        describe(issue.column, &issue.message)
                    );
                }
            }
        }
        out.push('\n');
    }

    let color = if set.is_empty() { "\x1b[33m" } else { "\x1b[32m" };
    let _ = write!(
        out,
        "{color}Found {} annotated line(s) in {} fixture(s), skipped {} file(s)\x1b[0m",
        set.pragma_count(),
        set.len(),
        set.skipped
    );
    out
}

fn render_compact(set: &FixtureSet) -> String {
    let mut lines = Vec::new();
    for fixture in set.iter() {
        for (line, pragma) in fixture.file.pragmas() {
            for (code, issues) in &pragma.issues {
                if issues.is_empty() {
                    lines.push(format!("{}:{line}: [{code}]", fixture.path.display()));
                }
                for issue in issues {
                    let mut entry = format!(
                        "{}:{line}:{}: [{code}]",
                        fixture.path.display(),
                        issue.column
                    );
                    if !issue.message.is_empty() {
                        entry.push(' ');
                        entry.push_str(&issue.message);
                    }
                    lines.push(entry);
                }
            }
        }
    }
    lines.join("\n")
}

fn mode_suffix(fixture: &LoadedFixture) -> String {
    match fixture.file.check_mode() {
        CheckMode::All => String::new(),
        mode => format!(", {mode}: {}", fixture.file.issue_codes().join(", ")),
    }
}

fn describe(column: usize, message: &str) -> String {
    match (column, message.is_empty()) {
        (0, true) => "any column, any message".to_string(),
        (0, false) => format!("any column, {message:?}"),
        (col, true) => format!("col {col}, any message"),
        (col, false) => format!("col {col}, {message:?}"),
    }
}
