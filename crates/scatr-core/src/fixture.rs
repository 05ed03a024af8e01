//! Annotated source fixtures.
//!
//! A [`File`] is built once from fixture text and the comment tokens of its
//! language. Construction scans every line, recognizes pragmas and the
//! optional check-mode directive on line 1, and attaches each pragma to the
//! code line it describes:
//!
//! ```text
//! // [E1]: 1 "a"          <- standalone, describes the next line
//! // [E2]: 2 "b"          <- chained onto the same code line
//! doSomething() // [E3]   <- trailing, describes this line
//! ```
//!
//! All three annotations above end up in one [`Pragma`] on line 3.

use crate::directive::FileDirective;
use crate::pragma::parse_pragma;
use crate::types::{CheckMode, Pragma};

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// One source fixture with its extracted expectations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    name: String,
    #[serde(skip)]
    content: String,
    comment_prefixes: Vec<String>,
    pragmas: BTreeMap<usize, Pragma>,
    check_mode: CheckMode,
    issue_codes: Vec<String>,
}

impl File {
    /// Builds a fixture from its full text.
    ///
    /// `name` has its extension stripped. `comment_prefixes` are tried in
    /// order on every line; the first one found wins.
    #[must_use]
    pub fn new<S: AsRef<str>>(
        name: &str,
        content: impl Into<String>,
        comment_prefixes: &[S],
    ) -> Self {
        let content = content.into();
        let mut extractor = Extractor::new(strip_extension(name), comment_prefixes);

        for (idx, line) in content.lines().enumerate() {
            extractor.feed(idx + 1, line);
        }

        extractor.finish(content)
    }

    /// Builds a fixture by streaming lines from `reader`.
    ///
    /// A read error stops the scan; everything extracted up to that point is
    /// kept and the error is logged.
    #[must_use]
    pub fn from_reader<R: BufRead, S: AsRef<str>>(
        name: &str,
        mut reader: R,
        comment_prefixes: &[S],
    ) -> Self {
        let mut extractor = Extractor::new(strip_extension(name), comment_prefixes);
        let mut content = String::new();
        let mut buf = String::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            match reader.read_line(&mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    line_no += 1;
                    let line = buf.strip_suffix('\n').unwrap_or(&buf);
                    let line = line.strip_suffix('\r').unwrap_or(line);
                    extractor.feed(line_no, line);
                    content.push_str(&buf);
                }
                Err(e) => {
                    warn!(
                        "Stopped reading fixture {} after line {}: {}",
                        extractor.name, line_no, e
                    );
                    break;
                }
            }
        }

        extractor.finish(content)
    }

    /// Opens and scans a fixture on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open<S: AsRef<str>>(path: &Path, comment_prefixes: &[S]) -> io::Result<Self> {
        let handle = std::fs::File::open(path)?;
        let name = path
            .file_name()
            .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy());
        Ok(Self::from_reader(&name, BufReader::new(handle), comment_prefixes))
    }

    /// Fixture name without extension.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fixture text as read.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Comment tokens recognized for this fixture.
    #[must_use]
    pub fn comment_prefixes(&self) -> &[String] {
        &self.comment_prefixes
    }

    /// Expectations keyed by 1-indexed line number.
    #[must_use]
    pub fn pragmas(&self) -> &BTreeMap<usize, Pragma> {
        &self.pragmas
    }

    /// Expectations for a single line.
    #[must_use]
    pub fn pragma_at(&self, line: usize) -> Option<&Pragma> {
        self.pragmas.get(&line)
    }

    /// Expectations for a single line, for recording hits.
    pub fn pragma_at_mut(&mut self, line: usize) -> Option<&mut Pragma> {
        self.pragmas.get_mut(&line)
    }

    /// File-level check mode.
    #[must_use]
    pub fn check_mode(&self) -> CheckMode {
        self.check_mode
    }

    /// Codes listed by the check-mode directive.
    #[must_use]
    pub fn issue_codes(&self) -> &[String] {
        &self.issue_codes
    }

    /// Returns true if issues with `code` take part in verifying this fixture.
    #[must_use]
    pub fn should_check(&self, code: &str) -> bool {
        self.check_mode.allows(&self.issue_codes, code)
    }
}

/// A pragma stored during the scan, tagged with the line that wrote it.
#[derive(Debug)]
struct Slot {
    pragma: Pragma,
    origin: usize,
    /// Written by a comment-only pragma line rather than a trailing one.
    standalone: bool,
}

/// Single forward pass over a fixture's lines.
struct Extractor {
    name: String,
    prefixes: Vec<String>,
    slots: BTreeMap<usize, Slot>,
    /// Origin line of the most recent standalone pragma.
    pending: Option<usize>,
    previous_comment_only: bool,
    check_mode: CheckMode,
    issue_codes: Vec<String>,
}

impl Extractor {
    fn new<S: AsRef<str>>(name: String, prefixes: &[S]) -> Self {
        Self {
            name,
            prefixes: prefixes
                .iter()
                .map(|p| p.as_ref().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            slots: BTreeMap::new(),
            pending: None,
            previous_comment_only: false,
            check_mode: CheckMode::All,
            issue_codes: Vec::new(),
        }
    }

    fn feed(&mut self, line_no: usize, line: &str) {
        let trimmed = line.trim();
        let comment_only = self
            .prefixes
            .iter()
            .any(|p| trimmed.starts_with(p.as_str()));

        if let Some((prefix, body)) = self.find_comment(line) {
            if line_no == 1 {
                if let Some(directive) = FileDirective::parse(body) {
                    debug!(
                        "{}: check mode {} for {:?}",
                        self.name, directive.mode, directive.codes
                    );
                    self.check_mode = directive.mode;
                    self.issue_codes = directive.codes;
                }
            }

            if let Some(pragma) = parse_pragma(body) {
                let standalone = trimmed.starts_with(prefix.as_str());
                self.place(line_no, pragma, standalone);
            }
        }

        self.previous_comment_only = comment_only;
    }

    /// Returns the first prefix present in `line` and the text after it.
    fn find_comment<'l>(&self, line: &'l str) -> Option<(String, &'l str)> {
        self.prefixes.iter().find_map(|prefix| {
            line.find(prefix.as_str())
                .map(|idx| (prefix.clone(), &line[idx + prefix.len()..]))
        })
    }

    fn place(&mut self, line_no: usize, mut pragma: Pragma, standalone: bool) {
        let target = if standalone {
            self.pending = Some(line_no);
            line_no + 1
        } else {
            line_no
        };

        if let Some(existing) = self.slots.remove(&target) {
            pragma = merged(existing.pragma, pragma);
        }

        // A standalone line is itself the line above its target. Only entries
        // written by standalone pragmas chain; a trailing pragma stays put
        // even when its line opens with another comment token.
        let above_is_comment = standalone || self.previous_comment_only;
        let fold_above = above_is_comment
            && self.slots.get(&(target - 1)).is_some_and(|above| {
                above.standalone && Some(above.origin) != self.pending
            });
        if fold_above {
            if let Some(above) = self.slots.remove(&(target - 1)) {
                pragma = merged(above.pragma, pragma);
            }
        }

        debug!(
            "{}:{}: {} issue code(s) expected on line {}",
            self.name,
            line_no,
            pragma.issues.len(),
            target
        );
        self.slots.insert(
            target,
            Slot {
                pragma,
                origin: line_no,
                standalone,
            },
        );
    }

    fn finish(self, content: String) -> File {
        File {
            name: self.name,
            content,
            comment_prefixes: self.prefixes,
            pragmas: self
                .slots
                .into_iter()
                .map(|(line, slot)| (line, slot.pragma))
                .collect(),
            check_mode: self.check_mode,
            issue_codes: self.issue_codes,
        }
    }
}

/// Merges two pragmas, keeping `above` first in declaration order.
fn merged(mut above: Pragma, below: Pragma) -> Pragma {
    above.extend(below);
    above
}

fn strip_extension(name: &str) -> String {
    Path::new(name).with_extension("").to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn go(content: &str) -> File {
        File::new("fixture.go", content, &["//"])
    }

    fn lines_of(file: &File) -> Vec<usize> {
        file.pragmas().keys().copied().collect()
    }

    fn codes_at(file: &File, line: usize) -> Vec<String> {
        file.pragma_at(line)
            .map(|p| p.codes().map(String::from).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_name_strips_extension() {
        assert_eq!(go("").name(), "fixture");
        assert_eq!(File::new("dir/a.test.py", "", &["#"]).name(), "dir/a.test");
        assert_eq!(File::new("Makefile", "", &["#"]).name(), "Makefile");
    }

    #[test]
    fn test_standalone_targets_next_line() {
        let file = go("// [E1]: 1 \"a\"\ndoSomething()\n");
        assert_eq!(lines_of(&file), vec![2]);
        assert_eq!(codes_at(&file, 2), vec!["E1"]);
    }

    #[test]
    fn test_trailing_targets_same_line() {
        let file = go("x := 1\ndoSomething() // [E2]: 15\n");
        assert_eq!(lines_of(&file), vec![2]);
        let issues = file.pragma_at(2).unwrap().issues("E2").unwrap();
        assert_eq!(issues[0].column, 15);
    }

    #[test]
    fn test_chained_standalone_lines_merge() {
        let file = go("// [E1]: 1 \"a\"\n// [E2]: 2 \"b\"\ndoSomething()\n");
        assert_eq!(lines_of(&file), vec![3]);
        assert_eq!(codes_at(&file, 3), vec!["E1", "E2"]);
    }

    #[test]
    fn test_long_chain_merges_in_order() {
        let file = go("  // [E1]: 1\n  // [E1]: 2\n  // [E1]: 3\n  call()\n");
        assert_eq!(lines_of(&file), vec![4]);
        let issues = file.pragma_at(4).unwrap().issues("E1").unwrap();
        let columns: Vec<usize> = issues.iter().map(|i| i.column).collect();
        assert_eq!(columns, vec![1, 2, 3]);
    }

    #[test]
    fn test_standalone_and_trailing_merge() {
        let file = go("// [E1]: 1 \"a\"\ndoSomething() // [E2]: 2 \"b\"\n");
        assert_eq!(lines_of(&file), vec![2]);
        assert_eq!(codes_at(&file, 2), vec!["E1", "E2"]);
    }

    #[test]
    fn test_merge_keeps_top_to_bottom_order_for_same_code() {
        let file = go("// [E1]: 1 \"first\"\ncall() // [E1]: 2 \"second\"\n");
        let issues = file.pragma_at(2).unwrap().issues("E1").unwrap();
        let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_separate_code_lines_stay_separate() {
        let file = go("a() // [E1]\nb() // [E2]\n// [E3]\nc()\n");
        assert_eq!(lines_of(&file), vec![1, 2, 4]);
        assert_eq!(codes_at(&file, 1), vec!["E1"]);
        assert_eq!(codes_at(&file, 2), vec!["E2"]);
        assert_eq!(codes_at(&file, 4), vec!["E3"]);
    }

    #[test]
    fn test_plain_comment_breaks_chain() {
        let file = go("// [E1]\n// just a note\n// [E2]\ncall()\n");
        assert_eq!(lines_of(&file), vec![2, 4]);
        assert_eq!(codes_at(&file, 4), vec!["E2"]);
    }

    #[test]
    fn test_trailing_does_not_absorb_previous_code_line() {
        let file = go("// [E1]\nfirst()\nsecond() // [E2]\n");
        assert_eq!(lines_of(&file), vec![2, 3]);
    }

    #[test]
    fn test_indented_standalone() {
        let file = go("func f() {\n\t// [E1]: 2\n\treturn\n}\n");
        assert_eq!(lines_of(&file), vec![3]);
    }

    #[test]
    fn test_plain_comments_produce_nothing() {
        let file = go("// Package main.\npackage main\n\nfunc main() {} // ok\n");
        assert!(file.pragmas().is_empty());
    }

    #[test]
    fn test_multiple_prefixes_first_match_wins() {
        let file = File::new("f.tf", "# [E1]\nx = 1 // [E2]\n", &["#", "//"]);
        assert_eq!(lines_of(&file), vec![2]);
        assert_eq!(codes_at(&file, 2), vec!["E1", "E2"]);
    }

    #[test]
    fn test_trailing_after_leading_block_comment_stays_on_its_line() {
        let content = "/* setup */ int a = b; // [E1]: 1\nint c = d; // [E2]: 2\n";
        let file = File::new("a.c", content, &["//", "/*"]);
        assert_eq!(lines_of(&file), vec![1, 2]);
        assert_eq!(codes_at(&file, 1), vec!["E1"]);
        assert_eq!(codes_at(&file, 2), vec!["E2"]);
    }

    #[test]
    fn test_trailing_after_leading_hash_comment_stays_on_its_line() {
        let content = "# note $x = 1; // [E1]\n$y = 2; // [E2]\n";
        let file = File::new("a.php", content, &["//", "#"]);
        assert_eq!(lines_of(&file), vec![1, 2]);
        assert_eq!(codes_at(&file, 1), vec!["E1"]);
        assert_eq!(codes_at(&file, 2), vec!["E2"]);
    }

    #[test]
    fn test_standalone_chain_still_folds_with_mixed_prefixes() {
        let content = "# [E1]: 1\n// [E2]: 2\n$x = 1; // [E3]: 3\n";
        let file = File::new("a.php", content, &["//", "#"]);
        assert_eq!(lines_of(&file), vec![3]);
        assert_eq!(codes_at(&file, 3), vec!["E1", "E2", "E3"]);
    }

    #[test]
    fn test_merge_order_does_not_change_issue_multiset() {
        let upper = parse_pragma(r#" [E1]: 1 "a", 4; [E2]"#).unwrap();
        let lower = parse_pragma(r#" [E1]: 2 "b"; [E3]: 7"#).unwrap();

        let sorted = |pragma: Pragma| -> Vec<(String, Vec<(usize, String)>)> {
            pragma
                .issues
                .into_iter()
                .map(|(code, issues)| {
                    let mut issues: Vec<(usize, String)> =
                        issues.into_iter().map(|i| (i.column, i.message)).collect();
                    issues.sort();
                    (code, issues)
                })
                .collect()
        };

        let down = merged(upper.clone(), lower.clone());
        let up = merged(lower, upper);
        assert_eq!(down.hit, up.hit);
        assert_eq!(sorted(down), sorted(up));
    }

    #[test]
    fn test_check_directive() {
        let file = go("// scatr-check: E1, E2\npackage main\n");
        assert_eq!(file.check_mode(), CheckMode::Include);
        assert_eq!(file.issue_codes(), ["E1", "E2"]);
        assert!(file.should_check("E1"));
        assert!(!file.should_check("E9"));
    }

    #[test]
    fn test_ignore_directive() {
        let file = go("// scatr-ignore: E3, E4\npackage main\n");
        assert_eq!(file.check_mode(), CheckMode::Exclude);
        assert_eq!(file.issue_codes(), ["E3", "E4"]);
        assert!(!file.should_check("E3"));
        assert!(file.should_check("E1"));
    }

    #[test]
    fn test_directive_only_on_first_line() {
        let file = go("package main\n// scatr-check: E1\n");
        assert_eq!(file.check_mode(), CheckMode::All);
        assert!(file.issue_codes().is_empty());
    }

    #[test]
    fn test_directive_with_unknown_prefix_is_ignored() {
        let file = go("# scatr-check: E1\n");
        assert_eq!(file.check_mode(), CheckMode::All);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let content = "// [E1]: 1 \"a\"\n// [E2]\nf() // [E3]: 4\n";
        assert_eq!(go(content), go(content));
    }

    #[test]
    fn test_crlf_lines() {
        let file = go("// [E1]: 1\r\ncall()\r\n");
        assert_eq!(lines_of(&file), vec![2]);
    }

    #[test]
    fn test_from_reader_matches_new() {
        let content = "// [E1]: 1 \"a\"\n// [E2]\nf() // [E3]: 4\n";
        let streamed = File::from_reader("fixture.go", content.as_bytes(), &["//"]);
        assert_eq!(streamed, go(content));
    }

    #[test]
    fn test_from_reader_stops_on_invalid_utf8() {
        let bytes: &[u8] = b"// [E1]: 1\nfoo()\n\xff\xfe bad\n// [E2]\nbar()\n";
        let file = File::from_reader("broken.go", bytes, &["//"]);
        assert_eq!(lines_of(&file), vec![2]);
        assert_eq!(file.content(), "// [E1]: 1\nfoo()\n");
    }

    #[test]
    fn test_hits_are_mutable_through_pragma_at_mut() {
        let mut file = go("call() // [E1]: 3\n");
        let pragma = file.pragma_at_mut(1).unwrap();
        pragma.issues_mut("E1").unwrap()[0].hit = true;
        assert!(pragma.mark_hit("E1"));
        assert!(file.pragma_at(1).unwrap().is_hit("E1"));
    }

    #[test]
    fn test_empty_prefixes_are_ignored() {
        let file = File::new("a.txt", "[E1]\n", &[""]);
        assert!(file.pragmas().is_empty());
        assert!(file.comment_prefixes().is_empty());
    }
}
