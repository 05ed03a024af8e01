//! Character scanner for pragma issue lists.
//!
//! Reads the `column? "message"?` pieces of an issue list one token at a
//! time. Quoted messages are unescaped while scanning, so an escaped quote
//! never terminates the literal.

use thiserror::Error;

/// Errors produced while scanning an issue list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// A quoted message had no closing quote.
    #[error("unterminated quoted message")]
    Unterminated,

    /// A backslash escape inside a quoted message was not recognized.
    #[error("invalid escape sequence `{escape}`")]
    InvalidEscape {
        /// The offending escape, including the backslash.
        escape: String,
    },

    /// A column did not fit in `usize`.
    #[error("column out of range: {digits}")]
    ColumnOverflow {
        /// The digits that were read.
        digits: String,
    },
}

/// Forward-only scanner over a single issue list.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the start of `src`.
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Returns the unread remainder.
    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips any whitespace at the current position.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consumes `expected` if it is the next character.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Reads a run of ASCII digits as a column number.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ColumnOverflow`] if the value does not fit.
    pub fn digits(&mut self) -> Result<Option<usize>, ScanError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if start == self.pos {
            return Ok(None);
        }
        let digits = &self.src[start..self.pos];
        digits
            .parse()
            .map(Some)
            .map_err(|_| ScanError::ColumnOverflow {
                digits: digits.to_string(),
            })
    }

    /// Reads a double-quoted literal and returns its unescaped contents.
    ///
    /// Returns `Ok(None)` without consuming anything when the next character
    /// is not a quote.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing closing quote or an unknown escape.
    pub fn quoted(&mut self) -> Result<Option<String>, ScanError> {
        if !self.eat('"') {
            return Ok(None);
        }

        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(ScanError::Unterminated),
                Some('"') => return Ok(Some(out)),
                Some('\\') => out.push(self.escape()?),
                Some(c) => out.push(c),
            }
        }
    }

    /// Decodes the escape following a backslash.
    fn escape(&mut self) -> Result<char, ScanError> {
        let start = self.pos;
        let c = self.bump().ok_or(ScanError::Unterminated)?;
        let decoded = match c {
            '"' | '\\' | '\'' => Some(c),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            '0' => Some('\0'),
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            'v' => Some('\u{0B}'),
            'x' => self.hex_digits(2)?.filter(char::is_ascii),
            'u' if self.eat('{') => self.braced_code_point()?,
            'u' => self.hex_digits(4)?,
            'U' => self.hex_digits(8)?,
            _ => None,
        };
        decoded.ok_or_else(|| ScanError::InvalidEscape {
            escape: format!("\\{}", &self.src[start..self.pos]),
        })
    }

    /// Reads exactly `len` hex digits and converts them to a `char`.
    fn hex_digits(&mut self, len: usize) -> Result<Option<char>, ScanError> {
        let start = self.pos;
        for _ in 0..len {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    self.bump();
                }
                Some(_) => return Ok(None),
                None => return Err(ScanError::Unterminated),
            }
        }
        Ok(code_point(&self.src[start..self.pos]))
    }

    /// Reads `HEX+}` after `\u{`.
    fn braced_code_point(&mut self) -> Result<Option<char>, ScanError> {
        let start = self.pos;
        loop {
            match self.bump() {
                Some('}') => break,
                Some(c) if c.is_ascii_hexdigit() => {}
                Some(_) => return Ok(None),
                None => return Err(ScanError::Unterminated),
            }
        }
        let digits = &self.src[start..self.pos - 1];
        if digits.is_empty() || digits.len() > 6 {
            return Ok(None);
        }
        Ok(code_point(digits))
    }
}

fn code_point(hex: &str) -> Option<char> {
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted(src: &str) -> Result<Option<String>, ScanError> {
        Scanner::new(src).quoted()
    }

    #[test]
    fn digits_reads_column() {
        let mut s = Scanner::new("42 \"x\"");
        assert_eq!(s.digits(), Ok(Some(42)));
        assert_eq!(s.rest(), " \"x\"");
    }

    #[test]
    fn digits_absent() {
        let mut s = Scanner::new("\"x\"");
        assert_eq!(s.digits(), Ok(None));
        assert_eq!(s.rest(), "\"x\"");
    }

    #[test]
    fn digits_overflow() {
        let mut s = Scanner::new("99999999999999999999999999");
        assert!(matches!(s.digits(), Err(ScanError::ColumnOverflow { .. })));
    }

    #[test]
    fn quoted_plain() {
        assert_eq!(quoted("\"bad thing\""), Ok(Some("bad thing".to_string())));
    }

    #[test]
    fn quoted_not_a_quote() {
        let mut s = Scanner::new("abc");
        assert_eq!(s.quoted(), Ok(None));
        assert_eq!(s.rest(), "abc");
    }

    #[test]
    fn quoted_escaped_quote_does_not_terminate() {
        assert_eq!(
            quoted(r#""say \"hi\"" tail"#),
            Ok(Some("say \"hi\"".to_string()))
        );
    }

    #[test]
    fn quoted_simple_escapes() {
        assert_eq!(
            quoted(r#""a\tb\nc\\d""#),
            Ok(Some("a\tb\nc\\d".to_string()))
        );
    }

    #[test]
    fn quoted_unicode_escapes() {
        assert_eq!(quoted(r#""é\u{1F600}\x41""#), Ok(Some("é😀A".to_string())));
    }

    #[test]
    fn quoted_unterminated() {
        assert_eq!(quoted("\"never closed"), Err(ScanError::Unterminated));
        assert_eq!(quoted("\"trailing \\"), Err(ScanError::Unterminated));
    }

    #[test]
    fn quoted_invalid_escape() {
        assert_eq!(
            quoted(r#""bad \q""#),
            Err(ScanError::InvalidEscape {
                escape: "\\q".to_string()
            })
        );
        assert!(matches!(
            quoted(r#""\xff""#),
            Err(ScanError::InvalidEscape { .. })
        ));
    }

    #[test]
    fn skip_whitespace_and_eat() {
        let mut s = Scanner::new("   , x");
        s.skip_whitespace();
        assert!(s.eat(','));
        assert!(!s.eat(','));
        s.skip_whitespace();
        assert_eq!(s.rest(), "x");
    }
}
