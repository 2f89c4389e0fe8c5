//! The minify stage.

use super::scanner::{is_word_byte, scan, Segment, SegmentKind};
use crate::error::MinifyError;

/// Shrinks compiled script without changing its behavior.
pub trait Minifier: Send + Sync {
    fn minify(&self, source: &str) -> Result<String, MinifyError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Gap {
    None,
    Space,
    Newline,
}

/// Whitespace and comment stripping minifier.
///
/// Literals are copied verbatim. Comments are dropped unless they are license
/// comments (`/*!`, `@license`, `@preserve`) or start with a preserved prefix.
/// Indentation and blank lines go away; line breaks survive as single
/// newlines so automatic semicolon insertion sees the same input. A space is
/// only kept where dropping it would merge two tokens.
///
/// ```rust
/// use cldrjs::{Condenser, Minifier};
///
/// let condenser = Condenser::new().preserving("-module-");
/// let output = condenser
///     .minify("/*-module-*/\n/* doc */\nvar  a = 1 ,\n\n    b = a + +2;  // done\n")
///     .unwrap();
/// assert_eq!(output, "/*-module-*/\nvar a=1,\nb=a+ +2;\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Condenser {
    preserved_prefixes: Vec<String>,
}

impl Condenser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps block comments whose body starts with `prefix`.
    pub fn preserving(mut self, prefix: impl Into<String>) -> Self {
        self.preserved_prefixes.push(prefix.into());
        self
    }

    fn keeps_comment(&self, segment: &Segment<'_>) -> bool {
        if segment.kind != SegmentKind::BlockComment {
            return false;
        }
        let body = &segment.text[2..];
        body.starts_with('!')
            || body.contains("@license")
            || body.contains("@preserve")
            || self
                .preserved_prefixes
                .iter()
                .any(|prefix| body.starts_with(prefix.as_str()))
    }
}

impl Minifier for Condenser {
    fn minify(&self, source: &str) -> Result<String, MinifyError> {
        let segments = scan(source).map_err(|e| MinifyError {
            offset: e.offset,
            message: e.to_string(),
        })?;

        let mut out = Output::with_capacity(source.len());
        for segment in &segments {
            match segment.kind {
                SegmentKind::Code => {
                    for c in segment.text.chars() {
                        match c {
                            '\n' => out.gap(Gap::Newline),
                            c if c.is_whitespace() => out.gap(Gap::Space),
                            c => out.push_token(c.encode_utf8(&mut [0; 4])),
                        }
                    }
                }
                SegmentKind::LineComment => {}
                SegmentKind::BlockComment if !self.keeps_comment(segment) => {
                    out.gap(if segment.text.contains('\n') {
                        Gap::Newline
                    } else {
                        Gap::Space
                    });
                }
                _ => out.push_token(segment.text),
            }
        }
        Ok(out.finish())
    }
}

struct Output {
    text: String,
    pending: Gap,
}

impl Output {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            pending: Gap::None,
        }
    }

    fn gap(&mut self, gap: Gap) {
        self.pending = self.pending.max(gap);
    }

    fn push_token(&mut self, token: &str) {
        if let (Some(&last), Some(&first)) = (self.text.as_bytes().last(), token.as_bytes().first()) {
            match self.pending {
                Gap::Newline if last != b'\n' => self.text.push('\n'),
                Gap::Space if needs_space(last, first) => self.text.push(' '),
                _ => {}
            }
        }
        self.pending = Gap::None;
        self.text.push_str(token);
    }

    fn finish(mut self) -> String {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.text
    }
}

fn needs_space(last: u8, first: u8) -> bool {
    (is_word_byte(last) && is_word_byte(first))
        || (last == first && matches!(last, b'+' | b'-' | b'/'))
        || (last.is_ascii_digit() && first == b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn condense(source: &str) -> String {
        Condenser::new().minify(source).unwrap()
    }

    #[test]
    fn test_literals_are_untouched() {
        assert_eq!(
            condense("var s = \"a  //  b\";\nvar r = / +/g;\n"),
            "var s=\"a  //  b\";\nvar r=/ +/g;\n"
        );
    }

    #[test]
    fn test_keeps_spaces_between_words() {
        assert_eq!(
            condense("return typeof x === \"undefined\";"),
            "return typeof x===\"undefined\";\n"
        );
        assert_eq!(condense("a - -b; c + ++d;"), "a- -b;c+ ++d;\n");
        assert_eq!(condense("1 .toString()"), "1 .toString()\n");
    }

    #[test]
    fn test_multiline_comment_acts_as_line_break() {
        assert_eq!(condense("a /* x\ny */ b"), "a\nb\n");
        assert_eq!(condense("a /* x */ b"), "a b\n");
    }

    #[test]
    fn test_license_comments_survive() {
        assert_eq!(
            condense("/*! keep */\n/* drop */\nvar a;\n/* @license MIT */"),
            "/*! keep */\nvar a;\n/* @license MIT */\n"
        );
    }

    #[test]
    fn test_preserved_prefixes() {
        let condenser = Condenser::new().preserving("_lib/");
        assert_eq!(
            condenser.minify("/*_lib/twitter_cldr_*/\n/*_other*/x;").unwrap(),
            "/*_lib/twitter_cldr_*/\nx;\n"
        );
    }

    #[test]
    fn test_unterminated_literal_is_an_error() {
        let err = Condenser::new().minify("var a;\n'open").unwrap_err();
        assert_eq!(err.offset, 7);
        assert_eq!(err.message, "unterminated string literal");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(condense(""), "");
        assert_eq!(condense("  \n\n // only a comment\n"), "");
    }
}
