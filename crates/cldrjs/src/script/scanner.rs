//! Lexical scanner shared by the script compiler and the minifier.
//!
//! The scanner does not tokenize fully. It only splits source into plain code
//! and the regions whose content must never be touched: string, template and
//! regex literals and comments. Whether a `/` starts a regex or is a division
//! is decided from the previous significant token.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SegmentKind {
    Code,
    Str,
    Template,
    Regex,
    LineComment,
    BlockComment,
}

impl SegmentKind {
    pub(crate) fn is_comment(self) -> bool {
        matches!(self, SegmentKind::LineComment | SegmentKind::BlockComment)
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SegmentKind::Code => "code",
            SegmentKind::Str => "string literal",
            SegmentKind::Template => "template literal",
            SegmentKind::Regex => "regular expression literal",
            SegmentKind::LineComment => "line comment",
            SegmentKind::BlockComment => "block comment",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Segment<'s> {
    pub kind: SegmentKind,
    /// Byte offset of `text` in the scanned source.
    pub start: usize,
    pub text: &'s str,
}

/// A literal or comment that runs off the end of its line or of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanError {
    pub offset: usize,
    pub kind: SegmentKind,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unterminated {}", self.kind)
    }
}

/// Words after which a `/` starts a regex literal.
const REGEX_KEYWORDS: &[&str] = &[
    "return",
    "typeof",
    "instanceof",
    "in",
    "of",
    "new",
    "delete",
    "void",
    "throw",
    "case",
    "do",
    "else",
    "yield",
    "await",
];

/// Splits `source` into segments that together cover it exactly.
pub(crate) fn scan(source: &str) -> Result<Vec<Segment<'_>>, ScanError> {
    let bytes = source.as_bytes();
    let mut segments = Vec::new();
    let mut code_start = 0;
    let mut i = 0;
    let mut regex_allowed = true;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        let literal = match b {
            b'"' | b'\'' => Some((SegmentKind::Str, end_of_string(bytes, i)?)),
            b'`' => Some((SegmentKind::Template, end_of_template(bytes, i)?)),
            b'/' if next == Some(b'/') => Some((SegmentKind::LineComment, end_of_line_comment(bytes, i))),
            b'/' if next == Some(b'*') => Some((SegmentKind::BlockComment, end_of_block_comment(bytes, i)?)),
            b'/' if regex_allowed => Some((SegmentKind::Regex, end_of_regex(bytes, i)?)),
            _ => None,
        };

        if let Some((kind, end)) = literal {
            if code_start < i {
                segments.push(Segment {
                    kind: SegmentKind::Code,
                    start: code_start,
                    text: &source[code_start..i],
                });
            }
            segments.push(Segment {
                kind,
                start: i,
                text: &source[i..end],
            });
            if !kind.is_comment() {
                regex_allowed = false;
            }
            i = end;
            code_start = end;
            continue;
        }

        if is_word_byte(b) {
            let end = bytes[i..]
                .iter()
                .position(|&c| !is_word_byte(c))
                .map_or(bytes.len(), |n| i + n);
            regex_allowed = REGEX_KEYWORDS.contains(&&source[i..end]);
            i = end;
            continue;
        }

        if !b.is_ascii_whitespace() {
            regex_allowed = !matches!(b, b')' | b']' | b'.');
        }
        i += 1;
    }

    if code_start < bytes.len() {
        segments.push(Segment {
            kind: SegmentKind::Code,
            start: code_start,
            text: &source[code_start..],
        });
    }
    Ok(segments)
}

pub(crate) fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn unterminated(offset: usize, kind: SegmentKind) -> ScanError {
    ScanError { offset, kind }
}

fn end_of_string(bytes: &[u8], start: usize) -> Result<usize, ScanError> {
    let quote = bytes[start];
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'\n' => break,
            c if c == quote => return Ok(j + 1),
            _ => j += 1,
        }
    }
    Err(unterminated(start, SegmentKind::Str))
}

fn end_of_template(bytes: &[u8], start: usize) -> Result<usize, ScanError> {
    let mut depth = 0usize;
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'`' if depth == 0 => return Ok(j + 1),
            b'$' if depth == 0 && bytes.get(j + 1) == Some(&b'{') => {
                depth = 1;
                j += 2;
            }
            b'{' if depth > 0 => {
                depth += 1;
                j += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                j += 1;
            }
            _ => j += 1,
        }
    }
    Err(unterminated(start, SegmentKind::Template))
}

fn end_of_line_comment(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&c| c == b'\n')
        .map_or(bytes.len(), |n| start + n)
}

fn end_of_block_comment(bytes: &[u8], start: usize) -> Result<usize, ScanError> {
    bytes[start + 2..]
        .windows(2)
        .position(|w| w == b"*/")
        .map(|n| start + 2 + n + 2)
        .ok_or_else(|| unterminated(start, SegmentKind::BlockComment))
}

fn end_of_regex(bytes: &[u8], start: usize) -> Result<usize, ScanError> {
    let mut in_class = false;
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' if bytes.get(j + 1) != Some(&b'\n') => j += 2,
            b'\n' | b'\\' => break,
            b'[' => {
                in_class = true;
                j += 1;
            }
            b']' => {
                in_class = false;
                j += 1;
            }
            b'/' if !in_class => {
                j += 1;
                while j < bytes.len() && bytes[j].is_ascii_alphabetic() {
                    j += 1;
                }
                return Ok(j);
            }
            _ => j += 1,
        }
    }
    Err(unterminated(start, SegmentKind::Regex))
}
