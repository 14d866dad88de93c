//! Markdown scanning: inline formatting and block line classification
//!
//! The supported subset is deliberately small: ATX headings, bullet and
//! numbered list items, and inline bold / italic / code spans. Everything
//! else is literal text. Scanning never fails; malformed constructs degrade
//! to plain text.

use once_cell::sync::Lazy;
use regex::Regex;

// Inline constructs, anchored at the scan position. Priority: code span,
// bold+italic, bold, italic. All must close; unterminated delimiters fall
// through and are emitted as literal text.
static CODE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^`([^`]+)`").unwrap());
static BOLD_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*\*\*(.+?)\*\*\*").unwrap());
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*\*(.+?)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*([^*]+)\*").unwrap());

// Block-level classifiers.
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[-*+]\s+(.+)$").unwrap());
static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)\.\s+(.+)$").unwrap());

/// One run of equally-formatted text within a single source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub text: String,
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_code: bool,
}

impl TextSegment {
    fn plain(text: String) -> Self {
        TextSegment {
            text,
            is_bold: false,
            is_italic: false,
            is_code: false,
        }
    }

    /// True when the segment carries any formatting flag.
    pub fn is_formatted(&self) -> bool {
        self.is_bold || self.is_italic || self.is_code
    }
}

/// Splits one logical line into formatting segments.
///
/// At each scan position the first matching construct wins: `` `code` ``,
/// `***bold italic***`, `**bold**`, `*italic*`. Literal text between
/// matches is emitted as plain segments. Concatenating the segment texts
/// reproduces the input minus delimiter characters; no segment is ever
/// empty. Empty input yields an empty vec.
pub fn parse_inline(text: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while !rest.is_empty() {
        let first = rest.chars().next().unwrap();
        if first == '`' || first == '*' {
            if let Some((segment, consumed)) = match_construct(rest) {
                if !literal.is_empty() {
                    segments.push(TextSegment::plain(std::mem::take(&mut literal)));
                }
                segments.push(segment);
                rest = &rest[consumed..];
                continue;
            }
        }
        literal.push(first);
        rest = &rest[first.len_utf8()..];
    }

    if !literal.is_empty() {
        segments.push(TextSegment::plain(literal));
    }
    segments
}

/// Tries each inline construct at the start of `rest`; returns the segment
/// and the number of bytes consumed (including delimiters).
fn match_construct(rest: &str) -> Option<(TextSegment, usize)> {
    if let Some(caps) = CODE_SPAN.captures(rest) {
        let inner = caps.get(1).unwrap();
        return Some((
            TextSegment {
                text: inner.as_str().to_string(),
                is_bold: false,
                is_italic: false,
                is_code: true,
            },
            caps.get(0).unwrap().end(),
        ));
    }
    if let Some(caps) = BOLD_ITALIC.captures(rest) {
        let inner = caps.get(1).unwrap();
        return Some((
            TextSegment {
                text: inner.as_str().to_string(),
                is_bold: true,
                is_italic: true,
                is_code: false,
            },
            caps.get(0).unwrap().end(),
        ));
    }
    if let Some(caps) = BOLD.captures(rest) {
        let inner = caps.get(1).unwrap();
        return Some((
            TextSegment {
                text: inner.as_str().to_string(),
                is_bold: true,
                is_italic: false,
                is_code: false,
            },
            caps.get(0).unwrap().end(),
        ));
    }
    if let Some(caps) = ITALIC.captures(rest) {
        let inner = caps.get(1).unwrap();
        return Some((
            TextSegment {
                text: inner.as_str().to_string(),
                is_bold: false,
                is_italic: true,
                is_code: false,
            },
            caps.get(0).unwrap().end(),
        ));
    }
    None
}

/// Block-level classification of one source line.
///
/// Exactly one variant applies per line, checked in priority order:
/// blank, heading, bullet item, numbered item, paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Whitespace-only line; contributes vertical space only.
    Blank,
    /// ATX heading, `level` in 1..=6.
    Heading { level: usize, text: &'a str },
    /// `-` / `*` / `+` list item.
    Bullet { text: &'a str },
    /// `N.` list item; `number` is the literal captured digits.
    Numbered { number: &'a str, text: &'a str },
    Paragraph { text: &'a str },
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if let Some(caps) = HEADING.captures(line) {
        return LineKind::Heading {
            level: caps.get(1).unwrap().as_str().len(),
            text: caps.get(2).unwrap().as_str(),
        };
    }
    if let Some(caps) = BULLET.captures(line) {
        return LineKind::Bullet {
            text: caps.get(1).unwrap().as_str(),
        };
    }
    if let Some(caps) = NUMBERED.captures(line) {
        return LineKind::Numbered {
            number: caps.get(1).unwrap().as_str(),
            text: caps.get(2).unwrap().as_str(),
        };
    }
    LineKind::Paragraph { text: line }
}
