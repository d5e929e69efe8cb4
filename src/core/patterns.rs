//! Ordered table of diagnostic patterns.
//!
//! Each entry pairs a defect category with a regex and a function that turns
//! one set of captures into a [`DefectRecord`]. Extraction walks the table in
//! order; adding a category means appending an entry here.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::models::{DefectCategory, DefectRecord};

/// JS/TS source path: no whitespace, parens, quotes or colons
const FILE_TOKEN: &str = r#"[^\s():'"]+\.[cm]?[jt]sx?"#;

static SYNTAX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"SyntaxError: (?P<message>[^\n]+?) in (?P<file>\S+) line (?P<line>\d+)").unwrap()
});

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"ReferenceError: (?P<variable>[\w$]+) is not defined(?:\s+at\s+)?[^\n]*?(?P<file>{FILE_TOKEN}):(?P<line>\d+)(?::(?P<column>\d+))?"
    ))
    .unwrap()
});

static TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"TypeError: (?P<message>[^\n]+?)(?:\s+at\s+[^\n]*?|\s*\(|\s+)(?P<file>{FILE_TOKEN}):(?P<line>\d+)(?::(?P<column>\d+))?"
    ))
    .unwrap()
});

/// Any error or exception line that names `file:line`
static LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"[\w.$]*(?:Error|Exception)[^\n]*?(?P<file>{FILE_TOKEN}):(?P<line>\d+)"
    ))
    .unwrap()
});

/// One row of the pattern table
pub struct PatternEntry {
    pub category: DefectCategory,
    pub regex: &'static LazyLock<Regex>,
    pub extract: fn(&Captures<'_>) -> Option<DefectRecord>,
}

impl PatternEntry {
    /// Every record this pattern yields over the whole text, in text order
    pub fn scan(&self, text: &str) -> Vec<DefectRecord> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| (self.extract)(&caps))
            .collect()
    }
}

/// Syntax, then Reference, then Type
pub static PATTERN_TABLE: &[PatternEntry] = &[
    PatternEntry {
        category: DefectCategory::Syntax,
        regex: &SYNTAX_PATTERN,
        extract: extract_syntax,
    },
    PatternEntry {
        category: DefectCategory::Reference,
        regex: &REFERENCE_PATTERN,
        extract: extract_reference,
    },
    PatternEntry {
        category: DefectCategory::Type,
        regex: &TYPE_PATTERN,
        extract: extract_type,
    },
];

/// Pattern used by grouping mode to discover implicated files
pub fn location_pattern() -> &'static Regex {
    &LOCATION_PATTERN
}

/// Build the per-file block pattern for grouping mode.
///
/// A block is the error line naming `file_path:<line>` plus any indented
/// `at ...` frames directly below it. The path must start right after
/// whitespace, a paren, a quote or a colon, so `a.js` never matches `lib/a.js`.
pub fn file_block_pattern(file_path: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r#"[\w.$]*(?:Error|Exception)[^\n]*?[\s('":]{}:\d+[^\n]*(?:\n|$)(?:[ \t]+at\b[^\n]*(?:\n|$))*"#,
        regex::escape(file_path)
    ))
}

/// Parse a 1-based position; zero and overflow are rejected
fn position(caps: &Captures<'_>, name: &str) -> Option<usize> {
    caps.name(name)
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .filter(|n| *n >= 1)
}

fn located(category: DefectCategory, caps: &Captures<'_>, payload: &str) -> Option<DefectRecord> {
    let file = caps.name("file")?.as_str().trim();
    if file.is_empty() {
        return None;
    }
    let line = position(caps, "line")?;
    Some(DefectRecord::new(category, file, line, payload.trim()).with_column(position(caps, "column")))
}

fn extract_syntax(caps: &Captures<'_>) -> Option<DefectRecord> {
    located(DefectCategory::Syntax, caps, caps.name("message")?.as_str())
}

fn extract_reference(caps: &Captures<'_>) -> Option<DefectRecord> {
    located(DefectCategory::Reference, caps, caps.name("variable")?.as_str())
}

fn extract_type(caps: &Captures<'_>) -> Option<DefectRecord> {
    located(DefectCategory::Type, caps, caps.name("message")?.as_str())
}
