//! Deterministic per-category fixes.
//!
//! Every strategy is a pure `(content, record) -> content` function. Edits
//! go through [`LineBuffer`], which keeps the file's line terminator so the
//! rewritten text only differs where a fix touched it.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::{DefectCategory, DefectRecord};

/// Marker appended to declarations the fixer inserts
pub const AUTO_ADDED_MARKER: &str = "// Auto-added by error fixer";

/// Known syntax phrases and the character that repairs them
const SYNTAX_FIXES: &[(&str, &str)] = &[
    ("missing semicolon", ";"),
    ("missing closing parenthesis", ")"),
    ("missing closing brace", "}"),
];

/// Payload phrases that mean a property was read off null/undefined
const NULL_ACCESS_PHRASES: &[&str] = &[
    "cannot read property",
    "cannot read properties",
    "is undefined",
    "is null",
];

static PROPERTY_ACCESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\.(\w+)").unwrap());

/// Property name quoted in a TypeError message, e.g. `'name'`
static QUOTED_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"`](\w+)['"`]"#).unwrap());

/// File content split into addressable lines
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: Vec<String>,
    terminator: &'static str,
}

impl LineBuffer {
    pub fn parse(content: &str) -> Self {
        let terminator = if content.contains("\r\n") { "\r\n" } else { "\n" };
        Self {
            lines: content.split(terminator).map(str::to_string).collect(),
            terminator,
        }
    }

    /// Line at a 1-based position
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    /// Leading whitespace of a 1-based line
    pub fn indent_of(&self, line: usize) -> &str {
        self.line(line)
            .map(|l| &l[..l.len() - l.trim_start().len()])
            .unwrap_or("")
    }

    /// Append text to the end of a 1-based line
    pub fn append_to_line(&mut self, line: usize, text: &str) -> bool {
        match line.checked_sub(1).and_then(|i| self.lines.get_mut(i)) {
            Some(l) => {
                l.push_str(text);
                true
            }
            None => false,
        }
    }

    /// Insert new lines so the first of them sits at `line`
    pub fn insert_before_line(&mut self, line: usize, new_lines: Vec<String>) -> bool {
        if line == 0 || line > self.lines.len() {
            return false;
        }
        let at = line - 1;
        self.lines.splice(at..at, new_lines);
        true
    }

    /// Replace every line with `content`, keeping this buffer's terminator
    pub fn replace_all(&mut self, content: &str) {
        self.lines = content
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn render(&self) -> String {
        self.lines.join(self.terminator)
    }
}

/// A deterministic fix for one defect category
pub type Strategy = fn(&str, &DefectRecord) -> String;

/// Look up the strategy for a category
pub fn strategy_for(category: DefectCategory) -> Strategy {
    match category {
        DefectCategory::Syntax => fix_syntax,
        DefectCategory::Reference => fix_reference,
        DefectCategory::Type => fix_type,
        DefectCategory::Generic => fix_generic,
    }
}

/// Apply the strategy matching the record's category
pub fn apply_fix(content: &str, record: &DefectRecord) -> String {
    strategy_for(record.category)(content, record)
}

/// Append the missing token named in the payload
pub fn fix_syntax(content: &str, record: &DefectRecord) -> String {
    let payload = record.payload.to_lowercase();
    let Some((_, token)) = SYNTAX_FIXES.iter().find(|(phrase, _)| payload.contains(phrase)) else {
        debug!("No syntax fix for payload: {}", record.payload);
        return content.to_string();
    };

    let mut buffer = LineBuffer::parse(content);
    if !buffer.append_to_line(record.line, token) {
        debug!("Line {} is outside {}", record.line, record.file);
        return content.to_string();
    }
    buffer.render()
}

/// Whether the content already binds or imports `name`
pub fn declares_identifier(content: &str, name: &str) -> bool {
    let name = regex::escape(name);
    let pattern = format!(
        r"(?:\b(?:const|let|var|function|class)\s+{name}\b)|(?:\bimport\s*\{{[^}}]*\b{name}\b[^}}]*\}})|(?:\bimport\s+{name}\b)"
    );
    Regex::new(&pattern)
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}

/// Declare the undefined identifier above the line that uses it
pub fn fix_reference(content: &str, record: &DefectRecord) -> String {
    let name = record.payload.trim();
    if name.is_empty() {
        return content.to_string();
    }
    if declares_identifier(content, name) {
        debug!("{} is already declared in {}", name, record.file);
        return content.to_string();
    }

    let mut buffer = LineBuffer::parse(content);
    let indent = buffer.indent_of(record.line).to_string();
    let declaration = format!("{indent}const {name} = null; {AUTO_ADDED_MARKER}");
    if !buffer.insert_before_line(record.line, vec![declaration]) {
        return content.to_string();
    }
    buffer.render()
}

fn is_null_access(payload: &str) -> bool {
    let payload = payload.to_lowercase();
    NULL_ACCESS_PHRASES.iter().any(|p| payload.contains(p))
}

/// Pick the `base.prop` access to guard on a line.
///
/// Prefers the access whose property is the one quoted in the message, so
/// `console.log(obj.name)` guards `obj` rather than `console`.
fn guarded_object<'a>(line: &'a str, payload: &str) -> Option<&'a str> {
    let accesses: Vec<(&str, &str)> = PROPERTY_ACCESS
        .captures_iter(line)
        .filter_map(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
        .collect();

    let named = QUOTED_PROPERTY
        .captures_iter(payload)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .find_map(|prop| accesses.iter().find(|(_, p)| *p == prop));

    named.or_else(|| accesses.first()).map(|(base, _)| *base)
}

/// Insert a null/undefined guard above the failing property access
pub fn fix_type(content: &str, record: &DefectRecord) -> String {
    if !is_null_access(&record.payload) {
        return content.to_string();
    }

    let mut buffer = LineBuffer::parse(content);
    let Some(object) = buffer.line(record.line).and_then(|l| guarded_object(l, &record.payload)) else {
        return content.to_string();
    };
    let object = object.to_string();
    let indent = buffer.indent_of(record.line).to_string();

    let guard = vec![
        format!("{indent}if ({object} === undefined || {object} === null) {{"),
        format!("{indent}  console.error('{object} is undefined/null');"),
        format!("{indent}  return;"),
        format!("{indent}}}"),
    ];
    buffer.insert_before_line(record.line, guard);
    buffer.render()
}

/// No deterministic fix exists for generic errors
pub fn fix_generic(content: &str, _record: &DefectRecord) -> String {
    content.to_string()
}
