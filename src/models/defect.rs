use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Kind of failure recognized in diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefectCategory {
    /// Parser-level failure (missing token)
    Syntax,
    /// Use of an undeclared identifier
    Reference,
    /// Property access on a null/undefined value
    Type,
    /// Any other error that names a file and line
    Generic,
}

impl DefectCategory {
    /// Get the human-readable name for this category
    pub fn name(&self) -> &'static str {
        match self {
            DefectCategory::Syntax => "Syntax",
            DefectCategory::Reference => "Reference",
            DefectCategory::Type => "Type",
            DefectCategory::Generic => "Generic",
        }
    }

    /// Whether a deterministic rewrite exists for this category
    pub fn is_mechanically_fixable(&self) -> bool {
        !matches!(self, DefectCategory::Generic)
    }
}

impl fmt::Display for DefectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One defect found in diagnostic text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectRecord {
    pub category: DefectCategory,
    /// Path exactly as written in the diagnostic
    pub file: String,
    /// 1-based line in the target file
    pub line: usize,
    /// 1-based column, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    /// Variable name for Reference, violation text for Syntax/Type
    pub payload: String,
}

impl DefectRecord {
    pub fn new(category: DefectCategory, file: impl Into<String>, line: usize, payload: impl Into<String>) -> Self {
        Self {
            category,
            file: file.into(),
            line,
            column: None,
            payload: payload.into(),
        }
    }

    pub fn with_column(mut self, column: Option<usize>) -> Self {
        self.column = column;
        self
    }

    /// Same record pointed at a different line
    pub fn at_line(&self, line: usize) -> Self {
        Self {
            line,
            ..self.clone()
        }
    }
}

impl fmt::Display for DefectRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}:{}", self.category, self.file, self.line)?;
        if let Some(col) = self.column {
            write!(f, ":{}", col)?;
        }
        write!(f, " - {}", self.payload)
    }
}

/// All diagnostics that mention the same file, collected in one extraction pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileErrorGroup {
    pub file_path: String,
    /// First table category that recognizes one of the blocks, else `Generic`
    pub category: DefectCategory,
    pub error_lines: BTreeSet<usize>,
    /// Verbatim error blocks including trailing stack frames
    pub raw_error_text: Vec<String>,
}

impl FileErrorGroup {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            category: DefectCategory::Generic,
            error_lines: BTreeSet::new(),
            raw_error_text: Vec::new(),
        }
    }

    /// Diagnostic text handed to the repair oracle
    pub fn diagnostic_text(&self) -> String {
        self.raw_error_text.join("\n")
    }
}

/// Output of a single extraction pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Extracted {
    Record(DefectRecord),
    Group(FileErrorGroup),
}
