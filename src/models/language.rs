//! Source language detection for oracle prompts

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Languages the fixer knows how to label in code fences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Typescript,
    /// Unknown extension, fenced without a tag
    Plain,
}

impl Language {
    /// Detect language from a file path's extension
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("js" | "jsx" | "mjs" | "cjs") => Language::Javascript,
            Some("ts" | "tsx" | "mts" | "cts") => Language::Typescript,
            _ => Language::Plain,
        }
    }

    /// Returns the display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Javascript => "JavaScript",
            Language::Typescript => "TypeScript",
            Language::Plain => "source",
        }
    }

    /// Info string used after the opening code fence
    pub fn fence_tag(&self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Plain => "",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
