//! Prompt text for the remote repair oracle
//!
//! The whole request goes out as a single user message, so the role framing
//! and output rules live in the same text as the file.

use crate::models::Language;

/// Instructions placed before the diagnostics
pub const REPAIR_PREAMBLE: &str = "You are an expert developer tasked with fixing errors in code.
Below is a file that is producing errors when run. Please fix the file to eliminate the errors.";

/// Output rules placed after the file content
pub const REPAIR_RULES: &str = "Please analyze the error messages and fix the issues in the code.
Return ONLY the fixed file content with no additional explanations or markdown.
Your response should be valid, runnable code that addresses all the errors.";

/// Build the repair request for one file
pub fn build_repair_prompt(file_path: &str, diagnostic_text: &str, file_content: &str) -> String {
    let language = Language::from_path(file_path);
    format!(
        "{preamble}\n\nFILE PATH: {path}\nLANGUAGE: {lang}\n\nERROR MESSAGES:\n{errors}\n\nCURRENT FILE CONTENT:\n```{tag}\n{content}\n```\n\n{rules}\n",
        preamble = REPAIR_PREAMBLE,
        path = file_path,
        lang = language.display_name(),
        errors = diagnostic_text.trim_end(),
        tag = language.fence_tag(),
        content = file_content,
        rules = REPAIR_RULES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_not_empty() {
        assert!(!REPAIR_PREAMBLE.is_empty());
        assert!(REPAIR_RULES.contains("ONLY the fixed file content"));
    }

    #[test]
    fn test_build_repair_prompt_sections() {
        let prompt = build_repair_prompt(
            "/app/src/a.ts",
            "TypeError: x is undefined at f (/app/src/a.ts:2:1)\n",
            "const x = y.z;",
        );
        assert!(prompt.contains("FILE PATH: /app/src/a.ts"));
        assert!(prompt.contains("LANGUAGE: TypeScript"));
        assert!(prompt.contains("ERROR MESSAGES:\nTypeError: x is undefined at f (/app/src/a.ts:2:1)\n\n"));
        assert!(prompt.contains("```typescript\nconst x = y.z;\n```"));
    }

    #[test]
    fn test_build_repair_prompt_unknown_extension() {
        let prompt = build_repair_prompt("Makefile", "Error: x", "all:");
        assert!(prompt.contains("```\nall:\n```"));
    }
}
