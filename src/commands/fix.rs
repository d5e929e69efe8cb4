use tracing::info;

use super::load_diagnostics;
use crate::core::{apply_all, extract_records, load_config, FixSummary, Workspace};
use crate::error::AutofixError;
use crate::models::ConfigOverrides;

/// Apply rule-based fixes for every recognized diagnostic
pub fn run_fix(workspace: &Workspace, overrides: ConfigOverrides) -> Result<FixSummary, AutofixError> {
    info!("Starting error parsing and auto-fix process...");
    let config = load_config(workspace, overrides)?;

    let Some(diagnostics) = load_diagnostics(workspace, &config)? else {
        return Ok(FixSummary::default());
    };

    info!("Parsing errors from output...");
    let records = extract_records(&diagnostics);
    if records.is_empty() {
        info!("No recognizable errors found.");
        return Ok(FixSummary::default());
    }

    info!("Found {} error(s) to fix.", records.len());
    let summary = apply_all(workspace, &records);
    info!("Error parsing and fixing complete.");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_fix_without_input_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::new(temp_dir.path());
        let summary = run_fix(&workspace, ConfigOverrides::default()).unwrap();
        assert_eq!(summary, FixSummary::default());
    }

    #[test]
    fn test_run_fix_relative_path() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("src")).unwrap();
        fs::write(temp_dir.path().join("src/app.js"), "let a = 1\nrun(a)").unwrap();
        fs::write(
            temp_dir.path().join("error_output.txt"),
            "SyntaxError: missing semicolon in src/app.js line 2\n",
        )
        .unwrap();

        let workspace = Workspace::new(temp_dir.path());
        let summary = run_fix(&workspace, ConfigOverrides::default()).unwrap();
        assert_eq!(summary.fixed, 1);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("src/app.js")).unwrap(),
            "let a = 1\nrun(a);"
        );
    }
}
