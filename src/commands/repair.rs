use tracing::info;

use super::load_diagnostics;
use crate::core::{group_by_file, load_config, repair_all, select_oracle, FixSummary, Workspace};
use crate::error::AutofixError;
use crate::models::ConfigOverrides;

/// Repair each implicated file through the configured oracle
pub async fn run_repair(workspace: &Workspace, overrides: ConfigOverrides) -> Result<FixSummary, AutofixError> {
    info!("Starting oracle-powered error parsing and auto-fix process...");
    let config = load_config(workspace, overrides)?;

    let Some(diagnostics) = load_diagnostics(workspace, &config)? else {
        return Ok(FixSummary::default());
    };

    info!("Parsing errors from output...");
    let groups = group_by_file(&diagnostics);
    if groups.is_empty() {
        info!("No recognizable errors found in files.");
        return Ok(FixSummary::default());
    }

    info!("Found errors in {} file(s).", groups.len());
    let oracle = select_oracle(&config.oracle, config.oracle.credential())?;
    let summary = repair_all(workspace, &groups, oracle.as_ref()).await;
    info!("Oracle-powered error fixing complete.");
    Ok(summary)
}
