//! Whole-file repair through an external oracle.
//!
//! [`RepairOracle`] is the seam: [`AnthropicOracle`] calls the live
//! messages API, [`StandInOracle`] reproduces the deterministic fixes locally.
//! Which one runs is decided once by [`select_oracle`].

mod anthropic;
mod stand_in;

pub use anthropic::*;
pub use stand_in::*;

use async_trait::async_trait;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{error, info, warn};

use super::applier::{FixOutcome, FixSummary};
use super::config::Workspace;
use super::strategies::LineBuffer;
use crate::error::{AutofixError, OracleError};
use crate::models::{FileErrorGroup, OracleConfig};

/// Produces a replacement body for a file given its diagnostics
#[async_trait]
pub trait RepairOracle: Send + Sync {
    /// Short label for logs
    fn name(&self) -> &'static str;

    /// `Ok(None)` means the oracle had no fix to offer
    async fn repair(
        &self,
        file_path: &str,
        file_content: &str,
        diagnostic_text: &str,
    ) -> Result<Option<String>, OracleError>;
}

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[\w+#.-]*[ \t]*\r?\n(.*?)\r?\n[ \t]*```").unwrap());

/// Pull the file body out of an oracle reply.
///
/// The first fenced block wins; without one the whole reply is the body.
pub fn extract_code_block(response: &str) -> String {
    match CODE_FENCE.captures(response).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().to_string(),
        None => response.to_string(),
    }
}

/// Pick the live oracle when a credential is configured, the stand-in otherwise
pub fn select_oracle(
    config: &OracleConfig,
    credential: Option<String>,
) -> Result<Box<dyn RepairOracle>, OracleError> {
    match credential {
        Some(api_key) => {
            info!("Using live oracle at {} (model {})", config.url, config.model);
            Ok(Box::new(AnthropicOracle::new(config.clone(), api_key)?))
        }
        None => {
            warn!(
                "{} not set. Using stand-in oracle for local fixes.",
                config.api_key_env
            );
            Ok(Box::new(StandInOracle::new()))
        }
    }
}

/// Send each file's diagnostics to the oracle, one request at a time
pub async fn repair_all(
    workspace: &Workspace,
    groups: &[FileErrorGroup],
    oracle: &dyn RepairOracle,
) -> FixSummary {
    let mut summary = FixSummary::default();
    for group in groups {
        let outcome = repair_one(workspace, group, oracle).await;
        summary.record(&outcome);
    }
    info!("Oracle repair summary ({}): {}", oracle.name(), summary);
    summary
}

async fn repair_one(workspace: &Workspace, group: &FileErrorGroup, oracle: &dyn RepairOracle) -> FixOutcome {
    let path = workspace.resolve(&group.file_path);
    info!("Processing file: {}", path.display());

    if !path.is_file() {
        warn!("File not found: {}", path.display());
        return FixOutcome::NotFound;
    }
    if !group.category.is_mechanically_fixable() {
        info!("{}: not mechanically fixable, relying on {} oracle", group.file_path, oracle.name());
    }

    match try_repair(&path, group, oracle).await {
        Ok(outcome) => outcome,
        Err(AutofixError::Oracle(e)) if e.is_unavailable() => {
            error!("Oracle unavailable for {}: {}", path.display(), e);
            FixOutcome::Failed(e.to_string())
        }
        Err(AutofixError::Oracle(e)) => {
            warn!("No usable fix for {}: {}", path.display(), e);
            FixOutcome::Failed(e.to_string())
        }
        Err(e) => {
            error!("Error processing {}: {}", path.display(), e);
            FixOutcome::Failed(e.to_string())
        }
    }
}

async fn try_repair(
    path: &Path,
    group: &FileErrorGroup,
    oracle: &dyn RepairOracle,
) -> Result<FixOutcome, AutofixError> {
    let content = fs::read_to_string(path)?;
    let repaired = oracle
        .repair(&group.file_path, &content, &group.diagnostic_text())
        .await?;

    let Some(body) = repaired else {
        info!("No changes made to {}", path.display());
        return Ok(FixOutcome::NoOp);
    };

    // Replies come back with `\n`; keep the file's own line endings
    let mut buffer = LineBuffer::parse(&content);
    buffer.replace_all(&body);
    match buffer.render() {
        fixed if fixed != content => {
            fs::write(path, &fixed)?;
            info!("Fixed {} with {} oracle", path.display(), oracle.name());
            Ok(FixOutcome::Fixed)
        }
        _ => {
            info!("No changes made to {}", path.display());
            Ok(FixOutcome::NoOp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FailingOracle;

    #[async_trait]
    impl RepairOracle for FailingOracle {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn repair(&self, _: &str, _: &str, _: &str) -> Result<Option<String>, OracleError> {
            Err(OracleError::Unavailable("connection refused".into()))
        }
    }

    struct FixedOracle(&'static str);

    #[async_trait]
    impl RepairOracle for FixedOracle {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn repair(&self, _: &str, _: &str, _: &str) -> Result<Option<String>, OracleError> {
            Ok(Some(self.0.to_string()))
        }
    }

    #[test]
    fn test_extract_code_block_fenced() {
        let response = "Here is the fix:\n```javascript\nconst a = 1;\nuse(a);\n```\nDone.";
        assert_eq!(extract_code_block(response), "const a = 1;\nuse(a);");
    }

    #[test]
    fn test_extract_code_block_untagged_first_wins() {
        let response = "```\nfirst\n```\n```js\nsecond\n```";
        assert_eq!(extract_code_block(response), "first");
    }

    #[test]
    fn test_extract_code_block_plain_response() {
        assert_eq!(extract_code_block("const a = 1;\n"), "const a = 1;\n");
    }

    #[test]
    fn test_select_oracle_without_credential_is_stand_in() {
        let oracle = select_oracle(&OracleConfig::default(), None).unwrap();
        assert_eq!(oracle.name(), "stand-in");
    }

    #[test]
    fn test_select_oracle_with_credential_is_live() {
        let oracle = select_oracle(&OracleConfig::default(), Some("sk-test".into())).unwrap();
        assert_eq!(oracle.name(), "anthropic");
    }

    #[tokio::test]
    async fn test_repair_all_isolates_failures() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::new(temp_dir.path());
        fs::write(temp_dir.path().join("a.js"), "broken").unwrap();

        let groups = vec![FileErrorGroup::new("a.js"), FileErrorGroup::new("missing.js")];
        let summary = repair_all(&workspace, &groups, &FailingOracle).await;

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.not_found, 1);
        assert_eq!(fs::read_to_string(temp_dir.path().join("a.js")).unwrap(), "broken");
    }

    #[tokio::test]
    async fn test_repair_all_writes_only_changes() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::new(temp_dir.path());
        fs::write(temp_dir.path().join("a.js"), "broken").unwrap();
        fs::write(temp_dir.path().join("b.js"), "good").unwrap();

        let groups = vec![FileErrorGroup::new("a.js")];
        let summary = repair_all(&workspace, &groups, &FixedOracle("good")).await;
        assert_eq!(summary.fixed, 1);
        assert_eq!(fs::read_to_string(temp_dir.path().join("a.js")).unwrap(), "good");

        let groups = vec![FileErrorGroup::new("b.js")];
        let summary = repair_all(&workspace, &groups, &FixedOracle("good")).await;
        assert_eq!(summary.unchanged, 1);
    }

    #[tokio::test]
    async fn test_repair_keeps_crlf_line_endings() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::new(temp_dir.path());
        fs::write(temp_dir.path().join("w.js"), "let a = 1\r\nuse(a)\r\n").unwrap();

        let groups = vec![FileErrorGroup::new("w.js")];
        let summary = repair_all(&workspace, &groups, &FixedOracle("let a = 1;\nuse(a);\n")).await;

        assert_eq!(summary.fixed, 1);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("w.js")).unwrap(),
            "let a = 1;\r\nuse(a);\r\n"
        );
    }
}
