use async_trait::async_trait;
use tracing::debug;

use super::RepairOracle;
use crate::core::applier::apply_fixes;
use crate::core::extract::extract_records;
use crate::error::OracleError;

/// Local oracle used when no API credential is configured.
///
/// Runs the deterministic strategies over the whole file and hands back the
/// result as a replacement body. Pure: same inputs, same output, no I/O.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandInOracle;

impl StandInOracle {
    pub fn new() -> Self {
        Self
    }

    /// Replacement body for `file_path`, or `None` when nothing applies
    pub fn fix(&self, file_path: &str, file_content: &str, diagnostic_text: &str) -> Option<String> {
        let records: Vec<_> = extract_records(diagnostic_text)
            .into_iter()
            .filter(|r| r.file == file_path)
            .collect();
        debug!("Stand-in oracle found {} fixable record(s) for {}", records.len(), file_path);

        if records.is_empty() {
            return None;
        }
        let fixed = apply_fixes(file_content, &records);
        (fixed != file_content).then_some(fixed)
    }
}

#[async_trait]
impl RepairOracle for StandInOracle {
    fn name(&self) -> &'static str {
        "stand-in"
    }

    async fn repair(
        &self,
        file_path: &str,
        file_content: &str,
        diagnostic_text: &str,
    ) -> Result<Option<String>, OracleError> {
        Ok(self.fix(file_path, file_content, diagnostic_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REF_DIAG: &str = "ReferenceError: y is not defined at Object.<anonymous> (/w/a.js:1:13)\n";

    #[test]
    fn test_stand_in_fixes_reference() {
        let fixed = StandInOracle::new().fix("/w/a.js", "console.log(y);", REF_DIAG);
        assert_eq!(
            fixed.as_deref(),
            Some("const y = null; // Auto-added by error fixer\nconsole.log(y);")
        );
    }

    #[test]
    fn test_stand_in_ignores_other_files() {
        assert_eq!(StandInOracle::new().fix("/w/b.js", "console.log(y);", REF_DIAG), None);
    }

    #[test]
    fn test_stand_in_no_change_is_none() {
        let content = "const y = 1;\nconsole.log(y);";
        assert_eq!(StandInOracle::new().fix("/w/a.js", content, REF_DIAG), None);
    }

    #[test]
    fn test_stand_in_is_deterministic() {
        let diag = "TypeError: Cannot read properties of null (reading 'name') at f (/w/a.js:2:9)\n\
                    ReferenceError: y is not defined at f (/w/a.js:1:1)\n";
        let content = "log(y);\nlog(user.name);";
        let oracle = StandInOracle::new();
        let first = oracle.fix("/w/a.js", content, diag);
        let second = oracle.fix("/w/a.js", content, diag);
        assert_eq!(first, second);
        assert_eq!(
            first.as_deref(),
            Some("const y = null; // Auto-added by error fixer\nlog(y);\nif (user === undefined || user === null) {\n  console.error('user is undefined/null');\n  return;\n}\nlog(user.name);")
        );
    }

    #[tokio::test]
    async fn test_stand_in_through_trait() {
        let oracle: Box<dyn RepairOracle> = Box::new(StandInOracle::new());
        let fixed = oracle.repair("/w/a.js", "console.log(y);", REF_DIAG).await.unwrap();
        assert!(fixed.unwrap().starts_with("const y = null;"));
    }
}
