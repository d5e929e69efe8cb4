//! Integration tests for grouping extraction and oracle-backed repair

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use autofix::commands::run_repair;
use autofix::core::{group_by_file, repair_all, RepairOracle, StandInOracle, Workspace};
use autofix::error::OracleError;
use autofix::models::ConfigOverrides;

mod common;

use common::{create_source_file, create_test_workspace, read, write_error_output};

/// Records every call and answers with a canned reply
struct ScriptedOracle {
    reply: Result<Option<String>, &'static str>,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    fn new(reply: Result<Option<String>, &'static str>) -> Self {
        Self { reply, calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl RepairOracle for ScriptedOracle {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn repair(&self, _: &str, _: &str, diagnostic_text: &str) -> Result<Option<String>, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(!diagnostic_text.is_empty());
        match &self.reply {
            Ok(body) => Ok(body.clone()),
            Err(msg) => Err(OracleError::MalformedResponse(msg.to_string())),
        }
    }
}

#[tokio::test]
async fn test_repair_command_with_stand_in() {
    let (_temp_dir, root) = create_test_workspace();
    let type_file = create_source_file(&root, "type-error.js", "const obj = null;\nconsole.log(obj.property);");
    let ref_file = create_source_file(&root, "reference-error.js", "console.log(y);");
    write_error_output(
        &root,
        &format!(
            "TypeError: Cannot read property 'property' of null at Object.<anonymous> ({}:2:13)\n    at Module._compile (node:internal/modules/cjs/loader:1105:14)\n\
             ReferenceError: y is not defined at Object.<anonymous> ({}:1:13)\n",
            type_file.display(),
            ref_file.display()
        ),
    );

    let summary = run_repair(&Workspace::new(&root), ConfigOverrides::default()).await.unwrap();

    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.fixed, 2);
    assert_eq!(
        read(&type_file),
        "const obj = null;\nif (obj === undefined || obj === null) {\n  console.error('obj is undefined/null');\n  return;\n}\nconsole.log(obj.property);"
    );
    assert_eq!(read(&ref_file), "const y = null; // Auto-added by error fixer\nconsole.log(y);");
}

#[tokio::test]
async fn test_one_request_per_file() {
    let (_temp_dir, root) = create_test_workspace();
    let a = create_source_file(&root, "a.js", "broken();");
    let b = create_source_file(&root, "b.js", "alsoBroken();");
    let text = format!(
        "Error: one at f ({a}:1:1)\nError: two at g ({a}:1:5)\nException: three at h ({b}:1:1)\n",
        a = a.display(),
        b = b.display()
    );

    let groups = group_by_file(&text);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].raw_error_text.len(), 2);

    let oracle = ScriptedOracle::new(Ok(Some("fixed();\n".to_string())));
    let summary = repair_all(&Workspace::new(&root), &groups, &oracle).await;

    assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);
    assert_eq!(summary.fixed, 2);
    assert_eq!(read(&a), "fixed();\n");
    assert_eq!(read(&b), "fixed();\n");
}

#[tokio::test]
async fn test_malformed_response_skips_file() {
    let (_temp_dir, root) = create_test_workspace();
    let a = create_source_file(&root, "a.js", "broken();");
    let groups = group_by_file(&format!("Error: boom at f ({}:1:1)\n", a.display()));

    let oracle = ScriptedOracle::new(Err("no code block"));
    let summary = repair_all(&Workspace::new(&root), &groups, &oracle).await;

    assert_eq!(summary.failed, 1);
    assert_eq!(read(&a), "broken();");
}

#[tokio::test]
async fn test_stand_in_leaves_unfixable_file() {
    let (_temp_dir, root) = create_test_workspace();
    let a = create_source_file(&root, "a.js", "throw new Error('x');");
    let groups = group_by_file(&format!("Error: x at Object.<anonymous> ({}:1:7)\n", a.display()));

    let summary = repair_all(&Workspace::new(&root), &groups, &StandInOracle::new()).await;

    assert_eq!(summary.unchanged, 1);
    assert_eq!(read(&a), "throw new Error('x');");
}

#[tokio::test]
async fn test_missing_input_is_not_an_error() {
    let (_temp_dir, root) = create_test_workspace();
    let summary = run_repair(&Workspace::new(&root), ConfigOverrides::default()).await.unwrap();
    assert_eq!(summary.attempted, 0);
}
