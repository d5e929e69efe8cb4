//! Common test utilities

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create an empty workspace that never picks up a real API key
pub fn create_test_workspace() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path().to_path_buf();

    fs::write(
        root.join("autofix.toml"),
        "[oracle]\napi_key_env = \"AUTOFIX_INTEGRATION_TEST_UNSET_KEY\"\n",
    )
    .expect("Failed to write config");

    (temp_dir, root)
}

/// Create a source file and return its absolute path
pub fn create_source_file(root: &Path, name: &str, content: &str) -> PathBuf {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create source parent dir");
    }
    fs::write(&path, content).expect("Failed to write source file");
    path
}

/// Write the diagnostic file the commands read
pub fn write_error_output(root: &Path, text: &str) {
    fs::write(root.join("error_output.txt"), text).expect("Failed to write error output");
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("Failed to read file")
}
