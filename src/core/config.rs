use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::AutofixError;
use crate::models::{Config, ConfigOverrides};

/// Load configuration from the workspace with CLI overrides
pub fn load_config(workspace: &Workspace, overrides: ConfigOverrides) -> Result<Config, AutofixError> {
    let config = Config::load_from_dir(workspace.root())?;
    let config = config.with_overrides(overrides);

    info!(
        "Configuration loaded: input={}, model={}, timeout={}s",
        config.input.error_file.display(),
        config.oracle.model,
        config.oracle.timeout_seconds
    );

    Ok(config)
}

/// Directory that diagnostic paths and the input file are resolved against.
///
/// Passed explicitly instead of relying on the process working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Workspace rooted at the process working directory
    pub fn current() -> Result<Self, AutofixError> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a path from a diagnostic or config entry
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Read the diagnostic text; absent or blank input is `MissingInput`
    pub fn read_diagnostics(&self, input: &Path) -> Result<String, AutofixError> {
        let path = self.resolve(input);
        if !path.is_file() {
            return Err(AutofixError::MissingInput(path));
        }
        let text = std::fs::read_to_string(&path)?;
        if text.trim().is_empty() {
            return Err(AutofixError::MissingInput(path));
        }
        debug!("Read {} bytes of diagnostics from {}", text.len(), path.display());
        Ok(text)
    }
}
