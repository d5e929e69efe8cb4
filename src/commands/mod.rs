pub mod fix;
pub mod repair;
pub mod scan;

pub use fix::*;
pub use repair::*;
pub use scan::*;

use tracing::info;

use crate::core::Workspace;
use crate::error::AutofixError;
use crate::models::Config;

/// Read the configured diagnostic file; `None` when there is nothing to do
fn load_diagnostics(workspace: &Workspace, config: &Config) -> Result<Option<String>, AutofixError> {
    match workspace.read_diagnostics(&config.input.error_file) {
        Ok(text) => Ok(Some(text)),
        Err(AutofixError::MissingInput(path)) => {
            info!("No error output found at {}. Nothing to do.", path.display());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
