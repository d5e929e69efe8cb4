pub mod applier;
pub mod config;
pub mod extract;
pub mod oracle;
pub mod patterns;
pub mod prompts;
pub mod strategies;

pub use applier::*;
pub use config::*;
pub use extract::*;
pub use oracle::*;
pub use prompts::*;
pub use strategies::*;
