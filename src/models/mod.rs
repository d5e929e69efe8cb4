pub mod config;
pub mod defect;
pub mod language;

pub use config::*;
pub use defect::*;
pub use language::*;
