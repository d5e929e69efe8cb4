//! autofix - turn CI failure output into source fixes
//!
//! autofix reads diagnostic text produced by a build or test run, works out
//! which files and lines it implicates, and rewrites those files. Fixes are
//! either deterministic per-category rewrites or whole-file repairs from a
//! remote LLM oracle.
//!
//! # Architecture
//!
//! - **commands**: CLI command implementations (fix, repair, scan)
//! - **core**: Pattern table, extractor, fix strategies, applier, oracle
//! - **models**: Data structures (config, defect records, language)
//! - **error**: Error types

pub mod commands;
pub mod core;
pub mod error;
pub mod models;

pub use error::{AutofixError, Result};
