//! Apply deterministic fixes to files on disk, one record at a time.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use super::config::Workspace;
use super::strategies::{apply_fix, LineBuffer};
use crate::error::AutofixError;
use crate::models::DefectRecord;

/// What happened to one record or file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    Fixed,
    /// A strategy ran but had nothing it could change
    NoOp,
    NotFound,
    Failed(String),
}

/// Counts reported at the end of a batch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FixSummary {
    pub attempted: usize,
    pub fixed: usize,
    pub unchanged: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl FixSummary {
    pub fn record(&mut self, outcome: &FixOutcome) {
        self.attempted += 1;
        match outcome {
            FixOutcome::Fixed => self.fixed += 1,
            FixOutcome::NoOp => self.unchanged += 1,
            FixOutcome::NotFound => self.not_found += 1,
            FixOutcome::Failed(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for FixSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempted, {} fixed, {} unchanged, {} not found, {} failed",
            self.attempted, self.fixed, self.unchanged, self.not_found, self.failed
        )
    }
}

/// Lines inserted into one file by earlier fixes in the batch.
///
/// Positions are kept in the diagnostic's original line numbering, so a
/// later record is shifted by every insertion made at or above its line.
#[derive(Debug, Default, Clone)]
pub struct ShiftLedger {
    insertions: Vec<(usize, usize)>,
}

impl ShiftLedger {
    /// Current position of an originally reported line
    pub fn resolve(&self, line: usize) -> usize {
        line + self
            .insertions
            .iter()
            .filter(|(at, _)| *at <= line)
            .map(|(_, count)| count)
            .sum::<usize>()
    }

    pub fn record(&mut self, original_line: usize, inserted: usize) {
        if inserted > 0 {
            self.insertions.push((original_line, inserted));
        }
    }
}

fn inserted_lines(before: &str, after: &str) -> usize {
    LineBuffer::parse(after)
        .line_count()
        .saturating_sub(LineBuffer::parse(before).line_count())
}

/// Apply a run of records for the same file in memory
pub fn apply_fixes(content: &str, records: &[DefectRecord]) -> String {
    let mut ledger = ShiftLedger::default();
    let mut current = content.to_string();
    for record in records {
        let target = record.at_line(ledger.resolve(record.line));
        let next = apply_fix(&current, &target);
        ledger.record(record.line, inserted_lines(&current, &next));
        current = next;
    }
    current
}

/// Applies defect records to files in a workspace
pub struct FixApplier<'a> {
    workspace: &'a Workspace,
    shifts: HashMap<PathBuf, ShiftLedger>,
}

impl<'a> FixApplier<'a> {
    pub fn new(workspace: &'a Workspace) -> Self {
        Self {
            workspace,
            shifts: HashMap::new(),
        }
    }

    /// Process every record in order; failures never stop the batch
    pub fn apply_all(&mut self, records: &[DefectRecord]) -> FixSummary {
        let mut summary = FixSummary::default();
        for record in records {
            let outcome = self.apply_one(record);
            summary.record(&outcome);
        }
        info!("Fix summary: {}", summary);
        summary
    }

    pub fn apply_one(&mut self, record: &DefectRecord) -> FixOutcome {
        let path = self.workspace.resolve(&record.file);
        info!("Attempting to fix {} error in {}", record.category, path.display());

        match self.try_apply(record, path.clone()) {
            Ok(outcome) => outcome,
            Err(AutofixError::FileNotFound(p)) => {
                warn!("File not found: {}", p.display());
                FixOutcome::NotFound
            }
            Err(e) => {
                error!("Error while fixing {}: {}", path.display(), e);
                FixOutcome::Failed(e.to_string())
            }
        }
    }

    fn try_apply(&mut self, record: &DefectRecord, path: PathBuf) -> Result<FixOutcome, AutofixError> {
        if !path.is_file() {
            return Err(AutofixError::FileNotFound(path));
        }

        let content = fs::read_to_string(&path)?;
        let ledger = self.shifts.entry(path.clone()).or_default();
        let line = ledger.resolve(record.line);
        if line != record.line {
            debug!("Line {} of {} is now line {}", record.line, path.display(), line);
        }

        let fixed = apply_fix(&content, &record.at_line(line));
        if fixed == content {
            info!("No automatic fix available for {} in {}", record, path.display());
            return Ok(FixOutcome::NoOp);
        }

        fs::write(&path, &fixed)?;
        ledger.record(record.line, inserted_lines(&content, &fixed));
        info!("Fixed {} error in {}", record.category, path.display());
        Ok(FixOutcome::Fixed)
    }
}

/// Apply all records against a workspace
pub fn apply_all(workspace: &Workspace, records: &[DefectRecord]) -> FixSummary {
    FixApplier::new(workspace).apply_all(records)
}
