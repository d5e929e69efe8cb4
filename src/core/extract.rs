//! Turn raw diagnostic text into defect records or per-file groups.

use std::collections::HashMap;
use tracing::{debug, warn};

use super::patterns::{file_block_pattern, location_pattern, PATTERN_TABLE};
use crate::models::{DefectCategory, DefectRecord, Extracted, FileErrorGroup};

/// How diagnostic text should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// One record per pattern match, for deterministic fixing
    FieldStructured,
    /// One group per implicated file, for oracle repair
    Grouping,
}

/// Extract defects from diagnostic text in the requested mode
pub fn extract(raw_text: &str, mode: ExtractMode) -> Vec<Extracted> {
    match mode {
        ExtractMode::FieldStructured => extract_records(raw_text)
            .into_iter()
            .map(Extracted::Record)
            .collect(),
        ExtractMode::Grouping => group_by_file(raw_text)
            .into_iter()
            .map(Extracted::Group)
            .collect(),
    }
}

/// Run every pattern in table order over the full text.
///
/// Patterns do not suppress each other: text matching two categories yields
/// two records, the earlier category first.
pub fn extract_records(raw_text: &str) -> Vec<DefectRecord> {
    let mut records = Vec::new();
    for entry in PATTERN_TABLE {
        let found = entry.scan(raw_text);
        debug!("{} pattern matched {} time(s)", entry.category, found.len());
        records.extend(found);
    }
    records
}

/// Group diagnostics by the file they mention.
///
/// Groups come out in the order their file was first seen.
pub fn group_by_file(raw_text: &str) -> Vec<FileErrorGroup> {
    let mut groups: Vec<FileErrorGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for caps in location_pattern().captures_iter(raw_text) {
        let file_path = caps["file"].to_string();
        let line = caps["line"].parse::<usize>().ok().filter(|l| *l >= 1);

        let slot = *index.entry(file_path.clone()).or_insert_with(|| {
            groups.push(FileErrorGroup::new(file_path.clone()));
            groups.len() - 1
        });
        if let Some(line) = line {
            groups[slot].error_lines.insert(line);
        }
    }

    for group in &mut groups {
        match file_block_pattern(&group.file_path) {
            Ok(re) => {
                group.raw_error_text = re
                    .find_iter(raw_text)
                    .map(|m| m.as_str().to_string())
                    .collect();
            }
            Err(e) => {
                warn!("Could not build block pattern for {}: {}", group.file_path, e);
            }
        }
        group.category = classify(group);
        debug!(
            "{} ({}): {} line(s), {} block(s)",
            group.file_path,
            group.category,
            group.error_lines.len(),
            group.raw_error_text.len()
        );
    }

    groups
}

/// Category of the first table pattern that locates an error in this file
fn classify(group: &FileErrorGroup) -> DefectCategory {
    let text = group.diagnostic_text();
    PATTERN_TABLE
        .iter()
        .find(|entry| entry.scan(&text).iter().any(|r| r.file == group.file_path))
        .map(|entry| entry.category)
        .unwrap_or(DefectCategory::Generic)
}
