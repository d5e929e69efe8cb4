use super::load_diagnostics;
use crate::core::{extract, load_config, ExtractMode, Workspace};
use crate::error::AutofixError;
use crate::models::{ConfigOverrides, Extracted};

/// Print what would be extracted, without touching any file
pub fn run_scan(workspace: &Workspace, overrides: ConfigOverrides, grouped: bool, json: bool) -> Result<(), AutofixError> {
    let config = load_config(workspace, overrides)?;
    let Some(diagnostics) = load_diagnostics(workspace, &config)? else {
        return Ok(());
    };

    let mode = if grouped { ExtractMode::Grouping } else { ExtractMode::FieldStructured };
    let items = extract(&diagnostics, mode);

    if json {
        let rendered = serde_json::to_string_pretty(&items)
            .map_err(|e| AutofixError::Io(std::io::Error::other(e)))?;
        println!("{}", rendered);
        return Ok(());
    }

    if items.is_empty() {
        println!("No recognizable errors found.");
        return Ok(());
    }

    println!("=== {} item(s) ===\n", items.len());
    for item in &items {
        match item {
            Extracted::Record(record) => println!("  {}", record),
            Extracted::Group(group) => {
                let lines: Vec<String> = group.error_lines.iter().map(|l| l.to_string()).collect();
                println!(
                    "  {} [{}] (lines {}; {} block(s))",
                    group.file_path,
                    group.category,
                    lines.join(", "),
                    group.raw_error_text.len()
                );
            }
        }
    }
    Ok(())
}
