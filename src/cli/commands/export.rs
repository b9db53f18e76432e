//! Spreadsheet export command handler

use crate::services::export_workbook;
use anyhow::Context;
use std::path::Path;

pub fn cmd_export_sheets(input: &Path, output: &Path) -> anyhow::Result<()> {
    let sheets = export_workbook(input, output)
        .with_context(|| format!("Failed to export {}", input.display()))?;

    for sheet in &sheets {
        println!("  {} -> {} ({} rows)", sheet.name, sheet.path.display(), sheet.rows);
    }

    println!();
    println!("Exported {} sheet(s) to {}", sheets.len(), output.display());

    Ok(())
}
