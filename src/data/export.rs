use std::path::Path;

use anyhow::{Context, Result};

use super::model::{CellValue, CrashTable};

/// Write a table as CSV with its normalized header. Missing cells become
/// empty fields.
pub fn write_csv(table: &CrashTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer
        .write_record(&table.columns)
        .context("writing CSV header")?;
    for (row_no, row) in table.rows.iter().enumerate() {
        writer
            .write_record(row.iter().map(export_field))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn export_field(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        other => other.to_string(),
    }
}
