use std::path::Path;

use anyhow::{Context, Result};

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// CSV serialization
// ---------------------------------------------------------------------------

/// Render one cell for CSV. Floats use the shortest round-trip form with a
/// trailing `.0` when integral (`{:?}`), so re-importing keeps the dtype;
/// Null becomes an empty field. Quoting/escaping is the `csv` crate's job.
fn csv_field(value: &CellValue) -> String {
    match value {
        CellValue::Integer(i) => i.to_string(),
        CellValue::Float(v) => format!("{v:?}"),
        CellValue::String(s) => s.clone(),
        CellValue::Null => String::new(),
    }
}

/// Serialize a table to CSV text: header row of column names, one line per
/// row, in table order.
pub fn to_csv(table: &Table) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns())
        .context("writing CSV header")?;

    for (i, row) in table.rows().iter().enumerate() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|c| csv_field(row.get(c.as_str()).unwrap_or(&CellValue::Null)))
            .collect();
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {i}"))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV writer: {e}"))?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

/// Serialize a table and write it to `path`.
pub fn save_csv(table: &Table, path: &Path) -> Result<()> {
    let text = to_csv(table)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}
