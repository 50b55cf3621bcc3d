use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Row, Table};
use super::{ATH_MARKET_CAP, DEV_BOUGHT, DEV_SOLD_PCT, ROI, TIME_CREATED, X_MULTIPLE};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a signal table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one scalar column per field (as written by Pandas/Polars)
/// * `.json`    – `[{ "time_created": 1, "roi": 10.0, ... }, ...]`
/// * `.csv`     – header row, one signal per line, dtypes guessed per cell
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// The built-in demonstration dataset: five token launches, already in
/// chronological order.
pub fn demo_table() -> Table {
    fn ints(values: &[i64]) -> Vec<CellValue> {
        values.iter().map(|&v| CellValue::Integer(v)).collect()
    }
    fn floats(values: &[f64]) -> Vec<CellValue> {
        values.iter().map(|&v| CellValue::Float(v)).collect()
    }

    Table::from_columns(vec![
        (TIME_CREATED.to_string(), ints(&[1, 1, 2, 3, 1])),
        (DEV_BOUGHT.to_string(), floats(&[0.5, 1.2, 0.8, 1.5, 0.2])),
        (
            DEV_SOLD_PCT.to_string(),
            floats(&[100.0, 50.0, 100.0, 90.0, 100.0]),
        ),
        (
            ATH_MARKET_CAP.to_string(),
            floats(&[5.0e7, 2.0e8, 3.0e8, 1.0e8, 4.5e7]),
        ),
        (ROI.to_string(), floats(&[10.0, 8.0, 5.0, 15.0, 20.0])),
        (X_MULTIPLE.to_string(), floats(&[2.0, 5.0, 3.0, 7.0, 10.0])),
    ])
    .expect("demo columns have equal length")
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "time_created": 1, "ath_market_cap": 5.0e7, "roi": 10.0, ... },
///   ...
/// ]
/// ```
///
/// Keys missing from a record read as Null; columns are ordered by name.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut column_set: BTreeSet<String> = BTreeSet::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut row = Row::new();
        for (key, val) in obj {
            column_set.insert(key.clone());
            row.insert(key.clone(), json_to_cell(val));
        }
        rows.push(row);
    }

    Ok(Table::from_rows(column_set.into_iter().collect(), rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Integer(*b as i64),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one signal per line.
/// Cell dtypes are guessed: integer, then float, else string; an empty
/// field is a missing value.
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut row = Row::new();
        for (col_idx, value) in record.iter().enumerate() {
            let Some(col_name) = headers.get(col_idx) else {
                bail!("CSV row {row_no} has more fields than the header");
            };
            row.insert(col_name.clone(), guess_cell_type(value));
        }
        rows.push(row);
    }

    Ok(Table::from_rows(headers, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of scalar signal columns.
///
/// Strings, ints, floats, and bools map onto [`CellValue`] (bools as 0/1);
/// nulls become missing values. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        if columns.is_empty() {
            columns = schema.fields().iter().map(|f| f.name().clone()).collect();
        }

        for row_idx in 0..batch.num_rows() {
            let mut row = Row::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = cell_from_arrow(batch.column(col_idx), row_idx)
                    .with_context(|| format!("column '{}', row {row_idx}", field.name()))?;
                row.insert(field.name().clone(), value);
            }
            rows.push(row);
        }
    }

    Ok(Table::from_rows(columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn cell_from_arrow(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            CellValue::String(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            CellValue::String(arr.value(row).to_string())
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?;
            CellValue::Integer(arr.value(row) as i64)
        }
        other => bail!("unsupported parquet column type {other:?}"),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_table_matches_the_reference_dataset() {
        let t = demo_table();
        assert_eq!(t.len(), 5);
        assert_eq!(
            t.columns(),
            &[
                TIME_CREATED.to_string(),
                DEV_BOUGHT.to_string(),
                DEV_SOLD_PCT.to_string(),
                ATH_MARKET_CAP.to_string(),
                ROI.to_string(),
                X_MULTIPLE.to_string(),
            ]
        );
        assert_eq!(t.get(0, ATH_MARKET_CAP), &CellValue::Float(50_000_000.0));
        assert_eq!(t.get(4, ROI), &CellValue::Float(20.0));
        assert_eq!(t.get(3, TIME_CREATED), &CellValue::Integer(3));
    }

    #[test]
    fn cell_type_guessing() {
        assert_eq!(guess_cell_type(""), CellValue::Null);
        assert_eq!(guess_cell_type("42"), CellValue::Integer(42));
        assert_eq!(guess_cell_type("-3"), CellValue::Integer(-3));
        assert_eq!(guess_cell_type("2.5"), CellValue::Float(2.5));
        assert_eq!(guess_cell_type("5e7"), CellValue::Float(50_000_000.0));
        assert_eq!(
            guess_cell_type("pump"),
            CellValue::String("pump".to_string())
        );
    }

    #[test]
    fn json_cells_map_onto_the_value_enum() {
        assert_eq!(json_to_cell(&JsonValue::Null), CellValue::Null);
        assert_eq!(json_to_cell(&serde_json::json!(7)), CellValue::Integer(7));
        assert_eq!(
            json_to_cell(&serde_json::json!(0.02)),
            CellValue::Float(0.02)
        );
        assert_eq!(json_to_cell(&serde_json::json!(true)), CellValue::Integer(1));
        assert_eq!(
            json_to_cell(&serde_json::json!("abc")),
            CellValue::String("abc".to_string())
        );
    }

    #[test]
    fn json_loader_round_trip_through_a_temp_file() {
        let dir = std::env::temp_dir().join("signal_scope_loader_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("signals.json");
        std::fs::write(
            &path,
            r#"[{"time_created": 1, "roi": 10.5}, {"time_created": 2, "roi": null}]"#,
        )
        .unwrap();

        let t = load_file(&path).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(0, "roi"), &CellValue::Float(10.5));
        assert!(t.get(1, "roi").is_null());
        assert_eq!(t.get(1, "time_created"), &CellValue::Integer(2));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        assert!(load_file(Path::new("signals.xlsx")).is_err());
    }
}
