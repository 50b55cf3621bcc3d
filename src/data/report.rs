use super::model::{CellValue, Table};
use super::{ROI, X_MULTIPLE};

// ---------------------------------------------------------------------------
// Aggregate statistics over a table
// ---------------------------------------------------------------------------

/// Aggregates shown in the side panel and printable on export.
/// `None` marks an aggregate with no defined value (no numeric rows).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub rows: usize,
    pub missing_cells: usize,
    pub max_roi: Option<f64>,
    pub mean_roi: Option<f64>,
    pub max_x_multiple: Option<f64>,
    pub mean_x_multiple: Option<f64>,
}

fn numeric_column(table: &Table, column: &str) -> Vec<f64> {
    table
        .column(column)
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_f64())
                .filter(|v| !v.is_nan())
                .collect()
        })
        .unwrap_or_default()
}

fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

fn mean_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Compute row count, missing-cell count, and max/mean of `roi` and
/// `x_multiple`. Aggregates skip missing values; an empty table yields zero
/// counts and all-`None` aggregates.
pub fn summarize(table: &Table) -> Summary {
    let missing_cells = table
        .rows()
        .iter()
        .map(|r| {
            table
                .columns()
                .iter()
                .filter(|c| r.get(c.as_str()).map(CellValue::is_null).unwrap_or(true))
                .count()
        })
        .sum();

    let roi = numeric_column(table, ROI);
    let x = numeric_column(table, X_MULTIPLE);

    Summary {
        rows: table.len(),
        missing_cells,
        max_roi: max_of(&roi),
        mean_roi: mean_of(&roi),
        max_x_multiple: max_of(&x),
        mean_x_multiple: mean_of(&x),
    }
}

/// Index of the row holding the maximum numeric value in `column`, if any.
/// Ties go to the earliest row.
pub fn top_row(table: &Table, column: &str) -> Option<usize> {
    table
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            r.get(column)
                .and_then(CellValue::as_f64)
                .filter(|v| !v.is_nan())
                .map(|v| (i, v))
        })
        .reduce(|best, cur| if cur.1 > best.1 { cur } else { best })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::demo_table;

    fn empty_table() -> Table {
        Table::from_columns(vec![
            (ROI.to_string(), vec![]),
            (X_MULTIPLE.to_string(), vec![]),
        ])
        .unwrap()
    }

    #[test]
    fn empty_table_summarizes_without_panicking() {
        let t = empty_table();
        let s = summarize(&t);
        assert_eq!(s.rows, 0);
        assert_eq!(s.missing_cells, 0);
        assert_eq!(s.max_roi, None);
        assert_eq!(s.mean_roi, None);
        assert_eq!(s.mean_x_multiple, None);
    }

    #[test]
    fn demo_data_aggregates() {
        let s = summarize(&demo_table());
        assert_eq!(s.rows, 5);
        assert_eq!(s.missing_cells, 0);
        assert_eq!(s.max_roi, Some(20.0));
        assert_eq!(s.mean_roi, Some(11.6));
        assert_eq!(s.max_x_multiple, Some(10.0));
        assert_eq!(s.mean_x_multiple, Some(5.4));
    }

    #[test]
    fn missing_values_are_counted_and_skipped() {
        let t = Table::from_columns(vec![(
            ROI.to_string(),
            vec![CellValue::Float(4.0), CellValue::Null, CellValue::Float(8.0)],
        )])
        .unwrap();
        let s = summarize(&t);
        assert_eq!(s.missing_cells, 1);
        assert_eq!(s.mean_roi, Some(6.0));
        assert_eq!(s.max_roi, Some(8.0));
    }

    #[test]
    fn top_row_finds_the_maximum() {
        let t = demo_table();
        assert_eq!(top_row(&t, ROI), Some(4)); // roi 20
        assert_eq!(top_row(&t, X_MULTIPLE), Some(4)); // x 10
        assert_eq!(top_row(&t, "no_such_column"), None);
        assert_eq!(top_row(&empty_table(), ROI), None);
    }
}
