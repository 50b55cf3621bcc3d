use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes of the source data:
/// integers, floats, strings, and missing values.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    String(String),
    Null,
}

// -- Manual Eq/Ord so columns can be sorted --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    /// Total order used by [`Table::sorted_by`]: Null sorts first, numeric
    /// values (integer or float) compare by value, strings lexically.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
            return a.total_cmp(&b);
        }
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                String(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for numeric comparison.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Whether this cell is a missing value.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Construction-level schema violations; these abort the call that caused
/// them (unlike per-predicate filter errors, which are collected).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    #[error("column '{column}' has {actual} values, expected {expected}")]
    UnequalLength {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("schema mismatch: {left:?} vs {right:?}")]
    Mismatch {
        left: Vec<String>,
        right: Vec<String>,
    },
}

/// An operation referenced a column the table does not have.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("no such column '{0}'")]
pub struct ColumnError(pub String);

// ---------------------------------------------------------------------------
// Table – the pipeline's sole data structure
// ---------------------------------------------------------------------------

/// One row: column name → value.
pub type Row = BTreeMap<String, CellValue>;

/// An ordered, schema-consistent collection of rows.
///
/// Every transformation returns a new `Table`; earlier tables stay valid, so
/// e.g. blacklist padding can keep drawing from the pre-filter table after
/// filtering has produced a narrowed one.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Declared column order (used for display and CSV serialization).
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table from (column name, values) pairs in declared order.
    /// All columns must have the same length.
    pub fn from_columns(columns: Vec<(String, Vec<CellValue>)>) -> Result<Self, SchemaError> {
        let expected = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        for (name, values) in &columns {
            if values.len() != expected {
                return Err(SchemaError::UnequalLength {
                    column: name.clone(),
                    expected,
                    actual: values.len(),
                });
            }
        }

        let names: Vec<String> = columns.iter().map(|(n, _)| n.clone()).collect();
        let mut rows: Vec<Row> = (0..expected).map(|_| Row::new()).collect();
        for (name, values) in columns {
            for (row, value) in rows.iter_mut().zip(values) {
                row.insert(name.clone(), value);
            }
        }
        Ok(Table {
            columns: names,
            rows,
        })
    }

    pub(crate) fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Table { columns, rows }
    }

    /// Declared column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Cell at (row, column); missing cells read as [`CellValue::Null`].
    pub fn get(&self, row: usize, column: &str) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&CellValue::Null)
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Result<Vec<&CellValue>, ColumnError> {
        if !self.has_column(name) {
            return Err(ColumnError(name.to_string()));
        }
        Ok(self
            .rows
            .iter()
            .map(|r| r.get(name).unwrap_or(&CellValue::Null))
            .collect())
    }

    /// Project onto a subset of columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<Table, ColumnError> {
        for name in names {
            if !self.has_column(name) {
                return Err(ColumnError(name.to_string()));
            }
        }
        let rows = self
            .rows
            .iter()
            .map(|r| {
                names
                    .iter()
                    .map(|&n| {
                        let v = r.get(n).cloned().unwrap_or(CellValue::Null);
                        (n.to_string(), v)
                    })
                    .collect()
            })
            .collect();
        Ok(Table {
            columns: names.iter().map(|n| n.to_string()).collect(),
            rows,
        })
    }

    /// Keep the rows matching `pred`, preserving relative order.
    pub fn filter_rows(&self, pred: impl Fn(&Row) -> bool) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| pred(r)).cloned().collect(),
        }
    }

    /// First `n` rows, order preserved.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Vertical concatenation: `self`'s rows followed by `other`'s.
    /// Both tables must declare the same columns in the same order.
    pub fn concat(&self, other: &Table) -> Result<Table, SchemaError> {
        if self.columns != other.columns {
            return Err(SchemaError::Mismatch {
                left: self.columns.clone(),
                right: other.columns.clone(),
            });
        }
        let mut rows = self.rows.clone();
        rows.extend(other.rows.iter().cloned());
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Append a derived column (or replace an existing one in place).
    /// `values` must have one entry per row.
    pub fn with_column(&self, name: &str, values: Vec<CellValue>) -> Result<Table, SchemaError> {
        if values.len() != self.rows.len() {
            return Err(SchemaError::UnequalLength {
                column: name.to_string(),
                expected: self.rows.len(),
                actual: values.len(),
            });
        }
        let mut columns = self.columns.clone();
        if !self.has_column(name) {
            columns.push(name.to_string());
        }
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(r, v)| {
                let mut r = r.clone();
                r.insert(name.to_string(), v);
                r
            })
            .collect();
        Ok(Table { columns, rows })
    }

    /// Stable sort by one column. Null compares lowest, so it sorts first
    /// ascending and last descending (the total order of [`CellValue`]).
    pub fn sorted_by(&self, column: &str, ascending: bool) -> Result<Table, ColumnError> {
        if !self.has_column(column) {
            return Err(ColumnError(column.to_string()));
        }
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            let va = a.get(column).unwrap_or(&CellValue::Null);
            let vb = b.get(column).unwrap_or(&CellValue::Null);
            if ascending {
                va.cmp(vb)
            } else {
                vb.cmp(va)
            }
        });
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_col() -> Table {
        Table::from_columns(vec![
            (
                "roi".to_string(),
                vec![
                    CellValue::Float(10.0),
                    CellValue::Null,
                    CellValue::Float(5.0),
                ],
            ),
            (
                "name".to_string(),
                vec![
                    CellValue::String("a".to_string()),
                    CellValue::String("b".to_string()),
                    CellValue::String("c".to_string()),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn unequal_columns_fail_construction() {
        let err = Table::from_columns(vec![
            ("a".to_string(), vec![CellValue::Integer(1)]),
            (
                "b".to_string(),
                vec![CellValue::Integer(1), CellValue::Integer(2)],
            ),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnequalLength {
                column: "b".to_string(),
                expected: 1,
                actual: 2,
            }
        );
    }

    #[test]
    fn head_and_filter_preserve_order() {
        let t = two_col();
        assert_eq!(t.head(2).len(), 2);
        assert_eq!(t.head(2).get(1, "name"), &CellValue::String("b".into()));
        assert_eq!(t.head(10).len(), 3);

        let kept = t.filter_rows(|r| r.get("roi").map(|v| !v.is_null()).unwrap_or(false));
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.get(0, "name"), &CellValue::String("a".into()));
        assert_eq!(kept.get(1, "name"), &CellValue::String("c".into()));
    }

    #[test]
    fn concat_appends_in_order() {
        let t = two_col();
        let joined = t.concat(&t.head(1)).unwrap();
        assert_eq!(joined.len(), 4);
        assert_eq!(joined.get(3, "name"), &CellValue::String("a".into()));
    }

    #[test]
    fn concat_rejects_schema_mismatch() {
        let t = two_col();
        let other = t.select(&["roi"]).unwrap();
        assert!(matches!(t.concat(&other), Err(SchemaError::Mismatch { .. })));
    }

    #[test]
    fn select_projects_and_errors_on_unknown() {
        let t = two_col();
        let p = t.select(&["name"]).unwrap();
        assert_eq!(p.columns(), &["name".to_string()]);
        assert_eq!(p.len(), 3);
        assert_eq!(t.select(&["nope"]), Err(ColumnError("nope".to_string())));
    }

    #[test]
    fn with_column_appends_and_replaces() {
        let t = two_col();
        let t2 = t
            .with_column("flag", vec![CellValue::Integer(1); 3])
            .unwrap();
        assert_eq!(t2.columns().last().map(|s| s.as_str()), Some("flag"));
        // Replacing keeps the column position.
        let t3 = t2
            .with_column("roi", vec![CellValue::Integer(0); 3])
            .unwrap();
        assert_eq!(t3.columns(), t2.columns());
        assert_eq!(t3.get(0, "roi"), &CellValue::Integer(0));
        // Wrong length fails.
        assert!(t.with_column("flag", vec![CellValue::Integer(1)]).is_err());
    }

    #[test]
    fn sorted_by_is_stable_with_nulls_first() {
        let t = two_col();
        let asc = t.sorted_by("roi", true).unwrap();
        assert_eq!(asc.get(0, "name"), &CellValue::String("b".into()));
        assert_eq!(asc.get(1, "name"), &CellValue::String("c".into()));
        assert_eq!(asc.get(2, "name"), &CellValue::String("a".into()));
        let desc = t.sorted_by("roi", false).unwrap();
        assert_eq!(desc.get(0, "name"), &CellValue::String("a".into()));
    }

    #[test]
    fn integers_and_floats_compare_by_value() {
        assert_eq!(
            CellValue::Integer(3).cmp(&CellValue::Float(3.0)),
            std::cmp::Ordering::Equal
        );
        assert!(CellValue::Integer(2) < CellValue::Float(2.5));
    }
}
