use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Comparison operators
// ---------------------------------------------------------------------------

/// The six comparison kinds a filter row can pick. Evaluation goes through a
/// single match dispatch; the free-text value is parsed once per predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    /// All operators in UI order.
    pub const ALL: [CmpOp; 6] = [
        CmpOp::Eq,
        CmpOp::Ne,
        CmpOp::Lt,
        CmpOp::Le,
        CmpOp::Gt,
        CmpOp::Ge,
    ];

    /// The symbol shown in the filter form ("==", "!=", …).
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    fn eval(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
        }
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// One filter row: narrow the table to rows whose `column` satisfies
/// `op` against the parsed `value`. Built fresh per apply from the form,
/// serializable so a filter set can be saved as a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub op: CmpOp,
    pub value: String,
}

impl Predicate {
    pub fn new(column: impl Into<String>, op: CmpOp, value: impl Into<String>) -> Self {
        Predicate {
            column: column.into(),
            op,
            value: value.into(),
        }
    }
}

/// A predicate that could not be applied. Collected and reported, never
/// fatal: the offending predicate is skipped and filtering continues.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredicateError {
    #[error("filter references unknown column '{column}'")]
    Column { column: String },
    #[error("invalid value '{value}' for filter on column '{column}': not a number")]
    Parse { column: String, value: String },
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Apply `predicates` in order, each narrowing the previous result
/// (logical AND). Row order is preserved throughout.
///
/// Cells are compared numerically: Null and non-numeric cells behave as NaN,
/// so they fail every comparison except `!=`. An empty predicate list
/// returns the input unchanged.
pub fn filter_table(table: &Table, predicates: &[Predicate]) -> (Table, Vec<PredicateError>) {
    let mut filtered = table.clone();
    let mut errors = Vec::new();

    for pred in predicates {
        if !filtered.has_column(&pred.column) {
            errors.push(PredicateError::Column {
                column: pred.column.clone(),
            });
            continue;
        }
        let rhs: f64 = match pred.value.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                errors.push(PredicateError::Parse {
                    column: pred.column.clone(),
                    value: pred.value.clone(),
                });
                continue;
            }
        };

        let column = pred.column.clone();
        let op = pred.op;
        filtered = filtered.filter_rows(|row| {
            let lhs = row
                .get(&column)
                .and_then(CellValue::as_f64)
                .unwrap_or(f64::NAN);
            op.eval(lhs, rhs)
        });
    }

    (filtered, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::demo_table;

    fn roi_table() -> Table {
        Table::from_columns(vec![(
            "roi".to_string(),
            vec![
                CellValue::Float(10.0),
                CellValue::Float(8.0),
                CellValue::Float(5.0),
                CellValue::Float(15.0),
                CellValue::Float(20.0),
            ],
        )])
        .unwrap()
    }

    #[test]
    fn ge_keeps_matching_rows_in_order() {
        let t = roi_table();
        let (out, errors) = filter_table(&t, &[Predicate::new("roi", CmpOp::Ge, "10")]);
        assert!(errors.is_empty());
        assert_eq!(out.len(), 3);
        assert_eq!(out.get(0, "roi"), &CellValue::Float(10.0));
        assert_eq!(out.get(1, "roi"), &CellValue::Float(15.0));
        assert_eq!(out.get(2, "roi"), &CellValue::Float(20.0));
    }

    #[test]
    fn unparseable_value_reports_and_leaves_table_untouched() {
        let t = roi_table();
        let (out, errors) = filter_table(&t, &[Predicate::new("roi", CmpOp::Eq, "abc")]);
        assert_eq!(out, t);
        assert_eq!(
            errors,
            vec![PredicateError::Parse {
                column: "roi".to_string(),
                value: "abc".to_string(),
            }]
        );
    }

    #[test]
    fn unknown_column_reports_and_continues() {
        let t = roi_table();
        let (out, errors) = filter_table(
            &t,
            &[
                Predicate::new("nonsense", CmpOp::Gt, "1"),
                Predicate::new("roi", CmpOp::Lt, "10"),
            ],
        );
        assert_eq!(
            errors,
            vec![PredicateError::Column {
                column: "nonsense".to_string(),
            }]
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn bad_predicate_is_isolated_from_valid_ones() {
        let t = roi_table();
        let valid = [
            Predicate::new("roi", CmpOp::Ge, "8"),
            Predicate::new("roi", CmpOp::Le, "15"),
        ];
        let (expected, _) = filter_table(&t, &valid);

        let mixed = [
            valid[0].clone(),
            Predicate::new("roi", CmpOp::Eq, "not a number"),
            valid[1].clone(),
        ];
        let (out, errors) = filter_table(&t, &mixed);
        assert_eq!(out, expected);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn zero_predicates_is_a_valid_noop() {
        let t = roi_table();
        let (out, errors) = filter_table(&t, &[]);
        assert_eq!(out, t);
        assert!(errors.is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let t = demo_table();
        let preds = [
            Predicate::new("dev_sold_pct", CmpOp::Eq, "100"),
            Predicate::new("roi", CmpOp::Ge, "10"),
        ];
        let (once, _) = filter_table(&t, &preds);
        let (twice, errors) = filter_table(&once, &preds);
        assert_eq!(once, twice);
        assert!(errors.is_empty());
    }

    #[test]
    fn null_cells_fail_every_comparison_but_ne() {
        let t = Table::from_columns(vec![(
            "roi".to_string(),
            vec![CellValue::Null, CellValue::Float(5.0)],
        )])
        .unwrap();

        let (eq, _) = filter_table(&t, &[Predicate::new("roi", CmpOp::Eq, "5")]);
        assert_eq!(eq.len(), 1);
        let (lt, _) = filter_table(&t, &[Predicate::new("roi", CmpOp::Lt, "100")]);
        assert_eq!(lt.len(), 1);
        let (ne, _) = filter_table(&t, &[Predicate::new("roi", CmpOp::Ne, "5")]);
        assert_eq!(ne.len(), 1);
        assert!(ne.get(0, "roi").is_null());
    }

    #[test]
    fn operators_keep_distinct_symbols() {
        let mut symbols: Vec<&str> = CmpOp::ALL.iter().map(|o| o.symbol()).collect();
        symbols.dedup();
        assert_eq!(symbols.len(), 6);
    }
}
