use super::model::{CellValue, Row, SchemaError, Table};
use super::{ROI, X_MULTIPLE};

// ---------------------------------------------------------------------------
// Blacklist: low-quality signals, padded to a minimum size
// ---------------------------------------------------------------------------

/// Minimum number of blacklist rows the builder pads towards.
pub const DEFAULT_MIN_SIZE: usize = 100;

fn numeric(row: &Row, column: &str) -> Option<f64> {
    row.get(column).and_then(CellValue::as_f64)
}

/// A filtered row qualifies as a blacklist candidate when its outcome is
/// weak on either axis, or its `roi` was never recorded.
fn is_candidate(row: &Row) -> bool {
    let weak_multiple = numeric(row, X_MULTIPLE).map(|x| x < 10.0).unwrap_or(false);
    match numeric(row, ROI) {
        None => true,
        Some(roi) => weak_multiple || roi < 10.0,
    }
}

/// Padding rows from the pool use a looser condition than candidate
/// extraction: a recorded `roi` below 10 alone does not qualify. The
/// asymmetry is observed source behaviour, kept on purpose.
fn is_padding(row: &Row) -> bool {
    let weak_multiple = numeric(row, X_MULTIPLE).map(|x| x < 10.0).unwrap_or(false);
    weak_multiple || numeric(row, ROI).is_none()
}

/// Build the blacklist: candidates from `filtered` (order preserved), padded
/// with the first matching rows of `pool` (in pool order) until `min_size`
/// is reached.
///
/// Padding is plain concatenation; a row present in both the candidate set
/// and the padding pool appears twice. A pool with too few matching rows
/// yields a short result and a logged warning, not an error. `SchemaError`
/// can only occur when `filtered` and `pool` have differing schemas.
pub fn build_blacklist(
    filtered: &Table,
    pool: &Table,
    min_size: usize,
) -> Result<Table, SchemaError> {
    let candidates = filtered.filter_rows(is_candidate);
    if candidates.len() >= min_size {
        return Ok(candidates);
    }

    let needed = min_size - candidates.len();
    let padding = pool.filter_rows(is_padding).head(needed);
    let blacklist = candidates.concat(&padding)?;

    if blacklist.len() < min_size {
        log::warn!(
            "blacklist has {} rows, short of the {} minimum (padding pool exhausted)",
            blacklist.len(),
            min_size
        );
    }
    Ok(blacklist)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One row per (x_multiple, roi) pair; roi None becomes Null.
    fn signals(rows: &[(f64, Option<f64>)]) -> Table {
        Table::from_columns(vec![
            (
                X_MULTIPLE.to_string(),
                rows.iter().map(|&(x, _)| CellValue::Float(x)).collect(),
            ),
            (
                ROI.to_string(),
                rows.iter()
                    .map(|&(_, roi)| match roi {
                        Some(r) => CellValue::Float(r),
                        None => CellValue::Null,
                    })
                    .collect(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn five_candidates_and_five_pool_rows_cap_at_ten() {
        // All five filtered rows qualify; the pool also has five matching
        // rows; min_size 100 is unreachable, so the result is exactly 10.
        let filtered = signals(&[(2.0, Some(5.0)); 5]);
        let pool = signals(&[(3.0, Some(50.0)); 5]);
        let out = build_blacklist(&filtered, &pool, DEFAULT_MIN_SIZE).unwrap();
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn no_padding_when_minimum_already_met() {
        let filtered = signals(&[(1.0, Some(1.0)); 4]);
        let pool = signals(&[(1.0, None); 4]);
        let out = build_blacklist(&filtered, &pool, 3).unwrap();
        assert_eq!(out.len(), 4);
        assert_eq!(out, filtered);
    }

    #[test]
    fn candidate_condition_is_the_stricter_variant() {
        let filtered = signals(&[
            (20.0, Some(5.0)),  // roi < 10 alone qualifies
            (5.0, Some(50.0)),  // x_multiple < 10 alone qualifies
            (20.0, None),       // missing roi qualifies
            (20.0, Some(50.0)), // strong on both axes: kept out
        ]);
        let pool = signals(&[]);
        let out = build_blacklist(&filtered, &pool, 0).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out.get(0, X_MULTIPLE), &CellValue::Float(20.0));
        assert_eq!(out.get(1, X_MULTIPLE), &CellValue::Float(5.0));
        assert!(out.get(2, ROI).is_null());
    }

    #[test]
    fn padding_uses_the_looser_condition() {
        // roi < 10 with a strong multiple qualifies as a candidate but NOT
        // as padding.
        let filtered = signals(&[]);
        let pool = signals(&[
            (20.0, Some(5.0)), // excluded from padding
            (5.0, Some(50.0)),
            (20.0, None),
        ]);
        let out = build_blacklist(&filtered, &pool, 10).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.get(0, X_MULTIPLE), &CellValue::Float(5.0));
        assert!(out.get(1, ROI).is_null());
    }

    #[test]
    fn padding_keeps_pool_order_and_duplicates() {
        let rows = [(1.0, Some(1.0)), (2.0, Some(2.0)), (3.0, Some(3.0))];
        let table = signals(&rows);
        // The filtered table IS the pool: every row comes back twice.
        let out = build_blacklist(&table, &table, 6).unwrap();
        assert_eq!(out.len(), 6);
        for (i, &(x, _)) in rows.iter().enumerate() {
            assert_eq!(out.get(i, X_MULTIPLE), &CellValue::Float(x));
            assert_eq!(out.get(i + 3, X_MULTIPLE), &CellValue::Float(x));
        }
    }

    #[test]
    fn padding_takes_only_what_is_needed() {
        let filtered = signals(&[(1.0, Some(1.0)); 2]);
        let pool = signals(&[(1.0, None); 10]);
        let out = build_blacklist(&filtered, &pool, 5).unwrap();
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn short_result_is_not_an_error() {
        let filtered = signals(&[]);
        let pool = signals(&[]);
        let out = build_blacklist(&filtered, &pool, 100).unwrap();
        assert!(out.is_empty());
    }
}
