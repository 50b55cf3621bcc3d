use super::model::{CellValue, SchemaError, Table};
use super::{ATH_MARKET_CAP, SHORT_TERM_CHANGE, TREND_ALIGNMENT};

// ---------------------------------------------------------------------------
// Trend classification
// ---------------------------------------------------------------------------

/// Change above which a move counts as a strong uptrend (and below the
/// negated value, a strong downtrend).
pub const STRONG_MOVE: f64 = 0.02;

/// Symbolic 4-way bucket of the sequential percent change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// `+` change above [`STRONG_MOVE`].
    StrongUp,
    /// `-` change below −[`STRONG_MOVE`], and also the label for an
    /// undefined change. The source data conflates the two; callers that
    /// need to tell them apart must check `short_term_change` for Null.
    StrongDown,
    /// `<` change in [−STRONG_MOVE, 0).
    MildDown,
    /// `>` change in [0, STRONG_MOVE].
    FlatOrMildUp,
}

impl Trend {
    pub fn symbol(&self) -> &'static str {
        match self {
            Trend::StrongUp => "+",
            Trend::StrongDown => "-",
            Trend::MildDown => "<",
            Trend::FlatOrMildUp => ">",
        }
    }

    /// Human-readable name for legends and tooltips.
    pub fn describe(&self) -> &'static str {
        match self {
            Trend::StrongUp => "strong up",
            Trend::StrongDown => "strong down",
            Trend::MildDown => "mild down",
            Trend::FlatOrMildUp => "flat / mild up",
        }
    }

    /// All buckets in legend order.
    pub const ALL: [Trend; 4] = [
        Trend::StrongUp,
        Trend::StrongDown,
        Trend::MildDown,
        Trend::FlatOrMildUp,
    ];

    /// Bucket a sequential change, evaluated in fixed priority order.
    pub fn classify(change: Option<f64>) -> Trend {
        match change {
            None => Trend::StrongDown,
            Some(c) if c.is_nan() => Trend::StrongDown,
            Some(c) if c > STRONG_MOVE => Trend::StrongUp,
            Some(c) if c < -STRONG_MOVE => Trend::StrongDown,
            Some(c) if c < 0.0 => Trend::MildDown,
            Some(_) => Trend::FlatOrMildUp,
        }
    }
}

// ---------------------------------------------------------------------------
// Annotation
// ---------------------------------------------------------------------------

/// Append `short_term_change` and `trend_alignment` columns derived from
/// sequential change in `ath_market_cap`.
///
/// Row order is the time axis: no sort is performed, so callers must hand
/// in rows already in chronological order if that matters. The change for
/// row 0 is Null, as it is for any row whose previous market cap is
/// missing, non-numeric, or zero; Null changes get the `-` label.
pub fn annotate_trend(table: &Table) -> Result<Table, SchemaError> {
    let mut changes = Vec::with_capacity(table.len());
    let mut labels = Vec::with_capacity(table.len());

    let mut prev: Option<f64> = None;
    for row in table.rows() {
        let cur = row.get(ATH_MARKET_CAP).and_then(CellValue::as_f64);
        let change = match (prev, cur) {
            (Some(p), Some(c)) if p != 0.0 => Some((c - p) / p),
            _ => None,
        };
        changes.push(match change {
            Some(c) => CellValue::Float(c),
            None => CellValue::Null,
        });
        labels.push(CellValue::String(
            Trend::classify(change).symbol().to_string(),
        ));
        prev = cur;
    }

    table
        .with_column(SHORT_TERM_CHANGE, changes)?
        .with_column(TREND_ALIGNMENT, labels)
}
