use crate::color::TrendColors;
use crate::data::blacklist::{DEFAULT_MIN_SIZE, build_blacklist};
use crate::data::filter::{CmpOp, Predicate, PredicateError, filter_table};
use crate::data::model::Table;
use crate::data::report::{Summary, summarize};
use crate::data::trend::annotate_trend;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// `dataset` is the trend-annotated table; `filtered` and `blacklist` are
/// recomputed from it on every [`AppState::apply_filters`], never mutated in
/// place. The predicate drafts live here only as form contents: each apply
/// passes a fresh copy of them into the filter.
pub struct AppState {
    /// Loaded dataset with derived trend columns (None until loaded).
    pub dataset: Option<Table>,

    /// Filter form rows, applied in order.
    pub predicates: Vec<Predicate>,

    /// Result of the last apply.
    pub filtered: Option<Table>,

    /// Per-predicate problems from the last apply (skipped, not fatal).
    pub filter_errors: Vec<PredicateError>,

    /// Weak signals padded up from the pre-filter pool.
    pub blacklist: Option<Table>,

    /// Minimum blacklist size the builder pads towards.
    pub min_blacklist_size: usize,

    /// Aggregates over the filtered table.
    pub summary: Option<Summary>,

    /// Optional display sort for the filtered table.
    pub sort_column: Option<String>,
    pub sort_ascending: bool,

    /// Chart/legend colours for the four trend buckets.
    pub trend_colors: TrendColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            predicates: Vec::new(),
            filtered: None,
            filter_errors: Vec::new(),
            blacklist: None,
            min_blacklist_size: DEFAULT_MIN_SIZE,
            summary: None,
            sort_column: None,
            sort_ascending: true,
            trend_colors: TrendColors::default(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded table: derive the trend columns, then rerun
    /// the whole pipeline with the current form contents.
    pub fn set_dataset(&mut self, raw: Table) {
        match annotate_trend(&raw) {
            Ok(annotated) => {
                self.dataset = Some(annotated);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("trend annotation failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.dataset = None;
            }
        }
        self.loading = false;
        self.apply_filters();
    }

    /// Append a blank filter row defaulting to the first column.
    pub fn add_predicate(&mut self) {
        let column = self
            .dataset
            .as_ref()
            .and_then(|ds| ds.columns().first().cloned())
            .unwrap_or_default();
        self.predicates.push(Predicate::new(column, CmpOp::Eq, ""));
    }

    pub fn remove_predicate(&mut self, index: usize) {
        if index < self.predicates.len() {
            self.predicates.remove(index);
        }
    }

    /// Rerun filter → blacklist → summary from the annotated dataset.
    pub fn apply_filters(&mut self) {
        let Some(dataset) = self.dataset.clone() else {
            self.filtered = None;
            self.filter_errors.clear();
            self.blacklist = None;
            self.summary = None;
            return;
        };

        let (mut filtered, errors) = filter_table(&dataset, &self.predicates);
        self.filter_errors = errors;

        // The blacklist pads from the pre-filter pool, in the pool's own
        // row order, so it is built before any display sort.
        match build_blacklist(&filtered, &dataset, self.min_blacklist_size) {
            Ok(blacklist) => self.blacklist = Some(blacklist),
            Err(e) => {
                log::error!("blacklist build failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.blacklist = None;
            }
        }

        if let Some(column) = self.sort_column.clone() {
            match filtered.sorted_by(&column, self.sort_ascending) {
                Ok(sorted) => filtered = sorted,
                // Column vanished with a new dataset; drop the sort.
                Err(_) => self.sort_column = None,
            }
        }

        self.summary = Some(summarize(&filtered));
        self.filtered = Some(filtered);
    }
}
