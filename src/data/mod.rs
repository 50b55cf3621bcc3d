/// Data layer: core types, loading, and the signal pipeline.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv  (or the built-in demo set)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  trend    │  append short_term_change + trend_alignment
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply user predicates → narrowed Table + errors
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ blacklist │  weak signals, padded from the pre-filter pool
///   └──────────┘
///        │
///        ▼
///   report / export  (aggregates, CSV)
/// ```
///
/// Every stage returns a new `Table`; the pre-filter table stays valid so
/// the blacklist can pad from it.
pub mod blacklist;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod report;
pub mod trend;

// Canonical column names of a signal table. The filter works over whatever
// columns a file brings in; these are the ones the pipeline itself reads
// or derives.
pub const TIME_CREATED: &str = "time_created";
pub const DEV_BOUGHT: &str = "dev_bought_own_token";
pub const DEV_SOLD_PCT: &str = "dev_sold_pct";
pub const ATH_MARKET_CAP: &str = "ath_market_cap";
pub const ROI: &str = "roi";
pub const X_MULTIPLE: &str = "x_multiple";
pub const SHORT_TERM_CHANGE: &str = "short_term_change";
pub const TREND_ALIGNMENT: &str = "trend_alignment";
