//! Canonical domain types for the collection pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated stock symbol |
//! | [`DailySnapshot`] | Latest one-day trading snapshot from a provider |
//! | [`QuoteRecord`] | Canonical record persisted to the structured store |
//! | [`HistoryRow`] | One row of the cumulative per-ticker table |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! All types enforce their invariants at construction time.

mod models;
mod symbol;
mod timestamp;

pub use models::{DailySnapshot, HistoryRow, QuoteRecord};
pub use symbol::Symbol;
pub use timestamp::{format_session_date, parse_session_date, UtcDateTime};
