use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Symbol, UtcDateTime, ValidationError};

/// Latest one-day trading snapshot as returned by a market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub symbol: Symbol,
    /// Calendar date of the trading session the snapshot belongs to.
    pub session_date: Date,
    /// Closing price, as reported (not yet rounded).
    pub close: f64,
    /// Traded volume for the session.
    pub volume: u64,
}

impl DailySnapshot {
    pub fn new(
        symbol: Symbol,
        session_date: Date,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("close", close)?;

        Ok(Self {
            symbol,
            session_date,
            close,
            volume,
        })
    }
}

/// Canonical quote record, written once per run and never mutated.
///
/// `observed_at` marks when the record was built ("when recorded"), not the
/// trading session the price belongs to; the session date travels separately
/// with the snapshot into the tabular history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub ticker: Symbol,
    /// Closing price rounded to 2 fractional digits.
    pub price: f64,
    pub volume: u64,
    pub observed_at: UtcDateTime,
}

/// One row of the cumulative per-ticker history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub price: f64,
    pub volume: u64,
    pub date: Date,
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
