//! Record builder: normalize a provider snapshot into a [`QuoteRecord`].

use crate::{DailySnapshot, QuoteRecord, UtcDateTime};

/// Round a price to 2 fractional digits, half away from zero on the
/// ×100-scaled value. This is the pinned rounding rule for stored prices.
pub fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Build the canonical quote record for the current run.
///
/// The timestamp is the wall-clock UTC instant of processing: it marks when
/// the observation was recorded, not when the session traded.
pub fn build_record(snapshot: &DailySnapshot) -> QuoteRecord {
    QuoteRecord {
        ticker: snapshot.symbol.clone(),
        price: round_price(snapshot.close),
        volume: snapshot.volume,
        observed_at: UtcDateTime::now(),
    }
}
