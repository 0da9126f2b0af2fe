//! Trade tick representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Monotonic clock in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Display timestamp (UTC).
    pub datetime: DateTime<Utc>,
    /// Instrument identifier (e.g., "ETH/USDT").
    pub symbol: String,
    /// Trade price.
    pub price: f64,
    /// Traded quantity.
    pub amount: f64,
    /// Notional value of the trade.
    pub cost: f64,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub fn new(
        timestamp: i64,
        datetime: DateTime<Utc>,
        symbol: impl Into<String>,
        price: f64,
        amount: f64,
        cost: f64,
    ) -> Self {
        Self {
            timestamp,
            datetime,
            symbol: symbol.into(),
            price,
            amount,
            cost,
        }
    }

    /// Creates a tick whose datetime is derived from `timestamp` and whose
    /// cost is `price * amount`.
    #[must_use]
    pub fn from_trade(timestamp: i64, symbol: impl Into<String>, price: f64, amount: f64) -> Self {
        Self::new(
            timestamp,
            datetime_from_millis(timestamp),
            symbol,
            price,
            amount,
            price * amount,
        )
    }
}

/// Converts a millisecond epoch clock into a UTC datetime.
///
/// Out-of-range values map to the Unix epoch.
#[must_use]
pub fn datetime_from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}
