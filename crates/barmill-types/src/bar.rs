//! Aggregated bar data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar built from one bucket of ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bucket index in the sampling measure.
    pub group_key: i64,
    /// Datetime of the last tick in the bucket.
    pub datetime: DateTime<Utc>,
    /// Symbol of the first tick in the bucket.
    pub symbol: String,
    /// Price of the first tick.
    pub open: f64,
    /// Highest price in the bucket.
    pub high: f64,
    /// Lowest price in the bucket.
    pub low: f64,
    /// Price of the last tick.
    pub close: f64,
    /// Sum of tick cost.
    pub value: f64,
    /// Sum of tick amount.
    pub volume: f64,
    /// True when the bar closed above its open.
    pub win: bool,
}

impl Bar {
    /// Creates a new bar. `win` is derived from `open` and `close`.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        group_key: i64,
        datetime: DateTime<Utc>,
        symbol: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        value: f64,
        volume: f64,
    ) -> Self {
        Self {
            group_key,
            datetime,
            symbol: symbol.into(),
            open,
            high,
            low,
            close,
            value,
            volume,
            win: close > open,
        }
    }
}
