//! Streaming bucketing over timestamp-ordered ticks.

use barmill_types::{Bar, BarUnit, Tick};
use chrono::{DateTime, Utc};

/// Streaming bar sampler.
///
/// Maps each tick onto the configured measure and emits a bar whenever the
/// bucket index changes. Input must already be ordered by `timestamp`; the
/// measure is then non-decreasing and every bar covers a contiguous run.
#[derive(Debug)]
pub struct BarSampler {
    unit: BarUnit,
    quantity: f64,
    row: u64,
    running: f64,
    current_bar: Option<BarBuilder>,
}

impl BarSampler {
    /// Creates a sampler. The quantity is assumed to be validated by the caller.
    pub(crate) const fn new(unit: BarUnit, quantity: f64) -> Self {
        Self {
            unit,
            quantity,
            row: 0,
            running: 0.0,
            current_bar: None,
        }
    }

    /// Returns the bucket index the next tick falls into and advances the measure.
    pub fn bucket_for(&mut self, tick: &Tick) -> i64 {
        let measure = match self.unit {
            BarUnit::Time => {
                self.row += 1;
                return time_bucket(tick.timestamp, self.quantity);
            }
            BarUnit::Tick => self.row as f64,
            BarUnit::Value => {
                self.running += tick.cost;
                self.running
            }
            BarUnit::Volume => {
                self.running += tick.amount;
                self.running
            }
        };
        self.row += 1;
        (measure / self.quantity).floor() as i64
    }

    /// Processes a tick, potentially emitting a completed bar.
    ///
    /// Returns `Some(bar)` when this tick opens a new bucket,
    /// `None` otherwise.
    pub fn process(&mut self, tick: &Tick) -> Option<Bar> {
        let group_key = self.bucket_for(tick);

        match self.current_bar.take() {
            Some(mut builder) if builder.group_key == group_key => {
                builder.update(tick);
                self.current_bar = Some(builder);
                None
            }
            Some(builder) => {
                self.current_bar = Some(BarBuilder::new(group_key, tick));
                Some(builder.finish())
            }
            None => {
                self.current_bar = Some(BarBuilder::new(group_key, tick));
                None
            }
        }
    }

    /// Finishes sampling, returning the last open bar.
    #[must_use]
    pub fn finish(self) -> Option<Bar> {
        self.current_bar.map(BarBuilder::finish)
    }
}

/// Floor-divides an epoch timestamp by the bucket width.
///
/// Whole-number widths stay in integer arithmetic, exact for every `i64`
/// timestamp; fractional widths fall back to `f64`.
fn time_bucket(timestamp: i64, quantity: f64) -> i64 {
    // `i64::MAX as f64` rounds up to 2^63, which is itself out of range.
    if quantity.fract() == 0.0 && quantity < i64::MAX as f64 {
        timestamp.div_euclid(quantity as i64)
    } else {
        (timestamp as f64 / quantity).floor() as i64
    }
}

/// Running reduction of one bucket.
#[derive(Debug)]
struct BarBuilder {
    group_key: i64,
    datetime: DateTime<Utc>,
    symbol: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    value: f64,
    volume: f64,
}

impl BarBuilder {
    /// Creates a new builder from the first tick of a bucket.
    fn new(group_key: i64, tick: &Tick) -> Self {
        Self {
            group_key,
            datetime: tick.datetime,
            symbol: tick.symbol.clone(),
            open: tick.price,
            high: tick.price,
            low: tick.price,
            close: tick.price,
            value: tick.cost,
            volume: tick.amount,
        }
    }

    fn update(&mut self, tick: &Tick) {
        self.high = self.high.max(tick.price);
        self.low = self.low.min(tick.price);
        self.close = tick.price;
        self.datetime = tick.datetime;
        self.value += tick.cost;
        self.volume += tick.amount;
    }

    fn finish(self) -> Bar {
        Bar::new(
            self.group_key,
            self.datetime,
            self.symbol,
            self.open,
            self.high,
            self.low,
            self.close,
            self.value,
            self.volume,
        )
    }
}
