//! Whole-table tick-to-bar aggregation.

use barmill_types::{Bar, BarUnit, BarmillError, Result, Tick};
use tracing::debug;

use crate::BarSampler;

/// Default bucket width: one hour on the millisecond clock.
const DEFAULT_QUANTITY: f64 = 3_600_000.0;

/// Builds bars from a tick table.
///
/// Ticks are stably sorted by `timestamp`, bucketed by
/// `floor(measure / quantity)` and each run of equal buckets becomes one bar.
/// Bars are returned ordered by `datetime`.
///
/// A measure value that is an exact multiple of `quantity` starts the bucket
/// with that index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarAggregator {
    unit: BarUnit,
    quantity: f64,
}

impl Default for BarAggregator {
    fn default() -> Self {
        Self {
            unit: BarUnit::Time,
            quantity: DEFAULT_QUANTITY,
        }
    }
}

impl BarAggregator {
    /// Creates an aggregator for the given unit and bucket width.
    ///
    /// # Errors
    ///
    /// Returns [`BarmillError::InvalidQuantity`] unless `quantity` is finite
    /// and strictly positive.
    pub fn new(unit: BarUnit, quantity: f64) -> Result<Self> {
        if !(quantity.is_finite() && quantity > 0.0) {
            return Err(BarmillError::InvalidQuantity(quantity));
        }
        Ok(Self { unit, quantity })
    }

    /// Creates an aggregator from a unit name such as `"time"` or `"dollar"`.
    ///
    /// # Errors
    ///
    /// Returns [`BarmillError::UnknownUnit`] for an unrecognized unit and
    /// [`BarmillError::InvalidQuantity`] for a non-positive width.
    pub fn parse(unit: &str, quantity: f64) -> Result<Self> {
        Self::new(unit.parse()?, quantity)
    }

    /// Returns the measure driving the buckets.
    #[must_use]
    pub const fn unit(&self) -> BarUnit {
        self.unit
    }

    /// Returns the bucket width.
    #[must_use]
    pub const fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Returns a streaming sampler for timestamp-ordered ticks.
    #[must_use]
    pub const fn sampler(&self) -> BarSampler {
        BarSampler::new(self.unit, self.quantity)
    }

    /// Computes the bucket index of every tick, in the given order.
    ///
    /// The ticks are expected to be sorted by `timestamp`.
    #[must_use]
    pub fn bucket_keys(&self, ticks: &[Tick]) -> Vec<i64> {
        let mut sampler = self.sampler();
        ticks.iter().map(|tick| sampler.bucket_for(tick)).collect()
    }

    /// Aggregates a tick table into bars.
    ///
    /// An empty table yields no bars.
    #[must_use]
    pub fn aggregate(&self, ticks: &[Tick]) -> Vec<Bar> {
        let mut order: Vec<usize> = (0..ticks.len()).collect();
        order.sort_by_key(|&i| ticks[i].timestamp);

        let mut sampler = self.sampler();
        let mut bars = Vec::new();
        for &i in &order {
            if let Some(bar) = sampler.process(&ticks[i]) {
                bars.push(bar);
            }
        }
        if let Some(bar) = sampler.finish() {
            bars.push(bar);
        }

        bars.sort_by_key(|bar| bar.datetime);

        debug!(
            unit = %self.unit,
            quantity = self.quantity,
            ticks = ticks.len(),
            bars = bars.len(),
            "aggregated ticks into bars"
        );
        bars
    }
}
