//! The `aggregate` task.

use barmill_aggregate::BarAggregator;
use barmill_types::{BarUnit, Frame, FrameKind};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::{ConfiguredTask, DF_ARG, Task, TaskArgs, TaskError, TaskOutput};

/// Configuration of [`AggregateTask`].
///
/// Omitted fields fall back to hourly time bars.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregateConfig {
    /// Sampling clock: `time`, `tick`, `value` or `volume`, or an alias.
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Bucket width in units of the clock.
    #[serde(default = "default_quantity")]
    pub quantity: f64,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self { unit: default_unit(), quantity: default_quantity() }
    }
}

fn default_unit() -> String {
    BarUnit::default().as_str().to_string()
}

fn default_quantity() -> f64 {
    BarAggregator::default().quantity()
}

/// Turns the injected tick table into bars.
#[derive(Debug)]
pub struct AggregateTask {
    aggregator: BarAggregator,
    created_at: DateTime<Utc>,
}

impl AggregateTask {
    /// Returns the configured aggregator.
    #[must_use]
    pub const fn aggregator(&self) -> &BarAggregator {
        &self.aggregator
    }
}

impl ConfiguredTask for AggregateTask {
    const NAME: &'static str = "aggregate";
    type Config = AggregateConfig;

    fn from_config(config: Self::Config) -> Result<Self, TaskError> {
        let aggregator = BarAggregator::parse(&config.unit, config.quantity)?;
        Ok(Self { aggregator, created_at: Utc::now() })
    }
}

impl Task for AggregateTask {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn execute(&mut self, mut args: TaskArgs) -> Result<TaskOutput, TaskError> {
        let frame = args.take_df().ok_or_else(|| TaskError::missing(Self::NAME, DF_ARG))?;
        let ticks = match frame {
            Frame::Ticks(ticks) => ticks,
            other => {
                return Err(TaskError::UnexpectedFrame {
                    task: Self::NAME.to_string(),
                    expected: FrameKind::Ticks,
                    found: other.kind(),
                });
            }
        };

        let bars = self.aggregator.aggregate(&ticks);
        info!(
            unit = %self.aggregator.unit(),
            quantity = self.aggregator.quantity(),
            ticks = ticks.len(),
            bars = bars.len(),
            "aggregated ticks"
        );
        Ok(TaskOutput::Frame(Frame::Bars(bars)))
    }
}
