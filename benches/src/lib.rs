//! Benchmark utilities for barmill.

use barmill_lib::{CsvFormatter, Formatter, Tick};

/// Configuration for generated tick data.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Number of ticks to generate.
    pub count: usize,
    /// Seed for the pseudo-random walk.
    pub seed: u64,
    /// Largest gap between consecutive timestamps, in milliseconds.
    pub max_gap_ms: u64,
    /// Starting price.
    pub start_price: f64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            count: 100_000,
            seed: 42,
            max_gap_ms: 500,
            start_price: 2_000.0,
        }
    }
}

/// Minimal linear congruential generator, enough for reproducible data.
#[derive(Debug, Clone)]
struct Lcg(u64);

impl Lcg {
    const fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn unit(&mut self) -> f64 {
        self.next_u64() as f64 / (1u64 << 31) as f64
    }
}

/// Generates a reproducible random-walk tick series with irregular spacing.
pub fn synthetic_ticks(config: &TickConfig) -> Vec<Tick> {
    let mut rng = Lcg(config.seed);
    let mut timestamp = 1_700_000_000_000_i64;
    let mut price = config.start_price;

    (0..config.count)
        .map(|_| {
            timestamp += (rng.next_u64() % config.max_gap_ms.max(1)) as i64;
            price = (price * (1.0 + (rng.unit() - 0.5) * 0.001)).max(0.01);
            let amount = 0.01 + rng.unit() * 2.0;
            Tick::from_trade(timestamp, "ETH/USDT", price, amount)
        })
        .collect()
}

/// Encodes ticks as CSV, the way a `read` step would find them in storage.
pub fn ticks_to_csv(ticks: &[Tick]) -> Vec<u8> {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = CsvFormatter::new().write_ticks(ticks, &mut buffer);
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_ticks_reproducible() {
        let config = TickConfig {
            count: 1_000,
            ..Default::default()
        };
        let a = synthetic_ticks(&config);
        let b = synthetic_ticks(&config);

        assert_eq!(a.len(), 1_000);
        assert_eq!(a, b);
        assert!(a.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(a.iter().all(|t| t.price > 0.0 && t.amount > 0.0));
    }

    #[test]
    fn test_ticks_to_csv() {
        let ticks = synthetic_ticks(&TickConfig {
            count: 3,
            ..Default::default()
        });
        let csv = String::from_utf8(ticks_to_csv(&ticks)).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }
}
