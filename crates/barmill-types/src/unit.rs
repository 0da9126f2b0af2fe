//! Bar sampling clock definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::BarmillError;

/// The monotone measure that decides bucket membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BarUnit {
    /// Elapsed time, measured on the tick `timestamp` clock.
    #[default]
    #[serde(alias = "milliseconds")]
    Time,
    /// Number of ticks.
    Tick,
    /// Cumulative traded value (sum of `cost`).
    #[serde(alias = "dollar")]
    Value,
    /// Cumulative traded volume (sum of `amount`).
    Volume,
}

impl BarUnit {
    /// Returns the unit as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Tick => "tick",
            Self::Value => "value",
            Self::Volume => "volume",
        }
    }

    /// Returns all available units.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Time, Self::Tick, Self::Value, Self::Volume]
    }
}

impl std::fmt::Display for BarUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BarUnit {
    type Err = BarmillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "time" | "milliseconds" | "ms" | "timestamp" => Ok(Self::Time),
            "tick" | "ticks" => Ok(Self::Tick),
            "value" | "dollar" | "notional" | "cost" => Ok(Self::Value),
            "volume" | "amount" => Ok(Self::Volume),
            _ => Err(BarmillError::UnknownUnit(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_parse() {
        assert_eq!("time".parse::<BarUnit>().unwrap(), BarUnit::Time);
        assert_eq!("Milliseconds".parse::<BarUnit>().unwrap(), BarUnit::Time);
        assert_eq!("dollar".parse::<BarUnit>().unwrap(), BarUnit::Value);
        assert_eq!("VOLUME".parse::<BarUnit>().unwrap(), BarUnit::Volume);
        assert_eq!("ticks".parse::<BarUnit>().unwrap(), BarUnit::Tick);
    }

    #[test]
    fn test_unit_parse_unknown() {
        let err = "fortnight".parse::<BarUnit>().unwrap_err();
        assert_eq!(err, BarmillError::UnknownUnit("fortnight".to_string()));
    }

    #[test]
    fn test_unit_serde_aliases() {
        let unit: BarUnit = serde_json::from_str("\"dollar\"").unwrap();
        assert_eq!(unit, BarUnit::Value);
        assert_eq!(serde_json::to_string(&BarUnit::Tick).unwrap(), "\"tick\"");
    }
}
