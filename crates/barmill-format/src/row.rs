//! Row-oriented tick decoding shared by the text formats.

use barmill_types::{Tick, datetime_from_millis};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::FormatError;

/// Naive layouts accepted after RFC 3339; interpreted as UTC.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// A tick as it appears in CSV or JSON input.
#[derive(Debug, Deserialize)]
pub(crate) struct TickRow {
    timestamp: i64,
    #[serde(default)]
    datetime: Option<String>,
    symbol: String,
    price: f64,
    amount: f64,
    #[serde(default)]
    cost: Option<f64>,
}

impl TickRow {
    /// Converts the row into a tick, filling in the optional columns.
    /// `row` is the zero-based record number, used in error messages.
    pub(crate) fn into_tick(self, row: usize) -> Result<Tick, FormatError> {
        let datetime = match self.datetime.as_deref() {
            Some(s) if !s.trim().is_empty() => parse_datetime(s)?,
            _ => datetime_from_millis(self.timestamp),
        };
        let price = finite("price", row, self.price)?;
        let amount = finite("amount", row, self.amount)?;
        let cost = match self.cost {
            Some(cost) => finite("cost", row, cost)?,
            None => finite("cost", row, price * amount)?,
        };
        Ok(Tick::new(
            self.timestamp,
            datetime,
            self.symbol,
            price,
            amount,
            cost,
        ))
    }
}

/// Rejects NaN and infinite tick values.
pub(crate) fn finite(column: &str, row: usize, value: f64) -> Result<f64, FormatError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormatError::InvalidValue {
            column: column.to_string(),
            row,
            reason: format!("{value} is not a finite number"),
        })
    }
}

/// Parses a display datetime.
///
/// Accepts RFC 3339 (with offset) and naive `YYYY-MM-DD HH:MM:SS[.f]`
/// layouts, the latter read as UTC.
///
/// # Errors
///
/// Returns [`FormatError::InvalidDatetime`] if no layout matches.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, FormatError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| FormatError::InvalidDatetime(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_datetime("2020-05-01T01:02:03.000Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2020, 5, 1, 1, 2, 3).unwrap());

        let offset = parse_datetime("2020-05-01T03:02:03+02:00").unwrap();
        assert_eq!(offset, dt);
    }

    #[test]
    fn test_parse_naive() {
        let expected = Utc.with_ymd_and_hms(2020, 5, 1, 1, 2, 3).unwrap();
        assert_eq!(parse_datetime("2020-05-01 01:02:03").unwrap(), expected);
        assert_eq!(parse_datetime("2020-05-01T01:02:03").unwrap(), expected);
        assert!(parse_datetime("2020-05-01 01:02:03.250").is_ok());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            parse_datetime("yesterday"),
            Err(FormatError::InvalidDatetime(_))
        ));
    }

    #[test]
    fn test_row_defaults() {
        let row = TickRow {
            timestamp: 1_000,
            datetime: None,
            symbol: "ETH/USDT".to_string(),
            price: 2.0,
            amount: 3.0,
            cost: None,
        };
        let tick = row.into_tick(0).unwrap();
        assert_eq!(tick.datetime, datetime_from_millis(1_000));
        assert!((tick.cost - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_row_rejects_non_finite() {
        let row = |price: f64, amount: f64, cost: Option<f64>| TickRow {
            timestamp: 0,
            datetime: None,
            symbol: "X".to_string(),
            price,
            amount,
            cost,
        };

        let err = row(f64::NAN, 1.0, None).into_tick(4).unwrap_err();
        assert!(matches!(
            err,
            FormatError::InvalidValue { ref column, row: 4, .. } if column == "price"
        ));

        let err = row(5.0, 1.0, Some(f64::INFINITY)).into_tick(2).unwrap_err();
        assert!(matches!(
            err,
            FormatError::InvalidValue { ref column, row: 2, .. } if column == "cost"
        ));

        // finite price and amount whose product overflows
        let err = row(f64::MAX, 2.0, None).into_tick(0).unwrap_err();
        assert!(matches!(err, FormatError::InvalidValue { ref column, .. } if column == "cost"));
    }
}
