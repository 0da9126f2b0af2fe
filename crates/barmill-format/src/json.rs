//! JSON format.

use barmill_types::{Bar, Tick};
use bytes::Bytes;
use std::io::Write;

use crate::row::TickRow;
use crate::{FormatError, Formatter, TickReader};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (only for array style).
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Writes any serializable rows in the configured style.
    fn write_rows<T: serde::Serialize, W: Write>(
        &self,
        rows: &[T],
        mut writer: W,
    ) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, rows)?;
                } else {
                    serde_json::to_writer(&mut writer, rows)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for row in rows {
                    serde_json::to_writer(&mut writer, row)?;
                    writeln!(writer)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn write_ticks<W: Write + Send>(&self, ticks: &[Tick], writer: W) -> Result<(), FormatError> {
        self.write_rows(ticks, writer)
    }

    fn write_bars<W: Write + Send>(&self, bars: &[Bar], writer: W) -> Result<(), FormatError> {
        self.write_rows(bars, writer)
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

impl TickReader for JsonFormatter {
    fn read_ticks(&self, data: Bytes) -> Result<Vec<Tick>, FormatError> {
        let rows: Vec<TickRow> = match self.style {
            JsonStyle::Array => serde_json::from_slice(&data)?,
            JsonStyle::Ndjson => serde_json::Deserializer::from_slice(&data)
                .into_iter::<TickRow>()
                .collect::<Result<_, _>>()?,
        };
        rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| row.into_tick(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barmill_types::datetime_from_millis;
    use std::io::Cursor;

    fn create_test_tick() -> Tick {
        Tick::from_trade(1_705_321_845_000, "ETH/USDT", 1.5, 2.0)
    }

    #[test]
    fn test_json_array() {
        let formatter = JsonFormatter::new();
        let ticks = vec![create_test_tick()];
        let mut output = Cursor::new(Vec::new());

        formatter.write_ticks(&ticks, &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.starts_with('['));
        assert!(result.contains("\"price\":1.5"));
    }

    #[test]
    fn test_ndjson_bars() {
        let formatter = JsonFormatter::ndjson();
        let bar = Bar::new(0, datetime_from_millis(0), "X", 1.0, 2.0, 1.0, 2.0, 3.0, 2.0);
        let mut output = Cursor::new(Vec::new());

        formatter.write_bars(&[bar.clone(), bar], &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"win\":true"));
    }

    #[test]
    fn test_pretty_json() {
        let formatter = JsonFormatter::new().with_pretty(true);
        let ticks = vec![create_test_tick()];
        let mut output = Cursor::new(Vec::new());

        formatter.write_ticks(&ticks, &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.contains('\n'));
        assert!(result.contains("  "));
    }

    #[test]
    fn test_read_written_ticks() {
        for formatter in [JsonFormatter::new(), JsonFormatter::ndjson()] {
            let ticks = vec![create_test_tick(), Tick::from_trade(5, "BTC/USD", 3.0, 1.0)];
            let mut output = Vec::new();
            formatter.write_ticks(&ticks, &mut output).unwrap();

            let read = formatter.read_ticks(Bytes::from(output)).unwrap();
            assert_eq!(read, ticks);
        }
    }

    #[test]
    fn test_read_without_optional_fields() {
        let data = Bytes::from_static(br#"[{"timestamp":10,"symbol":"X","price":2,"amount":4}]"#);
        let ticks = JsonFormatter::new().read_ticks(data).unwrap();
        assert_eq!(ticks[0].cost, 8.0);
        assert_eq!(ticks[0].datetime, datetime_from_millis(10));
    }
}
