//! CSV format.

use barmill_types::{Bar, Tick};
use bytes::Bytes;
use std::io::Write;

use crate::row::TickRow;
use crate::{FormatError, Formatter, TickReader};

/// Datetime layout used for CSV output.
const DATETIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Field delimiter.
const DELIMITER: u8 = b',';

const TICK_HEADER: [&str; 6] = ["timestamp", "datetime", "symbol", "price", "amount", "cost"];

const BAR_HEADER: [&str; 10] = [
    "group_key", "datetime", "symbol", "open", "high", "low", "close", "value", "volume", "win",
];

/// CSV formatter.
///
/// Output always carries a header row; fields containing the delimiter or
/// quotes are quoted so the output reads back unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    /// Creates a new CSV formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn writer<W: Write>(writer: W) -> ::csv::Writer<W> {
        ::csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .from_writer(writer)
    }
}

impl Formatter for CsvFormatter {
    fn write_ticks<W: Write + Send>(&self, ticks: &[Tick], writer: W) -> Result<(), FormatError> {
        let mut out = Self::writer(writer);
        out.write_record(TICK_HEADER)?;

        for tick in ticks {
            out.write_record([
                tick.timestamp.to_string(),
                tick.datetime.format(DATETIME_LAYOUT).to_string(),
                tick.symbol.clone(),
                tick.price.to_string(),
                tick.amount.to_string(),
                tick.cost.to_string(),
            ])?;
        }

        out.flush()?;
        Ok(())
    }

    fn write_bars<W: Write + Send>(&self, bars: &[Bar], writer: W) -> Result<(), FormatError> {
        let mut out = Self::writer(writer);
        out.write_record(BAR_HEADER)?;

        for bar in bars {
            out.write_record([
                bar.group_key.to_string(),
                bar.datetime.format(DATETIME_LAYOUT).to_string(),
                bar.symbol.clone(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.value.to_string(),
                bar.volume.to_string(),
                bar.win.to_string(),
            ])?;
        }

        out.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}

impl TickReader for CsvFormatter {
    fn read_ticks(&self, data: Bytes) -> Result<Vec<Tick>, FormatError> {
        let mut reader = ::csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .trim(::csv::Trim::All)
            .from_reader(data.as_ref());

        reader
            .deserialize::<TickRow>()
            .enumerate()
            .map(|(i, row)| row?.into_tick(i))
            .collect()
    }
}
