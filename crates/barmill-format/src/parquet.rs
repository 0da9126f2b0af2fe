//! Apache Parquet format.

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, StringArray,
    TimestampMillisecondArray,
};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Field, Float64Type, Int64Type, Schema, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType,
};
use arrow::record_batch::RecordBatch;
use barmill_types::{Bar, Tick, datetime_from_millis};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

use crate::row::finite;
use crate::{FormatError, Formatter, TickReader, parse_datetime};

/// Parquet formatter.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    fn datetime_field() -> Field {
        Field::new(
            "datetime",
            DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
            false,
        )
    }

    /// Creates the Arrow schema for tick data.
    fn tick_schema() -> Schema {
        Schema::new(vec![
            Field::new("timestamp", DataType::Int64, false),
            Self::datetime_field(),
            Field::new("symbol", DataType::Utf8, false),
            Field::new("price", DataType::Float64, false),
            Field::new("amount", DataType::Float64, false),
            Field::new("cost", DataType::Float64, false),
        ])
    }

    /// Creates the Arrow schema for bar data.
    fn bar_schema() -> Schema {
        Schema::new(vec![
            Field::new("group_key", DataType::Int64, false),
            Self::datetime_field(),
            Field::new("symbol", DataType::Utf8, false),
            Field::new("open", DataType::Float64, false),
            Field::new("high", DataType::Float64, false),
            Field::new("low", DataType::Float64, false),
            Field::new("close", DataType::Float64, false),
            Field::new("value", DataType::Float64, false),
            Field::new("volume", DataType::Float64, false),
            Field::new("win", DataType::Boolean, false),
        ])
    }

    fn datetime_array(datetimes: impl Iterator<Item = DateTime<Utc>>) -> ArrayRef {
        let millis: Vec<_> = datetimes.map(|dt| dt.timestamp_millis()).collect();
        Arc::new(TimestampMillisecondArray::from(millis).with_timezone("UTC"))
    }

    /// Converts ticks to Arrow RecordBatch.
    fn ticks_to_batch(ticks: &[Tick]) -> Result<RecordBatch, FormatError> {
        let timestamps: Vec<_> = ticks.iter().map(|t| t.timestamp).collect();
        let symbols: Vec<_> = ticks.iter().map(|t| t.symbol.as_str()).collect();
        let prices: Vec<_> = ticks.iter().map(|t| t.price).collect();
        let amounts: Vec<_> = ticks.iter().map(|t| t.amount).collect();
        let costs: Vec<_> = ticks.iter().map(|t| t.cost).collect();

        RecordBatch::try_new(
            Arc::new(Self::tick_schema()),
            vec![
                Arc::new(Int64Array::from(timestamps)),
                Self::datetime_array(ticks.iter().map(|t| t.datetime)),
                Arc::new(StringArray::from(symbols)),
                Arc::new(Float64Array::from(prices)),
                Arc::new(Float64Array::from(amounts)),
                Arc::new(Float64Array::from(costs)),
            ],
        )
        .map_err(|e| FormatError::Parquet(e.to_string()))
    }

    /// Converts bars to Arrow RecordBatch.
    fn bars_to_batch(bars: &[Bar]) -> Result<RecordBatch, FormatError> {
        let group_keys: Vec<_> = bars.iter().map(|b| b.group_key).collect();
        let symbols: Vec<_> = bars.iter().map(|b| b.symbol.as_str()).collect();
        let opens: Vec<_> = bars.iter().map(|b| b.open).collect();
        let highs: Vec<_> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<_> = bars.iter().map(|b| b.low).collect();
        let closes: Vec<_> = bars.iter().map(|b| b.close).collect();
        let values: Vec<_> = bars.iter().map(|b| b.value).collect();
        let volumes: Vec<_> = bars.iter().map(|b| b.volume).collect();
        let wins: Vec<_> = bars.iter().map(|b| b.win).collect();

        RecordBatch::try_new(
            Arc::new(Self::bar_schema()),
            vec![
                Arc::new(Int64Array::from(group_keys)),
                Self::datetime_array(bars.iter().map(|b| b.datetime)),
                Arc::new(StringArray::from(symbols)),
                Arc::new(Float64Array::from(opens)),
                Arc::new(Float64Array::from(highs)),
                Arc::new(Float64Array::from(lows)),
                Arc::new(Float64Array::from(closes)),
                Arc::new(Float64Array::from(values)),
                Arc::new(Float64Array::from(volumes)),
                Arc::new(BooleanArray::from(wins)),
            ],
        )
        .map_err(|e| FormatError::Parquet(e.to_string()))
    }

    /// Writes record batches built from `rows` in row-group sized chunks.
    fn write_chunks<T, W, F>(
        &self,
        rows: &[T],
        schema: Schema,
        writer: W,
        to_batch: F,
    ) -> Result<(), FormatError>
    where
        W: Write + Send,
        F: Fn(&[T]) -> Result<RecordBatch, FormatError>,
    {
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, Arc::new(schema), Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in rows.chunks(self.row_group_size.max(1)) {
            let batch = to_batch(chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }
}

impl Formatter for ParquetFormatter {
    fn write_ticks<W: Write + Send>(&self, ticks: &[Tick], writer: W) -> Result<(), FormatError> {
        self.write_chunks(ticks, Self::tick_schema(), writer, Self::ticks_to_batch)
    }

    fn write_bars<W: Write + Send>(&self, bars: &[Bar], writer: W) -> Result<(), FormatError> {
        self.write_chunks(bars, Self::bar_schema(), writer, Self::bars_to_batch)
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}

impl TickReader for ParquetFormatter {
    fn read_ticks(&self, data: Bytes) -> Result<Vec<Tick>, FormatError> {
        let reader = ParquetRecordBatchReaderBuilder::try_new(data)
            .and_then(|builder| builder.build())
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        let mut ticks = Vec::new();
        for batch in reader {
            let batch = batch.map_err(|e| FormatError::Parquet(e.to_string()))?;
            let offset = ticks.len();
            ticks.extend(batch_to_ticks(&batch, offset)?);
        }
        Ok(ticks)
    }
}

/// Decodes one record batch into ticks. `offset` is the row number of the
/// batch's first row, used in error messages.
fn batch_to_ticks(batch: &RecordBatch, offset: usize) -> Result<Vec<Tick>, FormatError> {
    let timestamps = timestamp_values(required(batch, "timestamp")?, offset)?;
    let symbols = string_values(required(batch, "symbol")?, "symbol", offset)?;
    let prices = float_values(required(batch, "price")?, "price", offset)?;
    let amounts = float_values(required(batch, "amount")?, "amount", offset)?;
    let costs = match batch.column_by_name("cost") {
        Some(array) => Some(cast_column(array, &DataType::Float64, "cost", offset)?),
        None => None,
    };
    let datetimes = match batch.column_by_name("datetime") {
        Some(array) => datetime_values(array, offset)?,
        None => timestamps.iter().map(|&ts| datetime_from_millis(ts)).collect(),
    };

    let mut ticks = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let price = finite("price", offset + row, prices[row])?;
        let amount = finite("amount", offset + row, amounts[row])?;
        let cost = match &costs {
            Some(array) if !array.is_null(row) => array.as_primitive::<Float64Type>().value(row),
            _ => price * amount,
        };
        let cost = finite("cost", offset + row, cost)?;
        ticks.push(Tick::new(
            timestamps[row],
            datetimes[row],
            symbols[row].clone(),
            price,
            amount,
            cost,
        ));
    }
    Ok(ticks)
}

fn required<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, FormatError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| FormatError::MissingColumn(name.to_string()))
}

fn arrow_error(e: arrow::error::ArrowError) -> FormatError {
    FormatError::Parquet(e.to_string())
}

fn ensure_no_nulls(array: &dyn Array, column: &str, offset: usize) -> Result<(), FormatError> {
    if array.null_count() == 0 {
        return Ok(());
    }
    let row = (0..array.len()).find(|&i| array.is_null(i)).unwrap_or(0);
    Err(FormatError::InvalidValue {
        column: column.to_string(),
        row: offset + row,
        reason: "null value".to_string(),
    })
}

/// Casts `array` to `to`, failing on any value the cast cannot represent.
///
/// A lenient cast maps unparseable values to null; those rows are reported
/// instead of being read as defaults. Nulls already present in the source
/// pass through.
fn cast_column(
    array: &ArrayRef,
    to: &DataType,
    column: &str,
    offset: usize,
) -> Result<ArrayRef, FormatError> {
    let converted = cast(array, to).map_err(arrow_error)?;
    if converted.null_count() != array.null_count() {
        let lost = (0..array.len()).find(|&i| converted.is_null(i) && !array.is_null(i));
        if let Some(row) = lost {
            return Err(FormatError::InvalidValue {
                column: column.to_string(),
                row: offset + row,
                reason: format!("cannot convert {} to {to}", array.data_type()),
            });
        }
    }
    Ok(converted)
}

/// Casts a required column, rejecting nulls in the result.
fn cast_required(
    array: &ArrayRef,
    to: &DataType,
    column: &str,
    offset: usize,
) -> Result<ArrayRef, FormatError> {
    let converted = cast_column(array, to, column, offset)?;
    ensure_no_nulls(converted.as_ref(), column, offset)?;
    Ok(converted)
}

/// Reads the `timestamp` column as epoch milliseconds.
fn timestamp_values(array: &ArrayRef, offset: usize) -> Result<Vec<i64>, FormatError> {
    match array.data_type() {
        DataType::Timestamp(_, tz) => {
            let to = DataType::Timestamp(TimeUnit::Millisecond, tz.clone());
            let millis = cast_required(array, &to, "timestamp", offset)?;
            Ok(millis
                .as_primitive::<TimestampMillisecondType>()
                .values()
                .to_vec())
        }
        _ => {
            let ints = cast_required(array, &DataType::Int64, "timestamp", offset)?;
            Ok(ints.as_primitive::<Int64Type>().values().to_vec())
        }
    }
}

fn float_values(array: &ArrayRef, column: &str, offset: usize) -> Result<Vec<f64>, FormatError> {
    let floats = cast_required(array, &DataType::Float64, column, offset)?;
    Ok(floats.as_primitive::<Float64Type>().values().to_vec())
}

fn string_values(
    array: &ArrayRef,
    column: &str,
    offset: usize,
) -> Result<Vec<String>, FormatError> {
    let strings = cast_required(array, &DataType::Utf8, column, offset)?;
    Ok(strings
        .as_string::<i32>()
        .iter()
        .map(|s| s.unwrap_or_default().to_string())
        .collect())
}

/// Reads the `datetime` column, accepting timestamp or string encodings.
fn datetime_values(array: &ArrayRef, offset: usize) -> Result<Vec<DateTime<Utc>>, FormatError> {
    ensure_no_nulls(array.as_ref(), "datetime", offset)?;
    match array.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            string_values(array, "datetime", offset)?
                .iter()
                .map(|s| parse_datetime(s))
                .collect()
        }
        other => {
            let tz = match other {
                DataType::Timestamp(_, tz) => tz.clone(),
                _ => None,
            };
            let to = DataType::Timestamp(TimeUnit::Microsecond, tz);
            let micros = cast_required(array, &to, "datetime", offset)?;
            Ok(micros
                .as_primitive::<TimestampMicrosecondType>()
                .values()
                .iter()
                .map(|&us| DateTime::from_timestamp_micros(us).unwrap_or_default())
                .collect())
        }
    }
}
