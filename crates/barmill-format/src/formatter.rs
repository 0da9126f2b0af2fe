//! File format abstraction.

use barmill_types::{Bar, Frame, Tick};
use bytes::Bytes;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::{CsvFormatter, JsonFormatter};

/// File format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileFormat {
    /// Apache Parquet format.
    #[default]
    Parquet,
    /// CSV format.
    Csv,
    /// JSON array format.
    Json,
    /// Newline-delimited JSON format.
    Ndjson,
}

impl FileFormat {
    /// Returns the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Parquet => "parquet",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Parquet, Self::Csv, Self::Json, Self::Ndjson]
    }

    /// Determines the format from a file name's extension.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::UnsupportedExtension`] for a missing or unknown
    /// extension.
    pub fn from_path(filename: &str) -> Result<Self, FormatError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| FormatError::UnsupportedExtension(filename.to_string()))?;
        ext.parse()
            .map_err(|_| FormatError::UnsupportedExtension(filename.to_string()))
    }

    /// Reads a tick table encoded in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be decoded into ticks.
    pub fn read_ticks(&self, data: Bytes) -> Result<Vec<Tick>, FormatError> {
        match self {
            Self::Parquet => {
                #[cfg(feature = "parquet")]
                {
                    crate::ParquetFormatter::new().read_ticks(data)
                }
                #[cfg(not(feature = "parquet"))]
                {
                    drop(data);
                    Err(FormatError::NotCompiled(*self))
                }
            }
            Self::Csv => CsvFormatter::new().read_ticks(data),
            Self::Json => JsonFormatter::new().read_ticks(data),
            Self::Ndjson => JsonFormatter::ndjson().read_ticks(data),
        }
    }

    /// Writes a tick or bar table in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_frame<W: Write + Send>(&self, frame: &Frame, writer: W) -> Result<(), FormatError> {
        match self {
            Self::Parquet => {
                #[cfg(feature = "parquet")]
                {
                    write_frame_with(&crate::ParquetFormatter::new(), frame, writer)
                }
                #[cfg(not(feature = "parquet"))]
                {
                    drop(writer);
                    Err(FormatError::NotCompiled(*self))
                }
            }
            Self::Csv => write_frame_with(&CsvFormatter::new(), frame, writer),
            Self::Json => write_frame_with(&JsonFormatter::new(), frame, writer),
            Self::Ndjson => write_frame_with(&JsonFormatter::ndjson(), frame, writer),
        }
    }
}

fn write_frame_with<F: Formatter, W: Write + Send>(
    formatter: &F,
    frame: &Frame,
    writer: W,
) -> Result<(), FormatError> {
    match frame {
        Frame::Ticks(ticks) => formatter.write_ticks(ticks, writer),
        Frame::Bars(bars) => formatter.write_bars(bars, writer),
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for FileFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parquet" | "pq" => Ok(Self::Parquet),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            _ => Err(FormatError::UnsupportedExtension(s.to_string())),
        }
    }
}

/// Errors that can occur while reading or writing tables.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The file extension is not one of the supported formats.
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    /// The format is known but its support was not compiled in.
    #[error("Support for {0} was not compiled in")]
    NotCompiled(FileFormat),

    /// A required column is absent.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A column holds a null or unusable value.
    #[error("Invalid value in column '{column}' at row {row}: {reason}")]
    InvalidValue {
        /// The offending column.
        column: String,
        /// Zero-based row number.
        row: usize,
        /// What was wrong with the value.
        reason: String,
    },

    /// A datetime string could not be parsed.
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// Arrow/Parquet error.
    #[error("Parquet error: {0}")]
    Parquet(String),
}

/// Trait for output formatters.
pub trait Formatter: Send + Sync {
    /// Writes tick data to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_ticks<W: Write + Send>(&self, ticks: &[Tick], writer: W) -> Result<(), FormatError>;

    /// Writes bar data to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_bars<W: Write + Send>(&self, bars: &[Bar], writer: W) -> Result<(), FormatError>;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}

/// Trait for formats that can decode a tick table.
pub trait TickReader {
    /// Decodes ticks from the raw file contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is malformed or required columns are missing.
    fn read_ticks(&self, data: Bytes) -> Result<Vec<Tick>, FormatError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(FileFormat::from_path("a/b.parquet").unwrap(), FileFormat::Parquet);
        assert_eq!(FileFormat::from_path("b.PQ").unwrap(), FileFormat::Parquet);
        assert_eq!(FileFormat::from_path("ticks.csv").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_path("ticks.jsonl").unwrap(), FileFormat::Ndjson);
    }

    #[test]
    fn test_from_path_unsupported() {
        for name in ["ticks.xlsx", "ticks", "archive.tar.gz"] {
            let err = FileFormat::from_path(name).unwrap_err();
            assert!(
                matches!(&err, FormatError::UnsupportedExtension(n) if n == name),
                "{name}"
            );
        }
    }

    #[test]
    fn test_extension_roundtrip() {
        for format in FileFormat::all() {
            assert_eq!(format.extension().parse::<FileFormat>().unwrap(), *format);
        }
    }
}
