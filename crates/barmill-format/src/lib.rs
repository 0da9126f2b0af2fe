//! Tick readers and bar writers for the barmill tick-to-bar pipeline.
//!
//! This crate reads tick tables from, and writes tick or bar tables to,
//! various file formats:
//!
//! - [`CsvFormatter`] - CSV format
//! - [`JsonFormatter`] - JSON array or NDJSON format
//! - [`ParquetFormatter`] - Apache Parquet columnar format
//! - [`FileFormat`] - Extension-based dispatch over the formats above

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barmill/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;
mod row;

#[cfg(feature = "parquet")]
mod parquet;

pub use crate::csv::CsvFormatter;
pub use formatter::{FileFormat, FormatError, Formatter, TickReader};
pub use json::{JsonFormatter, JsonStyle};
pub use row::parse_datetime;

#[cfg(feature = "parquet")]
pub use crate::parquet::ParquetFormatter;
