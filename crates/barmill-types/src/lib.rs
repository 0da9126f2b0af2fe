//! Core types for the barmill tick-to-bar pipeline.
//!
//! This crate provides the fundamental data structures used throughout barmill:
//!
//! - [`Tick`] - A single trade with timestamp, symbol, price, amount and cost
//! - [`Bar`] - An aggregated OHLCV bar with traded value and win flag
//! - [`BarUnit`] - The sampling clock that drives bar construction
//! - [`Frame`] - A tick or bar table passed between pipeline steps

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barmill/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod error;
mod frame;
mod tick;
mod unit;

pub use bar::Bar;
pub use error::{BarmillError, Result};
pub use frame::{Frame, FrameKind};
pub use tick::{Tick, datetime_from_millis};
pub use unit::BarUnit;
