//! Bar construction for the barmill tick-to-bar pipeline.
//!
//! This crate provides tick-to-bar aggregation over alternative clocks:
//!
//! - [`BarAggregator`] - Sorts, buckets and reduces a whole tick table
//! - [`BarSampler`] - Streaming bucketer over timestamp-ordered ticks

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barmill/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod sampler;

pub use aggregator::BarAggregator;
pub use sampler::BarSampler;
