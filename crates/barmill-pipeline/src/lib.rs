//! Task registry and sequential pipeline runner for barmill.
//!
//! - [`Task`] - The contract every pipeline step satisfies
//! - [`TaskRegistry`] - Resolves task names to constructed tasks
//! - [`Pipeline`] - Runs a [`PipelineSpec`] step by step
//! - [`PipelineRun`] - Status record of one run
//!
//! Built-in tasks are `get_storage`, `read`, `aggregate` and `write`.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barmill/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod args;
mod error;
mod record;
mod registry;
mod runner;
mod task;
pub mod tasks;

#[cfg(test)]
mod testing;

pub use args::{DF_ARG, Params, STORAGE_SIGNATURE_ARG, TaskArgs};
pub use error::{PipelineError, RegistryError, TaskError};
pub use record::{PipelineRun, RunId, StepRecord, StepStatus};
pub use registry::TaskRegistry;
pub use runner::{Pipeline, PipelineSpec, StepObserver, TaskDescriptor};
pub use task::{ConfiguredTask, Task, TaskOutput, parse_config};
