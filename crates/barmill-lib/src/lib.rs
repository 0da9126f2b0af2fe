//! Tick-to-bar aggregation over alternative sampling clocks.
//!
//! This is a facade crate that re-exports functionality from the barmill
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use barmill_lib::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = TaskRegistry::with_builtin_tasks(StorageProvider::with_local_root("data"));
//!     let spec = PipelineSpec::from_json(&std::fs::read_to_string("pipeline.json")?)?;
//!
//!     let output = Pipeline::new(&registry).run(&spec)?;
//!     println!("{output}");
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barmill/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use barmill_types::*;

// Re-export aggregation
pub use barmill_aggregate::{BarAggregator, BarSampler};

// Re-export storage backends
pub use barmill_storage::{
    LocalStorage, MemoryStorage, STORAGE_ROOT_ENV, Storage, StorageError, StorageProvider,
    StorageSignature,
};

// Re-export file formats
pub use barmill_format::{
    CsvFormatter, FileFormat, FormatError, Formatter, JsonFormatter, JsonStyle, TickReader,
};

#[cfg(feature = "parquet")]
pub use barmill_format::ParquetFormatter;

// Re-export the pipeline engine
#[cfg(feature = "pipeline")]
pub use barmill_pipeline::{
    ConfiguredTask, Params, Pipeline, PipelineError, PipelineRun, PipelineSpec, RegistryError,
    RunId, StepObserver, StepRecord, StepStatus, Task, TaskArgs, TaskDescriptor, TaskError,
    TaskOutput, TaskRegistry, tasks,
};

/// Prelude module for convenient imports.
///
/// ```
/// use barmill_lib::prelude::*;
/// ```
pub mod prelude {
    pub use barmill_types::{Bar, BarUnit, BarmillError, Frame, FrameKind, Result, Tick};

    pub use barmill_aggregate::BarAggregator;

    pub use barmill_storage::{LocalStorage, MemoryStorage, Storage, StorageProvider};

    pub use barmill_format::{FileFormat, Formatter, TickReader};

    #[cfg(feature = "pipeline")]
    pub use barmill_pipeline::{
        Pipeline, PipelineRun, PipelineSpec, Task, TaskDescriptor, TaskOutput, TaskRegistry,
    };
}
