//! Error types for tasks, the registry and the pipeline runner.

use barmill_format::FormatError;
use barmill_storage::StorageError;
use barmill_types::{BarmillError, FrameKind};
use thiserror::Error;

/// Errors raised while constructing or executing a task.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The step's arguments do not match the task's configuration record.
    #[error("Invalid arguments for task '{task}': {source}")]
    InvalidArguments {
        /// The task being constructed.
        task: String,
        /// The deserialization failure.
        source: serde_json::Error,
    },

    /// A required argument was neither declared nor injected.
    #[error("Task '{task}' requires argument '{argument}'")]
    MissingArgument {
        /// The task being executed.
        task: String,
        /// The absent argument.
        argument: String,
    },

    /// The injected table is not the kind the task consumes.
    #[error("Task '{task}' expected a {expected} table, got {found}")]
    UnexpectedFrame {
        /// The task being executed.
        task: String,
        /// The kind the task consumes.
        expected: FrameKind,
        /// The kind that was injected.
        found: FrameKind,
    },

    /// Bar construction was misconfigured.
    #[error(transparent)]
    Bar(#[from] BarmillError),

    /// Storage resolution or access failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Decoding or encoding a table failed.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// I/O error while moving bytes to or from storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TaskError {
    pub(crate) fn missing(task: &str, argument: &str) -> Self {
        Self::MissingArgument { task: task.to_string(), argument: argument.to_string() }
    }
}

/// Errors raised by the task registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A task with this name is already registered; the existing entry is
    /// kept.
    #[error("Task name '{0}' is already in use")]
    RegistrationConflict(String),

    /// No task is registered under this name.
    #[error("Task '{0}' is not registered")]
    NotRegistered(String),

    /// The task's constructor rejected its arguments.
    #[error("Failed to construct task '{name}': {source}")]
    Construction {
        /// The task name.
        name: String,
        /// The construction failure.
        source: TaskError,
    },
}

/// A step failure that aborted a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The step's task could not be resolved or constructed.
    #[error("Step {index} ('{name}'): {source}")]
    Resolve {
        /// Zero-based step index.
        index: usize,
        /// The step's task name.
        name: String,
        /// The registry failure.
        source: RegistryError,
    },

    /// The step's task failed while executing.
    #[error("Step {index} ('{name}') failed: {source}")]
    Execute {
        /// Zero-based step index.
        index: usize,
        /// The step's task name.
        name: String,
        /// The execution failure.
        source: TaskError,
    },
}

impl PipelineError {
    /// Returns the index of the failing step.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Resolve { index, .. } | Self::Execute { index, .. } => *index,
        }
    }

    /// Returns the task name of the failing step.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Resolve { name, .. } | Self::Execute { name, .. } => name,
        }
    }

    /// Returns the task failure behind this error, if any.
    #[must_use]
    pub const fn task_error(&self) -> Option<&TaskError> {
        match self {
            Self::Resolve { source: RegistryError::Construction { source, .. }, .. }
            | Self::Execute { source, .. } => Some(source),
            Self::Resolve { .. } => None,
        }
    }
}
