//! The task contract.

use std::fmt;
use std::sync::Arc;

use barmill_storage::Storage;
use barmill_types::Frame;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Params, TaskArgs, TaskError};

/// A single pipeline step.
pub trait Task: Send + fmt::Debug {
    /// Returns the name the task is registered under.
    fn name(&self) -> &str;

    /// Returns when the task instance was constructed.
    fn created_at(&self) -> DateTime<Utc>;

    /// Runs the task with its merged arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if a required argument is missing or the work fails.
    fn execute(&mut self, args: TaskArgs) -> Result<TaskOutput, TaskError>;
}

/// A task built from a typed configuration record.
pub trait ConfiguredTask: Task + Sized + 'static {
    /// The registry name.
    const NAME: &'static str;

    /// The configuration record parsed from a step's arguments.
    type Config: DeserializeOwned;

    /// Builds the task from its validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is well-formed but unusable.
    fn from_config(config: Self::Config) -> Result<Self, TaskError>;

    /// Parses `params` into [`Self::Config`] and builds the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::InvalidArguments`] for unknown or ill-typed
    /// arguments, or the error of [`Self::from_config`].
    fn from_params(params: &Params) -> Result<Self, TaskError> {
        Self::from_config(parse_config(Self::NAME, params)?)
    }
}

/// Deserializes a task's configuration record from step arguments.
///
/// # Errors
///
/// Returns [`TaskError::InvalidArguments`] if the arguments do not match.
pub fn parse_config<C: DeserializeOwned>(task: &str, params: &Params) -> Result<C, TaskError> {
    serde_json::from_value(Value::Object(params.clone()))
        .map_err(|source| TaskError::InvalidArguments { task: task.to_string(), source })
}

/// The value a task produces.
#[derive(Debug, Clone, Default)]
pub enum TaskOutput {
    /// Nothing was produced.
    #[default]
    Empty,
    /// A tick or bar table. Only this variant is threaded into the next step.
    Frame(Frame),
    /// A resolved storage backend.
    Storage(Arc<dyn Storage>),
    /// A table was written to storage.
    Written {
        /// The storage path that was written.
        path: String,
        /// Number of rows written.
        rows: usize,
    },
}

impl TaskOutput {
    /// Returns true if this output is a table.
    #[must_use]
    pub const fn is_frame(&self) -> bool {
        matches!(self, Self::Frame(_))
    }

    /// Returns the table, if any.
    #[must_use]
    pub const fn as_frame(&self) -> Option<&Frame> {
        match self {
            Self::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    /// Converts into the table, if any.
    #[must_use]
    pub fn into_frame(self) -> Option<Frame> {
        match self {
            Self::Frame(frame) => Some(frame),
            _ => None,
        }
    }
}

impl fmt::Display for TaskOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "nothing"),
            Self::Frame(frame) => write!(f, "{} ({} rows)", frame.kind(), frame.len()),
            Self::Storage(storage) => write!(f, "{} storage", storage.signature()),
            Self::Written { path, rows } => write!(f, "{rows} rows written to {path}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barmill_storage::MemoryStorage;
    use barmill_types::Tick;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Config {
        filename: String,
        #[serde(default)]
        bucket: Option<String>,
    }

    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_config() {
        let config: Config = parse_config("read", &params(json!({"filename": "a.csv"}))).unwrap();
        assert_eq!(config.filename, "a.csv");
        assert!(config.bucket.is_none());
    }

    #[test]
    fn test_parse_config_rejects_unknown_field() {
        let err = parse_config::<Config>("read", &params(json!({"filename": "a.csv", "bukket": "x"})))
            .unwrap_err();
        assert!(matches!(err, TaskError::InvalidArguments { ref task, .. } if task == "read"));
        assert!(err.to_string().contains("bukket"));
    }

    #[test]
    fn test_parse_config_rejects_wrong_type() {
        let err = parse_config::<Config>("read", &params(json!({"filename": 3}))).unwrap_err();
        assert!(matches!(err, TaskError::InvalidArguments { .. }));
    }

    #[test]
    fn test_output_display() {
        let frame = TaskOutput::Frame(Frame::Ticks(vec![Tick::from_trade(0, "X", 1.0, 1.0)]));
        assert!(frame.is_frame());
        assert_eq!(frame.to_string(), "ticks (1 rows)");

        let storage = TaskOutput::Storage(Arc::new(MemoryStorage::new()));
        assert!(!storage.is_frame());
        assert_eq!(storage.to_string(), "memory storage");

        let written = TaskOutput::Written { path: "b/a.csv".into(), rows: 3 };
        assert_eq!(written.to_string(), "3 rows written to b/a.csv");
        assert!(written.into_frame().is_none());
    }
}
