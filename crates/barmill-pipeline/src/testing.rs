//! Tasks used by the registry and runner tests.

use std::sync::{Arc, Mutex};

use barmill_storage::MemoryStorage;
use barmill_types::{Frame, Tick};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::{ConfiguredTask, DF_ARG, Params, Task, TaskArgs, TaskError, TaskOutput};

pub(crate) fn params(value: Value) -> Params {
    value.as_object().cloned().unwrap()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct EmitTicksConfig {
    count: usize,
}

/// Produces `count` one-second-apart ticks.
#[derive(Debug)]
pub(crate) struct EmitTicks {
    count: usize,
    created_at: DateTime<Utc>,
}

impl Task for EmitTicks {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn execute(&mut self, _args: TaskArgs) -> Result<TaskOutput, TaskError> {
        let ticks = (0..self.count)
            .map(|i| Tick::from_trade(i as i64 * 1000, "TEST", 1.0 + i as f64, 1.0))
            .collect::<Vec<_>>();
        Ok(TaskOutput::Frame(Frame::Ticks(ticks)))
    }
}

impl ConfiguredTask for EmitTicks {
    const NAME: &'static str = "emit_ticks";
    type Config = EmitTicksConfig;

    fn from_config(config: Self::Config) -> Result<Self, TaskError> {
        Ok(Self { count: config.count, created_at: Utc::now() })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct EmptyConfig {}

/// Produces a storage handle.
#[derive(Debug)]
pub(crate) struct EmitStorage {
    created_at: DateTime<Utc>,
}

impl Task for EmitStorage {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn execute(&mut self, _args: TaskArgs) -> Result<TaskOutput, TaskError> {
        Ok(TaskOutput::Storage(Arc::new(MemoryStorage::new())))
    }
}

impl ConfiguredTask for EmitStorage {
    const NAME: &'static str = "emit_storage";
    type Config = EmptyConfig;

    fn from_config(_config: Self::Config) -> Result<Self, TaskError> {
        Ok(Self { created_at: Utc::now() })
    }
}

/// Produces nothing.
#[derive(Debug)]
pub(crate) struct Nothing {
    created_at: DateTime<Utc>,
}

impl Default for Nothing {
    fn default() -> Self {
        Self { created_at: Utc::now() }
    }
}

impl Task for Nothing {
    fn name(&self) -> &str {
        "nothing"
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn execute(&mut self, _args: TaskArgs) -> Result<TaskOutput, TaskError> {
        Ok(TaskOutput::Empty)
    }
}

/// What a [`Recorder`] saw when it executed.
#[derive(Debug, Clone)]
pub(crate) struct Captured {
    pub(crate) df_rows: Option<usize>,
    pub(crate) had_df_param: bool,
    pub(crate) storage_signature: Option<String>,
}

/// Records the arguments it receives.
#[derive(Debug)]
pub(crate) struct Recorder {
    created_at: DateTime<Utc>,
    sink: Arc<Mutex<Vec<Captured>>>,
}

impl Recorder {
    pub(crate) fn new(sink: Arc<Mutex<Vec<Captured>>>) -> Self {
        Self { created_at: Utc::now(), sink }
    }
}

impl Task for Recorder {
    fn name(&self) -> &str {
        "record"
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn execute(&mut self, args: TaskArgs) -> Result<TaskOutput, TaskError> {
        let captured = Captured {
            df_rows: args.df().map(Frame::len),
            had_df_param: args.get(DF_ARG).is_some(),
            storage_signature: args.storage_signature().map(str::to_string),
        };
        self.sink.lock().unwrap().push(captured);
        Ok(TaskOutput::Empty)
    }
}
