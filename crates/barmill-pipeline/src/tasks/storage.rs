//! The `get_storage` task.

use std::sync::Arc;

use barmill_storage::StorageProvider;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::tasks::resolve_storage;
use crate::{Task, TaskArgs, TaskError, TaskOutput};

/// Configuration of [`GetStorageTask`]. The task takes no arguments of its
/// own.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetStorageConfig {}

/// Resolves the pipeline's storage signature to a backend handle.
#[derive(Debug)]
pub struct GetStorageTask {
    storages: Arc<StorageProvider>,
    created_at: DateTime<Utc>,
}

impl GetStorageTask {
    /// The registry name.
    pub const NAME: &'static str = "get_storage";

    /// Creates the task.
    #[must_use]
    pub fn new(_config: GetStorageConfig, storages: Arc<StorageProvider>) -> Self {
        Self { storages, created_at: Utc::now() }
    }
}

impl Task for GetStorageTask {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn execute(&mut self, args: TaskArgs) -> Result<TaskOutput, TaskError> {
        let storage = resolve_storage(Self::NAME, &self.storages, &args)?;
        Ok(TaskOutput::Storage(storage))
    }
}
