//! The `write` task.

use std::io::Write;
use std::sync::Arc;

use barmill_format::FileFormat;
use barmill_storage::StorageProvider;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::tasks::{object_path, resolve_storage};
use crate::{DF_ARG, Task, TaskArgs, TaskError, TaskOutput};

/// Configuration of [`WriteTask`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriteConfig {
    /// Object name. Its extension selects the file format.
    pub filename: String,
    /// Optional bucket or directory to write into.
    #[serde(default)]
    pub bucket: Option<String>,
}

/// Writes the injected tick or bar table to the pipeline's storage.
#[derive(Debug)]
pub struct WriteTask {
    config: WriteConfig,
    storages: Arc<StorageProvider>,
    created_at: DateTime<Utc>,
}

impl WriteTask {
    /// The registry name.
    pub const NAME: &'static str = "write";

    /// Creates the task.
    #[must_use]
    pub fn new(config: WriteConfig, storages: Arc<StorageProvider>) -> Self {
        Self { config, storages, created_at: Utc::now() }
    }
}

impl Task for WriteTask {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn execute(&mut self, mut args: TaskArgs) -> Result<TaskOutput, TaskError> {
        let frame = args.take_df().ok_or_else(|| TaskError::missing(Self::NAME, DF_ARG))?;
        let storage = resolve_storage(Self::NAME, &self.storages, &args)?;
        let format = FileFormat::from_path(&self.config.filename)?;
        let path = object_path(
            storage.as_ref(),
            self.config.bucket.as_deref(),
            &self.config.filename,
        );

        let mut writer = storage.create(&path)?;
        format.write_frame(&frame, &mut writer)?;
        writer.flush()?;

        info!(
            path = %path,
            format = %format,
            kind = %frame.kind(),
            rows = frame.len(),
            "wrote table"
        );
        Ok(TaskOutput::Written { path, rows: frame.len() })
    }
}
