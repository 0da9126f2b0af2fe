//! The `read` task.

use std::io::Read;
use std::sync::Arc;

use barmill_format::FileFormat;
use barmill_storage::StorageProvider;
use barmill_types::Frame;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::tasks::{object_path, resolve_storage};
use crate::{Task, TaskArgs, TaskError, TaskOutput};

/// Configuration of [`ReadTask`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadConfig {
    /// Object name. Its extension selects the file format.
    pub filename: String,
    /// Optional bucket or directory holding the object.
    #[serde(default)]
    pub bucket: Option<String>,
}

/// Loads a tick table from the pipeline's storage.
#[derive(Debug)]
pub struct ReadTask {
    config: ReadConfig,
    storages: Arc<StorageProvider>,
    created_at: DateTime<Utc>,
}

impl ReadTask {
    /// The registry name.
    pub const NAME: &'static str = "read";

    /// Creates the task.
    #[must_use]
    pub fn new(config: ReadConfig, storages: Arc<StorageProvider>) -> Self {
        Self { config, storages, created_at: Utc::now() }
    }
}

impl Task for ReadTask {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn execute(&mut self, args: TaskArgs) -> Result<TaskOutput, TaskError> {
        let storage = resolve_storage(Self::NAME, &self.storages, &args)?;
        let format = FileFormat::from_path(&self.config.filename)?;
        let path = object_path(
            storage.as_ref(),
            self.config.bucket.as_deref(),
            &self.config.filename,
        );

        let mut data = Vec::new();
        storage.open(&path)?.read_to_end(&mut data)?;
        let ticks = format.read_ticks(Bytes::from(data))?;

        info!(path = %path, format = %format, rows = ticks.len(), "read ticks");
        Ok(TaskOutput::Frame(Frame::Ticks(ticks)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use barmill_format::FormatError;
    use barmill_storage::{MemoryStorage, StorageError};

    const CSV: &str = "timestamp,symbol,price,amount\n0,ETH/USDT,10,2\n100,ETH/USDT,12,1\n";

    fn task(filename: &str, bucket: Option<&str>, memory: &MemoryStorage) -> ReadTask {
        let storages = StorageProvider::new().with_backend(memory.clone());
        let config = ReadConfig {
            filename: filename.to_string(),
            bucket: bucket.map(str::to_string),
        };
        ReadTask::new(config, Arc::new(storages))
    }

    fn args() -> TaskArgs {
        TaskArgs::default().with_storage_signature("memory")
    }

    #[test]
    fn test_read_csv_from_bucket() {
        let memory = MemoryStorage::new();
        memory.insert("tick-raw/eth.csv", CSV).unwrap();

        let output = task("eth.csv", Some("tick-raw"), &memory).execute(args()).unwrap();
        let ticks = output.as_frame().and_then(Frame::as_ticks).unwrap();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[1].timestamp, 100);
        assert_relative_eq!(ticks[0].cost, 20.0);
    }

    #[test]
    fn test_unsupported_extension() {
        let memory = MemoryStorage::new();
        memory.insert("eth.xlsx", "irrelevant").unwrap();

        let err = task("eth.xlsx", None, &memory).execute(args()).unwrap_err();
        assert!(matches!(err, TaskError::Format(FormatError::UnsupportedExtension(_))));
    }

    #[test]
    fn test_missing_object() {
        let memory = MemoryStorage::new();
        let err = task("eth.csv", None, &memory).execute(args()).unwrap_err();
        assert!(matches!(err, TaskError::Storage(StorageError::NotFound(_))));
    }

    #[test]
    fn test_unknown_signature() {
        let memory = MemoryStorage::new();
        let args = TaskArgs::default().with_storage_signature("s3fs");
        let err = task("eth.csv", None, &memory).execute(args).unwrap_err();
        assert!(matches!(err, TaskError::Storage(StorageError::UnknownStorageSignature(_))));
    }
}
