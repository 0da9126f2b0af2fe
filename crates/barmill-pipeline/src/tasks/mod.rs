//! Built-in tasks.
//!
//! | Name          | Arguments                     | Consumes      | Produces        |
//! |---------------|-------------------------------|---------------|-----------------|
//! | `get_storage` | none                          | signature     | storage handle  |
//! | `read`        | `filename`, `bucket?`         | signature     | tick table      |
//! | `aggregate`   | `unit?`, `quantity?`          | tick table    | bar table       |
//! | `write`       | `filename`, `bucket?`         | any table     | written path    |

mod aggregate;
mod read;
mod storage;
mod write;

use std::sync::Arc;

use barmill_storage::{Storage, StorageProvider};

use crate::{
    RegistryError, STORAGE_SIGNATURE_ARG, Task, TaskArgs, TaskError, TaskRegistry, parse_config,
};

pub use aggregate::{AggregateConfig, AggregateTask};
pub use read::{ReadConfig, ReadTask};
pub use storage::{GetStorageConfig, GetStorageTask};
pub use write::{WriteConfig, WriteTask};

/// Registers every built-in task, resolving storage through `storages`.
///
/// # Errors
///
/// Returns the first [`RegistryError::RegistrationConflict`]. Tasks
/// registered before the conflict stay registered.
pub fn register_builtin(
    registry: &mut TaskRegistry,
    storages: Arc<StorageProvider>,
) -> Result<(), RegistryError> {
    registry.register_task::<AggregateTask>()?;

    let provider = Arc::clone(&storages);
    registry.register(ReadTask::NAME, move |params| {
        let config = parse_config(ReadTask::NAME, params)?;
        Ok(Box::new(ReadTask::new(config, Arc::clone(&provider))) as Box<dyn Task>)
    })?;

    let provider = Arc::clone(&storages);
    registry.register(GetStorageTask::NAME, move |params| {
        let config = parse_config(GetStorageTask::NAME, params)?;
        Ok(Box::new(GetStorageTask::new(config, Arc::clone(&provider))) as Box<dyn Task>)
    })?;

    registry.register(WriteTask::NAME, move |params| {
        let config = parse_config(WriteTask::NAME, params)?;
        Ok(Box::new(WriteTask::new(config, Arc::clone(&storages))) as Box<dyn Task>)
    })
}

fn resolve_storage(
    task: &str,
    storages: &StorageProvider,
    args: &TaskArgs,
) -> Result<Arc<dyn Storage>, TaskError> {
    let signature = args
        .storage_signature()
        .ok_or_else(|| TaskError::missing(task, STORAGE_SIGNATURE_ARG))?;
    Ok(storages.resolve(signature)?)
}

fn object_path(storage: &dyn Storage, bucket: Option<&str>, filename: &str) -> String {
    bucket.map_or_else(|| filename.to_string(), |bucket| storage.join(bucket, filename))
}
