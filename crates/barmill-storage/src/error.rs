//! Storage error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::StorageSignature;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while resolving or using a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The signature does not name any known backend.
    #[error("No storage backend corresponding to signature '{0}'")]
    UnknownStorageSignature(String),

    /// The backend is known but was not configured for this run.
    #[error("Storage backend '{0}' is not configured")]
    BackendUnavailable(StorageSignature),

    /// The path escapes the storage root or is otherwise malformed.
    #[error("Invalid storage path '{0}'")]
    InvalidPath(String),

    /// The object does not exist.
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Failed to open an object for reading.
    #[error("Failed to open '{path}': {source}")]
    Open {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to create an object for writing.
    #[error("Failed to create '{path}': {source}")]
    Create {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The storage lock was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    Poisoned,
}
