//! Storage interface and backend identifiers.

use std::io::{Read, Write};
use std::str::FromStr;

use crate::{Result, StorageError};

/// Identifier of a storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageSignature {
    /// Local filesystem rooted at a directory.
    Local,
    /// In-process memory.
    Memory,
}

impl StorageSignature {
    /// Returns the canonical signature string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Memory => "memory",
        }
    }
}

impl std::fmt::Display for StorageSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StorageSignature {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "local" | "file" | "localfs" => Ok(Self::Local),
            "memory" | "mem" | "memfs" => Ok(Self::Memory),
            _ => Err(StorageError::UnknownStorageSignature(s.to_string())),
        }
    }
}

/// Operations a pipeline step may perform against a storage backend.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Returns the signature this backend answers to.
    fn signature(&self) -> StorageSignature;

    /// Opens an object for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not exist or cannot be read.
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>>;

    /// Creates (or truncates) an object for writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be created.
    fn create(&self, path: &str) -> Result<Box<dyn Write + Send>>;

    /// Returns true if an object exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self, path: &str) -> Result<bool>;

    /// Joins a bucket and a path into an object path.
    fn join(&self, bucket: &str, path: &str) -> String {
        let bucket = bucket.trim_matches('/');
        let path = path.trim_start_matches('/');
        if bucket.is_empty() {
            path.to_string()
        } else {
            format!("{bucket}/{path}")
        }
    }
}
