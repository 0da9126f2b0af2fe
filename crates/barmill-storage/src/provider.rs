//! Signature-to-backend resolution.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::{LocalStorage, MemoryStorage, Result, Storage, StorageError, StorageSignature};

/// The set of storage backends available to a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct StorageProvider {
    backends: HashMap<StorageSignature, Arc<dyn Storage>>,
}

impl StorageProvider {
    /// Creates a provider with no backends.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider with a local backend rooted at `root` and an empty
    /// memory backend.
    #[must_use]
    pub fn with_local_root(root: impl Into<std::path::PathBuf>) -> Self {
        Self::new()
            .with_backend(LocalStorage::new(root))
            .with_backend(MemoryStorage::new())
    }

    /// Adds a backend, replacing any backend with the same signature.
    #[must_use]
    pub fn with_backend(mut self, storage: impl Storage + 'static) -> Self {
        self.insert(Arc::new(storage));
        self
    }

    /// Adds a shared backend, replacing any backend with the same signature.
    pub fn insert(&mut self, storage: Arc<dyn Storage>) {
        self.backends.insert(storage.signature(), storage);
    }

    /// Resolves a signature string to its configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UnknownStorageSignature`] for an unknown
    /// signature and [`StorageError::BackendUnavailable`] when the backend is
    /// not configured.
    pub fn resolve(&self, signature: &str) -> Result<Arc<dyn Storage>> {
        let parsed: StorageSignature = signature.parse()?;
        let storage = self
            .backends
            .get(&parsed)
            .cloned()
            .ok_or(StorageError::BackendUnavailable(parsed))?;
        debug!(signature = %parsed, "resolved storage backend");
        Ok(storage)
    }

    /// Returns the configured signatures.
    pub fn signatures(&self) -> impl Iterator<Item = StorageSignature> + '_ {
        self.backends.keys().copied()
    }
}
