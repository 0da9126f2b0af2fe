//! Local filesystem backend.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Component, Path, PathBuf};

use tracing::trace;

use crate::{Result, Storage, StorageError, StorageSignature};

/// Environment variable naming the default root of [`LocalStorage`].
pub const STORAGE_ROOT_ENV: &str = "BARMILL_STORAGE_ROOT";

/// Filesystem storage rooted at a directory.
///
/// Buckets are subdirectories of the root. Paths may not escape the root.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Creates a backend rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a backend rooted at `$BARMILL_STORAGE_ROOT`, or the current
    /// directory when unset.
    #[must_use]
    pub fn from_env() -> Self {
        let root = std::env::var_os(STORAGE_ROOT_ENV).map_or_else(|| PathBuf::from("."), PathBuf::from);
        Self::new(root)
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves an object path against the root.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl Storage for LocalStorage {
    fn signature(&self) -> StorageSignature {
        StorageSignature::Local
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let full = self.resolve(path)?;
        trace!(path = %full.display(), "opening local object");
        let file = File::open(&full).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(path.to_string())
            } else {
                StorageError::Open { path: full.clone(), source }
            }
        })?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn create(&self, path: &str) -> Result<Box<dyn Write + Send>> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Create {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        trace!(path = %full.display(), "creating local object");
        let file = File::create(&full).map_err(|source| StorageError::Create {
            path: full.clone(),
            source,
        })?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.resolve(path)?.is_file())
    }
}
