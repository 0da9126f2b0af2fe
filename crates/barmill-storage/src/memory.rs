//! In-process object store.

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::sync::{Arc, RwLock};

use crate::{Result, Storage, StorageError, StorageSignature};

type Objects = Arc<RwLock<HashMap<String, Vec<u8>>>>;

/// Object store held in memory.
///
/// Clones share the same objects. Writers publish their bytes on flush and
/// when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    objects: Objects,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an object, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn insert(&self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Result<()> {
        self.objects
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .insert(path.into(), data.into());
        Ok(())
    }

    /// Returns a copy of an object's bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn get(&self, path: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .objects
            .read()
            .map_err(|_| StorageError::Poisoned)?
            .get(path)
            .cloned())
    }

    /// Returns all object paths, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn paths(&self) -> Result<Vec<String>> {
        let mut paths: Vec<_> = self
            .objects
            .read()
            .map_err(|_| StorageError::Poisoned)?
            .keys()
            .cloned()
            .collect();
        paths.sort();
        Ok(paths)
    }
}

impl Storage for MemoryStorage {
    fn signature(&self) -> StorageSignature {
        StorageSignature::Memory
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let data = self
            .get(path)?
            .ok_or_else(|| StorageError::NotFound(path.to_string()))?;
        Ok(Box::new(Cursor::new(data)))
    }

    fn create(&self, path: &str) -> Result<Box<dyn Write + Send>> {
        self.insert(path, Vec::new())?;
        Ok(Box::new(MemoryWriter {
            path: path.to_string(),
            buffer: Vec::new(),
            objects: Arc::clone(&self.objects),
        }))
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self
            .objects
            .read()
            .map_err(|_| StorageError::Poisoned)?
            .contains_key(path))
    }
}

/// Buffers writes and publishes them into the shared map.
#[derive(Debug)]
struct MemoryWriter {
    path: String,
    buffer: Vec<u8>,
    objects: Objects,
}

impl MemoryWriter {
    fn publish(&self) -> std::io::Result<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| std::io::Error::other("storage lock poisoned"))?;
        objects.insert(self.path.clone(), self.buffer.clone());
        Ok(())
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.publish()
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        let _ = self.publish();
    }
}
