//! Storage backends for the barmill tick-to-bar pipeline.
//!
//! - [`Storage`] - The operations pipeline steps need from a backend
//! - [`StorageSignature`] - Enumerated backend identifiers
//! - [`LocalStorage`] - Directory-rooted filesystem backend
//! - [`MemoryStorage`] - In-process object store
//! - [`StorageProvider`] - Resolves signature strings to configured backends

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barmill/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod local;
mod memory;
mod provider;
mod storage;

pub use error::{Result, StorageError};
pub use local::{LocalStorage, STORAGE_ROOT_ENV};
pub use memory::MemoryStorage;
pub use provider::StorageProvider;
pub use storage::{Storage, StorageSignature};
