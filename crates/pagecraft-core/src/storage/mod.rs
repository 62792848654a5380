//! Storage abstraction for document persistence.

mod autosave;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use autosave::{AutoSaveManager, PlatformStorage, SaveStatus, create_default_storage};
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use crate::document::DocumentState;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A keyed store of documents.
///
/// Each key holds one serialized document, like a browser storage slot.
/// On native platforms implementations must be Send + Sync.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save a document under `key`, replacing what was there.
    fn save(&self, key: &str, document: &DocumentState) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the document under `key`.
    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<DocumentState>>;

    /// Remove the document under `key`. Missing keys are not an error.
    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Check whether `key` holds anything.
    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// A keyed store of documents (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Save a document under `key`, replacing what was there.
    fn save(&self, key: &str, document: &DocumentState) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the document under `key`.
    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<DocumentState>>;

    /// Remove the document under `key`. Missing keys are not an error.
    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Check whether `key` holds anything.
    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Parse a stored document, mapping failures to [`StorageError::Serialization`].
pub(crate) fn parse_document(key: &str, json: &str) -> StorageResult<DocumentState> {
    DocumentState::from_json(json)
        .map_err(|e| StorageError::Serialization(format!("Failed to parse {}: {}", key, e)))
}

/// Serialize a document for storage.
pub(crate) fn serialize_document(document: &DocumentState) -> StorageResult<String> {
    document.to_json().map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Minimal executor for driving storage futures in tests.
#[cfg(test)]
pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, Waker};

    let mut cx = Context::from_waker(Waker::noop());
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
