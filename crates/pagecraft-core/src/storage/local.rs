//! Browser `localStorage` implementation for WebAssembly.

use super::{BoxFuture, Storage, StorageError, StorageResult, parse_document, serialize_document};
use crate::document::DocumentState;

/// Storage backed by the page's `localStorage`.
///
/// Not Send/Sync: WASM is single-threaded and the handle is a JS object.
#[derive(Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn handle() -> StorageResult<web_sys::Storage> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Other("No window object".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Other(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StorageError::Other("localStorage not available".to_string()))
    }
}

impl Storage for LocalStorage {
    fn save(&self, key: &str, document: &DocumentState) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let json = serialize_document(document);
        Box::pin(async move {
            let json = json?;
            Self::handle()?
                .set_item(&key, &json)
                .map_err(|e| StorageError::Io(format!("Failed to write {}: {:?}", key, e)))
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<DocumentState>> {
        let key = key.to_string();
        Box::pin(async move {
            let json = Self::handle()?
                .get_item(&key)
                .map_err(|e| StorageError::Io(format!("Failed to read {}: {:?}", key, e)))?;
            match json {
                Some(json) => parse_document(&key, &json),
                None => Err(StorageError::NotFound(key)),
            }
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            Self::handle()?
                .remove_item(&key)
                .map_err(|e| StorageError::Io(format!("Failed to delete {}: {:?}", key, e)))
        })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let key = key.to_string();
        Box::pin(async move {
            let item = Self::handle()?
                .get_item(&key)
                .map_err(|e| StorageError::Io(format!("Failed to read {}: {:?}", key, e)))?;
            Ok(item.is_some())
        })
    }
}
