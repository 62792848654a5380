//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult, parse_document, serialize_document};
use crate::document::DocumentState;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Documents are kept serialized so a slot behaves like a browser storage
/// entry, including holding data that no longer parses.
#[derive(Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw text into a slot.
    pub fn insert_raw(&self, key: &str, raw: impl Into<String>) -> StorageResult<()> {
        let mut slots = self.slots.write().map_err(lock_error)?;
        slots.insert(key.to_string(), raw.into());
        Ok(())
    }

    /// Raw text of a slot.
    pub fn raw(&self, key: &str) -> StorageResult<Option<String>> {
        let slots = self.slots.read().map_err(lock_error)?;
        Ok(slots.get(key).cloned())
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, document: &DocumentState) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let json = serialize_document(document);
        Box::pin(async move {
            let json = json?;
            let mut slots = self.slots.write().map_err(lock_error)?;
            slots.insert(key, json);
            Ok(())
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<DocumentState>> {
        let key = key.to_string();
        Box::pin(async move {
            let json = {
                let slots = self.slots.read().map_err(lock_error)?;
                slots.get(&key).cloned()
            };
            match json {
                Some(json) => parse_document(&key, &json),
                None => Err(StorageError::NotFound(key)),
            }
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut slots = self.slots.write().map_err(lock_error)?;
            slots.remove(&key);
            Ok(())
        })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let key = key.to_string();
        Box::pin(async move {
            let slots = self.slots.read().map_err(lock_error)?;
            Ok(slots.contains_key(&key))
        })
    }
}
