//! Debounced autosave of the working document.
//!
//! A save fires once the document has been quiet for the debounce period,
//! so a burst of edits produces one write holding the latest state.

use crate::config::EditorConfig;
use crate::document::DocumentState;
use crate::storage::{Storage, StorageError, StorageResult};
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Progress of the autosave, for a status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing to save.
    Idle,
    /// Changes are waiting for the debounce to elapse.
    Pending,
    /// The latest changes are stored.
    Saved,
}

/// Manages automatic document persistence.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    /// Storage slot of the working document.
    key: String,
    /// Quiet period before saving.
    debounce: Duration,
    /// Time of the most recent unsaved change.
    last_change: Option<Instant>,
    /// Editor revision at the last observation.
    last_revision: Option<u64>,
    status: SaveStatus,
}

impl<S: Storage> AutoSaveManager<S> {
    /// Create an autosave manager writing to `key`.
    pub fn new(storage: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            debounce: Duration::from_millis(crate::config::DEFAULT_AUTOSAVE_DEBOUNCE_MS),
            last_change: None,
            last_revision: None,
            status: SaveStatus::Idle,
        }
    }

    /// Create an autosave manager using the key and debounce of `config`.
    pub fn from_config(storage: Arc<S>, config: &EditorConfig) -> Self {
        let mut manager = Self::new(storage, config.storage_key.clone());
        manager.set_debounce(Duration::from_millis(config.autosave_debounce_ms));
        manager
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn is_dirty(&self) -> bool {
        self.last_change.is_some()
    }

    /// Record a change at `now`, restarting the debounce.
    pub fn mark_dirty_at(&mut self, now: Instant) {
        self.last_change = Some(now);
        self.status = SaveStatus::Pending;
    }

    pub fn mark_dirty(&mut self) {
        self.mark_dirty_at(Instant::now());
    }

    /// Feed the editor revision; a new value counts as a change at `now`.
    /// The first observation only sets the baseline.
    pub fn observe_revision_at(&mut self, revision: u64, now: Instant) {
        match self.last_revision {
            Some(last) if last == revision => {}
            Some(_) => {
                self.last_revision = Some(revision);
                self.mark_dirty_at(now);
            }
            None => self.last_revision = Some(revision),
        }
    }

    pub fn observe_revision(&mut self, revision: u64) {
        self.observe_revision_at(revision, Instant::now());
    }

    /// Whether the debounce has elapsed since the last change.
    pub fn should_save_at(&self, now: Instant) -> bool {
        match self.last_change {
            Some(changed) => now.saturating_duration_since(changed) >= self.debounce,
            None => false,
        }
    }

    pub fn should_save(&self) -> bool {
        self.should_save_at(Instant::now())
    }

    /// Save `document` if the debounce has elapsed.
    /// Returns true if a save was performed.
    pub async fn maybe_save_at(&mut self, document: &DocumentState, now: Instant) -> StorageResult<bool> {
        if !self.should_save_at(now) {
            return Ok(false);
        }
        self.save(document).await?;
        Ok(true)
    }

    pub async fn maybe_save(&mut self, document: &DocumentState) -> StorageResult<bool> {
        self.maybe_save_at(document, Instant::now()).await
    }

    /// Save immediately.
    pub async fn save(&mut self, document: &DocumentState) -> StorageResult<()> {
        self.storage.save(&self.key, document).await?;
        self.last_change = None;
        self.status = SaveStatus::Saved;
        log::info!("Autosaved document to {}", self.key);
        Ok(())
    }

    /// Load the working document, falling back to the built-in document
    /// when the slot is empty or unreadable.
    pub async fn load_or_default(&mut self) -> DocumentState {
        self.last_change = None;
        self.status = SaveStatus::Idle;
        match self.storage.load(&self.key).await {
            Ok(document) => {
                log::info!("Restored document from {}", self.key);
                document
            }
            Err(StorageError::NotFound(_)) => {
                log::info!("No saved document in {}, starting fresh", self.key);
                DocumentState::default()
            }
            Err(e) => {
                log::warn!("Discarding saved document in {}: {}", self.key, e);
                DocumentState::default()
            }
        }
    }

    /// Remove the saved document (used by reset).
    pub async fn clear(&mut self) -> StorageResult<()> {
        self.storage.delete(&self.key).await?;
        self.last_change = None;
        self.status = SaveStatus::Idle;
        Ok(())
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Platform storage backend.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStorage = crate::storage::FileStorage;

#[cfg(target_arch = "wasm32")]
pub type PlatformStorage = crate::storage::LocalStorage;

/// Create the platform storage backend in its default location.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_storage() -> StorageResult<Arc<PlatformStorage>> {
    Ok(Arc::new(crate::storage::FileStorage::default_location()?))
}

#[cfg(target_arch = "wasm32")]
pub fn create_default_storage() -> StorageResult<Arc<PlatformStorage>> {
    Ok(Arc::new(crate::storage::LocalStorage::new()))
}
