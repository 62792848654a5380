//! Editor configuration.

use crate::history::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};

/// Default storage slot of the autosaved document.
pub const DEFAULT_STORAGE_KEY: &str = "pagecraft_autosave";
/// Default delay between the last change and the autosave, in milliseconds.
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 1000;
/// Default export resolution multiplier.
pub const DEFAULT_EXPORT_SCALE: f64 = 5.0;

/// Tunables of an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo states.
    pub history_limit: usize,
    /// Quiet period before the document is saved.
    pub autosave_debounce_ms: u64,
    /// Storage slot of the autosaved document.
    pub storage_key: String,
    /// Pixel multiplier applied when rasterizing for export.
    pub export_scale: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            autosave_debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            export_scale: DEFAULT_EXPORT_SCALE,
        }
    }
}

impl EditorConfig {
    /// Export scale with non-positive values replaced by the default.
    pub fn effective_export_scale(&self) -> f64 {
        if self.export_scale.is_finite() && self.export_scale > 0.0 {
            self.export_scale
        } else {
            log::warn!("Invalid export scale {}, using {}", self.export_scale, DEFAULT_EXPORT_SCALE);
            DEFAULT_EXPORT_SCALE
        }
    }
}
