//! Application shell: configuration, document restore, export and autosave.

use crate::raster::{PreviewRasterizer, write_png};
use pagecraft_core::export::{ExportError, Exporter};
use pagecraft_core::storage::{AutoSaveManager, FileStorage, SaveStatus, StorageError};
use pagecraft_core::{Editor, EditorConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Config file read from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "pagecraft.toml";

/// Environment variable overriding the config file path.
pub const CONFIG_ENV_VAR: &str = "PAGECRAFT_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Invalid config {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub editor: EditorConfig,
    /// Directory holding saved documents. Defaults to the platform data dir.
    pub storage_dir: Option<PathBuf>,
    /// Directory exported images are written to.
    pub output_dir: PathBuf,
    /// Workspace width the page is fitted into, in screen pixels.
    pub available_width: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            storage_dir: None,
            output_dir: PathBuf::from("."),
            available_width: 1200.0,
        }
    }
}

impl AppConfig {
    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Io { path: path.to_path_buf(), source }),
        };
        let config = toml::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Read the config named by `PAGECRAFT_CONFIG`, or `pagecraft.toml`.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load(&path)
    }

    fn open_storage(&self) -> Result<Arc<FileStorage>, StorageError> {
        let storage = match &self.storage_dir {
            Some(dir) => FileStorage::new(dir.clone())?,
            None => FileStorage::default_location()?,
        };
        log::info!("Documents stored in {}", storage.base_path().display());
        Ok(Arc::new(storage))
    }
}

/// A running editor session with persistence and export wired in.
pub struct App {
    config: AppConfig,
    editor: Editor,
    autosave: AutoSaveManager<FileStorage>,
    exporter: Exporter,
    rasterizer: PreviewRasterizer,
}

impl App {
    /// Restore the working document and start a session on it.
    pub async fn open(config: AppConfig) -> Result<Self, AppError> {
        let storage = config.open_storage()?;
        let mut autosave = AutoSaveManager::from_config(storage, &config.editor);
        let document = autosave.load_or_default().await;

        let mut editor = Editor::with_document(document, &config.editor);
        let scale = editor.fit_to_width(config.available_width);
        log::debug!("View scale {:.3}", scale.get());
        autosave.observe_revision(editor.revision());

        Ok(Self {
            exporter: Exporter::from_config(&config.editor),
            rasterizer: PreviewRasterizer::default(),
            config,
            editor,
            autosave,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Mutable access to the session. Call [`App::tick`] after changes.
    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn save_status(&self) -> SaveStatus {
        self.autosave.status()
    }

    /// Note edits and save once the debounce has elapsed.
    pub async fn tick(&mut self) -> Result<bool, AppError> {
        self.autosave.observe_revision(self.editor.revision());
        Ok(self.autosave.maybe_save(self.editor.document()).await?)
    }

    /// Save pending edits now, regardless of the debounce.
    pub async fn flush(&mut self) -> Result<bool, AppError> {
        self.autosave.observe_revision(self.editor.revision());
        if !self.autosave.is_dirty() {
            return Ok(false);
        }
        self.autosave.save(self.editor.document()).await?;
        Ok(true)
    }

    /// Export the page as PNG into the output directory.
    pub async fn export(&mut self) -> Result<PathBuf, AppError> {
        let exported = self.exporter.export(&mut self.editor, &self.rasterizer).await?;
        std::fs::create_dir_all(&self.config.output_dir).map_err(ExportError::from)?;
        let path = self.config.output_dir.join(&exported.filename);
        write_png(&path, &exported.image)?;
        Ok(path)
    }

    /// Discard the working document and its saved copy.
    pub async fn reset(&mut self) -> Result<(), AppError> {
        self.editor.reset();
        self.autosave.observe_revision(self.editor.revision());
        self.autosave.clear().await?;
        log::info!("Working document discarded");
        Ok(())
    }

    /// Load the configured session, export the page and save.
    pub async fn run() -> Result<(), AppError> {
        let config = AppConfig::load_default()?;
        let mut app = App::open(config).await?;
        let path = app.export().await?;
        log::info!("Exported {}", path.display());
        app.flush().await?;
        Ok(())
    }
}
