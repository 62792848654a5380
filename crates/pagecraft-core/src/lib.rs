//! Pagecraft Core Library
//!
//! Platform-agnostic document model, floating element manipulation, table
//! grids, undo history and export orchestration for the Pagecraft page editor.

pub mod color;
pub mod config;
pub mod document;
pub mod editor;
pub mod elements;
pub mod export;
pub mod history;
pub mod interaction;
pub mod page;
pub mod storage;
pub mod surface;
pub mod table;
pub mod view;

pub use config::EditorConfig;
pub use document::{DocumentPatch, DocumentState, TextStylePreset, Typography, WatermarkSettings};
pub use editor::Editor;
pub use elements::{ElementId, ElementKind, ElementPatch, ElementStore, FloatingElement, MIN_ELEMENT_SIZE};
pub use export::{ExportError, Exporter, RasterImage, Rasterizer, export_filename};
pub use history::{DEFAULT_HISTORY_LIMIT, History};
pub use interaction::{DragMode, InteractionController, InteractionEvent, InteractionState};
pub use page::{Orientation, PageSize};
pub use surface::{FormatCommand, TextSurface};
pub use table::{GridEnd, TableData, TableEdit};
pub use view::{Geometry, Presentation, ViewScale};
