//! Pagecraft Application
//!
//! Native shell around the core editor: configuration file, document
//! restore and autosave, and PNG export through a preview rasterizer.

mod app;
mod raster;

pub use app::{App, AppConfig, AppError, ConfigError};
pub use raster::{PreviewRasterizer, PreviewStyle, encode_png, write_png};
