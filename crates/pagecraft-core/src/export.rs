//! Raster export of the page.
//!
//! The core does not draw. A [`Rasterizer`] turns the document into pixels;
//! [`Exporter`] prepares the editor for capture, gates re-entry and restores
//! the on-screen presentation afterwards on every path.

use crate::config::EditorConfig;
use crate::document::DocumentState;
use crate::editor::Editor;
use crate::storage::BoxFuture;
use crate::view::Presentation;
use kurbo::Size;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Filename used when the document has no usable title.
pub const DEFAULT_EXPORT_NAME: &str = "Pagecraft_Export";

/// Largest image an export may allocate.
pub const MAX_EXPORT_PIXELS: usize = 1 << 26;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("An export is already in progress")]
    Busy,
    #[error("Rasterization failed: {0}")]
    Rasterize(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// RGBA8 pixel buffer, row-major, no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// A fully transparent image.
    pub fn new(width: u32, height: u32) -> Result<Self, ExportError> {
        let len = Self::byte_len(width, height)?;
        Ok(Self { width, height, pixels: vec![0; len] })
    }

    /// Buffer length for `width` x `height`, refusing more than
    /// [`MAX_EXPORT_PIXELS`].
    fn byte_len(width: u32, height: u32) -> Result<usize, ExportError> {
        (width as usize)
            .checked_mul(height as usize)
            .filter(|&count| count <= MAX_EXPORT_PIXELS)
            .and_then(|count| count.checked_mul(4))
            .ok_or_else(|| {
                ExportError::Rasterize(format!(
                    "Output size {}x{} exceeds {} pixels",
                    width, height, MAX_EXPORT_PIXELS
                ))
            })
    }

    /// Wrap existing RGBA data. The length must be `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ExportError> {
        let expected = Self::byte_len(width, height)?;
        if pixels.len() != expected {
            return Err(ExportError::Rasterize(format!(
                "Expected {} bytes for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    /// Output dimensions for a page of `size` document pixels at `scale`.
    pub fn page_dimensions(size: Size, scale: f64) -> Result<(u32, u32), ExportError> {
        let width = (size.width * scale).round();
        let height = (size.height * scale).round();
        if !(width >= 1.0 && height >= 1.0) || width > u32::MAX as f64 || height > u32::MAX as f64 {
            return Err(ExportError::Rasterize(format!("Invalid output size {}x{}", width, height)));
        }
        let (width, height) = (width as u32, height as u32);
        Self::byte_len(width, height)?;
        Ok((width, height))
    }

    /// Blank image sized for a page of `size` document pixels at `scale`.
    pub fn for_page(size: Size, scale: f64) -> Result<Self, ExportError> {
        let (width, height) = Self::page_dimensions(size, scale)?;
        Self::new(width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_rgba_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel at (x, y), or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }
}

/// Turns a document into pixels.
pub trait Rasterizer {
    /// Render `document` at `scale` output pixels per document pixel.
    fn rasterize<'a>(
        &'a self,
        document: &'a DocumentState,
        scale: f64,
    ) -> BoxFuture<'a, Result<RasterImage, ExportError>>;
}

/// Holds the editor in capture presentation and puts the previous
/// presentation back when dropped.
pub struct PresentationGuard<'a> {
    editor: &'a mut Editor,
    saved: Presentation,
}

impl<'a> PresentationGuard<'a> {
    pub fn new(editor: &'a mut Editor) -> Self {
        let saved = editor.presentation();
        editor.set_presentation(Presentation::capture());
        Self { editor, saved }
    }

    /// Presentation that will be restored.
    pub fn saved(&self) -> Presentation {
        self.saved
    }
}

impl Deref for PresentationGuard<'_> {
    type Target = Editor;

    fn deref(&self) -> &Editor {
        self.editor
    }
}

impl DerefMut for PresentationGuard<'_> {
    fn deref_mut(&mut self) -> &mut Editor {
        self.editor
    }
}

impl Drop for PresentationGuard<'_> {
    fn drop(&mut self) {
        self.editor.set_presentation(self.saved);
    }
}

/// Clears the busy flag when the export ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A finished export.
#[derive(Debug)]
pub struct ExportedImage {
    pub filename: String,
    pub image: RasterImage,
}

/// Runs exports one at a time.
#[derive(Debug)]
pub struct Exporter {
    busy: AtomicBool,
    scale: f64,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_EXPORT_SCALE)
    }
}

impl Exporter {
    pub fn new(scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { crate::config::DEFAULT_EXPORT_SCALE };
        Self { busy: AtomicBool::new(false), scale }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.effective_export_scale())
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Capture the editor's document.
    ///
    /// Selection and any open drag are cleared first. The view scale and
    /// drop shadow are neutralised for the capture and restored afterwards,
    /// on success and on failure. A call made while another is still in
    /// flight fails with [`ExportError::Busy`] and touches nothing.
    pub async fn export<R: Rasterizer + ?Sized>(
        &self,
        editor: &mut Editor,
        rasterizer: &R,
    ) -> Result<ExportedImage, ExportError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("Export requested while another is running");
            return Err(ExportError::Busy);
        }
        let _busy = BusyGuard(&self.busy);

        editor.prepare_export();
        let filename = export_filename(&editor.document().title);
        let guard = PresentationGuard::new(editor);

        log::info!("Exporting {} at {}x", filename, self.scale);
        match rasterizer.rasterize(guard.document(), self.scale).await {
            Ok(image) => {
                log::info!("Exported {} ({}x{})", filename, image.width(), image.height());
                Ok(ExportedImage { filename, image })
            }
            Err(e) => {
                log::error!("Export of {} failed: {}", filename, e);
                Err(e)
            }
        }
    }
}

/// Download filename for a document title: path separators replaced,
/// `.png` appended, a default used for a blank title.
pub fn export_filename(title: &str) -> String {
    let title = title.trim();
    let stem: String = if title.is_empty() {
        DEFAULT_EXPORT_NAME.to_string()
    } else {
        title.chars().map(|c| if c == '/' || c == '\\' { '_' } else { c }).collect()
    };
    format!("{}.png", stem)
}
