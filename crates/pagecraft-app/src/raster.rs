//! Preview rasterizer and PNG encoding.
//!
//! Draws the page background and a box per floating element with tiny-skia,
//! honouring rotation and opacity, with grid lines for tables. Text and image
//! pixels are not drawn; the output is a layout proof.

use kurbo::Rect;
use pagecraft_core::color::parse_css_color;
use pagecraft_core::elements::{ElementKind, FloatingElement};
use pagecraft_core::export::{ExportError, RasterImage, Rasterizer};
use pagecraft_core::storage::BoxFuture;
use pagecraft_core::table::TableData;
use pagecraft_core::DocumentState;
use peniko::Color;
use std::path::Path;
use tiny_skia::{Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Colours used for element boxes.
#[derive(Debug, Clone, Copy)]
pub struct PreviewStyle {
    pub text_fill: Color,
    pub image_fill: Color,
    pub table_fill: Color,
    pub grid_line: Color,
    /// Grid line width in document pixels.
    pub grid_line_width: f64,
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            text_fill: Color::from_rgba8(148, 163, 184, 64),
            image_fill: Color::from_rgba8(203, 213, 225, 255),
            table_fill: Color::from_rgba8(255, 255, 255, 255),
            grid_line: Color::from_rgba8(100, 116, 139, 255),
            grid_line_width: 1.0,
        }
    }
}

/// Rasterizer that draws a layout preview of the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewRasterizer {
    style: PreviewStyle,
}

impl PreviewRasterizer {
    pub fn new(style: PreviewStyle) -> Self {
        Self { style }
    }

    /// Render synchronously.
    pub fn render(&self, document: &DocumentState, scale: f64) -> Result<RasterImage, ExportError> {
        let (width, height) = RasterImage::page_dimensions(document.page_size_px(), scale)?;
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| ExportError::Rasterize(format!("Cannot allocate {}x{} pixmap", width, height)))?;

        let background = parse_css_color(&document.typography.background_color).unwrap_or_else(|| {
            log::warn!(
                "Unsupported page background {:?}, using white",
                document.typography.background_color
            );
            Color::WHITE
        });
        let rgba = background.to_rgba8();
        pixmap.fill(tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a));

        for element in document.elements.layered() {
            self.paint_element(&mut pixmap, element, scale);
        }
        into_raster_image(&pixmap)
    }

    fn paint_element(&self, pixmap: &mut Pixmap, element: &FloatingElement, scale: f64) {
        let geometry = element.geometry();
        let rect = geometry.as_rect();
        let Some(bounds) =
            tiny_skia::Rect::from_ltrb(rect.x0 as f32, rect.y0 as f32, rect.x1 as f32, rect.y1 as f32)
        else {
            log::debug!("Skipping degenerate element {}", element.id());
            return;
        };
        let center = geometry.center();
        let transform = Transform::from_rotate_at(geometry.rotation as f32, center.x as f32, center.y as f32)
            .post_scale(scale as f32, scale as f32);
        let opacity = f32::from(element.opacity) / 100.0;

        let fill = match element.kind() {
            ElementKind::Text(_) => self.style.text_fill,
            ElementKind::Image(_) => self.style.image_fill,
            ElementKind::Table(_) => self.style.table_fill,
        };
        pixmap.fill_rect(bounds, &paint(fill, opacity), transform, None);

        if let ElementKind::Table(content) = element.kind() {
            if let Some(grid) = grid_path(&content.table, rect) {
                let stroke = Stroke { width: self.style.grid_line_width as f32, ..Stroke::default() };
                pixmap.stroke_path(&grid, &paint(self.style.grid_line, opacity), &stroke, transform, None);
            }
        }
    }
}

impl Rasterizer for PreviewRasterizer {
    fn rasterize<'a>(
        &'a self,
        document: &'a DocumentState,
        scale: f64,
    ) -> BoxFuture<'a, Result<RasterImage, ExportError>> {
        Box::pin(async move { self.render(document, scale) })
    }
}

fn paint(color: Color, opacity: f32) -> Paint<'static> {
    let rgba = color.to_rgba8();
    let alpha = (f32::from(rgba.a) * opacity).round() as u8;
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, alpha);
    paint.anti_alias = true;
    paint
}

/// Cell borders of `table` stretched over the element box `rect`.
fn grid_path(table: &TableData, rect: Rect) -> Option<tiny_skia::Path> {
    let size = table.size();
    let sx = if size.width > 0.0 { rect.width() / size.width } else { 1.0 };
    let sy = if size.height > 0.0 { rect.height() / size.height } else { 1.0 };

    let mut builder = PathBuilder::new();
    let mut x = rect.x0;
    builder.move_to(x as f32, rect.y0 as f32);
    builder.line_to(x as f32, rect.y1 as f32);
    for width in &table.column_widths {
        x += width * sx;
        builder.move_to(x as f32, rect.y0 as f32);
        builder.line_to(x as f32, rect.y1 as f32);
    }
    let mut y = rect.y0;
    builder.move_to(rect.x0 as f32, y as f32);
    builder.line_to(rect.x1 as f32, y as f32);
    for height in &table.row_heights {
        y += height * sy;
        builder.move_to(rect.x0 as f32, y as f32);
        builder.line_to(rect.x1 as f32, y as f32);
    }
    builder.finish()
}

/// Unpremultiply the pixmap into straight RGBA.
fn into_raster_image(pixmap: &Pixmap) -> Result<RasterImage, ExportError> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    RasterImage::from_rgba(pixmap.width(), pixmap.height(), data)
}

/// Encode an image as an 8-bit RGBA PNG.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>, ExportError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = ::png::Encoder::new(&mut png_data, image.width(), image.height());
        encoder.set_color(::png::ColorType::Rgba);
        encoder.set_depth(::png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        writer
            .write_image_data(image.as_rgba())
            .map_err(|e| ExportError::Encode(e.to_string()))?;
    }
    Ok(png_data)
}

/// Encode and write `image` to `path`.
pub fn write_png(path: &Path, image: &RasterImage) -> Result<(), ExportError> {
    let data = encode_png(image)?;
    std::fs::write(path, data)?;
    log::info!("Wrote {} ({}x{})", path.display(), image.width(), image.height());
    Ok(())
}
