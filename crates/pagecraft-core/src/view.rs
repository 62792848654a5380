//! View scale and screen/document coordinate conversion.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Pixels per millimetre at 96 DPI.
pub const PX_PER_MM: f64 = 96.0 / 25.4;

/// Convert a screen-space pointer delta into a document-space delta.
///
/// The view scale is the on-screen zoom of the page. A scale that is zero,
/// negative or not finite is treated as 1.
pub fn screen_delta_to_doc_delta(delta: Vec2, view_scale: f64) -> Vec2 {
    let scale = sanitize_scale(view_scale);
    Vec2::new(delta.x / scale, delta.y / scale)
}

/// Angle in degrees of the pointer around `center`.
///
/// `pointer` is in page-local screen space, `center` in document space. The
/// pointer is brought into document space on both axes before the angle is
/// taken, so the result does not depend on the zoom level.
pub fn rotation_angle(pointer: Point, center: Point, view_scale: f64) -> f64 {
    let scale = sanitize_scale(view_scale);
    let doc = Point::new(pointer.x / scale, pointer.y / scale);
    (doc.y - center.y).atan2(doc.x - center.x).to_degrees()
}

/// Scale that fits a page of `page_width` pixels into `available_width`.
/// Never zooms in past 1:1 and never returns a non-positive value.
pub fn fit_view_scale(available_width: f64, page_width: f64) -> f64 {
    if !(page_width > 0.0) || !(available_width > 0.0) {
        return 1.0;
    }
    (available_width / page_width).min(1.0)
}

fn sanitize_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 { scale } else { 1.0 }
}

/// Position, size and rotation of a floating element in document space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Top-left corner.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees around the centre. Not normalised.
    pub rotation: f64,
}

impl Geometry {
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self { position, width, height, rotation: 0.0 }
    }

    /// Unrotated bounds.
    pub fn as_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, Size::new(self.width, self.height))
    }

    pub fn center(&self) -> Point {
        self.as_rect().center()
    }
}

/// Live zoom of the page on screen. Presentation only, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewScale(f64);

impl Default for ViewScale {
    fn default() -> Self {
        Self(1.0)
    }
}

impl ViewScale {
    pub fn new(scale: f64) -> Self {
        Self(sanitize_scale(scale))
    }

    /// Scale that fits the page into the available workspace width.
    pub fn fit(available_width: f64, page_width: f64) -> Self {
        Self::new(fit_view_scale(available_width, page_width))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Convert a page-local screen point into document space.
    pub fn screen_to_doc(self, point: Point) -> Point {
        Point::new(point.x / self.0, point.y / self.0)
    }

    /// Convert a document point into page-local screen space.
    pub fn doc_to_screen(self, point: Point) -> Point {
        Point::new(point.x * self.0, point.y * self.0)
    }
}

/// On-screen presentation of the page: zoom and drop shadow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub view_scale: ViewScale,
    pub drop_shadow: bool,
}

impl Default for Presentation {
    fn default() -> Self {
        Self { view_scale: ViewScale::default(), drop_shadow: true }
    }
}

impl Presentation {
    /// Unscaled and without shadow, as the page is captured for export.
    pub fn capture() -> Self {
        Self { view_scale: ViewScale::default(), drop_shadow: false }
    }
}
