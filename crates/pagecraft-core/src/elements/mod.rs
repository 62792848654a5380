//! Floating elements positioned over the page.

mod image;
mod store;

pub use image::{ImageContent, ImageFilters, ObjectFit};
pub use store::ElementStore;

use crate::table::{TableData, TableEdit};
use crate::view::Geometry;
use kurbo::{Affine, Point, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for floating elements.
pub type ElementId = Uuid;

/// Minimum width and height of any element.
pub const MIN_ELEMENT_SIZE: f64 = 20.0;
/// Maximum opacity (percent).
pub const MAX_OPACITY: u8 = 100;

/// Payload of a text element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextContent {
    /// Markup rendered inside the box. Opaque to the core.
    pub content: String,
    /// Overrides the page font size when set.
    #[serde(default)]
    pub font_size: Option<String>,
    /// Overrides the page font family when set.
    #[serde(default)]
    pub font_family: Option<String>,
}

impl TextContent {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into(), ..Default::default() }
    }
}

/// Payload of a table element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableContent {
    pub table: TableData,
    #[serde(default)]
    pub font_size: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
}

impl TableContent {
    pub fn new(table: TableData) -> Self {
        Self { table, font_size: None, font_family: None }
    }
}

/// Kind-specific payload. Fixed for the lifetime of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextContent),
    Image(ImageContent),
    Table(TableContent),
}

/// Discriminant of [`ElementKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Text,
    Image,
    Table,
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Text(_) => ElementType::Text,
            ElementKind::Image(_) => ElementType::Image,
            ElementKind::Table(_) => ElementType::Table,
        }
    }
}

/// A positioned, resizable, rotatable object on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingElement {
    pub(crate) id: ElementId,
    /// Top-left corner in document space.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees around the centre.
    #[serde(default)]
    pub rotation: f64,
    /// Opacity in percent (0-100).
    pub opacity: u8,
    /// Paint offset of the element and its selection chrome above the text layer.
    pub z_index: u32,
    kind: ElementKind,
}

impl FloatingElement {
    /// Create an element with a fresh id. Table elements take their size from
    /// the grid; other sizes are raised to [`MIN_ELEMENT_SIZE`].
    pub fn new(kind: ElementKind, geometry: Geometry) -> Self {
        let mut element = Self {
            id: Uuid::new_v4(),
            position: geometry.position,
            width: clamp_size(geometry.width, MIN_ELEMENT_SIZE),
            height: clamp_size(geometry.height, MIN_ELEMENT_SIZE),
            rotation: if geometry.rotation.is_finite() { geometry.rotation } else { 0.0 },
            opacity: MAX_OPACITY,
            z_index: 0,
            kind,
        };
        element.sync_table_size();
        element
    }

    /// Default text box from the sidebar.
    pub fn text_box(content: impl Into<String>) -> Self {
        Self::new(
            ElementKind::Text(TextContent::new(content)),
            Geometry::new(Point::new(100.0, 100.0), 250.0, 80.0),
        )
    }

    /// Default image placement.
    pub fn image(source: impl Into<String>) -> Self {
        Self::new(
            ElementKind::Image(ImageContent::new(source)),
            Geometry::new(Point::new(150.0, 200.0), 300.0, 200.0),
        )
    }

    /// Default table placement; size comes from the grid.
    pub fn table(table: TableData) -> Self {
        Self::new(
            ElementKind::Table(TableContent::new(table)),
            Geometry::new(Point::new(100.0, 100.0), 0.0, 0.0),
        )
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn geometry(&self) -> Geometry {
        Geometry {
            position: self.position,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
        }
    }

    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.kind {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextContent> {
        match &mut self.kind {
            ElementKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageContent> {
        match &self.kind {
            ElementKind::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_image_mut(&mut self) -> Option<&mut ImageContent> {
        match &mut self.kind {
            ElementKind::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Grid of a table element. There is no mutable accessor: edits go through
    /// [`FloatingElement::edit_table`] so the element size stays in sync.
    pub fn as_table(&self) -> Option<&TableData> {
        match &self.kind {
            ElementKind::Table(content) => Some(&content.table),
            _ => None,
        }
    }

    /// Apply a table edit and write the grid size back to the element.
    /// Returns false for non-table elements and refused edits.
    pub fn edit_table(&mut self, edit: TableEdit) -> bool {
        let applied = match &mut self.kind {
            ElementKind::Table(content) => edit.apply(&mut content.table),
            _ => false,
        };
        if applied {
            self.sync_table_size();
        }
        applied
    }

    /// Check whether a document-space point hits the element, honouring rotation.
    pub fn hit_test(&self, point: Point) -> bool {
        let geometry = self.geometry();
        let rotate = Affine::rotate_about(-geometry.rotation.to_radians(), geometry.center());
        geometry.as_rect().contains(rotate * point)
    }

    /// Shallow-merge a patch into the element.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x.filter(|v| v.is_finite()) {
            self.position.x = x;
        }
        if let Some(y) = patch.y.filter(|v| v.is_finite()) {
            self.position.y = y;
        }
        if let Some(rotation) = patch.rotation.filter(|v| v.is_finite()) {
            self.rotation = rotation;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity.min(MAX_OPACITY);
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
        if patch.width.is_some() || patch.height.is_some() {
            let width = patch.width.map_or(self.width, |w| clamp_size(w, self.width));
            let height = patch.height.map_or(self.height, |h| clamp_size(h, self.height));
            match &mut self.kind {
                ElementKind::Table(content) => content.table.fit_to(Size::new(width, height)),
                _ => {
                    self.width = width;
                    self.height = height;
                }
            }
        }

        match &mut self.kind {
            ElementKind::Text(text) => {
                if let Some(content) = &patch.content {
                    text.content.clone_from(content);
                }
                if let Some(size) = &patch.font_size {
                    text.font_size = Some(size.clone());
                }
                if let Some(family) = &patch.font_family {
                    text.font_family = Some(family.clone());
                }
            }
            ElementKind::Image(image) => {
                if let Some(source) = &patch.content {
                    image.source.clone_from(source);
                }
                if let Some(filters) = patch.filters {
                    image.filters = filters;
                }
                if let Some(fit) = patch.object_fit {
                    image.object_fit = fit;
                }
            }
            ElementKind::Table(table) => {
                if let Some(size) = &patch.font_size {
                    table.font_size = Some(size.clone());
                }
                if let Some(family) = &patch.font_family {
                    table.font_family = Some(family.clone());
                }
            }
        }

        self.sync_table_size();
    }

    /// Give the element a new id (used when inserting a copy).
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    /// Restore the element invariants after loading from storage.
    pub(crate) fn normalize(&mut self) {
        self.width = clamp_size(self.width, MIN_ELEMENT_SIZE);
        self.height = clamp_size(self.height, MIN_ELEMENT_SIZE);
        self.opacity = self.opacity.min(MAX_OPACITY);
        if !self.position.x.is_finite() || !self.position.y.is_finite() {
            self.position = Point::ZERO;
        }
        if !self.rotation.is_finite() {
            self.rotation = 0.0;
        }
        if let ElementKind::Table(content) = &mut self.kind {
            if content.table.repair() {
                log::warn!("Repaired inconsistent table grid in element {}", self.id);
            }
        }
        self.sync_table_size();
    }

    fn sync_table_size(&mut self) {
        if let ElementKind::Table(content) = &self.kind {
            let size = content.table.size();
            self.width = size.width;
            self.height = size.height;
        }
    }
}

/// Raise a size to the minimum; non-finite input keeps `fallback`.
fn clamp_size(value: f64, fallback: f64) -> f64 {
    let value = if value.is_finite() { value } else { fallback };
    value.max(MIN_ELEMENT_SIZE)
}

/// Partial update of a floating element. `None` fields are left untouched.
///
/// `content` is the markup of a text element or the source of an image.
/// Kind-specific fields are ignored on elements of another kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<u8>,
    pub z_index: Option<u32>,
    pub content: Option<String>,
    pub font_size: Option<String>,
    pub font_family: Option<String>,
    pub filters: Option<ImageFilters>,
    pub object_fit: Option<ObjectFit>,
}

impl ElementPatch {
    pub fn position(position: Point) -> Self {
        Self { x: Some(position.x), y: Some(position.y), ..Default::default() }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self { width: Some(width), height: Some(height), ..Default::default() }
    }

    pub fn rotation(rotation: f64) -> Self {
        Self { rotation: Some(rotation), ..Default::default() }
    }

    /// Full geometry update.
    pub fn geometry(geometry: Geometry) -> Self {
        Self {
            x: Some(geometry.position.x),
            y: Some(geometry.position.y),
            width: Some(geometry.width),
            height: Some(geometry.height),
            rotation: Some(geometry.rotation),
            ..Default::default()
        }
    }

    /// Build a patch from a text field of the property panel.
    /// Unparseable input falls back to a safe default for the field.
    pub fn from_input(field: NumericField, input: &str) -> Self {
        let value = input.trim().parse::<f64>().ok().filter(|v| v.is_finite());
        match field {
            NumericField::X => Self { x: Some(value.unwrap_or(0.0)), ..Default::default() },
            NumericField::Y => Self { y: Some(value.unwrap_or(0.0)), ..Default::default() },
            NumericField::Width => Self {
                width: Some(value.unwrap_or(MIN_ELEMENT_SIZE)),
                ..Default::default()
            },
            NumericField::Height => Self {
                height: Some(value.unwrap_or(MIN_ELEMENT_SIZE)),
                ..Default::default()
            },
            NumericField::Rotation => {
                Self { rotation: Some(value.unwrap_or(0.0)), ..Default::default() }
            }
            NumericField::Opacity => Self {
                opacity: Some(value.map_or(MAX_OPACITY, |v| v.clamp(0.0, 100.0).round() as u8)),
                ..Default::default()
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Numeric property-panel fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    X,
    Y,
    Width,
    Height,
    Rotation,
    Opacity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::GridEnd;

    #[test]
    fn test_text_box_defaults() {
        let el = FloatingElement::text_box("Hello");
        assert_eq!(el.position, Point::new(100.0, 100.0));
        assert_eq!((el.width, el.height), (250.0, 80.0));
        assert_eq!(el.opacity, 100);
        assert_eq!(el.rotation, 0.0);
        assert_eq!(el.element_type(), ElementType::Text);
        assert_eq!(el.as_text().unwrap().content, "Hello");
    }

    #[test]
    fn test_new_clamps_size() {
        let el = FloatingElement::new(
            ElementKind::Text(TextContent::default()),
            Geometry::new(Point::ZERO, 5.0, f64::NAN),
        );
        assert_eq!(el.width, MIN_ELEMENT_SIZE);
        assert_eq!(el.height, MIN_ELEMENT_SIZE);
    }

    #[test]
    fn test_table_size_from_grid() {
        let el = FloatingElement::table(TableData::default());
        assert_eq!((el.width, el.height), (400.0, 120.0));
    }

    #[test]
    fn test_edit_table_syncs_size() {
        let mut el = FloatingElement::table(TableData::default());
        assert!(el.edit_table(TableEdit::InsertColumn(GridEnd::End)));
        assert_eq!(el.width, 550.0);
        assert!(el.edit_table(TableEdit::RemoveRow));
        assert_eq!(el.height, 60.0);
        assert!(el.edit_table(TableEdit::ResizeColumn { index: 0, width: 1.0 }));
        assert_eq!(el.width, 20.0 + 200.0 + 150.0);
    }

    #[test]
    fn test_edit_table_on_text_is_refused() {
        let mut el = FloatingElement::text_box("x");
        let before = el.clone();
        assert!(!el.edit_table(TableEdit::InsertRow(GridEnd::End)));
        assert_eq!(el, before);
    }

    #[test]
    fn test_patch_clamps_size_and_opacity() {
        let mut el = FloatingElement::text_box("x");
        el.apply_patch(&ElementPatch {
            width: Some(-300.0),
            height: Some(10.0),
            opacity: Some(250),
            ..Default::default()
        });
        assert_eq!((el.width, el.height), (MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE));
        assert_eq!(el.opacity, 100);
    }

    #[test]
    fn test_patch_ignores_mismatched_kind_fields() {
        let mut el = FloatingElement::text_box("x");
        el.apply_patch(&ElementPatch {
            object_fit: Some(ObjectFit::Contain),
            filters: Some(ImageFilters { grayscale: 100.0, ..Default::default() }),
            ..Default::default()
        });
        assert_eq!(el.as_text().unwrap(), &TextContent::new("x"));
    }

    #[test]
    fn test_patch_image_fields() {
        let mut el = FloatingElement::image("data:image/png;base64,AAAA");
        el.apply_patch(&ElementPatch { object_fit: Some(ObjectFit::Fill), ..Default::default() });
        assert_eq!(el.as_image().unwrap().object_fit, ObjectFit::Fill);
    }

    #[test]
    fn test_patch_resizes_table_grid() {
        let mut el = FloatingElement::table(TableData::default());
        el.apply_patch(&ElementPatch::size(800.0, 240.0));
        let table = el.as_table().unwrap();
        assert_eq!(table.column_widths, vec![400.0, 400.0]);
        assert_eq!(table.row_heights, vec![120.0, 120.0]);
        assert_eq!((el.width, el.height), (800.0, 240.0));
    }

    #[test]
    fn test_from_input_fallbacks() {
        assert_eq!(ElementPatch::from_input(NumericField::X, "abc").x, Some(0.0));
        assert_eq!(ElementPatch::from_input(NumericField::Y, " 42 ").y, Some(42.0));
        assert_eq!(
            ElementPatch::from_input(NumericField::Width, "").width,
            Some(MIN_ELEMENT_SIZE)
        );
        assert_eq!(ElementPatch::from_input(NumericField::Opacity, "140").opacity, Some(100));
    }

    #[test]
    fn test_hit_test_rotated() {
        let mut el = FloatingElement::new(
            ElementKind::Text(TextContent::default()),
            Geometry::new(Point::new(0.0, 0.0), 200.0, 20.0),
        );
        assert!(el.hit_test(Point::new(190.0, 10.0)));
        el.rotation = 90.0;
        // Now a vertical bar centred on (100, 10).
        assert!(!el.hit_test(Point::new(190.0, 10.0)));
        assert!(el.hit_test(Point::new(100.0, 90.0)));
    }

    #[test]
    fn test_kind_serializes_with_type_tag() {
        let el = FloatingElement::text_box("x");
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["kind"]["type"], "text");
        let back: FloatingElement = serde_json::from_value(json).unwrap();
        assert_eq!(back, el);
    }
}
