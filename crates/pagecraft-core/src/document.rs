//! Document state: the page body, its settings and the floating elements.

use crate::elements::{ElementKind, ElementStore, FloatingElement, TextContent};
use crate::page::{Orientation, PageSize, clamp_margin, page_size_mm, page_size_px};
use crate::surface::inline_span;
use crate::view::Geometry;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for text style presets.
pub type PresetId = Uuid;

/// Global typography of the page body. Values are CSS strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub font_size: String,
    pub font_color: String,
    pub background_color: String,
    pub font_family: String,
    pub line_height: String,
    pub letter_spacing: String,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_size: "16px".to_string(),
            font_color: "#0f172a".to_string(),
            background_color: "#ffffff".to_string(),
            font_family: "'Inter', sans-serif".to_string(),
            line_height: "1.5".to_string(),
            letter_spacing: "0".to_string(),
        }
    }
}

/// Large rotated text painted behind the page content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkSettings {
    pub text: String,
    /// Percent, 1 to 50.
    pub opacity: u8,
    /// Degrees, -180 to 180.
    pub rotation: f64,
    /// Pixels, 20 to 300.
    pub font_size: f64,
    pub enabled: bool,
}

impl WatermarkSettings {
    pub const OPACITY_RANGE: (u8, u8) = (1, 50);
    pub const ROTATION_RANGE: (f64, f64) = (-180.0, 180.0);
    pub const FONT_SIZE_RANGE: (f64, f64) = (20.0, 300.0);

    /// Clamp every numeric field into its range.
    pub fn clamped(mut self) -> Self {
        self.opacity = self.opacity.clamp(Self::OPACITY_RANGE.0, Self::OPACITY_RANGE.1);
        self.rotation = clamp_finite(self.rotation, Self::ROTATION_RANGE, 0.0);
        self.font_size = clamp_finite(self.font_size, Self::FONT_SIZE_RANGE, 100.0);
        self
    }
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            text: "PAGECRAFT".to_string(),
            opacity: 10,
            rotation: -45.0,
            font_size: 100.0,
            enabled: false,
        }
    }
}

fn clamp_finite(value: f64, (min, max): (f64, f64), fallback: f64) -> f64 {
    if value.is_finite() { value.clamp(min, max) } else { fallback }
}

/// A named text style that can be stamped onto the selected text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStylePreset {
    pub id: PresetId,
    pub name: String,
    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
    pub color: String,
    pub outline_color: String,
    pub outline_width: String,
}

impl TextStylePreset {
    /// A preset with a fresh id and no outline.
    pub fn new(name: impl Into<String>, font_family: &str, font_size: &str, font_weight: &str, color: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            font_family: font_family.to_string(),
            font_size: font_size.to_string(),
            font_weight: font_weight.to_string(),
            color: color.to_string(),
            outline_color: "#000000".to_string(),
            outline_width: "0px".to_string(),
        }
    }

    pub fn with_outline(mut self, width: &str, color: &str) -> Self {
        self.outline_width = width.to_string();
        self.outline_color = color.to_string();
        self
    }

    /// Inline CSS declarations for this preset.
    pub fn inline_style(&self) -> String {
        format!(
            "font-family: {}; font-size: {}; font-weight: {}; color: {}; -webkit-text-stroke: {} {};",
            self.font_family,
            self.font_size,
            self.font_weight,
            self.color,
            self.outline_width,
            self.outline_color,
        )
    }

    /// Markup wrapping `text` in this style.
    pub fn wrap(&self, text: &str) -> String {
        inline_span(&self.inline_style(), text)
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentState {
    pub title: String,
    /// Markup of the page body, owned by the text surface.
    pub content: String,
    #[serde(default)]
    pub typography: Typography,
    /// Page margin in millimetres.
    pub margin: f64,
    #[serde(default)]
    pub page_size: PageSize,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub elements: ElementStore,
    #[serde(default)]
    pub presets: Vec<TextStylePreset>,
    #[serde(default)]
    pub watermark: Option<WatermarkSettings>,
}

impl Default for DocumentState {
    /// The welcome document shown on first start and after a reset.
    fn default() -> Self {
        let mut elements = ElementStore::new();
        let mut badge = FloatingElement::new(
            ElementKind::Text(TextContent::new(WELCOME_BADGE)),
            Geometry { position: Point::new(550.0, 50.0), width: 160.0, height: 40.0, rotation: 15.0 },
        );
        badge.z_index = 100;
        elements.push(badge);

        Self {
            title: "Welcome_to_Pagecraft".to_string(),
            content: WELCOME_CONTENT.to_string(),
            typography: Typography::default(),
            margin: 20.0,
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            elements,
            presets: Vec::new(),
            watermark: Some(WatermarkSettings::default()),
        }
    }
}

impl DocumentState {
    /// An empty page with default settings.
    pub fn blank() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            elements: ElementStore::new(),
            watermark: None,
            ..Self::default()
        }
    }

    pub fn page_size_mm(&self) -> Size {
        page_size_mm(self.page_size, self.orientation)
    }

    pub fn page_size_px(&self) -> Size {
        page_size_px(self.page_size, self.orientation)
    }

    /// Merge a patch into the document. Values are clamped on write.
    pub fn apply_patch(&mut self, patch: DocumentPatch) {
        let DocumentPatch {
            title,
            content,
            font_size,
            font_color,
            background_color,
            font_family,
            line_height,
            letter_spacing,
            margin,
            page_size,
            orientation,
            elements,
            presets,
            watermark,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        let typography = &mut self.typography;
        for (field, value) in [
            (&mut typography.font_size, font_size),
            (&mut typography.font_color, font_color),
            (&mut typography.background_color, background_color),
            (&mut typography.font_family, font_family),
            (&mut typography.line_height, line_height),
            (&mut typography.letter_spacing, letter_spacing),
        ] {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(margin) = margin {
            self.margin = clamp_margin(margin);
        }
        if let Some(page_size) = page_size {
            self.page_size = page_size;
        }
        if let Some(orientation) = orientation {
            self.orientation = orientation;
        }
        if let Some(mut elements) = elements {
            elements.normalize();
            self.elements = elements;
        }
        if let Some(presets) = presets {
            self.presets.clear();
            for preset in presets {
                self.add_preset(preset);
            }
        }
        if let Some(watermark) = watermark {
            self.watermark = Some(watermark.clamped());
        }
    }

    /// Watermark settings, falling back to the defaults when unset.
    pub fn watermark_or_default(&self) -> WatermarkSettings {
        self.watermark.clone().unwrap_or_default()
    }

    pub fn preset(&self, id: PresetId) -> Option<&TextStylePreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Add a preset, replacing any preset with the same id.
    pub fn add_preset(&mut self, preset: TextStylePreset) {
        match self.presets.iter_mut().find(|p| p.id == preset.id) {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
    }

    /// Remove a preset. Returns false if no preset has that id.
    pub fn remove_preset(&mut self, id: PresetId) -> bool {
        let before = self.presets.len();
        self.presets.retain(|p| p.id != id);
        self.presets.len() != before
    }

    /// Restore invariants on a document that came from storage.
    pub fn normalize(&mut self) {
        if !(0.0..=crate::page::MAX_MARGIN_MM).contains(&self.margin) {
            log::warn!("Clamping out-of-range margin {}", self.margin);
            self.margin = clamp_margin(self.margin);
        }
        self.elements.normalize();
        let presets = std::mem::take(&mut self.presets);
        for preset in presets {
            self.add_preset(preset);
        }
        self.watermark = self.watermark.take().map(WatermarkSettings::clamped);
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize the document to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON and restore its invariants.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut document: Self = serde_json::from_str(json)?;
        document.normalize();
        Ok(document)
    }
}

/// Partial update of the document. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub font_size: Option<String>,
    pub font_color: Option<String>,
    pub background_color: Option<String>,
    pub font_family: Option<String>,
    pub line_height: Option<String>,
    pub letter_spacing: Option<String>,
    pub margin: Option<f64>,
    pub page_size: Option<PageSize>,
    pub orientation: Option<Orientation>,
    pub elements: Option<ElementStore>,
    pub presets: Option<Vec<TextStylePreset>>,
    pub watermark: Option<WatermarkSettings>,
}

impl DocumentPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Default::default() }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Default::default() }
    }

    pub fn margin(margin: f64) -> Self {
        Self { margin: Some(margin), ..Default::default() }
    }

    pub fn page(page_size: PageSize, orientation: Orientation) -> Self {
        Self { page_size: Some(page_size), orientation: Some(orientation), ..Default::default() }
    }

    pub fn elements(elements: ElementStore) -> Self {
        Self { elements: Some(elements), ..Default::default() }
    }

    pub fn watermark(watermark: WatermarkSettings) -> Self {
        Self { watermark: Some(watermark), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

const WELCOME_BADGE: &str = "<div style=\"background: #fbbf24; color: #000; padding: 10px 20px; border-radius: 50px; font-weight: 900; font-size: 12px;\">NEW VERSION 1.0</div>";

const WELCOME_CONTENT: &str = r#"<div style="text-align: center; margin-bottom: 30px; border-bottom: 3px solid #4f46e1; padding-bottom: 15px;">
  <h1 style="font-size: 42px; font-weight: 900; color: #1e1b4b; margin-bottom: 5px;">Welcome to Pagecraft</h1>
  <p style="font-size: 16px; font-weight: 700; color: #4f46e1; text-transform: uppercase; letter-spacing: 3px;">Pages, posters and letters</p>
</div>
<div style="margin-bottom: 25px; line-height: 1.6; text-align: justify;">
  <h2 style="font-size: 24px; font-weight: 800; color: #1e293b; margin-bottom: 10px;">Create without limits</h2>
  <p>Type straight onto the page, then drop text boxes, images and tables anywhere on top of it. Drag to move, pull the corner to resize and use the handle to rotate.</p>
</div>
<ul style="margin-left: 15px; font-size: 13px; color: #475569;">
  <li><b>Floating elements:</b> place text, images and tables freely.</li>
  <li><b>Undo everything:</b> every committed change can be undone.</li>
  <li><b>High resolution export:</b> PNG at five times the page resolution.</li>
</ul>"#;
