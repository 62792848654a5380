//! Image element payload.

use serde::{Deserialize, Serialize};

/// How the image fills its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

impl ObjectFit {
    pub fn css_value(self) -> &'static str {
        match self {
            ObjectFit::Cover => "cover",
            ObjectFit::Contain => "contain",
            ObjectFit::Fill => "fill",
        }
    }

    pub fn all() -> &'static [ObjectFit] {
        &[ObjectFit::Cover, ObjectFit::Contain, ObjectFit::Fill]
    }
}

/// Colour filters applied to an image element. Percentages unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFilters {
    pub brightness: f64,
    pub contrast: f64,
    pub grayscale: f64,
    pub sepia: f64,
    /// Pixels.
    pub blur: f64,
    pub saturate: f64,
    /// Degrees.
    pub hue_rotate: f64,
    pub invert: f64,
}

impl Default for ImageFilters {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            grayscale: 0.0,
            sepia: 0.0,
            blur: 0.0,
            saturate: 100.0,
            hue_rotate: 0.0,
            invert: 0.0,
        }
    }
}

impl ImageFilters {
    /// CSS `filter` value.
    pub fn to_css(&self) -> String {
        format!(
            "brightness({}%) contrast({}%) grayscale({}%) sepia({}%) blur({}px) saturate({}%) hue-rotate({}deg) invert({}%)",
            self.brightness,
            self.contrast,
            self.grayscale,
            self.sepia,
            self.blur,
            self.saturate,
            self.hue_rotate,
            self.invert,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Payload of an image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    /// Image source, usually a data URL.
    pub source: String,
    pub filters: ImageFilters,
    #[serde(default)]
    pub object_fit: ObjectFit,
}

impl ImageContent {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            filters: ImageFilters::default(),
            object_fit: ObjectFit::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_css() {
        let css = ImageFilters::default().to_css();
        assert_eq!(
            css,
            "brightness(100%) contrast(100%) grayscale(0%) sepia(0%) blur(0px) saturate(100%) hue-rotate(0deg) invert(0%)"
        );
        assert!(ImageFilters::default().is_identity());
    }

    #[test]
    fn test_filters_serde_camel_case() {
        let json = serde_json::to_string(&ImageFilters::default()).unwrap();
        assert!(json.contains("\"hueRotate\""));
    }
}
