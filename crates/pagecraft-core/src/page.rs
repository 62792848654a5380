//! Page format and physical dimensions.

use crate::view::PX_PER_MM;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Maximum page margin in millimetres.
pub const MAX_MARGIN_MM: f64 = 80.0;

/// Paper size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Legal,
}

impl PageSize {
    /// Portrait dimensions in millimetres.
    pub fn portrait_mm(self) -> Size {
        match self {
            PageSize::A4 => Size::new(210.0, 297.0),
            PageSize::Legal => Size::new(216.0, 356.0),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Legal => "Legal",
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page dimensions in millimetres for a size and orientation.
pub fn page_size_mm(size: PageSize, orientation: Orientation) -> Size {
    let portrait = size.portrait_mm();
    match orientation {
        Orientation::Portrait => portrait,
        Orientation::Landscape => Size::new(portrait.height, portrait.width),
    }
}

/// Page dimensions in document pixels.
pub fn page_size_px(size: PageSize, orientation: Orientation) -> Size {
    let mm = page_size_mm(size, orientation);
    Size::new(mm.width * PX_PER_MM, mm.height * PX_PER_MM)
}

/// Clamp a margin to the supported range. Non-finite input becomes 0.
pub fn clamp_margin(margin: f64) -> f64 {
    if margin.is_finite() { margin.clamp(0.0, MAX_MARGIN_MM) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_portrait_pixels() {
        let px = page_size_px(PageSize::A4, Orientation::Portrait);
        assert!((px.width - 793.700_787).abs() < 1e-3);
        assert!((px.height - 1122.519_685).abs() < 1e-3);
    }

    #[test]
    fn test_landscape_swaps_axes() {
        let portrait = page_size_mm(PageSize::Legal, Orientation::Portrait);
        let landscape = page_size_mm(PageSize::Legal, Orientation::Landscape);
        assert_eq!(portrait.width, landscape.height);
        assert_eq!(portrait.height, landscape.width);
        assert_eq!(landscape, Size::new(356.0, 216.0));
    }

    #[test]
    fn test_clamp_margin() {
        assert_eq!(clamp_margin(-5.0), 0.0);
        assert_eq!(clamp_margin(20.0), 20.0);
        assert_eq!(clamp_margin(120.0), MAX_MARGIN_MM);
        assert_eq!(clamp_margin(f64::NAN), 0.0);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&PageSize::Legal).unwrap(), "\"legal\"");
        assert_eq!(serde_json::to_string(&Orientation::Landscape).unwrap(), "\"landscape\"");
    }
}
