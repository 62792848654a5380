//! CSS colour strings used by document settings.

use peniko::Color;

/// Parse a CSS colour as stored in document settings.
///
/// Supports `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `transparent`, `white`
/// and `black`. Anything else returns `None` and the caller picks a fallback.
pub fn parse_css_color(color: &str) -> Option<Color> {
    let color = color.trim();
    match color.to_ascii_lowercase().as_str() {
        "transparent" => return Some(Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(Color::from_rgba8(255, 255, 255, 255)),
        "black" => return Some(Color::from_rgba8(0, 0, 0, 255)),
        _ => {}
    }

    let hex = color.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range).and_then(|digits| u8::from_str_radix(digits, 16).ok())
    };
    // #rgb -> #rrggbb
    let short = |index: usize| channel(index..index + 1).map(|v| v * 17);

    match hex.len() {
        3 => Some(Color::from_rgba8(short(0)?, short(1)?, short(2)?, 255)),
        4 => Some(Color::from_rgba8(short(0)?, short(1)?, short(2)?, short(3)?)),
        6 => Some(Color::from_rgba8(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
        8 => Some(Color::from_rgba8(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => None,
    }
}
