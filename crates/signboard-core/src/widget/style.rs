//! Cosmetic widget attributes.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from a packed `0xAARRGGBB` value, as stored by mobile color pickers.
    pub fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Pack into `0xAARRGGBB`.
    pub fn to_argb(self) -> u32 {
        (u32::from(self.a) << 24) | (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Horizontal placement of text inside a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
}

impl HorizontalAlignment {
    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            HorizontalAlignment::Left => "Left",
            HorizontalAlignment::Center => "Center",
            HorizontalAlignment::Right => "Right",
        }
    }

    /// Get all alignments.
    pub fn all() -> &'static [HorizontalAlignment] {
        &[
            HorizontalAlignment::Left,
            HorizontalAlignment::Center,
            HorizontalAlignment::Right,
        ]
    }
}

/// Styling shared by every widget kind.
///
/// Every field is optional; `None` means "use the theme default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<SerializableColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<SerializableColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_size_sp: Option<u32>,
    #[serde(default)]
    pub is_vertical_text: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_alignment: Option<HorizontalAlignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height_scale: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing_sp: Option<f32>,
    /// Numeric weight (100..=900).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
}

impl TextStyle {
    /// Alignment to render with, falling back to centered text.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.horizontal_alignment.unwrap_or_default()
    }

    /// Line height multiplier, `1.0` when unset.
    pub fn line_height(&self) -> f32 {
        self.line_height_scale.unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_packing() {
        let color = SerializableColor::from_argb(0x80FF_2010);
        assert_eq!(color, SerializableColor::new(0xFF, 0x20, 0x10, 0x80));
        assert_eq!(color.to_argb(), 0x80FF_2010);
    }

    #[test]
    fn test_peniko_conversion() {
        let color = SerializableColor::new(12, 34, 56, 255);
        let peniko_color: Color = color.into();
        assert_eq!(SerializableColor::from(peniko_color), color);
    }

    #[test]
    fn test_empty_style_serializes_compactly() {
        let json = serde_json::to_string(&TextStyle::default()).unwrap();
        assert_eq!(json, r#"{"isVerticalText":false}"#);
    }

    #[test]
    fn test_style_defaults() {
        let style = TextStyle::default();
        assert_eq!(style.alignment(), HorizontalAlignment::Center);
        assert!((style.line_height() - 1.0).abs() < f32::EPSILON);
    }
}
