//! Widget kinds.

use serde::{Deserialize, Serialize};

/// The closed set of widget types that can be placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WidgetKind {
    Weather,
    Clock,
    Camera,
    Ad,
    Text,
    Gif,
    Video,
    OnvifCamera,
}

impl WidgetKind {
    /// Get display name for UI.
    pub fn label(&self) -> &'static str {
        match self {
            WidgetKind::Weather => "Weather",
            WidgetKind::Clock => "Clock",
            WidgetKind::Camera => "Camera",
            WidgetKind::Ad => "Advertisement",
            WidgetKind::Text => "Text",
            WidgetKind::Gif => "GIF",
            WidgetKind::Video => "Video",
            WidgetKind::OnvifCamera => "ONVIF Camera",
        }
    }

    /// Footprint used when the widget is first placed, as `(width, height)`.
    pub fn default_size(&self) -> (i32, i32) {
        match self {
            WidgetKind::Weather => (200, 150),
            _ => (150, 100),
        }
    }

    /// Whether the widget renders an external media reference.
    pub fn uses_media(&self) -> bool {
        matches!(
            self,
            WidgetKind::Camera
                | WidgetKind::Ad
                | WidgetKind::Gif
                | WidgetKind::Video
                | WidgetKind::OnvifCamera
        )
    }

    /// Get all widget kinds.
    pub fn all() -> &'static [WidgetKind] {
        &[
            WidgetKind::Weather,
            WidgetKind::Clock,
            WidgetKind::Camera,
            WidgetKind::Ad,
            WidgetKind::Text,
            WidgetKind::Gif,
            WidgetKind::Video,
            WidgetKind::OnvifCamera,
        ]
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes() {
        assert_eq!(WidgetKind::Weather.default_size(), (200, 150));
        for kind in WidgetKind::all().iter().filter(|k| **k != WidgetKind::Weather) {
            assert_eq!(kind.default_size(), (150, 100), "{kind:?}");
        }
    }

    #[test]
    fn test_media_kinds() {
        assert!(WidgetKind::Ad.uses_media());
        assert!(WidgetKind::OnvifCamera.uses_media());
        assert!(!WidgetKind::Clock.uses_media());
        assert!(!WidgetKind::Text.uses_media());
        assert!(!WidgetKind::Weather.uses_media());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&WidgetKind::OnvifCamera).unwrap();
        assert_eq!(json, "\"ONVIF_CAMERA\"");
        let kind: WidgetKind = serde_json::from_str("\"WEATHER\"").unwrap();
        assert_eq!(kind, WidgetKind::Weather);
    }
}
