//! The placed widget entity.

use super::kind::WidgetKind;
use super::style::TextStyle;
use chrono::Timelike;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for widgets.
pub type WidgetId = String;

/// Default corner radius in logical units.
pub const DEFAULT_CORNER_RADIUS: i32 = 12;

/// Errors raised when constructing a widget.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Widget size must be positive, got {width}x{height}")]
    NonPositiveSize { width: i32, height: i32 },
}

/// Weather-specific attributes.
///
/// `city_name`, `temperature`, `description` and `icon_ref` make up the
/// enrichment report; `auto_locate` and `manual_city_name` are user settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherInfo {
    /// Resolved or display city name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
    /// Temperature in degrees Celsius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_ref: Option<String>,
    #[serde(default = "default_auto_locate")]
    pub auto_locate: bool,
    /// Only consulted when `auto_locate` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_city_name: Option<String>,
}

fn default_auto_locate() -> bool {
    true
}

impl Default for WeatherInfo {
    fn default() -> Self {
        Self {
            city_name: None,
            temperature: None,
            description: None,
            icon_ref: None,
            auto_locate: true,
            manual_city_name: None,
        }
    }
}

impl WeatherInfo {
    /// A temperature has been fetched and not yet invalidated.
    pub fn is_resolved(&self) -> bool {
        self.temperature.is_some()
    }

    /// No report data at all: nothing fetched yet, or cleared by a settings change.
    pub fn is_pending(&self) -> bool {
        self.temperature.is_none() && self.description.is_none()
    }

    /// Drop temperature, description and icon.
    pub fn clear_report(&mut self) {
        self.temperature = None;
        self.description = None;
        self.icon_ref = None;
    }

    /// City to query in manual mode.
    pub fn effective_manual_city(&self) -> Option<&str> {
        self.manual_city_name
            .as_deref()
            .or(self.city_name.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// A widget placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub(crate) id: WidgetId,
    pub(crate) kind: WidgetKind,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default = "default_corner_radius")]
    pub corner_radius: i32,
    /// Stored but not used for ordering.
    #[serde(default)]
    pub z_index: i32,
    /// Absent means a placeholder is rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(default)]
    pub style: TextStyle,
    #[serde(default)]
    pub weather: WeatherInfo,
}

fn default_corner_radius() -> i32 {
    DEFAULT_CORNER_RADIUS
}

impl Widget {
    /// Create a new widget with a fresh id.
    pub fn new(kind: WidgetKind, x: i32, y: i32, width: i32, height: i32) -> Result<Self, ModelError> {
        Self::with_id(Uuid::new_v4().to_string(), kind, x, y, width, height)
    }

    /// Reconstruct a widget with a specific id (for storage/tests).
    pub fn with_id(
        id: impl Into<WidgetId>,
        kind: WidgetKind,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<Self, ModelError> {
        check_size(width, height)?;
        Ok(Self {
            id: id.into(),
            kind,
            x,
            y,
            width,
            height,
            corner_radius: DEFAULT_CORNER_RADIUS,
            z_index: 0,
            media_reference: None,
            text_content: None,
            style: TextStyle::default(),
            weather: WeatherInfo::default(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Get the bounds as a kurbo Rect.
    ///
    /// Integer bounds convert to `f64` exactly.
    pub fn rect(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.width),
            f64::from(self.y) + f64::from(self.height),
        )
    }

    /// Copy with a new top-left corner.
    pub fn with_position(&self, x: i32, y: i32) -> Self {
        Self { x, y, ..self.clone() }
    }

    /// Copy with a new size.
    pub fn with_size(&self, width: i32, height: i32) -> Result<Self, ModelError> {
        check_size(width, height)?;
        Ok(Self {
            width,
            height,
            ..self.clone()
        })
    }

    pub fn with_text(&self, text: Option<String>) -> Self {
        Self {
            text_content: text,
            ..self.clone()
        }
    }

    pub fn with_media(&self, media: Option<String>) -> Self {
        Self {
            media_reference: media,
            ..self.clone()
        }
    }

    pub fn with_style(&self, style: TextStyle) -> Self {
        Self {
            style,
            ..self.clone()
        }
    }

    /// Copy with new weather location settings.
    ///
    /// A blank manual city counts as none. When the mode or the manual city
    /// changes the previous report is dropped so the old temperature is never
    /// shown under the new location.
    pub fn with_weather_settings(&self, auto_locate: bool, manual_city: Option<&str>) -> Self {
        let manual_city = manual_city
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        let previous = &self.weather;
        let changed = previous.auto_locate != auto_locate
            || (!auto_locate && previous.manual_city_name != manual_city);

        let mut weather = previous.clone();
        weather.auto_locate = auto_locate;
        if auto_locate {
            weather.manual_city_name = None;
            if changed {
                weather.city_name = None;
            }
        } else {
            weather.manual_city_name = manual_city.clone();
            weather.city_name = manual_city;
        }
        if changed {
            weather.clear_report();
        }

        Self {
            weather,
            ..self.clone()
        }
    }

    /// Text to render right now, if the kind shows text.
    ///
    /// Clocks format the supplied time; it is never stored on the widget.
    pub fn display_text<T: Timelike>(&self, now: &T) -> Option<String> {
        match self.kind {
            WidgetKind::Clock => Some(format!(
                "{:02}:{:02}:{:02}",
                now.hour(),
                now.minute(),
                now.second()
            )),
            WidgetKind::Text => self.text_content.clone(),
            _ => None,
        }
    }
}

fn check_size(width: i32, height: i32) -> Result<(), ModelError> {
    if width <= 0 || height <= 0 {
        return Err(ModelError::NonPositiveSize { width, height });
    }
    Ok(())
}
