//! Widget entity model.
//!
//! Widgets are plain data: identity, kind, integer bounds, styling and the
//! weather report. Changes are expressed as copies with fields replaced; all
//! validation beyond size positivity belongs to the store and the gesture layer.

mod kind;
mod model;
mod style;

pub use kind::WidgetKind;
pub use model::{DEFAULT_CORNER_RADIUS, ModelError, WeatherInfo, Widget, WidgetId};
pub use style::{HorizontalAlignment, SerializableColor, TextStyle};
