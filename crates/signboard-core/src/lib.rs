//! Signboard Core Library
//!
//! Widget model, collision-free layout and dashboard state for the Signboard
//! digital signage display.

pub mod collision;
pub mod config;
pub mod dashboard;
pub mod interaction;
pub mod placement;
pub mod storage;
pub mod store;
pub mod weather;
pub mod widget;

#[cfg(test)]
mod test_support;

pub use collision::{any_overlap, first_overlap, overlaps};
pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{Dashboard, DashboardError};
pub use interaction::{Gesture, GestureKind, GestureOutcome};
pub use placement::{PlacementConfig, PlacementError, find_placement, MIN_WIDGET_SIZE};
pub use storage::{AutoSaveManager, FileStorage, LayoutDocument, LayoutStorage, MemoryStorage, StorageError};
pub use store::WidgetStore;
pub use weather::{GeoPoint, NoopWeatherProvider, WeatherError, WeatherProvider, WeatherReport, WeatherResult};
pub use widget::{HorizontalAlignment, SerializableColor, TextStyle, WeatherInfo, Widget, WidgetId, WidgetKind};
