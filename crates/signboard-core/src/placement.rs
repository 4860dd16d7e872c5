//! Free-space search for newly added widgets.
//!
//! Candidates are scanned left to right along shelves of the widget's own
//! height, starting one margin away from the canvas origin. The scan is a pure
//! function of the kind, the existing widgets and the configuration.

use crate::collision::any_overlap;
use crate::widget::{Widget, WidgetKind};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gap kept between widgets and from the canvas origin.
pub const PLACEMENT_MARGIN: i32 = 16;
/// Horizontal extent of the virtual placement canvas.
pub const CANVAS_WIDTH: i32 = 1000;
/// Vertical extent of the virtual placement canvas.
pub const CANVAS_HEIGHT: i32 = 2000;
/// Number of candidate positions tried before giving up.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;
/// Smallest width or height reachable through interactive resizing.
pub const MIN_WIDGET_SIZE: i32 = 48;

/// Placement failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("No free space for a new widget after {attempts} attempts")]
    NoFreeSpace { attempts: u32 },
}

/// Bounds and budget for the placement scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub margin: i32,
    pub canvas_width: i32,
    pub canvas_height: i32,
    pub max_attempts: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            margin: PLACEMENT_MARGIN,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

/// Find the first free rectangle for a widget of `kind`.
///
/// On a collision the candidate moves right by `width + margin`; once its right
/// edge would pass the canvas width it wraps to the next shelf. The search fails
/// when a shelf's bottom edge would pass the canvas height or the attempt budget
/// is spent.
pub fn find_placement(
    kind: WidgetKind,
    widgets: &[Widget],
    config: &PlacementConfig,
) -> Result<Rect, PlacementError> {
    let (width, height) = kind.default_size();
    let mut x = config.margin;
    let mut y = config.margin;

    for attempt in 0..config.max_attempts {
        if y + height > config.canvas_height {
            log::debug!("Placement for {kind:?} ran past the canvas bottom after {attempt} attempts");
            return Err(PlacementError::NoFreeSpace { attempts: attempt });
        }

        let candidate = Rect::from_origin_size(
            (f64::from(x), f64::from(y)),
            (f64::from(width), f64::from(height)),
        );
        if !any_overlap(None, candidate, widgets, false) {
            return Ok(candidate);
        }

        x += width + config.margin;
        if x + width > config.canvas_width {
            x = config.margin;
            y += height + config.margin;
        }
    }

    log::debug!("Placement for {kind:?} exhausted {} attempts", config.max_attempts);
    Err(PlacementError::NoFreeSpace {
        attempts: config.max_attempts,
    })
}
