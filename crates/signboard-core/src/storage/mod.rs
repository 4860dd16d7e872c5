//! Layout persistence.

mod autosave;
mod file;
mod memory;

pub use autosave::{AutoSaveManager, DEFAULT_AUTOSAVE_INTERVAL_SECS};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::weather::BoxFuture;
use crate::widget::Widget;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current layout file format version.
pub const LAYOUT_VERSION: u32 = 1;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// On-disk wrapper around the widget list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Informational only; no migrations exist yet.
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

fn default_version() -> u32 {
    LAYOUT_VERSION
}

impl LayoutDocument {
    pub fn new(widgets: Vec<Widget>) -> Self {
        Self {
            version: LAYOUT_VERSION,
            widgets,
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON, dropping widgets whose stored size is not positive.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_str(json)?;
        doc.widgets.retain(|w| {
            let valid = w.width > 0 && w.height > 0;
            if !valid {
                log::warn!(
                    "Dropping stored widget {} with size {}x{}",
                    w.id(),
                    w.width,
                    w.height
                );
            }
            valid
        });
        Ok(doc)
    }
}

/// Backend that holds the whole layout as one unit.
pub trait LayoutStorage: Send + Sync {
    /// Replace the stored layout with `widgets`.
    fn save_all(&self, widgets: &[Widget]) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the stored layout; an empty list if nothing was ever saved.
    fn load_all(&self) -> BoxFuture<'_, StorageResult<Vec<Widget>>>;

    /// Forget the stored layout.
    fn clear(&self) -> BoxFuture<'_, StorageResult<()>>;
}
