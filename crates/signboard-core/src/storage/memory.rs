//! In-memory storage implementation.

use super::{LayoutStorage, StorageError, StorageResult};
use crate::weather::BoxFuture;
use crate::widget::Widget;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    widgets: RwLock<Option<Vec<Widget>>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage that already holds `widgets`.
    pub fn with_widgets(widgets: Vec<Widget>) -> Self {
        Self {
            widgets: RwLock::new(Some(widgets)),
        }
    }

    /// Whether anything has been saved.
    pub fn has_layout(&self) -> bool {
        self.widgets.read().map(|w| w.is_some()).unwrap_or(false)
    }
}

impl LayoutStorage for MemoryStorage {
    fn save_all(&self, widgets: &[Widget]) -> BoxFuture<'_, StorageResult<()>> {
        let widgets = widgets.to_vec();
        Box::pin(async move {
            let mut stored = self
                .widgets
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            *stored = Some(widgets);
            Ok(())
        })
    }

    fn load_all(&self) -> BoxFuture<'_, StorageResult<Vec<Widget>>> {
        Box::pin(async move {
            let stored = self
                .widgets
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(stored.clone().unwrap_or_default())
        })
    }

    fn clear(&self) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut stored = self
                .widgets
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            *stored = None;
            Ok(())
        })
    }
}
