//! Periodic layout persistence.

use super::{LayoutStorage, StorageResult};
use crate::widget::Widget;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Tracks unsaved layout changes and writes them out when due.
pub struct AutoSaveManager {
    storage: Arc<dyn LayoutStorage>,
    interval: Duration,
    last_save: Option<Instant>,
    dirty: bool,
}

impl AutoSaveManager {
    pub fn new(storage: Arc<dyn LayoutStorage>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Dirty and the interval has passed since the last save.
    pub fn should_save(&self) -> bool {
        if !self.dirty {
            return false;
        }

        match self.last_save {
            Some(last) => last.elapsed() >= self.interval,
            None => true,
        }
    }

    /// Save if [`should_save`](Self::should_save). Returns whether a save ran.
    pub async fn maybe_save(&mut self, widgets: &[Widget]) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }

        self.save(widgets).await?;
        Ok(true)
    }

    /// Write the layout now, regardless of the dirty flag.
    pub async fn save(&mut self, widgets: &[Widget]) -> StorageResult<()> {
        self.storage.save_all(widgets).await?;
        self.last_save = Some(Instant::now());
        self.dirty = false;
        log::debug!("Auto-saved {} widgets", widgets.len());
        Ok(())
    }

    /// Load the persisted layout and reset the dirty state.
    pub async fn load(&mut self) -> StorageResult<Vec<Widget>> {
        let widgets = self.storage.load_all().await?;
        self.dirty = false;
        self.last_save = Some(Instant::now());
        Ok(widgets)
    }

    pub fn storage(&self) -> &Arc<dyn LayoutStorage> {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::widget::WidgetKind;

    fn widget(id: &str) -> Widget {
        Widget::with_id(id, WidgetKind::Clock, 0, 0, 10, 10).unwrap()
    }

    #[test]
    fn test_autosave_manager_creation() {
        let manager = AutoSaveManager::new(Arc::new(MemoryStorage::new()));

        assert!(!manager.is_dirty());
        assert!(!manager.should_save());
        assert_eq!(manager.interval(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_save_clears_dirty() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(storage.clone());

        manager.mark_dirty();
        assert!(manager.should_save());
        assert!(manager.maybe_save(&[widget("a")]).await.unwrap());

        assert!(!manager.is_dirty());
        assert_eq!(storage.load_all().await.unwrap(), vec![widget("a")]);
    }

    #[tokio::test]
    async fn test_interval_throttles_saves() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(storage.clone()).with_interval(Duration::from_secs(3600));

        manager.mark_dirty();
        assert!(manager.maybe_save(&[widget("a")]).await.unwrap());

        manager.mark_dirty();
        assert!(!manager.maybe_save(&[widget("b")]).await.unwrap());
        assert!(manager.is_dirty());
        assert_eq!(storage.load_all().await.unwrap(), vec![widget("a")]);

        // An explicit save ignores the interval.
        manager.save(&[widget("b")]).await.unwrap();
        assert_eq!(storage.load_all().await.unwrap(), vec![widget("b")]);
    }

    #[tokio::test]
    async fn test_clean_manager_skips_save() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(storage.clone()).with_interval(Duration::ZERO);

        assert!(!manager.maybe_save(&[widget("a")]).await.unwrap());
        assert!(!storage.has_layout());
    }

    #[tokio::test]
    async fn test_load_resets_dirty() {
        let storage = Arc::new(MemoryStorage::with_widgets(vec![widget("a")]));
        let mut manager = AutoSaveManager::new(storage);
        manager.mark_dirty();

        assert_eq!(manager.load().await.unwrap(), vec![widget("a")]);
        assert!(!manager.is_dirty());
    }
}
