//! An editing session over a persisted layout.
//!
//! Outside edit mode the layout is read-only; the widget list still changes as
//! weather data arrives. Leaving edit mode writes the layout out.

use crate::config::DashboardConfig;
use crate::interaction::{Gesture, GestureOutcome};
use crate::storage::{AutoSaveManager, LayoutStorage, StorageError};
use crate::store::WidgetStore;
use crate::weather::WeatherProvider;
use crate::widget::{Widget, WidgetKind};
use std::sync::Arc;
use thiserror::Error;

/// Dashboard errors.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Layout changes require edit mode")]
    NotInEditMode,
    #[error("Unknown widget: {0}")]
    UnknownWidget(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct Dashboard {
    store: WidgetStore,
    autosave: AutoSaveManager,
    edit_mode: bool,
}

impl Dashboard {
    /// Seed a store from `storage` with the default configuration.
    pub async fn load(
        storage: Arc<dyn LayoutStorage>,
        provider: Arc<dyn WeatherProvider>,
    ) -> Result<Self, DashboardError> {
        Self::load_with_config(storage, provider, &DashboardConfig::default()).await
    }

    /// Seed a store from `storage` and start weather lookups for every weather widget.
    pub async fn load_with_config(
        storage: Arc<dyn LayoutStorage>,
        provider: Arc<dyn WeatherProvider>,
        config: &DashboardConfig,
    ) -> Result<Self, DashboardError> {
        let mut autosave = AutoSaveManager::new(storage).with_interval(config.autosave_interval());
        let widgets = autosave.load().await?;
        log::info!("Loaded layout with {} widgets", widgets.len());

        let store = WidgetStore::with_config(widgets, provider, config.placement);
        store.refresh_all_weather();
        Ok(Self {
            store,
            autosave,
            edit_mode: false,
        })
    }

    /// Read access for rendering and for feeding location updates.
    pub fn store(&self) -> &WidgetStore {
        &self.store
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Enter or leave edit mode. Leaving saves the layout.
    pub async fn set_edit_mode(&mut self, enabled: bool) -> Result<(), DashboardError> {
        let was_editing = self.edit_mode;
        self.edit_mode = enabled;
        if was_editing && !enabled {
            self.autosave.save(&self.store.widgets()).await?;
        }
        Ok(())
    }

    /// See [`WidgetStore::add_widget`].
    pub fn add_widget(
        &mut self,
        kind: WidgetKind,
        media_reference: Option<String>,
        text_content: Option<String>,
    ) -> Result<bool, DashboardError> {
        self.require_edit_mode()?;
        let added = self.store.add_widget(kind, media_reference, text_content);
        if added {
            self.autosave.mark_dirty();
        }
        Ok(added)
    }

    pub fn update_widget(&mut self, widget: Widget) -> Result<(), DashboardError> {
        self.require_edit_mode()?;
        if self.store.update_widget(widget) {
            self.autosave.mark_dirty();
        }
        Ok(())
    }

    pub fn remove_widget(&mut self, id: &str) -> Result<(), DashboardError> {
        self.require_edit_mode()?;
        if self.store.remove_widget(id) {
            self.autosave.mark_dirty();
        }
        Ok(())
    }

    pub fn begin_drag(&self, id: &str) -> Result<Gesture, DashboardError> {
        Ok(Gesture::begin_drag(self.gesture_target(id)?))
    }

    pub fn begin_resize(&self, id: &str) -> Result<Gesture, DashboardError> {
        Ok(Gesture::begin_resize(self.gesture_target(id)?))
    }

    /// End a gesture started with [`Self::begin_drag`] or [`Self::begin_resize`].
    pub fn finish_gesture(&mut self, gesture: Gesture) -> Result<GestureOutcome, DashboardError> {
        if !self.edit_mode {
            // Edit mode was left mid-gesture.
            return Ok(gesture.cancel());
        }
        let outcome = gesture.finish(&self.store);
        if matches!(outcome, GestureOutcome::Committed(_)) {
            self.autosave.mark_dirty();
        }
        Ok(outcome)
    }

    /// Save if there are unsaved changes and the autosave interval has passed.
    pub async fn tick(&mut self) -> Result<bool, DashboardError> {
        Ok(self.autosave.maybe_save(&self.store.widgets()).await?)
    }

    /// Flush the layout and end the session.
    pub async fn shutdown(mut self) -> Result<(), DashboardError> {
        self.autosave.save(&self.store.widgets()).await?;
        log::info!("Dashboard saved {} widgets on shutdown", self.store.len());
        Ok(())
    }

    fn require_edit_mode(&self) -> Result<(), DashboardError> {
        if self.edit_mode {
            Ok(())
        } else {
            Err(DashboardError::NotInEditMode)
        }
    }

    fn gesture_target(&self, id: &str) -> Result<Widget, DashboardError> {
        self.require_edit_mode()?;
        self.store
            .get(id)
            .ok_or_else(|| DashboardError::UnknownWidget(id.to_string()))
    }
}
