//! Drag and resize gestures on placed widgets.
//!
//! A gesture follows the pointer freely, colliding or not, so the widget can be
//! highlighted while it overlaps a neighbour. Only the end of the gesture is
//! validated: a colliding final rectangle is reverted to the one captured when
//! the gesture began.

use crate::placement::MIN_WIDGET_SIZE;
use crate::store::WidgetStore;
use crate::widget::{Widget, WidgetId};
use kurbo::{Rect, Vec2};

/// What the pointer is doing to the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Moving the whole widget.
    Drag,
    /// Dragging the bottom-right resize handle.
    Resize,
}

/// Result of ending a gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// The final rectangle was free and has been written to the store.
    Committed(Widget),
    /// The final rectangle collided (or the gesture was cancelled); the widget
    /// stays at this pre-gesture rectangle.
    Reverted(Rect),
}

/// State of an active drag or resize.
#[derive(Debug, Clone)]
pub struct Gesture {
    kind: GestureKind,
    /// Widget as stored when the gesture started.
    original: Widget,
    /// Live rectangle shown under the pointer.
    current: Rect,
    is_colliding: bool,
}

impl Gesture {
    /// Start moving `widget`.
    pub fn begin_drag(widget: Widget) -> Self {
        Self::new(GestureKind::Drag, widget)
    }

    /// Start resizing `widget` from its bottom-right corner.
    pub fn begin_resize(widget: Widget) -> Self {
        Self::new(GestureKind::Resize, widget)
    }

    fn new(kind: GestureKind, widget: Widget) -> Self {
        let current = widget.rect();
        Self {
            kind,
            original: widget,
            current,
            is_colliding: false,
        }
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn widget_id(&self) -> &WidgetId {
        // Ids are immutable, so the snapshot's id is the live one.
        &self.original.id
    }

    /// Rectangle to draw right now.
    pub fn current_rect(&self) -> Rect {
        self.current
    }

    /// Rectangle captured when the gesture began.
    pub fn original_rect(&self) -> Rect {
        self.original.rect()
    }

    /// Whether the live rectangle overlaps another widget.
    pub fn is_colliding(&self) -> bool {
        self.is_colliding
    }

    /// Feed one pointer movement.
    ///
    /// Returns whether the new live rectangle collides.
    pub fn apply_delta(&mut self, delta: Vec2, store: &WidgetStore) -> bool {
        self.current = match self.kind {
            GestureKind::Drag => self.current + delta,
            GestureKind::Resize => {
                let floor = f64::from(MIN_WIDGET_SIZE);
                let width = (self.current.width() + delta.x).max(floor);
                let height = (self.current.height() + delta.y).max(floor);
                Rect::from_origin_size(self.current.origin(), (width, height))
            }
        };
        self.is_colliding = self.collides(self.current, store);
        self.is_colliding
    }

    /// End the gesture, committing the live rectangle unless it collides.
    pub fn finish(self, store: &WidgetStore) -> GestureOutcome {
        let final_rect = self.snapped();
        if self.collides(final_rect, store) {
            log::debug!(
                "{:?} of {} ended colliding, reverting",
                self.kind,
                self.original.id()
            );
            return GestureOutcome::Reverted(self.original.rect());
        }

        // Re-read so edits that landed during the gesture (e.g. weather) survive.
        let base = store
            .get(self.original.id())
            .unwrap_or_else(|| self.original.clone());
        let committed = match self.kind {
            GestureKind::Drag => base.with_position(final_rect.x0 as i32, final_rect.y0 as i32),
            GestureKind::Resize => {
                match base.with_size(final_rect.width() as i32, final_rect.height() as i32) {
                    Ok(widget) => widget,
                    Err(err) => {
                        log::warn!("Resize of {} produced an invalid size: {err}", base.id());
                        return GestureOutcome::Reverted(self.original.rect());
                    }
                }
            }
        };
        store.update_widget(committed.clone());
        GestureOutcome::Committed(committed)
    }

    /// Abort the gesture without touching the store.
    pub fn cancel(self) -> GestureOutcome {
        GestureOutcome::Reverted(self.original.rect())
    }

    /// Live rectangle rounded to the integer grid widgets are stored on.
    fn snapped(&self) -> Rect {
        let floor = f64::from(MIN_WIDGET_SIZE);
        match self.kind {
            GestureKind::Drag => Rect::from_origin_size(
                (self.current.x0.round(), self.current.y0.round()),
                self.original.rect().size(),
            ),
            GestureKind::Resize => Rect::from_origin_size(
                self.current.origin(),
                (
                    self.current.width().round().max(floor),
                    self.current.height().round().max(floor),
                ),
            ),
        }
    }

    fn collides(&self, rect: Rect, store: &WidgetStore) -> bool {
        store.check_collision_with_existing(&self.original, rect.x0, rect.y0, rect.width(), rect.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::NoopWeatherProvider;
    use crate::widget::WidgetKind;
    use std::sync::Arc;

    fn store_with_two() -> (WidgetStore, Widget, Widget) {
        let store = WidgetStore::new(Vec::new(), Arc::new(NoopWeatherProvider));
        store.add_widget(WidgetKind::Clock, None, None);
        store.add_widget(WidgetKind::Clock, None, None);
        let widgets = store.widgets();
        (store, widgets[0].clone(), widgets[1].clone())
    }

    #[tokio::test]
    async fn test_drag_commits_free_position() {
        let (store, first, _) = store_with_two();
        let mut gesture = Gesture::begin_drag(first.clone());

        assert!(!gesture.apply_delta(Vec2::new(0.0, 150.0), &store));
        assert!(!gesture.apply_delta(Vec2::new(10.4, 0.3), &store));

        match gesture.finish(&store) {
            GestureOutcome::Committed(widget) => {
                assert_eq!((widget.x, widget.y), (26, 166));
                assert_eq!((widget.width, widget.height), (150, 100));
            }
            other => panic!("expected commit, got {other:?}"),
        }
        let stored = store.get(first.id()).unwrap();
        assert_eq!((stored.x, stored.y), (26, 166));
    }

    #[tokio::test]
    async fn test_drag_follows_pointer_while_colliding() {
        let (store, first, _) = store_with_two();
        let mut gesture = Gesture::begin_drag(first.clone());

        assert!(gesture.apply_delta(Vec2::new(100.0, 0.0), &store));
        assert!(gesture.is_colliding());
        assert_eq!(gesture.current_rect().x0, 116.0);

        assert!(!gesture.apply_delta(Vec2::new(0.0, 200.0), &store));
        assert!(!gesture.is_colliding());
    }

    #[tokio::test]
    async fn test_drag_ending_in_collision_reverts() {
        let (store, first, second) = store_with_two();
        let mut gesture = Gesture::begin_drag(first.clone());
        gesture.apply_delta(Vec2::new(0.0, 300.0), &store);
        gesture.apply_delta(Vec2::new(120.0, -300.0), &store);

        assert_eq!(gesture.finish(&store), GestureOutcome::Reverted(first.rect()));
        assert_eq!(store.get(first.id()).unwrap(), first);
        assert_eq!(store.get(second.id()).unwrap(), second);
    }

    #[tokio::test]
    async fn test_resize_clamps_to_floor() {
        let (store, first, _) = store_with_two();
        let mut gesture = Gesture::begin_resize(first.clone());
        gesture.apply_delta(Vec2::new(-500.0, -500.0), &store);

        let rect = gesture.current_rect();
        assert_eq!((rect.width(), rect.height()), (48.0, 48.0));

        match gesture.finish(&store) {
            GestureOutcome::Committed(widget) => {
                assert_eq!((widget.width, widget.height), (48, 48));
                assert_eq!((widget.x, widget.y), (first.x, first.y));
            }
            other => panic!("expected commit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resize_into_neighbour_reverts() {
        let (store, first, _) = store_with_two();
        let mut gesture = Gesture::begin_resize(first.clone());
        assert!(gesture.apply_delta(Vec2::new(40.0, 0.0), &store));

        assert_eq!(gesture.finish(&store), GestureOutcome::Reverted(first.rect()));
        assert_eq!(store.get(first.id()).unwrap().width, 150);
    }

    #[tokio::test]
    async fn test_resize_up_to_shared_edge_is_allowed() {
        let (store, first, second) = store_with_two();
        // Close the 16 unit gap so the right edges touch.
        let mut gesture = Gesture::begin_resize(first.clone());
        gesture.apply_delta(Vec2::new(16.0, 20.0), &store);
        assert!(!gesture.is_colliding());
        assert!(matches!(gesture.finish(&store), GestureOutcome::Committed(_)));
        assert_eq!(store.get(first.id()).unwrap().rect().x1, second.rect().x0);
    }

    #[tokio::test]
    async fn test_cancel_leaves_store_untouched() {
        let (store, first, _) = store_with_two();
        let mut gesture = Gesture::begin_drag(first.clone());
        gesture.apply_delta(Vec2::new(0.0, 400.0), &store);

        assert_eq!(gesture.cancel(), GestureOutcome::Reverted(first.rect()));
        assert_eq!(store.get(first.id()).unwrap(), first);
    }
}
