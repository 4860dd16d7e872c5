//! The authoritative widget collection.
//!
//! All mutations go through one `watch` channel, so each change is serialized
//! against the others and is visible to readers and subscribers before the
//! mutating call returns. Weather lookups run as detached Tokio tasks and write
//! their result back through the same channel.

use crate::collision::any_overlap;
use crate::placement::{PlacementConfig, find_placement};
use crate::weather::{GeoPoint, WeatherError, WeatherProvider, WeatherReport, WeatherResult};
use crate::widget::{WeatherInfo, Widget, WidgetId, WidgetKind};
use kurbo::Rect;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::watch;

/// Shown when auto-locate is on but no position has been reported.
pub const LOCATION_UNAVAILABLE: &str = "Location unavailable";
/// Shown when a lookup fails for a reason other than an unknown city.
pub const WEATHER_UNAVAILABLE: &str = "Weather unavailable";
/// Shown when manual mode has no city configured.
pub const CITY_REQUIRED: &str = "Please specify a city";
/// City label used while auto-locate has no position.
pub const UNKNOWN_CITY: &str = "N/A";

/// What a weather fetch should query.
#[derive(Debug, Clone, PartialEq)]
enum WeatherQuery {
    Coordinates(GeoPoint),
    City(String),
}

struct StoreInner {
    widgets: watch::Sender<Vec<Widget>>,
    provider: Arc<dyn WeatherProvider>,
    config: PlacementConfig,
    location: Mutex<Option<GeoPoint>>,
    /// Latest fetch ticket issued per widget.
    tickets: Mutex<HashMap<WidgetId, u64>>,
    next_ticket: AtomicU64,
    runtime: Option<Handle>,
}

/// Owner of the live widget list.
///
/// Cloning is cheap and every clone refers to the same collection.
#[derive(Clone)]
pub struct WidgetStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for WidgetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetStore")
            .field("widgets", &self.inner.widgets.borrow().len())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl WidgetStore {
    /// Create a store seeded with `initial`, using the default placement bounds.
    ///
    /// Weather fetches are spawned on the Tokio runtime current at construction.
    pub fn new(initial: Vec<Widget>, provider: Arc<dyn WeatherProvider>) -> Self {
        Self::with_config(initial, provider, PlacementConfig::default())
    }

    /// Create a store with custom placement bounds.
    pub fn with_config(initial: Vec<Widget>, provider: Arc<dyn WeatherProvider>, config: PlacementConfig) -> Self {
        let runtime = Handle::try_current().ok();
        if runtime.is_none() {
            log::warn!("WidgetStore created outside a Tokio runtime; weather refresh is disabled");
        }
        let (widgets, _) = watch::channel(sanitize(initial));
        Self {
            inner: Arc::new(StoreInner {
                widgets,
                provider,
                config,
                location: Mutex::new(None),
                tickets: Mutex::new(HashMap::new()),
                next_ticket: AtomicU64::new(1),
                runtime,
            }),
        }
    }

    /// Snapshot of the current collection.
    pub fn widgets(&self) -> Vec<Widget> {
        self.inner.widgets.borrow().clone()
    }

    /// Get a widget by id.
    pub fn get(&self, id: &str) -> Option<Widget> {
        self.inner.widgets.borrow().iter().find(|w| w.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.widgets.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.widgets.borrow().is_empty()
    }

    /// Receive the full list after every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Widget>> {
        self.inner.widgets.subscribe()
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.inner.config
    }

    /// Last position reported through [`Self::update_current_location`].
    pub fn current_location(&self) -> Option<GeoPoint> {
        *lock(&self.inner.location)
    }

    /// Replace the whole collection, e.g. when seeding from storage.
    pub fn replace_all(&self, widgets: Vec<Widget>) {
        let widgets = sanitize(widgets);
        let live: HashSet<WidgetId> = widgets.iter().map(|w| w.id().to_string()).collect();
        self.inner.widgets.send_modify(|current| {
            *current = widgets;
            lock(&self.inner.tickets).retain(|id, _| live.contains(id));
        });
    }

    /// Place and append a new widget.
    ///
    /// Returns false, leaving the collection untouched, when no free space is
    /// found. A new weather widget gets a fetch scheduled immediately.
    pub fn add_widget(&self, kind: WidgetKind, media_reference: Option<String>, text_content: Option<String>) -> bool {
        let mut added: Option<WidgetId> = None;

        self.inner.widgets.send_if_modified(|widgets| {
            let rect = match find_placement(kind, widgets, &self.inner.config) {
                Ok(rect) => rect,
                Err(err) => {
                    log::info!("Could not place {kind:?} widget: {err}");
                    return false;
                }
            };
            let widget = match widget_at(kind, rect) {
                Ok(widget) => widget,
                Err(err) => {
                    log::error!("Planner produced an invalid rectangle {rect:?}: {err}");
                    return false;
                }
            };
            let widget = widget
                .with_media(media_reference.filter(|_| kind.uses_media()))
                .with_text(text_content.filter(|_| kind == WidgetKind::Text));

            log::debug!("Added {kind:?} widget {} at ({}, {})", widget.id(), widget.x, widget.y);
            added = Some(widget.id().to_string());
            widgets.push(widget);
            true
        });

        match added {
            Some(id) => {
                if kind == WidgetKind::Weather {
                    self.refresh_weather(&id);
                }
                true
            }
            None => false,
        }
    }

    /// Replace the stored widget that has the same id.
    ///
    /// Unknown ids are ignored. Updates that change the kind or carry a
    /// non-positive size are rejected. For weather widgets a change of location
    /// mode or manual city clears the old report and schedules a new fetch, as
    /// does an update that arrives with no report at all.
    ///
    /// Returns whether the collection changed.
    pub fn update_widget(&self, widget: Widget) -> bool {
        if widget.width <= 0 || widget.height <= 0 {
            log::warn!(
                "Ignoring update of {} with non-positive size {}x{}",
                widget.id(),
                widget.width,
                widget.height
            );
            return false;
        }

        let id = widget.id().to_string();
        let mut needs_refresh = false;

        let replaced = self.inner.widgets.send_if_modified(|widgets| {
            let Some(slot) = widgets.iter_mut().find(|w| w.id() == id) else {
                return false;
            };
            let mut updated = widget;
            if slot.kind() != updated.kind() {
                log::warn!("Ignoring update that changes {id} from {:?} to {:?}", slot.kind(), updated.kind());
                return false;
            }

            if updated.kind() == WidgetKind::Weather {
                let moved = location_changed(&slot.weather, &updated.weather);
                if moved {
                    updated.weather.clear_report();
                    // In-flight results were fetched for the old location.
                    lock(&self.inner.tickets).remove(&id);
                }
                needs_refresh = moved || updated.weather.is_pending();
            }
            *slot = updated;
            true
        });

        if !replaced {
            log::debug!("update_widget: {id} not replaced");
            return false;
        }
        if needs_refresh {
            log::debug!("Widget {id} needs a weather refresh");
            self.refresh_weather(&id);
        }
        true
    }

    /// Remove the widget with `id`; absent ids are a no-op.
    ///
    /// Returns whether a widget was removed.
    pub fn remove_widget(&self, id: &str) -> bool {
        let removed = self.inner.widgets.send_if_modified(|widgets| {
            let before = widgets.len();
            widgets.retain(|w| w.id() != id);
            if widgets.len() == before {
                return false;
            }
            lock(&self.inner.tickets).remove(id);
            true
        });
        if !removed {
            log::debug!("remove_widget: {id} not found");
        }
        removed
    }

    /// Check a candidate rectangle for `widget` against every other widget.
    pub fn check_collision_with_existing(&self, widget: &Widget, x: f64, y: f64, width: f64, height: f64) -> bool {
        let rect = Rect::from_origin_size((x, y), (width, height));
        any_overlap(Some(widget.id()), rect, &self.inner.widgets.borrow(), true)
    }

    /// Record the device position and refresh every auto-locating weather widget.
    pub fn update_current_location(&self, latitude: f64, longitude: f64) {
        *lock(&self.inner.location) = Some(GeoPoint::new(latitude, longitude));

        let targets: Vec<WidgetId> = self
            .inner
            .widgets
            .borrow()
            .iter()
            .filter(|w| w.kind() == WidgetKind::Weather && w.weather.auto_locate)
            .map(|w| w.id().to_string())
            .collect();
        for id in targets {
            self.refresh_weather(&id);
        }
    }

    /// Refresh every weather widget.
    pub fn refresh_all_weather(&self) {
        let targets: Vec<WidgetId> = self
            .inner
            .widgets
            .borrow()
            .iter()
            .filter(|w| w.kind() == WidgetKind::Weather)
            .map(|w| w.id().to_string())
            .collect();
        for id in targets {
            self.refresh_weather(&id);
        }
    }

    /// Fetch fresh conditions for one weather widget.
    ///
    /// Every call supersedes earlier fetches for the same widget: a result that
    /// arrives after a newer fetch was issued is dropped.
    pub fn refresh_weather(&self, id: &str) {
        // Settings and ticket must come from the same critical section.
        let mut issued: Option<(WeatherInfo, u64)> = None;
        self.inner.widgets.send_if_modified(|widgets| {
            if let Some(widget) = widgets.iter().find(|w| w.id() == id && w.kind() == WidgetKind::Weather) {
                issued = Some((widget.weather.clone(), self.issue_ticket(id)));
            }
            false
        });
        let Some((weather, ticket)) = issued else {
            log::debug!("refresh_weather: {id} is not a weather widget");
            return;
        };

        let query = if weather.auto_locate {
            match self.current_location() {
                Some(point) => WeatherQuery::Coordinates(point),
                None => {
                    log::warn!("Widget {id} auto-locates but no location is known");
                    self.patch_weather(id, ticket, |weather| {
                        weather.clear_report();
                        weather.description = Some(LOCATION_UNAVAILABLE.to_string());
                        weather.city_name = Some(UNKNOWN_CITY.to_string());
                    });
                    return;
                }
            }
        } else {
            match weather.effective_manual_city() {
                Some(city) => WeatherQuery::City(city.to_string()),
                None => {
                    log::warn!("Widget {id} is in manual mode without a city");
                    self.patch_weather(id, ticket, |weather| {
                        weather.clear_report();
                        weather.description = Some(CITY_REQUIRED.to_string());
                        weather.city_name = None;
                    });
                    return;
                }
            }
        };

        let Some(runtime) = self.inner.runtime.as_ref() else {
            self.apply_result(id, ticket, &query, Err(WeatherError::Network("no async runtime".to_string())));
            return;
        };

        log::debug!("Fetching weather for {id} ({query:?}), ticket {ticket}");
        let store = self.clone();
        let id = id.to_string();
        runtime.spawn(async move {
            let provider = &store.inner.provider;
            let result = match &query {
                WeatherQuery::Coordinates(point) => provider.fetch_by_coordinates(point.latitude, point.longitude).await,
                WeatherQuery::City(city) => provider.fetch_by_city_name(city).await,
            };
            store.apply_result(&id, ticket, &query, result);
        });
    }

    fn issue_ticket(&self, id: &str) -> u64 {
        let ticket = self.inner.next_ticket.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.tickets).insert(id.to_string(), ticket);
        ticket
    }

    fn apply_result(&self, id: &str, ticket: u64, query: &WeatherQuery, result: WeatherResult<WeatherReport>) {
        match result {
            Ok(report) => {
                log::debug!("Weather for {id}: {} {:.1}", report.city_name, report.temperature);
                self.patch_weather(id, ticket, move |weather| {
                    weather.city_name = Some(report.city_name);
                    weather.temperature = Some(report.temperature);
                    weather.description = Some(report.description);
                    weather.icon_ref = report.icon_ref;
                });
            }
            Err(err) => {
                log::error!("Weather fetch for {id} failed: {err}");
                let (description, city) = match (query, &err) {
                    (WeatherQuery::City(city), WeatherError::NotFound(_)) => {
                        (format!("City not found: {city}"), Some(city.clone()))
                    }
                    (WeatherQuery::City(city), _) => (WEATHER_UNAVAILABLE.to_string(), Some(city.clone())),
                    (WeatherQuery::Coordinates(_), _) => (WEATHER_UNAVAILABLE.to_string(), None),
                };
                self.patch_weather(id, ticket, move |weather| {
                    weather.clear_report();
                    weather.description = Some(description);
                    if city.is_some() {
                        weather.city_name = city;
                    }
                });
            }
        }
    }

    /// Apply `patch` to the stored widget's weather fields if `ticket` is still current.
    fn patch_weather(&self, id: &str, ticket: u64, patch: impl FnOnce(&mut WeatherInfo)) {
        self.inner.widgets.send_if_modified(|widgets| {
            if lock(&self.inner.tickets).get(id) != Some(&ticket) {
                log::debug!("Discarding superseded weather result for {id} (ticket {ticket})");
                return false;
            }
            let Some(widget) = widgets.iter_mut().find(|w| w.id() == id) else {
                return false;
            };
            patch(&mut widget.weather);
            true
        });
    }
}

fn widget_at(kind: WidgetKind, rect: Rect) -> Result<Widget, crate::widget::ModelError> {
    Widget::new(
        kind,
        rect.x0.round() as i32,
        rect.y0.round() as i32,
        rect.width().round() as i32,
        rect.height().round() as i32,
    )
}

fn location_changed(previous: &WeatherInfo, updated: &WeatherInfo) -> bool {
    previous.auto_locate != updated.auto_locate
        || (!updated.auto_locate && previous.effective_manual_city() != updated.effective_manual_city())
}

/// Drop widgets with a non-positive size and every repeat of an id already seen.
fn sanitize(widgets: Vec<Widget>) -> Vec<Widget> {
    let mut seen = HashSet::new();
    widgets
        .into_iter()
        .filter(|w| {
            if w.width <= 0 || w.height <= 0 {
                log::warn!("Dropping widget {} with non-positive size {}x{}", w.id(), w.width, w.height);
                return false;
            }
            let fresh = seen.insert(w.id().to_string());
            if !fresh {
                log::warn!("Dropping duplicate widget id {}", w.id());
            }
            fresh
        })
        .collect()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
