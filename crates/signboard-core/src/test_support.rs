//! Shared fixtures for unit tests.

use crate::store::WidgetStore;
use crate::weather::{BoxFuture, GeoPoint, WeatherError, WeatherProvider, WeatherReport, WeatherResult};
use crate::widget::Widget;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub fn report(city: &str, temperature: f64, description: &str) -> WeatherReport {
    WeatherReport {
        city_name: city.to_string(),
        temperature,
        description: description.to_string(),
        icon_ref: Some(format!("icon://{}", description.to_lowercase())),
    }
}

fn clone_result(result: &WeatherResult<WeatherReport>) -> WeatherResult<WeatherReport> {
    match result {
        Ok(report) => Ok(report.clone()),
        Err(WeatherError::Network(msg)) => Err(WeatherError::Network(msg.clone())),
        Err(WeatherError::NotFound(msg)) => Err(WeatherError::NotFound(msg.clone())),
        Err(WeatherError::Api { status, body }) => Err(WeatherError::Api {
            status: *status,
            body: body.clone(),
        }),
        Err(WeatherError::Decode(msg)) => Err(WeatherError::Decode(msg.clone())),
    }
}

/// Scripted provider that records every call.
pub struct MockWeather {
    coordinates: Mutex<WeatherResult<WeatherReport>>,
    cities: Mutex<HashMap<String, WeatherResult<WeatherReport>>>,
    delays: HashMap<String, Duration>,
    coordinate_calls: Mutex<Vec<GeoPoint>>,
    city_calls: Mutex<Vec<String>>,
}

impl MockWeather {
    pub fn new() -> Self {
        Self {
            coordinates: Mutex::new(Err(WeatherError::Network("no coordinate result scripted".into()))),
            cities: Mutex::new(HashMap::new()),
            delays: HashMap::new(),
            coordinate_calls: Mutex::new(Vec::new()),
            city_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_coordinates(self, result: WeatherResult<WeatherReport>) -> Self {
        self.set_coordinates(result);
        self
    }

    pub fn with_city(self, city: &str, result: WeatherResult<WeatherReport>) -> Self {
        self.cities.lock().unwrap().insert(city.to_string(), result);
        self
    }

    /// Delay lookups of `city` by `delay`.
    pub fn with_delay(mut self, city: &str, delay: Duration) -> Self {
        self.delays.insert(city.to_string(), delay);
        self
    }

    pub fn set_coordinates(&self, result: WeatherResult<WeatherReport>) {
        *self.coordinates.lock().unwrap() = result;
    }

    pub fn coordinate_calls(&self) -> Vec<GeoPoint> {
        self.coordinate_calls.lock().unwrap().clone()
    }

    pub fn city_calls(&self) -> Vec<String> {
        self.city_calls.lock().unwrap().clone()
    }
}

impl WeatherProvider for MockWeather {
    fn fetch_by_coordinates(&self, latitude: f64, longitude: f64) -> BoxFuture<'_, WeatherResult<WeatherReport>> {
        self.coordinate_calls
            .lock()
            .unwrap()
            .push(GeoPoint::new(latitude, longitude));
        let result = clone_result(&self.coordinates.lock().unwrap());
        Box::pin(async move { result })
    }

    fn fetch_by_city_name(&self, city: &str) -> BoxFuture<'_, WeatherResult<WeatherReport>> {
        self.city_calls.lock().unwrap().push(city.to_string());
        let result = match self.cities.lock().unwrap().get(city) {
            Some(result) => clone_result(result),
            None => Err(WeatherError::NotFound(city.to_string())),
        };
        let delay = self.delays.get(city).copied();
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }
}

/// Wait until the store's list satisfies `predicate`, failing after five seconds.
pub async fn wait_until(store: &WidgetStore, predicate: impl FnMut(&Vec<Widget>) -> bool) {
    let mut rx = store.subscribe();
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for store state")
        .expect("store dropped");
}
