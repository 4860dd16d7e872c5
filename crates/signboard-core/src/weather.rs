//! Weather enrichment contract.
//!
//! The store never talks to a weather service directly; it goes through a
//! [`WeatherProvider`] injected at construction.

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Current conditions for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// City name as resolved by the provider.
    pub city_name: String,
    /// Degrees Celsius.
    pub temperature: f64,
    pub description: String,
    pub icon_ref: Option<String>,
}

/// Weather lookup errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Location not found: {0}")]
    NotFound(String),
    #[error("Weather API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Invalid weather response: {0}")]
    Decode(String),
}

/// Result type for weather lookups.
pub type WeatherResult<T> = Result<T, WeatherError>;

/// Boxed future returned by providers; `Send` so fetches can run on a worker thread.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of current weather conditions.
pub trait WeatherProvider: Send + Sync {
    /// Look up conditions at a coordinate.
    fn fetch_by_coordinates(&self, latitude: f64, longitude: f64) -> BoxFuture<'_, WeatherResult<WeatherReport>>;

    /// Look up conditions for a city name.
    fn fetch_by_city_name(&self, city: &str) -> BoxFuture<'_, WeatherResult<WeatherReport>>;
}

/// Provider for offline builds; every lookup fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopWeatherProvider;

impl WeatherProvider for NoopWeatherProvider {
    fn fetch_by_coordinates(&self, _latitude: f64, _longitude: f64) -> BoxFuture<'_, WeatherResult<WeatherReport>> {
        Box::pin(async { Err(WeatherError::Network("weather lookups are disabled".to_string())) })
    }

    fn fetch_by_city_name(&self, city: &str) -> BoxFuture<'_, WeatherResult<WeatherReport>> {
        let city = city.to_string();
        Box::pin(async move { Err(WeatherError::NotFound(city)) })
    }
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}
