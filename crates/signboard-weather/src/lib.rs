//! OpenWeather client for Signboard.
//!
//! Implements [`WeatherProvider`] against the OpenWeather "current weather" API
//! using [`reqwest`].

use serde::Deserialize;
use signboard_core::weather::{BoxFuture, WeatherError, WeatherProvider, WeatherReport, WeatherResult};
use std::time::Duration;

/// Current-weather endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
/// Prefix for condition icon images.
pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
/// Environment variable read by [`OpenWeatherConfig::from_env`].
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`OpenWeatherClient`].
#[derive(Debug, Clone)]
pub struct OpenWeatherConfig {
    pub api_key: String,
    pub base_url: String,
    /// `metric` reports Celsius, which is what widgets display.
    pub units: String,
    pub timeout: Duration,
}

impl OpenWeatherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            units: "metric".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build a config from `OPENWEATHER_API_KEY`, if it is set and non-empty.
    pub fn from_env() -> Option<Self> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Self::new)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Subset of the OpenWeather response used by widgets.
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    name: String,
    main: MainDetails,
    #[serde(default)]
    weather: Vec<WeatherCondition>,
}

#[derive(Debug, Deserialize)]
struct MainDetails {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
    icon: Option<String>,
}

impl CurrentWeatherResponse {
    fn into_report(self) -> WeatherReport {
        let condition = self.weather.into_iter().next();
        WeatherReport {
            city_name: self.name,
            temperature: self.main.temp,
            description: condition
                .as_ref()
                .map(|c| c.description.clone())
                .unwrap_or_default(),
            icon_ref: condition.and_then(|c| c.icon).map(|icon| icon_url(&icon)),
        }
    }
}

/// URL of the 2x image for an OpenWeather icon code such as `10d`.
pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}@2x.png")
}

/// HTTP client for the OpenWeather API.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    config: OpenWeatherConfig,
}

impl OpenWeatherClient {
    /// Create a client with its own connection pool and the configured timeout.
    pub fn new(config: OpenWeatherConfig) -> WeatherResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| WeatherError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: OpenWeatherConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &OpenWeatherConfig {
        &self.config
    }

    fn request(&self, params: &[(&str, String)]) -> reqwest::RequestBuilder {
        self.client
            .get(&self.config.base_url)
            .query(params)
            .query(&[("appid", &self.config.api_key), ("units", &self.config.units)])
    }

    async fn fetch(&self, request: reqwest::RequestBuilder, lookup: &str) -> WeatherResult<WeatherReport> {
        let response = request
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            log::warn!("OpenWeather returned {status} for {lookup}");
            return Err(error_for_status(status, body, lookup));
        }
        parse_report(&body)
    }
}

/// Map a non-2xx reply. OpenWeather answers unknown cities with 404.
fn error_for_status(status: u16, body: String, lookup: &str) -> WeatherError {
    if status == 404 {
        WeatherError::NotFound(lookup.to_string())
    } else {
        WeatherError::Api { status, body }
    }
}

fn parse_report(body: &str) -> WeatherResult<WeatherReport> {
    serde_json::from_str::<CurrentWeatherResponse>(body)
        .map(CurrentWeatherResponse::into_report)
        .map_err(|e| WeatherError::Decode(e.to_string()))
}

impl WeatherProvider for OpenWeatherClient {
    fn fetch_by_coordinates(&self, latitude: f64, longitude: f64) -> BoxFuture<'_, WeatherResult<WeatherReport>> {
        let request = self.request(&[("lat", latitude.to_string()), ("lon", longitude.to_string())]);
        Box::pin(async move {
            let lookup = format!("{latitude:.4},{longitude:.4}");
            self.fetch(request, &lookup).await
        })
    }

    fn fetch_by_city_name(&self, city: &str) -> BoxFuture<'_, WeatherResult<WeatherReport>> {
        let request = self.request(&[("q", city.to_string())]);
        let city = city.to_string();
        Box::pin(async move { self.fetch(request, &city).await })
    }
}
