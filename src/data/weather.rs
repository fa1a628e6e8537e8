//! OpenWeather API client
//!
//! Fetches current conditions and the 5-day/3-hour forecast and runs the
//! payloads through the normalization pipeline, plus a geocoding search
//! used to resolve free-text location queries.

use reqwest::Client;
use thiserror::Error;

use super::api::{CurrentResponse, ForecastResponse, GeoEntry};
use super::{GeoMatch, NormalizedWeather};
use crate::normalize::{normalize, NormalizeError};

/// Base URL for the weather data endpoints
const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Base URL for the geocoding endpoints
const GEO_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";

/// Maximum number of geocoding hits to request
const GEO_RESULT_LIMIT: u8 = 5;

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The payloads could not be normalized
    #[error("Failed to normalize payloads: {0}")]
    Normalize(#[from] NormalizeError),

    /// The geocoding search matched nothing
    #[error("No location found matching '{0}'")]
    LocationNotFound(String),
}

/// Client for fetching weather data from the OpenWeather API
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    api_base_url: String,
    geo_base_url: String,
}

impl WeatherClient {
    /// Create a new WeatherClient with default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base_url: API_BASE_URL.to_string(),
            geo_base_url: GEO_BASE_URL.to_string(),
        }
    }

    /// Create a new WeatherClient with a custom HTTP client
    #[allow(dead_code)]
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            api_base_url: API_BASE_URL.to_string(),
            geo_base_url: GEO_BASE_URL.to_string(),
        }
    }

    /// Point both endpoint families at a different base URL
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.api_base_url = base_url.clone();
        self.geo_base_url = base_url;
        self
    }

    /// Fetch the current-conditions payload for the given coordinates
    pub async fn fetch_current(&self, lat: f64, lon: f64) -> Result<CurrentResponse, WeatherError> {
        let url = format!(
            "{}/weather?lat={}&lon={}&units=metric&appid={}",
            self.api_base_url, lat, lon, self.api_key
        );

        let response = self.client.get(&url).send().await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch the 5-day/3-hour forecast payload for the given coordinates
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<ForecastResponse, WeatherError> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&units=metric&appid={}",
            self.api_base_url, lat, lon, self.api_key
        );

        let response = self.client.get(&url).send().await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch both payloads sequentially and normalize them.
    ///
    /// A failed forecast fetch degrades to a synthesized forecast next to
    /// the live current conditions; a failed current fetch is an error and
    /// callers substitute the synthetic model instead.
    ///
    /// # Arguments
    /// * `lat` - Latitude coordinate
    /// * `lon` - Longitude coordinate
    ///
    /// # Returns
    /// * `Ok(NormalizedWeather)` - Normalized weather for the location
    /// * `Err(WeatherError)` - If the current fetch or normalization fails
    pub async fn fetch_weather(&self, lat: f64, lon: f64) -> Result<NormalizedWeather, WeatherError> {
        let current = self.fetch_current(lat, lon).await?;

        let forecast = match self.fetch_forecast(lat, lon).await {
            Ok(payload) => Some(payload),
            Err(err) => {
                tracing::warn!("forecast fetch failed, continuing without it: {err}");
                None
            }
        };

        Ok(normalize(Some(current), forecast)?)
    }

    /// Resolve a free-text query to its best geocoding match and fetch
    /// normalized weather for it.
    ///
    /// # Arguments
    /// * `query` - Location query, e.g. "Vancouver" or "Paris,FR"
    ///
    /// # Returns
    /// * `Ok(NormalizedWeather)` - Weather for the first matching location
    /// * `Err(WeatherError::LocationNotFound)` - If nothing matches
    pub async fn lookup(&self, query: &str) -> Result<NormalizedWeather, WeatherError> {
        let matches = self.search_locations(query).await?;
        let hit = matches
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::LocationNotFound(query.to_string()))?;

        tracing::debug!("resolved '{}' to {}", query, hit.display_name);
        let mut weather = self.fetch_weather(hit.lat, hit.lon).await?;

        // Prefer the richer geocoding name when the reading comes back
        // with a bare station name.
        if weather.location.name.is_empty() {
            weather.location.name = hit.name;
        }

        Ok(weather)
    }

    /// Search for locations matching a free-text query.
    ///
    /// Results pass through unmodified apart from the pre-formatted
    /// display name.
    pub async fn search_locations(&self, query: &str) -> Result<Vec<GeoMatch>, WeatherError> {
        let response = self
            .client
            .get(format!("{}/direct", self.geo_base_url))
            .query(&[("q", query), ("appid", self.api_key.as_str())])
            .query(&[("limit", GEO_RESULT_LIMIT)])
            .send()
            .await?;
        let text = response.text().await?;
        let entries: Vec<GeoEntry> = serde_json::from_str(&text)?;

        Ok(entries.into_iter().map(geo_match_from).collect())
    }
}

fn geo_match_from(entry: GeoEntry) -> GeoMatch {
    let display_name = match entry.state.as_deref() {
        Some(state) if !state.is_empty() => {
            format!("{}, {}, {}", entry.name, state, entry.country)
        }
        _ => format!("{}, {}", entry.name, entry.country),
    };

    GeoMatch {
        name: entry.name,
        country: entry.country,
        state: entry.state.filter(|state| !state.is_empty()),
        lat: entry.lat,
        lon: entry.lon,
        display_name,
    }
}
