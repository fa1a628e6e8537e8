//! Raw payload types for the upstream weather API
//!
//! These structs mirror the provider's JSON exactly and exist only at the
//! input boundary. Absent numeric fields deserialize to zero and an absent
//! weather block becomes an "Unknown" descriptor, so a single malformed
//! sample never fails a whole batch. Out-of-range physical values are
//! passed through uncorrected.

use serde::Deserialize;

use super::Condition;

/// Visibility the provider reports when it omits the field entirely (meters)
pub const DEFAULT_VISIBILITY_M: f64 = 10_000.0;

fn default_visibility() -> f64 {
    DEFAULT_VISIBILITY_M
}

/// Current-conditions payload
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentResponse {
    /// Observation time, epoch seconds
    pub dt: i64,
    #[serde(default)]
    pub main: MainReading,
    #[serde(default)]
    pub weather: Vec<ConditionTag>,
    #[serde(default)]
    pub wind: WindReading,
    #[serde(default)]
    pub clouds: CloudCover,
    /// Visibility in meters; omitted by the provider above 10 km
    #[serde(default = "default_visibility")]
    pub visibility: f64,
    #[serde(default)]
    pub rain: Precip,
    #[serde(default)]
    pub sys: SysBlock,
    #[serde(default)]
    pub coord: Coord,
    #[serde(default)]
    pub name: String,
}

/// 5-day/3-hour forecast payload
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
    #[serde(default)]
    pub city: CityBlock,
}

/// One 3-hour forecast sample
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    /// Sample time, epoch seconds
    pub dt: i64,
    #[serde(default)]
    pub main: MainReading,
    #[serde(default)]
    pub weather: Vec<ConditionTag>,
    #[serde(default)]
    pub wind: WindReading,
    #[serde(default)]
    pub clouds: CloudCover,
    /// Probability of precipitation, 0.0-1.0
    #[serde(default)]
    pub pop: f64,
    #[serde(default)]
    pub rain: Precip,
    #[serde(default = "default_visibility")]
    pub visibility: f64,
}

/// Thermodynamic readings shared by current and forecast samples
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MainReading {
    /// Temperature in Celsius
    #[serde(default)]
    pub temp: f64,
    /// Feels-like temperature in Celsius
    #[serde(default)]
    pub feels_like: f64,
    /// Relative humidity percentage
    #[serde(default)]
    pub humidity: f64,
    /// Pressure in hPa
    #[serde(default)]
    pub pressure: f64,
}

/// Provider condition descriptor
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionTag {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub id: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindReading {
    /// Wind speed in m/s
    #[serde(default)]
    pub speed: f64,
    /// Direction in degrees
    #[serde(default)]
    pub deg: f64,
    /// Gust speed in m/s, when reported
    #[serde(default)]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloudCover {
    /// Cloud cover percentage
    #[serde(default)]
    pub all: f64,
}

/// Accumulated precipitation, keyed by window length upstream
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Precip {
    #[serde(rename = "1h", default)]
    pub one_hour: f64,
    #[serde(rename = "3h", default)]
    pub three_hour: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SysBlock {
    /// Sunrise, epoch seconds
    #[serde(default)]
    pub sunrise: i64,
    /// Sunset, epoch seconds
    #[serde(default)]
    pub sunset: i64,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Coord {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

/// City metadata attached to the forecast payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CityBlock {
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

/// One geocoding search result as shipped by the provider
#[derive(Debug, Clone, Deserialize)]
pub struct GeoEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

fn condition_from(tags: &[ConditionTag]) -> Condition {
    tags.first()
        .map(|tag| Condition {
            category: tag.main.clone(),
            description: tag.description.clone(),
            code: tag.id,
        })
        .unwrap_or_else(Condition::unknown)
}

impl CurrentResponse {
    /// First reported condition descriptor, or the "Unknown" placeholder
    pub fn condition(&self) -> Condition {
        condition_from(&self.weather)
    }
}

impl ForecastEntry {
    /// First reported condition descriptor, or the "Unknown" placeholder
    pub fn condition(&self) -> Condition {
        condition_from(&self.weather)
    }
}
