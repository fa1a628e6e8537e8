//! Core data models for Skycast
//!
//! This module contains the normalized weather model produced by the
//! processing pipeline, the raw provider payload types, and the API client.

pub mod api;
pub mod weather;

#[allow(unused_imports)]
pub use weather::{WeatherClient, WeatherError};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The location a weather reading applies to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Place name as reported by the provider
    pub name: String,
    /// ISO country code
    pub country: String,
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
    /// Observation time for the reading
    pub localtime: DateTime<Utc>,
}

/// Weather condition descriptor as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Broad category, e.g. "Clear", "Rain", "Clouds"
    pub category: String,
    /// Free-text description, e.g. "light rain"
    pub description: String,
    /// Provider-specific numeric condition code
    pub code: i32,
}

impl Condition {
    /// Placeholder used when a payload carries no weather descriptor
    pub fn unknown() -> Self {
        Self {
            category: "Unknown".to_string(),
            description: "unknown".to_string(),
            code: 0,
        }
    }

    /// Clear-sky descriptor used by the synthetic generators
    pub fn sunny() -> Self {
        Self {
            category: "Clear".to_string(),
            description: "sunny".to_string(),
            code: 800,
        }
    }
}

/// Air quality categories, ordered from cleanest to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AirQuality {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AirQuality {
    /// Maps an accumulated pollution score (1-15) to a category.
    /// Scores outside the range are treated as already clamped.
    pub fn from_score(score: i32) -> Self {
        match score {
            i32::MIN..=3 => AirQuality::Good,
            4..=5 => AirQuality::Moderate,
            6..=7 => AirQuality::UnhealthySensitive,
            8..=9 => AirQuality::Unhealthy,
            10..=11 => AirQuality::VeryUnhealthy,
            _ => AirQuality::Hazardous,
        }
    }

    /// Human-readable display label
    pub fn label(&self) -> &'static str {
        match self {
            AirQuality::Good => "Good",
            AirQuality::Moderate => "Moderate",
            AirQuality::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            AirQuality::Unhealthy => "Unhealthy",
            AirQuality::VeryUnhealthy => "Very Unhealthy",
            AirQuality::Hazardous => "Hazardous",
        }
    }
}

/// Current conditions with every physical quantity in both unit systems.
///
/// Each metric/imperial pair is converted from the same raw provider value,
/// so the two sides never drift apart by more than their own rounding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in Celsius, rounded
    pub temp_c: i32,
    /// Temperature in Fahrenheit, rounded
    pub temp_f: i32,
    /// Feels-like temperature in Celsius, rounded
    pub feels_like_c: i32,
    /// Feels-like temperature in Fahrenheit, rounded
    pub feels_like_f: i32,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Cloud cover percentage (0-100)
    pub cloud: u8,
    /// Wind speed in km/h, rounded
    pub wind_kph: i32,
    /// Wind speed in mph, rounded
    pub wind_mph: i32,
    /// Wind direction in degrees
    pub wind_degree: u16,
    /// Pressure in hPa
    pub pressure_hpa: f64,
    /// Pressure in inches of mercury
    pub pressure_in: f64,
    /// Visibility in kilometers
    pub visibility_km: f64,
    /// Visibility in miles
    pub visibility_miles: f64,
    /// Precipitation over the last hour in millimeters
    pub precip_mm: f64,
    /// Precipitation over the last hour in inches
    pub precip_in: f64,
    /// Estimated UV index (0-11+)
    pub uv: u8,
    /// Estimated air quality category
    pub air_quality: AirQuality,
    /// Condition descriptor
    pub condition: Condition,
    /// Whether the reading falls between sunrise and sunset
    pub is_day: bool,
}

/// One slot of the 24-hour forecast strip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourSlot {
    /// Hour of day this slot represents (0-23)
    pub hour: u8,
    /// Temperature in Celsius, rounded
    pub temp_c: i32,
    /// Temperature in Fahrenheit, rounded
    pub temp_f: i32,
    /// Condition descriptor of the matched sample
    pub condition: Condition,
    /// Wind speed in km/h, rounded
    pub wind_kph: i32,
    /// Wind speed in mph, rounded
    pub wind_mph: i32,
    /// Relative humidity percentage
    pub humidity: u8,
    /// Estimated chance of rain as a percentage
    pub rain_chance: u8,
    /// Estimated UV index for this hour
    pub uv: u8,
}

/// One day of the 7-day forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayForecast {
    /// Calendar date (UTC)
    pub date: NaiveDate,
    /// Daily high in Celsius, rounded
    pub max_c: i32,
    /// Daily high in Fahrenheit, rounded
    pub max_f: i32,
    /// Daily low in Celsius, rounded
    pub min_c: i32,
    /// Daily low in Fahrenheit, rounded
    pub min_f: i32,
    /// Daily average in Celsius, rounded
    pub avg_c: i32,
    /// Daily average in Fahrenheit, rounded
    pub avg_f: i32,
    /// Strongest wind of the day in km/h, rounded
    pub max_wind_kph: i32,
    /// Strongest wind of the day in mph, rounded
    pub max_wind_mph: i32,
    /// Total precipitation in millimeters, one decimal
    pub total_precip_mm: f64,
    /// Total precipitation in inches, two decimals
    pub total_precip_in: f64,
    /// Average humidity percentage, rounded
    pub avg_humidity: u8,
    /// Representative condition (first reported for the day)
    pub condition: Condition,
    /// Estimated UV index for the day
    pub uv: u8,
    /// Highest estimated rain chance across the day's samples
    pub rain_chance: u8,
    /// Whether the rain chance crosses the 50% line
    pub will_rain: bool,
    /// Sunrise time
    pub sunrise: DateTime<Utc>,
    /// Sunset time
    pub sunset: DateTime<Utc>,
}

/// The complete normalized weather model.
///
/// `hourly` always holds exactly 24 entries, one per hour-of-day starting
/// at the current hour; `daily` always holds exactly 7 entries in date
/// order. Built fresh on every lookup and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedWeather {
    /// Where the readings apply
    pub location: Location,
    /// Current conditions
    pub current: CurrentConditions,
    /// 24-hour forecast strip
    pub hourly: Vec<HourSlot>,
    /// 7-day forecast
    pub daily: Vec<DayForecast>,
}

/// One geocoding search hit, passed through to consumers untouched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoMatch {
    /// Place name
    pub name: String,
    /// ISO country code
    pub country: String,
    /// Administrative region, when the provider reports one
    pub state: Option<String>,
    /// Latitude coordinate
    pub lat: f64,
    /// Longitude coordinate
    pub lon: f64,
    /// Pre-formatted "name, state, country" label
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_quality_score_thresholds() {
        assert_eq!(AirQuality::from_score(1), AirQuality::Good);
        assert_eq!(AirQuality::from_score(3), AirQuality::Good);
        assert_eq!(AirQuality::from_score(4), AirQuality::Moderate);
        assert_eq!(AirQuality::from_score(5), AirQuality::Moderate);
        assert_eq!(AirQuality::from_score(6), AirQuality::UnhealthySensitive);
        assert_eq!(AirQuality::from_score(7), AirQuality::UnhealthySensitive);
        assert_eq!(AirQuality::from_score(8), AirQuality::Unhealthy);
        assert_eq!(AirQuality::from_score(9), AirQuality::Unhealthy);
        assert_eq!(AirQuality::from_score(10), AirQuality::VeryUnhealthy);
        assert_eq!(AirQuality::from_score(11), AirQuality::VeryUnhealthy);
        assert_eq!(AirQuality::from_score(12), AirQuality::Hazardous);
        assert_eq!(AirQuality::from_score(15), AirQuality::Hazardous);
    }

    #[test]
    fn test_air_quality_ordering_matches_severity() {
        assert!(AirQuality::Good < AirQuality::Moderate);
        assert!(AirQuality::Moderate < AirQuality::UnhealthySensitive);
        assert!(AirQuality::UnhealthySensitive < AirQuality::Unhealthy);
        assert!(AirQuality::Unhealthy < AirQuality::VeryUnhealthy);
        assert!(AirQuality::VeryUnhealthy < AirQuality::Hazardous);
    }

    #[test]
    fn test_air_quality_labels() {
        assert_eq!(AirQuality::Good.label(), "Good");
        assert_eq!(
            AirQuality::UnhealthySensitive.label(),
            "Unhealthy for Sensitive Groups"
        );
        assert_eq!(AirQuality::Hazardous.label(), "Hazardous");
    }

    #[test]
    fn test_condition_unknown_placeholder() {
        let condition = Condition::unknown();
        assert_eq!(condition.category, "Unknown");
        assert_eq!(condition.code, 0);
    }

    #[test]
    fn test_normalized_weather_serialization_roundtrip() {
        let weather = NormalizedWeather {
            location: Location {
                name: "Vancouver".to_string(),
                country: "CA".to_string(),
                latitude: 49.28,
                longitude: -123.12,
                localtime: Utc::now(),
            },
            current: CurrentConditions {
                temp_c: 20,
                temp_f: 68,
                feels_like_c: 19,
                feels_like_f: 66,
                humidity: 65,
                cloud: 40,
                wind_kph: 11,
                wind_mph: 7,
                wind_degree: 270,
                pressure_hpa: 1013.0,
                pressure_in: 29.91,
                visibility_km: 10.0,
                visibility_miles: 6.2,
                precip_mm: 0.0,
                precip_in: 0.0,
                uv: 5,
                air_quality: AirQuality::Good,
                condition: Condition::sunny(),
                is_day: true,
            },
            hourly: Vec::new(),
            daily: Vec::new(),
        };

        let json = serde_json::to_string(&weather).expect("Failed to serialize");
        let deserialized: NormalizedWeather =
            serde_json::from_str(&json).expect("Failed to deserialize");

        assert_eq!(deserialized.current.temp_c, 20);
        assert_eq!(deserialized.current.temp_f, 68);
        assert_eq!(deserialized.current.air_quality, AirQuality::Good);
        assert_eq!(deserialized.location.name, "Vancouver");
    }

    #[test]
    fn test_geo_match_serialization_roundtrip() {
        let hit = GeoMatch {
            name: "Paris".to_string(),
            country: "FR".to_string(),
            state: Some("Ile-de-France".to_string()),
            lat: 48.85,
            lon: 2.35,
            display_name: "Paris, Ile-de-France, FR".to_string(),
        };

        let json = serde_json::to_string(&hit).expect("Failed to serialize");
        let deserialized: GeoMatch = serde_json::from_str(&json).expect("Failed to deserialize");

        assert_eq!(deserialized.name, "Paris");
        assert_eq!(deserialized.state.as_deref(), Some("Ile-de-France"));
    }
}
