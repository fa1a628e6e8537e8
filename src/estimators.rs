//! Derived-metric heuristics
//!
//! The upstream API reports neither UV index, air quality, nor rain
//! probability, so these are estimated from the signals it does provide:
//! cloud cover, humidity, visibility, wind, and the condition text.
//! Rain chance combines independent signals by taking their maximum, so a
//! single strong signal (a thunderstorm descriptor) dominates a weak
//! contradicting one (a low provider probability).

use chrono::{DateTime, Timelike, Utc};

use crate::data::{AirQuality, Condition};

/// Minimum rain chance implied by a condition keyword. Keywords are matched
/// by case-insensitive substring against the category first, then against
/// the free-text description.
const RAIN_CHANCE_FLOORS: &[(&str, f64)] = &[
    ("thunderstorm", 90.0),
    ("rain", 80.0),
    ("snow", 70.0),
    ("drizzle", 60.0),
];

/// Estimates the chance of rain as a percentage in 0-100.
///
/// Starts from the provider's probability-of-precipitation when present and
/// raises it (never lowers it) to each triggered floor: condition keywords,
/// an overcast sky paired with high humidity, and humidity on its own.
///
/// # Arguments
///
/// * `condition` - Condition descriptor for the sample
/// * `humidity` - Relative humidity percentage
/// * `pop` - Provider probability of precipitation (0.0-1.0), when reported
pub fn rain_chance(condition: &Condition, humidity: f64, pop: Option<f64>) -> u8 {
    let category = condition.category.to_lowercase();
    let description = condition.description.to_lowercase();

    let mut chance = pop.unwrap_or(0.0) * 100.0;

    for (keyword, floor) in RAIN_CHANCE_FLOORS {
        if category.contains(keyword) || description.contains(keyword) {
            chance = chance.max(*floor);
        }
    }

    if (category.contains("cloud") || description.contains("cloud")) && humidity > 80.0 {
        chance = chance.max(30.0);
    }

    if humidity > 90.0 {
        chance = chance.max(40.0);
    } else if humidity > 80.0 {
        chance = chance.max(20.0);
    }

    chance.clamp(0.0, 100.0).round() as u8
}

/// Base UV value for an hour of the day: midday peak, shoulder hours, then
/// the low-sun remainder of the day.
fn uv_base_for_hour(hour: u32) -> f64 {
    match hour {
        10..=16 => 8.0,
        8..=18 => 5.0,
        _ => 2.0,
    }
}

/// How much cloud cover knocks off the base UV value
fn uv_cloud_penalty(cloud: f64) -> f64 {
    if cloud > 80.0 {
        4.0
    } else if cloud > 50.0 {
        2.0
    } else if cloud > 20.0 {
        1.0
    } else {
        0.0
    }
}

/// How much adverse weather knocks off the UV value. Plain cloud categories
/// only count for the hourly strip, where cloud cover itself is coarser.
fn uv_condition_penalty(category: &str, include_clouds: bool) -> f64 {
    if category.contains("rain") || category.contains("thunderstorm") {
        3.0
    } else if category.contains("snow") || category.contains("fog") {
        2.0
    } else if include_clouds && category.contains("cloud") {
        1.0
    } else {
        0.0
    }
}

/// Estimates the UV index for the current reading.
///
/// Returns exactly 0 outside the daylight window (strictly between sunrise
/// and sunset) and at least 1 inside it. Cloud cover attenuates the base
/// value but can never drive it to zero on its own.
pub fn uv_index_current(
    observed: DateTime<Utc>,
    sunrise: DateTime<Utc>,
    sunset: DateTime<Utc>,
    cloud: f64,
    condition: &Condition,
) -> u8 {
    if observed <= sunrise || observed >= sunset {
        return 0;
    }

    let base = uv_base_for_hour(observed.hour());
    let clouded = (base - uv_cloud_penalty(cloud)).max(1.0);
    let category = condition.category.to_lowercase();
    let uv = clouded - uv_condition_penalty(&category, false);

    uv.max(1.0).round() as u8
}

/// Estimates the UV index for one slot of the hourly strip.
///
/// Daylight is approximated as hours 6 through 18 since per-hour sunrise
/// and sunset times are not available for the composed strip.
pub fn uv_index_for_hour(hour: u32, cloud: f64, condition: &Condition) -> u8 {
    if !(6..=18).contains(&hour) {
        return 0;
    }

    let base = uv_base_for_hour(hour);
    let clouded = (base - uv_cloud_penalty(cloud)).max(2.0);
    let category = condition.category.to_lowercase();
    let uv = clouded - uv_condition_penalty(&category, true);

    uv.max(1.0).round() as u8
}

/// Estimates the peak UV index for a forecast day from its representative
/// condition. A day always contains daylight, so the result is at least 1.
pub fn uv_index_for_day(condition: &Condition) -> u8 {
    let category = condition.category.to_lowercase();

    let base: f64 = if category.contains("clear") {
        10.0
    } else if category.contains("thunderstorm") {
        9.0
    } else if category.contains("rain") {
        8.0
    } else if category.contains("snow") {
        7.0
    } else if category.contains("fog") || category.contains("mist") || category.contains("haze") {
        6.0
    } else if category.contains("cloud") {
        5.0
    } else {
        3.0
    };

    base.max(1.0).round() as u8
}

/// Estimates an air quality category from humidity, visibility, the
/// condition text, and wind speed.
///
/// Accumulates an integer score starting at 1: stagnant humid air and poor
/// visibility push it up, rain washes it down, calm wind traps pollutants
/// while strong wind disperses them. The clamped score (1-15) maps onto the
/// six ordered categories.
///
/// # Arguments
///
/// * `humidity` - Relative humidity percentage
/// * `visibility_m` - Visibility in meters
/// * `condition` - Condition descriptor for the reading
/// * `wind_mps` - Wind speed in m/s
pub fn air_quality(
    humidity: f64,
    visibility_m: f64,
    condition: &Condition,
    wind_mps: f64,
) -> AirQuality {
    let mut score: i32 = 1;

    if humidity > 90.0 {
        score += 2;
    }
    if humidity > 80.0 {
        score += 1;
    }

    let visibility_km = visibility_m / 1000.0;
    if visibility_km < 5.0 {
        score += 3;
    }
    if visibility_km < 10.0 {
        score += 2;
    }
    if visibility_km < 15.0 {
        score += 1;
    }

    let description = condition.description.to_lowercase();
    if description.contains("haze") || description.contains("smog") {
        score += 3;
    }
    if description.contains("fog") || description.contains("mist") {
        score += 1;
    }

    // Rain scrubs particulates out of the air
    let category = condition.category.to_lowercase();
    if category.contains("rain") || category.contains("thunderstorm") {
        score -= 1;
    }

    if wind_mps < 2.0 {
        score += 2;
    } else if wind_mps > 8.0 {
        score -= 1;
    }

    AirQuality::from_score(score.clamp(1, 15))
}
