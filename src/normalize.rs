//! Normalization pipeline
//!
//! Maps the provider's current-conditions and forecast payloads onto the
//! internal model, deriving the fields the provider does not report. Every
//! call builds a fresh model from immutable inputs; nothing is shared
//! across calls.

use chrono::{DateTime, Timelike, Utc};
use thiserror::Error;

use crate::aggregate;
use crate::data::api::{CurrentResponse, ForecastResponse};
use crate::data::{Condition, CurrentConditions, Location, NormalizedWeather};
use crate::estimators;
use crate::fallback;
use crate::units;

/// Errors from the normalization pipeline
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The current-conditions payload is missing entirely. A model without
    /// current conditions would be mostly holes, so this fails fast and
    /// callers substitute the synthetic generator instead.
    #[error("current conditions unavailable")]
    MissingCurrent,
}

/// Builds the normalized model from raw provider payloads.
///
/// A missing or empty forecast is not an error: the daily list pads out
/// with placeholder days and the hourly strip is synthesized around the
/// live current temperature. A missing current payload is fatal.
///
/// # Arguments
/// * `current` - Current-conditions payload, if the fetch produced one
/// * `forecast` - Forecast payload, if the fetch produced one
///
/// # Returns
/// * `Ok(NormalizedWeather)` - The normalized model
/// * `Err(NormalizeError::MissingCurrent)` - If `current` is `None`
pub fn normalize(
    current: Option<CurrentResponse>,
    forecast: Option<ForecastResponse>,
) -> Result<NormalizedWeather, NormalizeError> {
    let current = current.ok_or(NormalizeError::MissingCurrent)?;

    let observed = timestamp(current.dt);
    let today = observed.date_naive();
    let current_hour = observed.hour();
    let condition = current.condition();

    let (entries, city) = match forecast {
        Some(payload) => (payload.list, payload.city),
        None => (Vec::new(), Default::default()),
    };

    if entries.is_empty() {
        tracing::debug!("no forecast samples, synthesizing daily and hourly forecasts");
    }

    let buckets = aggregate::bucket_by_day(&entries, &city);
    let daily = aggregate::finalize_daily(buckets, today);

    // The strip is all-or-nothing: with no samples every slot comes back
    // empty and the whole strip is synthesized around the live reading.
    let slots = aggregate::hourly_strip(&entries, current_hour);
    let hourly = if slots.iter().any(Option::is_none) {
        fallback::synthetic_hours(
            current_hour,
            current.main.temp,
            current.main.humidity,
            current.clouds.all,
            &condition,
        )
    } else {
        slots.into_iter().flatten().collect()
    };

    Ok(NormalizedWeather {
        location: Location {
            name: current.name.clone(),
            country: current.sys.country.clone(),
            latitude: current.coord.lat,
            longitude: current.coord.lon,
            localtime: observed,
        },
        current: normalize_current(&current, observed, &condition),
        hourly,
        daily,
    })
}

fn normalize_current(
    current: &CurrentResponse,
    observed: DateTime<Utc>,
    condition: &Condition,
) -> CurrentConditions {
    let sunrise = timestamp(current.sys.sunrise);
    let sunset = timestamp(current.sys.sunset);
    let is_day = observed > sunrise && observed < sunset;
    let visibility_km = current.visibility / 1000.0;

    CurrentConditions {
        temp_c: current.main.temp.round() as i32,
        temp_f: units::celsius_to_fahrenheit(current.main.temp),
        feels_like_c: current.main.feels_like.round() as i32,
        feels_like_f: units::celsius_to_fahrenheit(current.main.feels_like),
        humidity: current.main.humidity as u8,
        cloud: current.clouds.all as u8,
        wind_kph: units::mps_to_kph(current.wind.speed),
        wind_mph: units::mps_to_mph(current.wind.speed),
        wind_degree: current.wind.deg as u16,
        pressure_hpa: current.main.pressure,
        pressure_in: units::hpa_to_inhg(current.main.pressure),
        visibility_km: units::round_dp(visibility_km, 1),
        visibility_miles: units::km_to_miles(visibility_km),
        precip_mm: units::round_dp(current.rain.one_hour, 1),
        precip_in: units::mm_to_inches(current.rain.one_hour),
        uv: estimators::uv_index_current(observed, sunrise, sunset, current.clouds.all, condition),
        air_quality: estimators::air_quality(
            current.main.humidity,
            current.visibility,
            condition,
            current.wind.speed,
        ),
        condition: condition.clone(),
        is_day,
    }
}

fn timestamp(epoch: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(epoch, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
