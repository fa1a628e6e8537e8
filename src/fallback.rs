//! Synthetic weather generation
//!
//! Produces a complete, internally consistent model when the provider is
//! unreachable, and the partial pieces used when only the forecast half of
//! a lookup is missing. The hourly strip follows a sinusoidal diurnal
//! curve so temperatures rise and fall smoothly instead of jittering, and
//! the derived fields run through the same estimators as live data so the
//! output stays plausible.

use std::f64::consts::PI;

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use rand::Rng;

use crate::data::{
    Condition, CurrentConditions, DayForecast, HourSlot, Location, NormalizedWeather,
};
use crate::estimators;
use crate::units;

/// Flat temperature the synthetic current reading reports, in Celsius
pub const BASE_TEMP_C: f64 = 22.0;

/// Peak-to-mean swing of the synthetic diurnal temperature curve
const DIURNAL_AMPLITUDE_C: f64 = 6.0;

/// Ambient values for the synthetic current reading
const SYNTH_HUMIDITY: f64 = 60.0;
const SYNTH_CLOUD: f64 = 10.0;
const SYNTH_WIND_MPS: f64 = 3.0;
const SYNTH_PRESSURE_HPA: f64 = 1013.0;
const SYNTH_VISIBILITY_M: f64 = 10_000.0;

/// Weather palette for synthetic forecast days. Weights skew towards fair
/// weather; each entry carries the rain chance it implies.
struct PaletteDay {
    category: &'static str,
    description: &'static str,
    code: i32,
    weight: u32,
    rain_chance: u8,
}

const CONDITION_PALETTE: &[PaletteDay] = &[
    PaletteDay { category: "Clear", description: "sunny", code: 800, weight: 30, rain_chance: 0 },
    PaletteDay { category: "Clouds", description: "partly cloudy", code: 802, weight: 25, rain_chance: 10 },
    PaletteDay { category: "Clouds", description: "cloudy", code: 804, weight: 20, rain_chance: 20 },
    PaletteDay { category: "Rain", description: "light rain", code: 500, weight: 12, rain_chance: 60 },
    PaletteDay { category: "Rain", description: "rain", code: 501, weight: 8, rain_chance: 80 },
    PaletteDay { category: "Thunderstorm", description: "thunderstorm", code: 211, weight: 5, rain_chance: 90 },
];

/// Temperature on the diurnal curve: trough at 00:00, peak at 12:00
fn diurnal_temp(hour: u32, base: f64) -> f64 {
    base + DIURNAL_AMPLITUDE_C * ((f64::from(hour) - 6.0) * PI / 12.0).sin()
}

/// Builds a complete synthetic model for `location_name` as of `now`.
///
/// The current temperature is the flat 22°C base; UV and air quality come
/// out of the live estimators fed with the synthetic ambient values.
pub fn synthetic_weather(location_name: &str, now: DateTime<Utc>) -> NormalizedWeather {
    let mut rng = rand::thread_rng();
    let today = now.date_naive();
    let condition = Condition::sunny();

    let sunrise = today.and_hms_opt(6, 0, 0).unwrap_or_default().and_utc();
    let sunset = today.and_hms_opt(18, 0, 0).unwrap_or_default().and_utc();
    let is_day = now > sunrise && now < sunset;

    let current = CurrentConditions {
        temp_c: BASE_TEMP_C.round() as i32,
        temp_f: units::celsius_to_fahrenheit(BASE_TEMP_C),
        feels_like_c: BASE_TEMP_C.round() as i32,
        feels_like_f: units::celsius_to_fahrenheit(BASE_TEMP_C),
        humidity: SYNTH_HUMIDITY as u8,
        cloud: SYNTH_CLOUD as u8,
        wind_kph: units::mps_to_kph(SYNTH_WIND_MPS),
        wind_mph: units::mps_to_mph(SYNTH_WIND_MPS),
        wind_degree: 180,
        pressure_hpa: SYNTH_PRESSURE_HPA,
        pressure_in: units::hpa_to_inhg(SYNTH_PRESSURE_HPA),
        visibility_km: SYNTH_VISIBILITY_M / 1000.0,
        visibility_miles: units::km_to_miles(SYNTH_VISIBILITY_M / 1000.0),
        precip_mm: 0.0,
        precip_in: 0.0,
        uv: estimators::uv_index_current(now, sunrise, sunset, SYNTH_CLOUD, &condition),
        air_quality: estimators::air_quality(
            SYNTH_HUMIDITY,
            SYNTH_VISIBILITY_M,
            &condition,
            SYNTH_WIND_MPS,
        ),
        condition: condition.clone(),
        is_day,
    };

    let daily = (0..7)
        .map(|offset| synthetic_day(today + Duration::days(offset), &mut rng))
        .collect();

    NormalizedWeather {
        location: Location {
            name: location_name.to_string(),
            country: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            localtime: now,
        },
        current,
        hourly: synthetic_hours(now.hour(), BASE_TEMP_C, SYNTH_HUMIDITY, SYNTH_CLOUD, &condition),
        daily,
    }
}

/// Builds the 24-slot hourly strip on the diurnal curve, starting at
/// `start_hour`. Used both for the full synthetic model and to stand in
/// for a missing forecast next to a live current reading, in which case
/// the caller seeds `base_temp` and the ambient values from that reading.
pub fn synthetic_hours(
    start_hour: u32,
    base_temp: f64,
    humidity: f64,
    cloud: f64,
    condition: &Condition,
) -> Vec<HourSlot> {
    (0..24)
        .map(|offset| {
            let hour = (start_hour + offset) % 24;
            let temp = diurnal_temp(hour, base_temp);
            HourSlot {
                hour: hour as u8,
                temp_c: temp.round() as i32,
                temp_f: units::celsius_to_fahrenheit(temp),
                condition: condition.clone(),
                wind_kph: units::mps_to_kph(SYNTH_WIND_MPS),
                wind_mph: units::mps_to_mph(SYNTH_WIND_MPS),
                humidity: humidity as u8,
                rain_chance: estimators::rain_chance(condition, humidity, None),
                uv: estimators::uv_index_for_hour(hour, cloud, condition),
            }
        })
        .collect()
}

/// One synthetic forecast day with a condition drawn from the weighted
/// palette and temperatures scattered around the base.
pub fn synthetic_day<R: Rng>(date: NaiveDate, rng: &mut R) -> DayForecast {
    let palette = pick_palette(rng);
    let condition = Condition {
        category: palette.category.to_string(),
        description: palette.description.to_string(),
        code: palette.code,
    };

    let max_temp = BASE_TEMP_C + rng.gen_range(1.0..5.0);
    let min_temp = BASE_TEMP_C - rng.gen_range(3.0..7.0);
    let avg_temp = (max_temp + min_temp) / 2.0;
    let wind = rng.gen_range(2.0..6.0);
    let humidity = rng.gen_range(45.0..75.0);
    let precip = if palette.rain_chance > 50 {
        rng.gen_range(0.5..6.0)
    } else {
        0.0
    };

    DayForecast {
        date,
        max_c: max_temp.round() as i32,
        max_f: units::celsius_to_fahrenheit(max_temp),
        min_c: min_temp.round() as i32,
        min_f: units::celsius_to_fahrenheit(min_temp),
        avg_c: avg_temp.round() as i32,
        avg_f: units::celsius_to_fahrenheit(avg_temp),
        max_wind_kph: units::mps_to_kph(wind),
        max_wind_mph: units::mps_to_mph(wind),
        total_precip_mm: units::round_dp(precip, 1),
        total_precip_in: units::mm_to_inches(precip),
        avg_humidity: humidity as u8,
        uv: estimators::uv_index_for_day(&condition),
        rain_chance: palette.rain_chance,
        will_rain: palette.rain_chance > 50,
        sunrise: date.and_hms_opt(6, 0, 0).unwrap_or_default().and_utc(),
        sunset: date.and_hms_opt(18, 0, 0).unwrap_or_default().and_utc(),
        condition,
    }
}

fn pick_palette<R: Rng>(rng: &mut R) -> &'static PaletteDay {
    let total: u32 = CONDITION_PALETTE.iter().map(|entry| entry.weight).sum();
    let mut roll = rng.gen_range(0..total);

    for entry in CONDITION_PALETTE {
        if roll < entry.weight {
            return entry;
        }
        roll -= entry.weight;
    }

    &CONDITION_PALETTE[0]
}
