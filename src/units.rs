//! Unit conversion helpers
//!
//! Pure arithmetic over raw metric values. Each function applies its own
//! rounding; callers must always convert from the unrounded source value
//! rather than rounding the metric side first, so the two sides of a
//! dual-unit pair never compound each other's rounding error.

/// Celsius to Fahrenheit, rounded to the nearest degree
pub fn celsius_to_fahrenheit(c: f64) -> i32 {
    (c * 9.0 / 5.0 + 32.0).round() as i32
}

/// Meters per second to miles per hour, rounded
pub fn mps_to_mph(v: f64) -> i32 {
    (v * 2.237).round() as i32
}

/// Meters per second to kilometers per hour, rounded
pub fn mps_to_kph(v: f64) -> i32 {
    (v * 3.6).round() as i32
}

/// Hectopascals to inches of mercury, two decimals
pub fn hpa_to_inhg(v: f64) -> f64 {
    round_dp(v * 0.02953, 2)
}

/// Millimeters to inches, two decimals
pub fn mm_to_inches(v: f64) -> f64 {
    round_dp(v * 0.03937, 2)
}

/// Kilometers to miles, one decimal
pub fn km_to_miles(v: f64) -> f64 {
    round_dp(v * 0.621371, 1)
}

/// Rounds to `places` decimal places
pub fn round_dp(v: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (v * factor).round() / factor
}
