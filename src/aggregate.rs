//! Forecast aggregation
//!
//! Buckets the provider's 3-hour forecast samples by calendar day and
//! composes the 24-hour strip. The strip matches each hour slot to the
//! sample whose hour-of-day is nearest, regardless of which calendar day
//! the sample came from, so it reads as a "typical day" assembled from the
//! closest available samples.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};

use crate::data::api::{CityBlock, ForecastEntry};
use crate::data::{Condition, DayForecast, HourSlot};
use crate::estimators;
use crate::units;

/// Per-calendar-date accumulator filled while walking the forecast list.
/// Sample lists are unordered; ordering only matters at finalization.
#[derive(Debug, Clone)]
pub struct DailyBucket {
    /// Calendar date (UTC) this bucket collects
    pub date: NaiveDate,
    /// Temperature samples in Celsius
    pub temps: Vec<f64>,
    /// Humidity samples in percent
    pub humidities: Vec<f64>,
    /// Wind speed samples in m/s
    pub winds: Vec<f64>,
    /// Estimated rain chance per sample, in percent
    pub rain_chances: Vec<u8>,
    /// Accumulated precipitation per sample window, in mm
    pub precip: Vec<f64>,
    /// First condition reported for the date
    pub condition: Condition,
    /// Sunrise, epoch seconds
    pub sunrise: i64,
    /// Sunset, epoch seconds
    pub sunset: i64,
}

impl DailyBucket {
    fn new(date: NaiveDate, city: &CityBlock, condition: Condition) -> Self {
        Self {
            date,
            temps: Vec::new(),
            humidities: Vec::new(),
            winds: Vec::new(),
            rain_chances: Vec::new(),
            precip: Vec::new(),
            condition,
            sunrise: city.sunrise,
            sunset: city.sunset,
        }
    }
}

/// UTC calendar date of an epoch-seconds timestamp
fn date_of(dt: i64) -> NaiveDate {
    DateTime::from_timestamp(dt, 0)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .date_naive()
}

/// UTC hour-of-day of an epoch-seconds timestamp
fn hour_of(dt: i64) -> u32 {
    DateTime::from_timestamp(dt, 0)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .hour()
}

/// Groups forecast samples into one bucket per distinct calendar date.
///
/// A bucket is created when the first sample for its date arrives and keeps
/// that sample's condition descriptor plus the first-seen sunrise and
/// sunset for the date. An empty sample list yields an empty map, which
/// callers must treat as "no forecast available".
pub fn bucket_by_day(entries: &[ForecastEntry], city: &CityBlock) -> BTreeMap<NaiveDate, DailyBucket> {
    let mut buckets: BTreeMap<NaiveDate, DailyBucket> = BTreeMap::new();

    for entry in entries {
        let date = date_of(entry.dt);
        let condition = entry.condition();

        let bucket = buckets
            .entry(date)
            .or_insert_with(|| DailyBucket::new(date, city, condition.clone()));

        bucket.temps.push(entry.main.temp);
        bucket.humidities.push(entry.main.humidity);
        bucket.winds.push(entry.wind.speed);
        bucket
            .rain_chances
            .push(estimators::rain_chance(&condition, entry.main.humidity, Some(entry.pop)));
        bucket.precip.push(entry.rain.three_hour);
    }

    buckets
}

/// Composes the 24-hour strip. Slot `i` represents hour
/// `(current_hour + i) % 24`; each slot is filled from the sample whose
/// hour-of-day sits closest to the slot's hour, ties going to the earlier
/// sample in input order. With no samples at all, every slot is `None`.
pub fn hourly_strip(entries: &[ForecastEntry], current_hour: u32) -> Vec<Option<HourSlot>> {
    (0..24)
        .map(|offset| {
            let target = (current_hour + offset) % 24;
            nearest_sample(entries, target).map(|entry| hour_slot_from(entry, target))
        })
        .collect()
}

/// Sample whose hour-of-day has the smallest absolute distance to
/// `target_hour`. The comparison ignores the sample's calendar date, and
/// the distance is not circular: hour 23 is 23 slots from hour 0, not 1.
/// Near midnight this can pick a sample from an unexpected day; the tests
/// pin that behavior rather than switching to nearest-timestamp matching.
fn nearest_sample(entries: &[ForecastEntry], target_hour: u32) -> Option<&ForecastEntry> {
    let mut best: Option<(&ForecastEntry, u32)> = None;

    for entry in entries {
        let distance = hour_of(entry.dt).abs_diff(target_hour);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((entry, distance)),
        }
    }

    best.map(|(entry, _)| entry)
}

fn hour_slot_from(entry: &ForecastEntry, slot_hour: u32) -> HourSlot {
    let condition = entry.condition();

    HourSlot {
        hour: slot_hour as u8,
        temp_c: entry.main.temp.round() as i32,
        temp_f: units::celsius_to_fahrenheit(entry.main.temp),
        wind_kph: units::mps_to_kph(entry.wind.speed),
        wind_mph: units::mps_to_mph(entry.wind.speed),
        humidity: entry.main.humidity as u8,
        rain_chance: estimators::rain_chance(&condition, entry.main.humidity, Some(entry.pop)),
        uv: estimators::uv_index_for_hour(slot_hour, entry.clouds.all, &condition),
        condition,
    }
}

/// Turns the day buckets into exactly seven forecast days.
///
/// Buckets finalize in date order; short forecasts are padded with
/// placeholder days counted from `today`, long ones are cut after the
/// seventh date.
pub fn finalize_daily(
    buckets: BTreeMap<NaiveDate, DailyBucket>,
    today: NaiveDate,
) -> Vec<DayForecast> {
    let mut days: Vec<DayForecast> = buckets
        .into_values()
        .take(7)
        .map(finalize_bucket)
        .collect();

    while days.len() < 7 {
        let date = today + Duration::days(days.len() as i64);
        days.push(placeholder_day(date));
    }

    days
}

fn finalize_bucket(bucket: DailyBucket) -> DayForecast {
    let count = bucket.temps.len().max(1) as f64;
    let max_temp = bucket.temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_temp = bucket.temps.iter().copied().fold(f64::INFINITY, f64::min);
    let max_temp = if max_temp.is_finite() { max_temp } else { 0.0 };
    let min_temp = if min_temp.is_finite() { min_temp } else { 0.0 };
    let avg_temp = bucket.temps.iter().sum::<f64>() / count;
    let avg_humidity = bucket.humidities.iter().sum::<f64>() / count;
    let max_wind = bucket.winds.iter().copied().fold(0.0, f64::max);
    let total_precip = bucket.precip.iter().sum::<f64>();
    let rain_chance = bucket.rain_chances.iter().copied().max().unwrap_or(0);

    DayForecast {
        date: bucket.date,
        max_c: max_temp.round() as i32,
        max_f: units::celsius_to_fahrenheit(max_temp),
        min_c: min_temp.round() as i32,
        min_f: units::celsius_to_fahrenheit(min_temp),
        avg_c: avg_temp.round() as i32,
        avg_f: units::celsius_to_fahrenheit(avg_temp),
        max_wind_kph: units::mps_to_kph(max_wind),
        max_wind_mph: units::mps_to_mph(max_wind),
        total_precip_mm: units::round_dp(total_precip, 1),
        total_precip_in: units::mm_to_inches(total_precip),
        avg_humidity: avg_humidity.round() as u8,
        uv: estimators::uv_index_for_day(&bucket.condition),
        rain_chance,
        will_rain: rain_chance > 50,
        sunrise: astro_time(bucket.date, bucket.sunrise, 6),
        sunset: astro_time(bucket.date, bucket.sunset, 18),
        condition: bucket.condition,
    }
}

/// Sunrise/sunset for a bucket: the provider's city-level time when it
/// reported one, otherwise a coarse `fallback_hour`:00 on the bucket's date.
fn astro_time(date: NaiveDate, epoch: i64, fallback_hour: u32) -> DateTime<Utc> {
    if epoch > 0 {
        DateTime::from_timestamp(epoch, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    } else {
        date.and_hms_opt(fallback_hour, 0, 0)
            .unwrap_or_default()
            .and_utc()
    }
}

/// A mild sunny day used to pad the forecast out to seven entries when the
/// provider returned fewer distinct dates.
pub fn placeholder_day(date: NaiveDate) -> DayForecast {
    let max_temp: f64 = 24.0;
    let min_temp: f64 = 16.0;
    let avg_temp: f64 = 20.0;
    let wind: f64 = 3.0;

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
        total_precip_mm: 0.0,
        total_precip_in: 0.0,
        avg_humidity: 50,
        condition: Condition::sunny(),
        uv: 5,
        rain_chance: 0,
        will_rain: false,
        sunrise: astro_time(date, 0, 6),
        sunset: astro_time(date, 0, 18),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::api::{CloudCover, MainReading, Precip, WindReading};

    /// Builds a forecast sample at the given epoch time. 1700006400 is
    /// 2023-11-15 00:00 UTC, which keeps hour arithmetic easy to follow.
    const DAY_START: i64 = 1_700_006_400;

    fn entry(offset_hours: i64, temp: f64) -> ForecastEntry {
        ForecastEntry {
            dt: DAY_START + offset_hours * 3600,
            main: MainReading {
                temp,
                feels_like: temp,
                humidity: 60.0,
                pressure: 1013.0,
            },
            weather: Vec::new(),
            wind: WindReading {
                speed: 3.0,
                deg: 180.0,
                gust: None,
            },
            clouds: CloudCover { all: 20.0 },
            pop: 0.1,
            rain: Precip {
                one_hour: 0.0,
                three_hour: 0.5,
            },
            visibility: 10_000.0,
        }
    }

    fn city() -> CityBlock {
        CityBlock {
            sunrise: DAY_START + 7 * 3600,
            sunset: DAY_START + 17 * 3600,
        }
    }

    #[test]
    fn test_bucket_by_day_groups_by_utc_date() {
        // Samples every 3 hours across two days
        let entries: Vec<ForecastEntry> = (0..16).map(|i| entry(i * 3, 15.0)).collect();
        let buckets = bucket_by_day(&entries, &city());

        assert_eq!(buckets.len(), 2, "48 hours of samples span two dates");
        let first = buckets.values().next().expect("first bucket");
        assert_eq!(first.temps.len(), 8, "eight 3-hour samples per day");
    }

    #[test]
    fn test_bucket_keeps_first_seen_condition() {
        let mut first = entry(0, 10.0);
        first.weather = vec![crate::data::api::ConditionTag {
            main: "Rain".to_string(),
            description: "light rain".to_string(),
            id: 500,
        }];
        let mut second = entry(3, 12.0);
        second.weather = vec![crate::data::api::ConditionTag {
            main: "Clear".to_string(),
            description: "clear sky".to_string(),
            id: 800,
        }];

        let buckets = bucket_by_day(&[first, second], &city());
        let bucket = buckets.values().next().expect("bucket");
        assert_eq!(bucket.condition.category, "Rain");
    }

    #[test]
    fn test_bucket_preserves_city_astro_times() {
        let buckets = bucket_by_day(&[entry(0, 10.0)], &city());
        let bucket = buckets.values().next().expect("bucket");
        assert_eq!(bucket.sunrise, city().sunrise);
        assert_eq!(bucket.sunset, city().sunset);
    }

    #[test]
    fn test_empty_forecast_yields_empty_buckets_and_blank_strip() {
        let buckets = bucket_by_day(&[], &city());
        assert!(buckets.is_empty());

        let strip = hourly_strip(&[], 9);
        assert_eq!(strip.len(), 24);
        assert!(strip.iter().all(Option::is_none));
    }

    #[test]
    fn test_hourly_strip_starts_at_current_hour_and_wraps() {
        let entries: Vec<ForecastEntry> = (0..8).map(|i| entry(i * 3, 15.0)).collect();
        let strip = hourly_strip(&entries, 22);

        assert_eq!(strip.len(), 24);
        let hours: Vec<u8> = strip
            .iter()
            .map(|slot| slot.as_ref().expect("filled slot").hour)
            .collect();
        assert_eq!(hours[0], 22);
        assert_eq!(hours[1], 23);
        assert_eq!(hours[2], 0, "strip wraps past midnight");
        assert_eq!(hours[23], 21);
    }

    #[test]
    fn test_hourly_strip_picks_nearest_hour_sample() {
        // Samples at hours 0, 3, 6, ... 21 with distinct temperatures
        let entries: Vec<ForecastEntry> = (0..8).map(|i| entry(i * 3, i as f64)).collect();
        let strip = hourly_strip(&entries, 0);

        // Slot for hour 7 sits between the hour-6 and hour-9 samples;
        // hour 6 (distance 1) wins over hour 9 (distance 2).
        let slot = strip[7].as_ref().expect("filled slot");
        assert_eq!(slot.temp_c, 2, "hour 7 matches the 06:00 sample");

        // Slot for hour 8: hour 9 (distance 1) beats hour 6 (distance 2)
        let slot = strip[8].as_ref().expect("filled slot");
        assert_eq!(slot.temp_c, 3, "hour 8 matches the 09:00 sample");
    }

    #[test]
    fn test_hourly_strip_tie_goes_to_first_sample_in_input_order() {
        // Two samples equidistant from hour 12: hours 11 and 13
        let entries = vec![entry(11, 1.0), entry(13, 2.0)];
        let strip = hourly_strip(&entries, 12);
        let slot = strip[0].as_ref().expect("filled slot");
        assert_eq!(slot.temp_c, 1, "earlier sample wins the tie");

        // Same samples in the opposite order flip the winner
        let entries = vec![entry(13, 2.0), entry(11, 1.0)];
        let strip = hourly_strip(&entries, 12);
        let slot = strip[0].as_ref().expect("filled slot");
        assert_eq!(slot.temp_c, 2);
    }

    #[test]
    fn test_hourly_distance_ignores_calendar_day() {
        // A sample at 23:00 today and one at 01:00 tomorrow. For target
        // hour 0 the non-circular distance picks 01:00 (distance 1) over
        // 23:00 (distance 23), even though 23:00 is closer in real time
        // for a strip starting late in the evening.
        let entries = vec![entry(23, 5.0), entry(25, 9.0)];
        let strip = hourly_strip(&entries, 0);
        let slot = strip[0].as_ref().expect("filled slot");
        assert_eq!(
            slot.temp_c, 9,
            "hour-of-day matching crosses the midnight boundary"
        );
    }

    #[test]
    fn test_finalize_daily_pads_to_seven() {
        let entries: Vec<ForecastEntry> = (0..16).map(|i| entry(i * 3, 15.0)).collect();
        let buckets = bucket_by_day(&entries, &city());
        let today = date_of(DAY_START);
        let days = finalize_daily(buckets, today);

        assert_eq!(days.len(), 7);
        // Two real days, then placeholders counted from today
        assert_eq!(days[2].date, today + Duration::days(2));
        assert_eq!(days[2].condition.category, "Clear");
        assert_eq!(days[2].uv, 5);
        assert!((days[2].total_precip_mm - 0.0).abs() < 1e-9);
        assert_eq!(days[6].date, today + Duration::days(6));
    }

    #[test]
    fn test_finalize_daily_truncates_to_seven_in_date_order() {
        let entries: Vec<ForecastEntry> = (0..80).map(|i| entry(i * 3, 15.0)).collect();
        let buckets = bucket_by_day(&entries, &city());
        assert!(buckets.len() > 7);

        let days = finalize_daily(buckets, date_of(DAY_START));
        assert_eq!(days.len(), 7);
        for pair in days.windows(2) {
            assert!(pair[0].date < pair[1].date, "days stay in date order");
        }
        assert_eq!(days[0].date, date_of(DAY_START));
    }

    #[test]
    fn test_finalize_bucket_statistics() {
        let mut bucket = DailyBucket::new(date_of(DAY_START), &city(), Condition::sunny());
        bucket.temps = vec![10.0, 20.0, 14.0];
        bucket.humidities = vec![50.0, 70.0, 60.0];
        bucket.winds = vec![2.0, 6.5, 4.0];
        bucket.rain_chances = vec![10, 60, 20];
        bucket.precip = vec![0.4, 1.21, 0.0];

        let day = finalize_bucket(bucket);
        assert_eq!(day.max_c, 20);
        assert_eq!(day.min_c, 10);
        assert_eq!(day.avg_c, 15, "average of 10, 20, 14 rounds to 15");
        assert_eq!(day.avg_humidity, 60);
        assert_eq!(day.max_wind_kph, units::mps_to_kph(6.5));
        assert!((day.total_precip_mm - 1.6).abs() < 1e-9);
        assert_eq!(day.rain_chance, 60);
        assert!(day.will_rain, "60% chance crosses the 50% line");
        assert_eq!(day.max_f, 68, "high converts from the raw Celsius value");
    }

    #[test]
    fn test_finalize_bucket_rain_chance_below_threshold() {
        let mut bucket = DailyBucket::new(date_of(DAY_START), &city(), Condition::sunny());
        bucket.temps = vec![15.0];
        bucket.humidities = vec![50.0];
        bucket.winds = vec![3.0];
        bucket.rain_chances = vec![50];
        bucket.precip = vec![0.0];

        let day = finalize_bucket(bucket);
        assert_eq!(day.rain_chance, 50);
        assert!(!day.will_rain, "exactly 50% does not count as rain");
    }

    #[test]
    fn test_placeholder_day_defaults() {
        let date = date_of(DAY_START);
        let day = placeholder_day(date);
        assert_eq!(day.condition.category, "Clear");
        assert_eq!(day.uv, 5);
        assert_eq!(day.rain_chance, 0);
        assert!(!day.will_rain);
        assert!((day.total_precip_mm - 0.0).abs() < 1e-9);
        assert_eq!(day.sunrise.hour(), 6);
        assert_eq!(day.sunset.hour(), 18);
    }
}
