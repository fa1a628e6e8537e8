//! Skycast - normalized weather lookups from the command line
//!
//! Resolves a location query, fetches current conditions and the forecast,
//! and prints the normalized model. When the provider is unreachable or no
//! API key is configured, a synthetic demo model is shown instead.

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use skycast::cli::{Cli, StartupConfig};
use skycast::data::{NormalizedWeather, WeatherClient};
use skycast::fallback;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = StartupConfig::from_cli(&cli);

    let weather = resolve_weather(&config).await;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&weather)?);
    } else {
        print_summary(&weather);
    }

    Ok(())
}

/// Fetches live weather, degrading to the synthetic model when there is no
/// API key, the lookup fails, or --demo was passed.
async fn resolve_weather(config: &StartupConfig) -> NormalizedWeather {
    if config.demo {
        return fallback::synthetic_weather(&config.query, Utc::now());
    }

    let Some(api_key) = &config.api_key else {
        tracing::warn!("no API key configured, showing synthetic data");
        return fallback::synthetic_weather(&config.query, Utc::now());
    };

    let client = WeatherClient::new(api_key);
    match client.lookup(&config.query).await {
        Ok(weather) => weather,
        Err(err) => {
            tracing::warn!("lookup failed, showing synthetic data: {err}");
            fallback::synthetic_weather(&config.query, Utc::now())
        }
    }
}

fn print_summary(weather: &NormalizedWeather) {
    let location = &weather.location;
    let current = &weather.current;

    println!(
        "{}, {}  -  {}",
        location.name, location.country, current.condition.description
    );
    println!(
        "  {}°C ({}°F), feels like {}°C ({}°F)",
        current.temp_c, current.temp_f, current.feels_like_c, current.feels_like_f
    );
    println!(
        "  humidity {}%  cloud {}%  wind {} km/h ({} mph)",
        current.humidity, current.cloud, current.wind_kph, current.wind_mph
    );
    println!(
        "  UV {}  air quality: {}",
        current.uv,
        current.air_quality.label()
    );

    println!();
    println!("Next hours:");
    for slot in weather.hourly.iter().take(8) {
        println!(
            "  {:02}:00  {:>3}°C  rain {:>3}%  {}",
            slot.hour, slot.temp_c, slot.rain_chance, slot.condition.description
        );
    }

    println!();
    println!("7-day forecast:");
    for day in &weather.daily {
        println!(
            "  {}  {:>3}/{:<3}°C  rain {:>3}%  UV {:>2}  {}",
            day.date, day.max_c, day.min_c, day.rain_chance, day.uv, day.condition.description
        );
    }
}
