//! Command-line interface parsing for Skycast
//!
//! This module handles parsing of CLI arguments using clap and resolves
//! them into a startup configuration, including the API key lookup from
//! the environment.

use clap::Parser;

/// Environment variable consulted when no --api-key flag is given
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Location looked up when no query is given
pub const DEFAULT_QUERY: &str = "Vancouver";

/// Skycast - look up normalized weather for a location
#[derive(Parser, Debug)]
#[command(name = "skycast")]
#[command(about = "Weather conditions, forecast, and derived UV/air-quality for a location")]
#[command(version)]
pub struct Cli {
    /// Location to look up, e.g. "Vancouver" or "Paris,FR"
    pub query: Option<String>,

    /// Print the full normalized model as JSON instead of a text summary
    #[arg(long)]
    pub json: bool,

    /// OpenWeather API key; falls back to the OPENWEATHER_API_KEY
    /// environment variable
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Skip the network and print the synthetic demo model
    #[arg(long)]
    pub demo: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Location query to resolve
    pub query: String,
    /// Whether to print JSON instead of the text summary
    pub json: bool,
    /// API key, when one was supplied via flag or environment
    pub api_key: Option<String>,
    /// Whether to skip the network entirely
    pub demo: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments, consulting the
    /// environment for a missing API key.
    pub fn from_cli(cli: &Cli) -> Self {
        Self::resolve(cli, std::env::var(API_KEY_ENV).ok())
    }

    /// Creates a StartupConfig from parsed CLI arguments and an already
    /// looked-up environment key. The flag wins over the environment, and
    /// blank keys count as absent.
    pub fn resolve(cli: &Cli, env_key: Option<String>) -> Self {
        let api_key = cli
            .api_key
            .clone()
            .or(env_key)
            .filter(|key| !key.trim().is_empty());

        Self {
            query: cli
                .query
                .clone()
                .unwrap_or_else(|| DEFAULT_QUERY.to_string()),
            json: cli.json,
            api_key,
            demo: cli.demo,
        }
    }
}
