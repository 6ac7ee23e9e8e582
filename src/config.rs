//! Configuration management for powdercast
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::ForecastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the powdercast application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PowdercastConfig {
    /// Forecast site scraping configuration
    #[serde(default)]
    pub scrape: ScrapeConfig,
    /// Secondary weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Snapshot storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Scraping configuration for the primary forecast site.
///
/// Headers and cookies are explicit inputs here so that the fetch client
/// never carries module-level session state; test doubles supply fixed
/// values through this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Base URL for resort forecast pages
    #[serde(default = "default_scrape_base_url")]
    pub base_url: String,
    /// Forecast period path segment (e.g. "6day")
    #[serde(default = "default_scrape_period")]
    pub period: String,
    /// Browser-like User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Accept header
    #[serde(default = "default_accept")]
    pub accept: String,
    /// Accept-Language header
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    /// Optional session cookie header value
    pub cookies: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Secondary weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// API key; the secondary source is skipped entirely when unset
    pub api_key: Option<String>,
    /// Base URL for the weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Which API generation to call: "three-hour" or "one-call"
    #[serde(default = "default_api_flavor")]
    pub api_flavor: String,
    /// Unit system passed to the API
    #[serde(default = "default_units")]
    pub units: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Snapshot storage configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory where JSON snapshots are written
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Snapshot freshness threshold in hours
    #[serde(default = "default_freshness_hours")]
    pub freshness_hours: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Web server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to bind the HTTP server on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the static front-end page
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

// Default value functions
fn default_scrape_base_url() -> String {
    "https://www.snow-forecast.com/resorts".to_string()
}

fn default_scrape_period() -> String {
    "6day".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.5".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_api_flavor() -> String {
    "three-hour".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_freshness_hours() -> u32 {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: default_scrape_base_url(),
            period: default_scrape_period(),
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            cookies: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            api_flavor: default_api_flavor(),
            units: default_units(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            freshness_hours: default_freshness_hours(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl PowdercastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides with POWDERCAST_ prefix
        builder = builder.add_source(
            Environment::with_prefix("POWDERCAST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: PowdercastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("powdercast").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.scrape.timeout_seconds == 0 || self.scrape.timeout_seconds > 300 {
            return Err(
                ForecastError::config("Scrape timeout must be between 1 and 300 seconds").into(),
            );
        }

        if self.weather.timeout_seconds == 0 || self.weather.timeout_seconds > 300 {
            return Err(ForecastError::config(
                "Weather API timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.storage.freshness_hours == 0 || self.storage.freshness_hours > 168 {
            return Err(ForecastError::config(
                "Snapshot freshness threshold must be between 1 and 168 hours",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_flavors = ["three-hour", "one-call"];
        if !valid_flavors.contains(&self.weather.api_flavor.as_str()) {
            return Err(ForecastError::config(format!(
                "Invalid weather API flavor '{}'. Must be one of: {}",
                self.weather.api_flavor,
                valid_flavors.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Scrape base URL", &self.scrape.base_url),
            ("Weather API base URL", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ForecastError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if let Some(api_key) = &self.weather.api_key {
            if api_key.is_empty() {
                return Err(ForecastError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        Ok(())
    }
}
