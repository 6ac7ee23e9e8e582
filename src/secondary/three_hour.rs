//! Strategy for the 5-day / 3-hour forecast API generation
//!
//! The endpoint returns a flat `list` of 3-hour entries; the adapter
//! groups them by calendar day and collapses each group into one
//! [`SecondaryDay`](crate::models::SecondaryDay) aggregate.

use super::{DayBucket, MAX_DAYS, SecondaryProvider};
use crate::config::WeatherConfig;
use crate::error::ForecastError;
use crate::models::{Coordinates, SecondaryForecast};
use crate::resorts::{Elevation, Resort};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

/// Number of 3-hour entries to request: 8 per day for 5 days
const ENTRY_COUNT: u32 = 40;

/// Client for the 3-hour forecast endpoint
pub struct ThreeHourApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl ThreeHourApi {
    pub fn new(config: &WeatherConfig, api_key: String) -> Result<Self, ForecastError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            units: config.units.clone(),
        })
    }
}

#[async_trait]
impl SecondaryProvider for ThreeHourApi {
    async fn daily_forecast(
        &self,
        resort: &Resort,
        elevation: Elevation,
    ) -> Result<SecondaryForecast, ForecastError> {
        let station = resort.station(elevation);
        let url = format!("{}/data/2.5/forecast", self.base_url);
        debug!("Fetching 3-hour forecast for {}/{elevation}", resort.slug);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", station.latitude.to_string()),
                ("lon", station.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", self.units.clone()),
                ("cnt", ENTRY_COUNT.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::transport(format!(
                "weather API returned HTTP {status}"
            )));
        }

        let body: response::ForecastBody = response.json().await?;
        let forecast = aggregate(&body, resort, elevation, self.source_name());
        info!(
            "Secondary forecast for {}/{elevation}: {} days",
            resort.slug,
            forecast.daily.len()
        );
        Ok(forecast)
    }

    fn source_name(&self) -> &'static str {
        "OpenWeatherMap 5-Day / 3-Hour Forecast"
    }
}

/// Group 3-hour entries by day and aggregate. Separated from the HTTP
/// call so it can run over canned response bodies.
pub(crate) fn aggregate(
    body: &response::ForecastBody,
    resort: &Resort,
    elevation: Elevation,
    source: &str,
) -> SecondaryForecast {
    let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

    for entry in &body.list {
        let Some(timestamp) = DateTime::from_timestamp(entry.dt, 0) else {
            continue;
        };
        let date = timestamp.date_naive();
        buckets.entry(date).or_default().push(
            entry.main.temp,
            entry.main.feels_like,
            entry.snow.as_ref().and_then(|p| p.three_hour).unwrap_or(0.0),
            entry.rain.as_ref().and_then(|p| p.three_hour).unwrap_or(0.0),
            entry.weather.first().map(|w| w.description.as_str()),
            entry.clouds.as_ref().map_or(0.0, |c| c.all),
            entry.main.humidity,
            entry.wind.as_ref().map_or(0.0, |w| w.speed),
            entry.wind.as_ref().map_or(0.0, |w| w.deg),
            entry.main.pressure,
            entry.pop.unwrap_or(0.0),
        );
    }

    let station = resort.station(elevation);
    SecondaryForecast {
        resort: resort.slug.to_string(),
        elevation,
        coordinates: Coordinates {
            lat: station.latitude,
            lon: station.longitude,
        },
        daily: buckets
            .into_iter()
            .take(MAX_DAYS)
            .map(|(date, bucket)| bucket.finish(date))
            .collect(),
        retrieved_at: Utc::now(),
        source: source.to_string(),
    }
}

/// 3-hour endpoint response structures
pub(crate) mod response {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct ForecastBody {
        #[serde(default)]
        pub list: Vec<Entry>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Entry {
        pub dt: i64,
        pub main: Main,
        #[serde(default)]
        pub weather: Vec<Weather>,
        pub clouds: Option<Clouds>,
        pub wind: Option<Wind>,
        pub snow: Option<Precipitation>,
        pub rain: Option<Precipitation>,
        pub pop: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Main {
        pub temp: f64,
        pub feels_like: f64,
        #[serde(default)]
        pub humidity: f64,
        #[serde(default)]
        pub pressure: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Weather {
        pub description: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Clouds {
        #[serde(default)]
        pub all: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Wind {
        #[serde(default)]
        pub speed: f64,
        #[serde(default)]
        pub deg: f64,
    }

    /// Accumulated precipitation over the entry's window, in mm
    #[derive(Debug, Deserialize)]
    pub struct Precipitation {
        #[serde(rename = "3h")]
        pub three_hour: Option<f64>,
    }
}
