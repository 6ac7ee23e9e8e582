//! Strategy for the One Call API generation
//!
//! Unlike the 3-hour endpoint this one returns daily aggregates directly,
//! so the adapter maps entries one-to-one instead of bucketing.

use super::{MAX_DAYS, SecondaryProvider, round1, title_case};
use crate::config::WeatherConfig;
use crate::error::ForecastError;
use crate::models::{Coordinates, SecondaryDay, SecondaryForecast, ValueRange};
use crate::resorts::{Elevation, Resort};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info};

/// Client for the One Call daily endpoint
pub struct OneCallApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl OneCallApi {
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
impl SecondaryProvider for OneCallApi {
    async fn daily_forecast(
        &self,
        resort: &Resort,
        elevation: Elevation,
    ) -> Result<SecondaryForecast, ForecastError> {
        let station = resort.station(elevation);
        let url = format!("{}/data/3.0/onecall", self.base_url);
        debug!("Fetching one-call forecast for {}/{elevation}", resort.slug);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", station.latitude.to_string()),
                ("lon", station.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", self.units.clone()),
                ("exclude", "minutely,alerts".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::transport(format!(
                "weather API returned HTTP {status}"
            )));
        }

        let body: response::OneCallBody = response.json().await?;
        let forecast = convert(&body, resort, elevation, self.source_name());
        info!(
            "Secondary forecast for {}/{elevation}: {} days",
            resort.slug,
            forecast.daily.len()
        );
        Ok(forecast)
    }

    fn source_name(&self) -> &'static str {
        "OpenWeatherMap One Call"
    }
}

/// Map daily entries straight into the normalized shape
pub(crate) fn convert(
    body: &response::OneCallBody,
    resort: &Resort,
    elevation: Elevation,
    source: &str,
) -> SecondaryForecast {
    let daily = body
        .daily
        .iter()
        .filter_map(|entry| {
            let date = DateTime::from_timestamp(entry.dt, 0)?.date_naive();
            let feels: Vec<f64> = [
                entry.feels_like.morn,
                entry.feels_like.day,
                entry.feels_like.eve,
                entry.feels_like.night,
            ]
            .into_iter()
            .flatten()
            .collect();
            Some(SecondaryDay {
                date,
                day_name: date.format("%A").to_string(),
                day_short: date.format("%a").to_string(),
                temp: ValueRange {
                    min: round1(entry.temp.min),
                    max: round1(entry.temp.max),
                    avg: round1(entry.temp.day.unwrap_or((entry.temp.min + entry.temp.max) / 2.0)),
                },
                feels_like: feels_range(&feels),
                snow_cm: round1(entry.snow.unwrap_or(0.0) / 10.0),
                rain_mm: round1(entry.rain.unwrap_or(0.0)),
                condition: entry
                    .weather
                    .first()
                    .map_or_else(|| "N/A".to_string(), |w| title_case(&w.description)),
                clouds: entry.clouds.unwrap_or(0.0).round() as i64,
                humidity: entry.humidity.unwrap_or(0.0).round() as i64,
                wind_speed: round1(entry.wind_speed.unwrap_or(0.0)),
                wind_deg: entry.wind_deg.unwrap_or(0.0).round() as i64,
                pressure: entry.pressure.unwrap_or(0.0).round() as i64,
                pop: (entry.pop.unwrap_or(0.0) * 100.0).round() as i64,
            })
        })
        .take(MAX_DAYS)
        .collect();

    let station = resort.station(elevation);
    SecondaryForecast {
        resort: resort.slug.to_string(),
        elevation,
        coordinates: Coordinates {
            lat: station.latitude,
            lon: station.longitude,
        },
        daily,
        retrieved_at: Utc::now(),
        source: source.to_string(),
    }
}

fn feels_range(values: &[f64]) -> ValueRange {
    if values.is_empty() {
        return ValueRange {
            min: 0.0,
            max: 0.0,
            avg: 0.0,
        };
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    ValueRange {
        min: round1(min),
        max: round1(max),
        avg: round1(avg),
    }
}

/// One Call endpoint response structures
pub(crate) mod response {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct OneCallBody {
        #[serde(default)]
        pub daily: Vec<Daily>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Daily {
        pub dt: i64,
        pub temp: Temp,
        #[serde(default)]
        pub feels_like: FeelsLike,
        pub pressure: Option<f64>,
        pub humidity: Option<f64>,
        pub wind_speed: Option<f64>,
        pub wind_deg: Option<f64>,
        #[serde(default)]
        pub weather: Vec<Weather>,
        pub clouds: Option<f64>,
        pub pop: Option<f64>,
        /// Daily snowfall in mm
        pub snow: Option<f64>,
        /// Daily rainfall in mm
        pub rain: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Temp {
        pub min: f64,
        pub max: f64,
        pub day: Option<f64>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct FeelsLike {
        pub morn: Option<f64>,
        pub day: Option<f64>,
        pub eve: Option<f64>,
        pub night: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Weather {
        pub description: String,
    }
}
