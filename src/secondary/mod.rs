//! Secondary weather source: independent daily forecasts for cross-checks
//!
//! Two generations of the same vendor API are in the wild; both are
//! expressed as strategies behind one trait and selected by configuration
//! rather than duplicated call sites.

pub mod one_call;
pub mod three_hour;

pub use one_call::OneCallApi;
pub use three_hour::ThreeHourApi;

use crate::config::WeatherConfig;
use crate::error::ForecastError;
use crate::models::{SecondaryDay, SecondaryForecast, ValueRange};
use crate::resorts::{Elevation, Resort};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Daily-forecast strategy for one weather API generation
#[async_trait]
pub trait SecondaryProvider: Send + Sync {
    /// Fetch and normalize the daily forecast for one station
    async fn daily_forecast(
        &self,
        resort: &Resort,
        elevation: Elevation,
    ) -> Result<SecondaryForecast, ForecastError>;

    /// Human-readable provenance tag
    fn source_name(&self) -> &'static str;
}

/// Build the configured provider; None when no API key is set (the
/// pipeline then runs on the primary source alone).
pub fn provider_from_config(
    config: &WeatherConfig,
) -> Result<Option<Box<dyn SecondaryProvider>>, ForecastError> {
    let Some(api_key) = config.api_key.clone() else {
        return Ok(None);
    };
    let provider: Box<dyn SecondaryProvider> = match config.api_flavor.as_str() {
        "three-hour" => Box::new(ThreeHourApi::new(config, api_key)?),
        "one-call" => Box::new(OneCallApi::new(config, api_key)?),
        other => {
            return Err(ForecastError::config(format!(
                "unknown weather API flavor '{other}'"
            )));
        }
    };
    Ok(Some(provider))
}

/// Truncate daily aggregates to at most this many days
pub(crate) const MAX_DAYS: usize = 7;

/// Round to 1 decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn range(values: &[f64]) -> ValueRange {
    ValueRange {
        min: round1(values.iter().copied().fold(f64::INFINITY, f64::min)),
        max: round1(values.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        avg: round1(mean(values)),
    }
}

/// Most frequent value; ties broken by first occurrence
fn most_frequent(items: &[String]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(item.as_str()).or_default() += 1;
    }
    let mut seen = HashSet::new();
    let mut best: Option<(&str, usize)> = None;
    for item in items {
        if !seen.insert(item.as_str()) {
            continue;
        }
        let count = counts[item.as_str()];
        if best.is_none_or(|(_, n)| count > n) {
            best = Some((item.as_str(), count));
        }
    }
    best.map(|(item, _)| title_case(item))
}

/// Capitalize each word, matching the vendor's display convention
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Accumulator for one calendar day's finer-grained entries
#[derive(Debug, Default)]
pub(crate) struct DayBucket {
    temps: Vec<f64>,
    feels_like: Vec<f64>,
    snow_cm: f64,
    rain_mm: f64,
    conditions: Vec<String>,
    clouds: Vec<f64>,
    humidity: Vec<f64>,
    wind_speed: Vec<f64>,
    wind_deg: Vec<f64>,
    pressure: Vec<f64>,
    pop: Vec<f64>,
}

impl DayBucket {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn push(
        &mut self,
        temp: f64,
        feels_like: f64,
        snow_mm: f64,
        rain_mm: f64,
        condition: Option<&str>,
        clouds: f64,
        humidity: f64,
        wind_speed: f64,
        wind_deg: f64,
        pressure: f64,
        pop: f64,
    ) {
        self.temps.push(temp);
        self.feels_like.push(feels_like);
        self.snow_cm += snow_mm / 10.0;
        self.rain_mm += rain_mm;
        if let Some(condition) = condition {
            self.conditions.push(condition.to_string());
        }
        self.clouds.push(clouds);
        self.humidity.push(humidity);
        self.wind_speed.push(wind_speed);
        self.wind_deg.push(wind_deg);
        self.pressure.push(pressure);
        self.pop.push(pop);
    }

    /// Collapse the bucket into one daily aggregate: numeric fields
    /// averaged, precipitation summed, condition by frequency,
    /// precipitation probability by daily maximum.
    pub(crate) fn finish(self, date: NaiveDate) -> SecondaryDay {
        SecondaryDay {
            date,
            day_name: date.format("%A").to_string(),
            day_short: date.format("%a").to_string(),
            temp: range(&self.temps),
            feels_like: range(&self.feels_like),
            snow_cm: round1(self.snow_cm),
            rain_mm: round1(self.rain_mm),
            condition: most_frequent(&self.conditions).unwrap_or_else(|| "N/A".to_string()),
            clouds: mean(&self.clouds).round() as i64,
            humidity: mean(&self.humidity).round() as i64,
            wind_speed: round1(mean(&self.wind_speed)),
            wind_deg: mean(&self.wind_deg).round() as i64,
            pressure: mean(&self.pressure).round() as i64,
            pop: (self.pop.iter().copied().fold(0.0, f64::max) * 100.0).round() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round1() {
        assert_eq!(round1(3.25), 3.3);
        assert_eq!(round1(-3.25), -3.3);
        assert_eq!(round1(2.0), 2.0);
    }

    #[test]
    fn test_most_frequent_first_occurrence_tie_break() {
        let items: Vec<String> = ["light snow", "overcast", "overcast", "light snow"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(most_frequent(&items), Some("Light Snow".to_string()));

        let items: Vec<String> = ["snow", "clear", "clear"].iter().map(|s| s.to_string()).collect();
        assert_eq!(most_frequent(&items), Some("Clear".to_string()));

        assert_eq!(most_frequent(&[]), None);
    }

    #[test]
    fn test_bucket_aggregation() {
        let mut bucket = DayBucket::default();
        for (temp, snow_mm) in [(-5.0, 10.0), (-3.0, 6.0), (-1.0, 0.0)] {
            bucket.push(
                temp,
                temp - 4.0,
                snow_mm,
                0.0,
                Some("light snow"),
                80.0,
                85.0,
                4.0,
                270.0,
                1013.0,
                0.6,
            );
        }
        bucket.pop.push(0.9);

        let day = bucket.finish(NaiveDate::from_ymd_opt(2026, 11, 25).unwrap());
        assert_eq!(day.day_short, "Wed");
        assert_eq!(day.temp.min, -5.0);
        assert_eq!(day.temp.max, -1.0);
        assert_eq!(day.temp.avg, -3.0);
        // 16 mm of snow over the day -> 1.6 cm
        assert_eq!(day.snow_cm, 1.6);
        assert_eq!(day.condition, "Light Snow");
        // pop is the daily maximum, as a percentage
        assert_eq!(day.pop, 90);
        assert_eq!(day.humidity, 85);
    }

    #[test]
    fn test_provider_without_api_key_is_none() {
        let config = WeatherConfig::default();
        assert!(provider_from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_provider_selection_by_flavor() {
        let mut config = WeatherConfig {
            api_key: Some("k".repeat(16)),
            ..WeatherConfig::default()
        };
        let provider = provider_from_config(&config).unwrap().unwrap();
        assert_eq!(provider.source_name(), "OpenWeatherMap 5-Day / 3-Hour Forecast");

        config.api_flavor = "one-call".to_string();
        let provider = provider_from_config(&config).unwrap().unwrap();
        assert_eq!(provider.source_name(), "OpenWeatherMap One Call");
    }
}
