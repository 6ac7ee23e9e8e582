//! Secondary-source forecast models: independent per-day aggregates

use crate::resorts::Elevation;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Geographic coordinates used for the API call
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Min/max/avg triple for a numeric field aggregated over a day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// One day aggregated from the secondary source's finer-grained entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryDay {
    /// Calendar date of the aggregate
    pub date: NaiveDate,
    /// Full weekday name (e.g. "Wednesday")
    pub day_name: String,
    /// Abbreviated weekday name (e.g. "Wed"), the reconciliation key
    pub day_short: String,
    /// Air temperature range in Celsius
    pub temp: ValueRange,
    /// Feels-like temperature range in Celsius
    pub feels_like: ValueRange,
    /// Snow accumulated over the day, in cm
    pub snow_cm: f64,
    /// Rain accumulated over the day, in mm
    pub rain_mm: f64,
    /// Most frequent condition description among the day's entries
    pub condition: String,
    /// Average cloud cover percentage
    pub clouds: i64,
    /// Average relative humidity percentage
    pub humidity: i64,
    /// Average wind speed
    pub wind_speed: f64,
    /// Average wind direction in degrees
    pub wind_deg: i64,
    /// Average surface pressure in hPa
    pub pressure: i64,
    /// Maximum precipitation probability over the day, as a percentage
    pub pop: i64,
}

/// Independent daily forecast from the weather API for one station
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryForecast {
    /// Resort slug
    pub resort: String,
    /// Which station the coordinates belong to
    pub elevation: Elevation,
    /// Coordinates the API was queried with
    pub coordinates: Coordinates,
    /// Daily aggregates, date ascending, at most 7 days
    pub daily: Vec<SecondaryDay>,
    /// When this forecast was retrieved
    pub retrieved_at: DateTime<Utc>,
    /// Human-readable provenance tag
    pub source: String,
}

impl SecondaryForecast {
    /// Find the day whose weekday abbreviation matches the given prefix
    #[must_use]
    pub fn day_matching(&self, day_short: &str) -> Option<&SecondaryDay> {
        self.daily.iter().find(|d| d.day_short == day_short)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, day_short: &str) -> SecondaryDay {
        SecondaryDay {
            date: date.parse().unwrap(),
            day_name: String::new(),
            day_short: day_short.to_string(),
            temp: ValueRange { min: -5.0, max: -1.0, avg: -3.0 },
            feels_like: ValueRange { min: -9.0, max: -4.0, avg: -6.5 },
            snow_cm: 4.6,
            rain_mm: 0.0,
            condition: "Light Snow".to_string(),
            clouds: 80,
            humidity: 85,
            wind_speed: 4.2,
            wind_deg: 270,
            pressure: 1013,
            pop: 90,
        }
    }

    #[test]
    fn test_day_matching_is_exact_and_case_sensitive() {
        let forecast = SecondaryForecast {
            resort: "Val-Thorens".to_string(),
            elevation: Elevation::Mid,
            coordinates: Coordinates { lat: 45.3, lon: 6.6 },
            daily: vec![day("2026-11-25", "Wed"), day("2026-11-26", "Thu")],
            retrieved_at: Utc::now(),
            source: "test".to_string(),
        };

        assert!(forecast.day_matching("Thu").is_some());
        assert!(forecast.day_matching("thu").is_none());
        assert!(forecast.day_matching("Fri").is_none());
    }
}
