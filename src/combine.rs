//! Cross-source reconciliation
//!
//! Primary days carry display names ("Wednesday 25"), secondary days carry
//! abbreviated names ("Wed"). A day pairs up when the abbreviation equals
//! the first three characters of the primary name; unmatched days pass
//! through unchanged.

use crate::models::{CombinedDay, CrossCheck, ForecastDay, SecondaryForecast};
use crate::secondary::round1;
use tracing::debug;

/// Merge an elevation's primary days with its secondary daily forecast.
///
/// Order and count of the primary days are preserved. For each matched
/// day the cross-check carries both snow figures and their average,
/// rounded to one decimal.
pub fn reconcile(days: Vec<ForecastDay>, secondary: Option<&SecondaryForecast>) -> Vec<CombinedDay> {
    days.into_iter()
        .map(|day| {
            let cross_check = secondary.and_then(|forecast| cross_check_for(&day, forecast));
            CombinedDay { day, cross_check }
        })
        .collect()
}

fn cross_check_for(day: &ForecastDay, secondary: &SecondaryForecast) -> Option<CrossCheck> {
    // get() rather than slicing: localized day names may put a multi-byte
    // character across the 3-byte boundary
    let prefix = day.name.get(..3)?;
    let matched = secondary.day_matching(prefix)?;
    let primary_snow_total = day.snow_total();
    let average_snow = round1((primary_snow_total + matched.snow_cm) / 2.0);
    debug!(
        "Cross-check {}: primary {primary_snow_total} cm, secondary {} cm",
        day.name, matched.snow_cm
    );
    Some(CrossCheck {
        primary_snow_total,
        secondary_snow_cm: matched.snow_cm,
        average_snow,
        secondary: matched.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Condition, Coordinates, ForecastSlot, SecondaryDay, ValueRange};
    use crate::resorts::Elevation;
    use chrono::{NaiveDate, Utc};

    fn slot(snow: f64) -> ForecastSlot {
        ForecastSlot {
            time_label: "AM".to_string(),
            condition: Condition::unknown(),
            temperature: None,
            snow,
            rain: 0.0,
            wind: None,
            freezing_level: None,
            humidity: None,
        }
    }

    fn zero_range() -> ValueRange {
        ValueRange {
            min: 0.0,
            max: 0.0,
            avg: 0.0,
        }
    }

    fn secondary_day(day_short: &str, snow_cm: f64) -> SecondaryDay {
        SecondaryDay {
            date: NaiveDate::from_ymd_opt(2026, 11, 25).unwrap(),
            day_name: String::new(),
            day_short: day_short.to_string(),
            temp: zero_range(),
            feels_like: zero_range(),
            snow_cm,
            rain_mm: 0.0,
            condition: "Snow".to_string(),
            clouds: 0,
            humidity: 0,
            wind_speed: 0.0,
            wind_deg: 0,
            pressure: 0,
            pop: 0,
        }
    }

    fn secondary_forecast(days: Vec<SecondaryDay>) -> SecondaryForecast {
        SecondaryForecast {
            resort: "Val-Thorens".to_string(),
            elevation: Elevation::Mid,
            coordinates: Coordinates { lat: 0.0, lon: 0.0 },
            daily: days,
            retrieved_at: Utc::now(),
            source: "test".to_string(),
        }
    }

    fn primary_day(name: &str, snow: [Option<f64>; 3]) -> ForecastDay {
        ForecastDay {
            name: name.to_string(),
            date: String::new(),
            morning: snow[0].map(slot),
            afternoon: snow[1].map(slot),
            night: snow[2].map(slot),
        }
    }

    #[test]
    fn test_matched_day_averages_snow() {
        let days = vec![primary_day("Wednesday 25", [Some(2.0), Some(0.0), None])];
        let secondary = secondary_forecast(vec![secondary_day("Wed", 4.6)]);

        let combined = reconcile(days, Some(&secondary));
        let check = combined[0].cross_check.as_ref().unwrap();
        assert_eq!(check.primary_snow_total, 2.0);
        assert_eq!(check.secondary_snow_cm, 4.6);
        assert_eq!(check.average_snow, 3.3);
    }

    #[test]
    fn test_unmatched_day_passes_through() {
        let days = vec![
            primary_day("Wednesday 25", [Some(1.0), None, None]),
            primary_day("Thursday 26", [Some(2.0), None, None]),
        ];
        let secondary = secondary_forecast(vec![secondary_day("Wed", 4.0)]);

        let combined = reconcile(days, Some(&secondary));
        assert_eq!(combined.len(), 2);
        assert!(combined[0].cross_check.is_some());
        assert!(combined[1].cross_check.is_none());
        assert_eq!(combined[1].day.name, "Thursday 26");
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let days = vec![primary_day("wednesday 25", [Some(1.0), None, None])];
        let secondary = secondary_forecast(vec![secondary_day("Wed", 4.0)]);
        let combined = reconcile(days, Some(&secondary));
        assert!(combined[0].cross_check.is_none());
    }

    #[test]
    fn test_short_day_name_never_matches() {
        let days = vec![primary_day("We", [Some(1.0), None, None])];
        let secondary = secondary_forecast(vec![secondary_day("We", 4.0)]);
        let combined = reconcile(days, Some(&secondary));
        assert!(combined[0].cross_check.is_none());
    }

    #[test]
    fn test_no_secondary_source_leaves_all_unchecked() {
        let days = vec![primary_day("Wednesday 25", [Some(1.0), None, None])];
        let combined = reconcile(days, None);
        assert!(combined[0].cross_check.is_none());
    }
}
