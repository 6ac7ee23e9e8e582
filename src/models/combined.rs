//! Reconciled output and persisted snapshot shapes

use super::forecast::ForecastDay;
use super::secondary::SecondaryDay;
use crate::resorts::Elevation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cross-validation attachment for a day matched in both sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossCheck {
    /// Sum of the primary day's period snow amounts (missing periods as 0)
    pub primary_snow_total: f64,
    /// Secondary source's snow for the matched day, in cm
    pub secondary_snow_cm: f64,
    /// Rounded average of the two, 1 decimal
    pub average_snow: f64,
    /// The matched secondary day in full
    pub secondary: SecondaryDay,
}

/// A forecast day, possibly annotated with the secondary cross-check.
///
/// Days without a weekday match pass through unchanged; the flattened
/// cross-check fields simply don't appear in their JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedDay {
    #[serde(flatten)]
    pub day: ForecastDay,
    #[serde(flatten)]
    pub cross_check: Option<CrossCheck>,
}

/// The persisted (and served) artifact for one resort/elevation unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevationSnapshot {
    /// Resort slug
    pub resort: String,
    /// Elevation station
    pub elevation: Elevation,
    /// Days in source order, reconciled where possible
    pub days: Vec<CombinedDay>,
    /// Current snow conditions, when the page carried them
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub snow_conditions: BTreeMap<String, String>,
    /// Data sources that contributed to this snapshot
    pub sources: Vec<String>,
    /// When the snapshot was generated
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forecast::{Condition, ForecastSlot};

    fn bare_day() -> ForecastDay {
        ForecastDay {
            name: "Wed".to_string(),
            date: "26/11".to_string(),
            morning: Some(ForecastSlot {
                time_label: "AM".to_string(),
                condition: Condition::unknown(),
                temperature: Some(-4.0),
                snow: 2.0,
                rain: 0.0,
                wind: None,
                freezing_level: None,
                humidity: None,
            }),
            afternoon: None,
            night: None,
        }
    }

    #[test]
    fn test_unmatched_day_serializes_without_cross_check_fields() {
        let combined = CombinedDay {
            day: bare_day(),
            cross_check: None,
        };
        let json = serde_json::to_value(&combined).unwrap();
        assert_eq!(json["name"], "Wed");
        assert!(json.get("average_snow").is_none());
        assert!(json.get("secondary").is_none());
    }

    #[test]
    fn test_matched_day_flattens_cross_check() {
        let secondary: SecondaryDay = serde_json::from_value(serde_json::json!({
            "date": "2026-11-26",
            "day_name": "Wednesday",
            "day_short": "Wed",
            "temp": {"min": -5.0, "max": -1.0, "avg": -3.0},
            "feels_like": {"min": -9.0, "max": -4.0, "avg": -6.5},
            "snow_cm": 4.6,
            "rain_mm": 0.0,
            "condition": "Light Snow",
            "clouds": 80,
            "humidity": 85,
            "wind_speed": 4.2,
            "wind_deg": 270,
            "pressure": 1013,
            "pop": 90
        }))
        .unwrap();

        let combined = CombinedDay {
            day: bare_day(),
            cross_check: Some(CrossCheck {
                primary_snow_total: 2.0,
                secondary_snow_cm: 4.6,
                average_snow: 3.3,
                secondary,
            }),
        };
        let json = serde_json::to_value(&combined).unwrap();
        assert_eq!(json["name"], "Wed");
        assert_eq!(json["average_snow"], 3.3);
        assert_eq!(json["secondary"]["day_short"], "Wed");
    }
}
