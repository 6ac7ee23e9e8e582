//! Scraped forecast models: slots, days, elevations
//!
//! All entities here are built fresh per fetch cycle by the extraction
//! pipeline and never mutated after assembly.

use crate::resorts::Elevation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Weather condition for one slot: description text plus icon reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Human-readable condition (image alt text), "unknown" when absent
    pub text: String,
    /// Icon path/URL from the source markup, if any
    pub icon: Option<String>,
}

impl Condition {
    /// Sentinel for a cell without a recognizable condition image
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            text: "unknown".to_string(),
            icon: None,
        }
    }
}

/// Wind reading for one slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Speed in km/h
    pub speed: f64,
    /// Compass direction text (e.g. "NW"), if the source carried one
    pub direction: Option<String>,
}

impl Wind {
    /// Composed label, e.g. "15 km/h NW". A slot without a wind reading
    /// has no `Wind` at all; renderers print "N/A" for those.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.direction {
            Some(direction) => format!("{} km/h {}", self.speed, direction),
            None => format!("{} km/h", self.speed),
        }
    }
}

impl fmt::Display for Wind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A scraped value that is numeric when the source allows, raw text otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    /// Numeric value if this is a number
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(_) => None,
        }
    }
}

/// One time period (morning/afternoon/night) of one forecast day.
///
/// Field defaults encode the partial-data policy: a missing source cell is
/// an explicit `None` or zero, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSlot {
    /// Time label from the source column (e.g. "AM", "night")
    pub time_label: String,
    /// Weather condition
    pub condition: Condition,
    /// Temperature in Celsius; null when the cell had no digits
    pub temperature: Option<f64>,
    /// Fresh snow in cm; 0 when the cell was empty or a dash
    pub snow: f64,
    /// Rain in mm; 0 when the cell was empty or a dash
    pub rain: f64,
    /// Wind; null when the speed sub-element was absent
    pub wind: Option<Wind>,
    /// Freezing level in meters, or raw text when non-numeric
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freezing_level: Option<NumberOrText>,
    /// Relative humidity percentage, or raw text when non-numeric
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<NumberOrText>,
}

/// One forecast day with its fixed sub-periods.
///
/// Invariant: at most 3 slots regardless of the day header's declared
/// column span; the assembler clamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Day name as printed by the source (e.g. "Wed")
    pub name: String,
    /// Date label as printed by the source (e.g. "26/11")
    pub date: String,
    pub morning: Option<ForecastSlot>,
    pub afternoon: Option<ForecastSlot>,
    pub night: Option<ForecastSlot>,
}

impl ForecastDay {
    /// The day's periods in fixed order
    #[must_use]
    pub fn slots(&self) -> [Option<&ForecastSlot>; 3] {
        [
            self.morning.as_ref(),
            self.afternoon.as_ref(),
            self.night.as_ref(),
        ]
    }

    /// Number of filled periods
    #[must_use]
    pub fn filled_slots(&self) -> usize {
        self.slots().iter().filter(|s| s.is_some()).count()
    }

    /// Sum of the day's period snow amounts, treating missing periods as 0
    #[must_use]
    pub fn snow_total(&self) -> f64 {
        self.slots()
            .iter()
            .flatten()
            .map(|slot| slot.snow)
            .sum()
    }
}

/// Ordered day forecast for one elevation station
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevationForecast {
    /// Which station this forecast is for
    pub elevation: Elevation,
    /// Station height in meters
    pub elevation_meters: u32,
    /// Days in source order
    pub days: Vec<ForecastDay>,
}

/// Full multi-elevation forecast for one resort
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComprehensiveForecast {
    /// Resort slug
    pub resort: String,
    /// When this forecast was retrieved
    pub retrieved_at: DateTime<Utc>,
    /// Per-elevation day forecasts; absent elevations failed to fetch
    pub elevations: BTreeMap<Elevation, ElevationForecast>,
    /// Free-text weather summaries from the bottom-elevation page
    pub summaries: Vec<String>,
    /// Current snow condition label -> value, from the bottom-elevation page
    pub snow_conditions: BTreeMap<String, String>,
}
