//! Resort registry: known resorts with their per-elevation stations
//!
//! The scraped site keys pages by a resort slug and one of three elevation
//! stations; the secondary weather API needs fixed coordinates for the same
//! stations. Both mappings live here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three measurement stations of a resort
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Elevation {
    #[serde(rename = "bot")]
    Bottom,
    #[serde(rename = "mid")]
    Mid,
    #[serde(rename = "top")]
    Top,
}

impl Elevation {
    /// All elevations, bottom first
    pub const ALL: [Elevation; 3] = [Elevation::Bottom, Elevation::Mid, Elevation::Top];

    /// URL path segment used by the forecast site
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Elevation::Bottom => "bot",
            Elevation::Mid => "mid",
            Elevation::Top => "top",
        }
    }

    /// Parse the site's path segment
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bot" => Some(Elevation::Bottom),
            "mid" => Some(Elevation::Mid),
            "top" => Some(Elevation::Top),
            _ => None,
        }
    }
}

impl fmt::Display for Elevation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed geographic position and height of one elevation station
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Station {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Station height in meters
    pub meters: u32,
}

/// A resort known to the pipeline
#[derive(Debug, Clone)]
pub struct Resort {
    /// Slug used in forecast site URLs (e.g. "Val-Thorens")
    pub slug: &'static str,
    /// Stations ordered bottom, mid, top
    stations: [Station; 3],
}

impl Resort {
    /// Station for the given elevation
    #[must_use]
    pub fn station(&self, elevation: Elevation) -> Station {
        match elevation {
            Elevation::Bottom => self.stations[0],
            Elevation::Mid => self.stations[1],
            Elevation::Top => self.stations[2],
        }
    }
}

/// All resorts the pipeline fetches
#[must_use]
pub fn all() -> &'static [Resort] {
    static RESORTS: &[Resort] = &[
        Resort {
            slug: "Val-Thorens",
            stations: [
                Station { latitude: 45.2958, longitude: 6.5847, meters: 2300 },
                Station { latitude: 45.2975, longitude: 6.5875, meters: 2765 },
                Station { latitude: 45.2991, longitude: 6.5891, meters: 3230 },
            ],
        },
        Resort {
            slug: "Cervinia",
            stations: [
                Station { latitude: 45.9339, longitude: 7.6297, meters: 2050 },
                Station { latitude: 45.9356, longitude: 7.6314, meters: 2700 },
                Station { latitude: 45.9372, longitude: 7.6331, meters: 3480 },
            ],
        },
    ];
    RESORTS
}

/// Look up a resort by its URL slug
#[must_use]
pub fn find(slug: &str) -> Option<&'static Resort> {
    all().iter().find(|r| r.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_roundtrip() {
        for elevation in Elevation::ALL {
            assert_eq!(Elevation::parse(elevation.as_str()), Some(elevation));
        }
        assert_eq!(Elevation::parse("summit"), None);
    }

    #[test]
    fn test_elevation_serde_uses_site_segments() {
        assert_eq!(serde_json::to_string(&Elevation::Bottom).unwrap(), "\"bot\"");
        let parsed: Elevation = serde_json::from_str("\"top\"").unwrap();
        assert_eq!(parsed, Elevation::Top);
    }

    #[test]
    fn test_registry_lookup() {
        let resort = find("Val-Thorens").expect("registry should know Val-Thorens");
        assert_eq!(resort.station(Elevation::Bottom).meters, 2300);
        assert_eq!(resort.station(Elevation::Top).meters, 3230);
        assert!(find("Narnia").is_none());
    }

    #[test]
    fn test_stations_ascend() {
        for resort in all() {
            assert!(
                resort.station(Elevation::Bottom).meters < resort.station(Elevation::Mid).meters
            );
            assert!(resort.station(Elevation::Mid).meters < resort.station(Elevation::Top).meters);
        }
    }
}
