//! powdercast - multi-elevation ski resort snow forecasts
//!
//! This library scrapes per-elevation snow forecasts from a resort forecast
//! site, cross-checks them against an independent weather API, and persists
//! the combined result as JSON snapshots served by a small HTTP surface.

pub mod api;
pub mod combine;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod resorts;
pub mod scrape;
pub mod secondary;
pub mod store;
pub mod web;

// Re-export core types for public API
pub use config::PowdercastConfig;
pub use error::ForecastError;
pub use models::{
    ComprehensiveForecast, ElevationForecast, ForecastDay, ForecastSlot, SecondaryDay,
    SecondaryForecast,
};
pub use pipeline::Pipeline;
pub use resorts::{Elevation, Resort};
pub use store::SnapshotStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T, E = ForecastError> = std::result::Result<T, E>;
