//! Data models for the powdercast application
//!
//! Core domain models organized by concern:
//! - forecast: scraped day/period records per elevation
//! - secondary: daily aggregates from the independent weather API
//! - combined: reconciled output and persisted snapshot shapes

pub mod combined;
pub mod forecast;
pub mod secondary;

// Re-export all public types for convenient access
pub use combined::{CombinedDay, CrossCheck, ElevationSnapshot};
pub use forecast::{
    ComprehensiveForecast, Condition, ElevationForecast, ForecastDay, ForecastSlot, NumberOrText,
    Wind,
};
pub use secondary::{Coordinates, SecondaryDay, SecondaryForecast, ValueRange};
