//! HTML extraction pipeline for the primary forecast site
//!
//! Layered leaves-first: cell extractors produce positionally aligned value
//! sequences, the table locator finds the rows they run over, the day
//! assembler folds the aligned columns into day/period records, and the
//! fetcher orchestrates the per-elevation page downloads.

pub mod cells;
pub mod days;
pub mod fetch;
pub mod page;
pub mod table;

pub use days::{DayHeader, RowValues};
pub use fetch::ScrapeClient;
pub use page::{parse_elevation_forecast, parse_snow_conditions, parse_summaries};
pub use table::ForecastTable;

use scraper::Selector;

/// Parse a compile-time constant CSS selector.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static CSS selector is valid")
}
