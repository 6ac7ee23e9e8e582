//! Forecast table locator
//!
//! Finds the forecast table by its stable class marker and hands out one
//! row handle per logical row, identified by the `data-row` attribute. The
//! table and the day/time rows are structurally required; every other row
//! is independently optional and its absence must not abort assembly of
//! the rows that are present.

use super::selector;
use crate::error::ForecastError;
use scraper::{ElementRef, Html};

/// Row handles into a located forecast table
#[derive(Debug, Clone, Copy)]
pub struct ForecastTable<'a> {
    /// Day header row (required)
    pub days: ElementRef<'a>,
    /// Time period row (required); its cell count defines the column count
    pub time: ElementRef<'a>,
    pub weather: Option<ElementRef<'a>>,
    pub temperature: Option<ElementRef<'a>>,
    pub snow: Option<ElementRef<'a>>,
    pub rain: Option<ElementRef<'a>>,
    pub wind: Option<ElementRef<'a>>,
    pub freezing_level: Option<ElementRef<'a>>,
    pub humidity: Option<ElementRef<'a>>,
}

impl<'a> ForecastTable<'a> {
    /// Locate the forecast table and its rows in a parsed document.
    ///
    /// Fails with a structural-parse error when the table itself, the day
    /// row, or the time row cannot be found.
    pub fn locate(document: &'a Html) -> Result<Self, ForecastError> {
        let table_sel = selector("table.forecast-table__table");
        let table = document
            .select(&table_sel)
            .next()
            .ok_or_else(|| ForecastError::structure("no forecast table in page"))?;

        let days = Self::row(table, "days")
            .ok_or_else(|| ForecastError::structure("forecast table has no day row"))?;
        let time = Self::row(table, "time")
            .ok_or_else(|| ForecastError::structure("forecast table has no time row"))?;

        Ok(Self {
            days,
            time,
            weather: Self::row(table, "weather"),
            // The site has served both markers over time; accept either.
            temperature: Self::row(table, "temperature-max")
                .or_else(|| Self::row(table, "temperature")),
            snow: Self::row(table, "snow"),
            rain: Self::row(table, "rain"),
            wind: Self::row(table, "wind"),
            freezing_level: Self::row(table, "freezing-level"),
            humidity: Self::row(table, "humidity"),
        })
    }

    /// Find a row by its `data-row` identity marker
    fn row(table: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
        let tr = selector("tr");
        table
            .select(&tr)
            .find(|row| row.value().attr("data-row") == Some(name))
    }
}
