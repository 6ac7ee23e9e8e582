//! Whole-page parsing: markup in, typed elevation forecast out

use super::days::{self, RowValues};
use super::selector;
use super::table::ForecastTable;
use crate::error::ForecastError;
use crate::models::ElevationForecast;
use crate::resorts::Elevation;
use scraper::Html;
use std::collections::BTreeMap;

/// Parse one elevation page into its day forecast.
///
/// Fails with a structural-parse error (and produces no partial records)
/// when the forecast table or a required row is missing or misaligned.
pub fn parse_elevation_forecast(
    html: &str,
    elevation: Elevation,
    elevation_meters: u32,
) -> Result<ElevationForecast, ForecastError> {
    let document = Html::parse_document(html);
    let table = ForecastTable::locate(&document)?;
    let headers = days::day_headers(table.days);
    if headers.is_empty() {
        return Err(ForecastError::structure("day row has no day headers"));
    }
    let values = RowValues::extract(&table);
    let days = days::assemble(&headers, &values)?;
    Ok(ElevationForecast {
        elevation,
        elevation_meters,
        days,
    })
}

/// Free-text weather summaries from a page.
///
/// The site renders these as paragraphs containing "weather summary:";
/// short matches are navigation chrome and are skipped.
pub fn parse_summaries(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let p = selector("p");
    document
        .select(&p)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| text.to_lowercase().contains("weather summary:") && text.len() > 50)
        .collect()
}

/// Current snow conditions table: label -> value pairs
pub fn parse_snow_conditions(html: &str) -> BTreeMap<String, String> {
    let document = Html::parse_document(html);
    let table_sel = selector("table.snow-depths-table__table");
    let tr = selector("tr");
    let th = selector("th");
    let td = selector("td");

    let mut conditions = BTreeMap::new();
    let Some(table) = document.select(&table_sel).next() else {
        return conditions;
    };
    for row in table.select(&tr) {
        let label = row.select(&th).next();
        let value = row.select(&td).next();
        if let (Some(label), Some(value)) = (label, value) {
            let key = label
                .text()
                .collect::<String>()
                .trim()
                .trim_end_matches(':')
                .to_string();
            if !key.is_empty() {
                conditions.insert(key, value.text().collect::<String>().trim().to_string());
            }
        }
    }
    conditions
}
