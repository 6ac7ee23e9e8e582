//! Day headers and the day assembler
//!
//! Source cells carry no day identifier; only column position ties a
//! weather cell to a day and period. The assembler therefore walks a
//! single running column cursor shared across all days, and the aligned
//! value sequences are length-checked against the time row up front (fail
//! fast rather than silently misalign).

use super::cells;
use super::selector;
use super::table::ForecastTable;
use crate::error::ForecastError;
use crate::models::{Condition, ForecastDay, ForecastSlot, NumberOrText, Wind};
use scraper::ElementRef;

/// Periods per day; day headers claiming a wider span are clamped
const SLOTS_PER_DAY: usize = 3;

/// One day header cell: name, date label, declared column span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayHeader {
    pub name: String,
    pub date: String,
    pub span: usize,
}

/// Parse the day-header row into its header sequence
pub fn day_headers(days_row: ElementRef<'_>) -> Vec<DayHeader> {
    let cell_sel = selector("td.forecast-table-days__cell");
    let name_sel = selector(".forecast-table-days__name");
    let date_sel = selector(".forecast-table-days__date");

    let tagged: Vec<_> = days_row.select(&cell_sel).collect();
    let cells: Vec<_> = if tagged.is_empty() {
        let any_td = selector("td");
        days_row.select(&any_td).collect()
    } else {
        tagged
    };

    cells
        .into_iter()
        .map(|cell| {
            let name = cell
                .select(&name_sel)
                .next()
                .map_or_else(|| text_of(cell), text_of);
            let date = cell.select(&date_sel).next().map(text_of).unwrap_or_default();
            let span = cell
                .value()
                .attr("colspan")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(SLOTS_PER_DAY);
            DayHeader { name, date, span }
        })
        .collect()
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Positionally aligned value sequences, one entry per time-row column.
///
/// Optional rows that were absent from the table are `None` wholesale;
/// their fields take the per-kind defaults during assembly.
#[derive(Debug, Clone, Default)]
pub struct RowValues {
    pub time: Vec<String>,
    pub conditions: Option<Vec<Condition>>,
    pub temperatures: Option<Vec<Option<f64>>>,
    pub snow: Option<Vec<f64>>,
    pub rain: Option<Vec<f64>>,
    pub wind: Option<Vec<Option<Wind>>>,
    pub freezing_level: Option<Vec<Option<NumberOrText>>>,
    pub humidity: Option<Vec<Option<NumberOrText>>>,
}

impl RowValues {
    /// Run every extractor over its located row
    #[must_use]
    pub fn extract(table: &ForecastTable<'_>) -> Self {
        Self {
            time: cells::data_cells(table.time)
                .into_iter()
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect(),
            conditions: table.weather.map(cells::conditions),
            temperatures: table.temperature.map(cells::temperatures),
            snow: table.snow.map(cells::snow_amounts),
            rain: table.rain.map(cells::rain_amounts),
            wind: table.wind.map(cells::winds),
            freezing_level: table.freezing_level.map(cells::scalars),
            humidity: table.humidity.map(cells::scalars),
        }
    }

    /// Check that every present sequence matches the time row's length
    fn check_alignment(&self) -> Result<(), ForecastError> {
        let expected = self.time.len();
        let lengths = [
            ("weather", self.conditions.as_ref().map(Vec::len)),
            ("temperature", self.temperatures.as_ref().map(Vec::len)),
            ("snow", self.snow.as_ref().map(Vec::len)),
            ("rain", self.rain.as_ref().map(Vec::len)),
            ("wind", self.wind.as_ref().map(Vec::len)),
            ("freezing-level", self.freezing_level.as_ref().map(Vec::len)),
            ("humidity", self.humidity.as_ref().map(Vec::len)),
        ];
        for (row, len) in lengths {
            if let Some(len) = len {
                if len != expected {
                    return Err(ForecastError::structure(format!(
                        "{row} row has {len} cells, time row has {expected}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Build the slot at one column index
    fn slot_at(&self, i: usize) -> ForecastSlot {
        ForecastSlot {
            time_label: self.time[i].clone(),
            condition: self
                .conditions
                .as_ref()
                .map_or_else(Condition::unknown, |v| v[i].clone()),
            temperature: self.temperatures.as_ref().and_then(|v| v[i]),
            snow: self.snow.as_ref().map_or(0.0, |v| v[i]),
            rain: self.rain.as_ref().map_or(0.0, |v| v[i]),
            wind: self.wind.as_ref().and_then(|v| v[i].clone()),
            freezing_level: self.freezing_level.as_ref().and_then(|v| v[i].clone()),
            humidity: self.humidity.as_ref().and_then(|v| v[i].clone()),
        }
    }
}

/// Fold aligned column values into the ordered day list.
///
/// Each day consumes `min(declared span, 3)` columns, mapped to
/// morning/afternoon/night in order. A cursor overrun leaves the remaining
/// periods of that and all subsequent days empty rather than erroring.
/// Pure function of its inputs.
pub fn assemble(
    headers: &[DayHeader],
    values: &RowValues,
) -> Result<Vec<ForecastDay>, ForecastError> {
    values.check_alignment()?;

    let columns = values.time.len();
    let mut cursor = 0usize;
    let mut days = Vec::with_capacity(headers.len());

    for header in headers {
        let take = header.span.min(SLOTS_PER_DAY);
        let mut slots: [Option<ForecastSlot>; SLOTS_PER_DAY] = [None, None, None];
        for slot in slots.iter_mut().take(take) {
            if cursor >= columns {
                break;
            }
            *slot = Some(values.slot_at(cursor));
            cursor += 1;
        }
        let [morning, afternoon, night] = slots;
        days.push(ForecastDay {
            name: header.name.clone(),
            date: header.date.clone(),
            morning,
            afternoon,
            night,
        });
    }

    Ok(days)
}
