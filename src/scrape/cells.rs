//! Cell extractors, one per data row kind
//!
//! Every extractor maps a row handle to exactly one value per data cell,
//! in document order. Column alignment across rows is purely positional,
//! so extractors never filter or reorder entries; a cell that cannot be
//! read becomes the field's documented default instead. Malformed numeric
//! text degrades to the default as well, never an error.

use super::selector;
use crate::models::{Condition, NumberOrText, Wind};
use scraper::ElementRef;

/// Data cells of a row, in document order.
///
/// The canonical markup tags data cells with `forecast-table__cell`; some
/// page variants omit the class, in which case every `td` after the
/// leading row-label cell is a data cell.
pub fn data_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let tagged = selector("td.forecast-table__cell");
    let cells: Vec<_> = row.select(&tagged).collect();
    if !cells.is_empty() {
        return cells;
    }
    let any_td = selector("td");
    row.select(&any_td).skip(1).collect()
}

/// Concatenated, trimmed text content of an element
fn cell_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// True for cells that carry no value: empty or a placeholder dash
fn is_placeholder(text: &str) -> bool {
    text.is_empty() || text == "—" || text == "-"
}

/// Strip everything but digits, minus and decimal point, then parse.
/// Returns None when nothing parseable remains.
fn clean_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect();
    cleaned.parse().ok()
}

/// Parse the first numeric run (digits, optionally one decimal point)
fn leading_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let mut end = start;
    let mut seen_dot = false;
    for (i, c) in text[start..].char_indices() {
        if c.is_ascii_digit() {
            end = start + i + 1;
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            end = start + i + 1;
        } else {
            break;
        }
    }
    text[start..end].trim_end_matches('.').parse().ok()
}

/// First `data-value` attribute on a descendant, parsed as a number
fn data_value(cell: ElementRef<'_>) -> Option<f64> {
    let dv = selector("[data-value]");
    cell.select(&dv)
        .next()
        .and_then(|el| el.value().attr("data-value"))
        .and_then(|v| v.trim().parse().ok())
}

/// Weather condition per cell: image alt text, "unknown" when absent
pub fn conditions(row: ElementRef<'_>) -> Vec<Condition> {
    let img = selector("img");
    data_cells(row)
        .into_iter()
        .map(|cell| match cell.select(&img).next() {
            Some(image) => Condition {
                text: image
                    .value()
                    .attr("alt")
                    .map_or_else(|| "unknown".to_string(), |alt| alt.trim().to_string()),
                icon: image.value().attr("src").map(str::to_string),
            },
            None => Condition::unknown(),
        })
        .collect()
}

/// Temperature per cell: machine-readable attribute preferred, visible
/// text stripped to digits/minus/point otherwise, null when no digits
pub fn temperatures(row: ElementRef<'_>) -> Vec<Option<f64>> {
    data_cells(row)
        .into_iter()
        .map(|cell| {
            if let Some(value) = data_value(cell) {
                return Some(value);
            }
            let text = cell_text(cell);
            if is_placeholder(&text) {
                return None;
            }
            clean_number(&text)
        })
        .collect()
}

/// Snow amount per cell in cm; 0 when empty or a placeholder
pub fn snow_amounts(row: ElementRef<'_>) -> Vec<f64> {
    amounts(row, selector("span.snow-amount__value"))
}

/// Rain amount per cell in mm; 0 when empty or a placeholder
pub fn rain_amounts(row: ElementRef<'_>) -> Vec<f64> {
    amounts(row, selector("span.rain-amount__value"))
}

fn amounts(row: ElementRef<'_>, value_span: scraper::Selector) -> Vec<f64> {
    data_cells(row)
        .into_iter()
        .map(|cell| {
            let text = match cell.select(&value_span).next() {
                Some(span) => cell_text(span),
                None => cell_text(cell),
            };
            if is_placeholder(&text) {
                return 0.0;
            }
            leading_number(&text).unwrap_or(0.0)
        })
        .collect()
}

/// Wind per cell: speed from the value sub-element, direction from the
/// tooltip or `data-direction` attribute; None when speed is absent
pub fn winds(row: ElementRef<'_>) -> Vec<Option<Wind>> {
    let val = selector("span.wind-icon__val");
    let tooltip = selector("span.wind-icon__tooltip");
    let directed = selector("[data-direction]");
    data_cells(row)
        .into_iter()
        .map(|cell| {
            let speed = cell
                .select(&val)
                .next()
                .and_then(|el| leading_number(&cell_text(el)))?;
            let direction = cell
                .select(&tooltip)
                .next()
                .map(|el| cell_text(el))
                .filter(|t| !t.is_empty())
                .or_else(|| {
                    cell.select(&directed)
                        .next()
                        .and_then(|el| el.value().attr("data-direction"))
                        .map(str::to_string)
                });
            Some(Wind { speed, direction })
        })
        .collect()
}

/// Scalar per cell (freezing level, humidity): numeric attribute
/// preferred, else numeric text, else the raw text passed through
pub fn scalars(row: ElementRef<'_>) -> Vec<Option<NumberOrText>> {
    data_cells(row)
        .into_iter()
        .map(|cell| {
            if let Some(value) = data_value(cell) {
                return Some(NumberOrText::Number(value));
            }
            let text = cell_text(cell);
            if is_placeholder(&text) {
                return None;
            }
            match text.parse::<f64>() {
                Ok(n) => Some(NumberOrText::Number(n)),
                Err(_) => Some(NumberOrText::Text(text)),
            }
        })
        .collect()
}
