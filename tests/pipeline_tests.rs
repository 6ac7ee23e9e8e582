//! End-to-end tests over the extraction, reconciliation and persistence
//! stages, driven by realistic page markup instead of live fetches.

use chrono::{NaiveDate, Utc};
use powdercast::combine::reconcile;
use powdercast::config::StorageConfig;
use powdercast::error::ForecastError;
use powdercast::models::{
    Coordinates, ElevationSnapshot, SecondaryDay, SecondaryForecast, ValueRange,
};
use powdercast::resorts::Elevation;
use powdercast::scrape::{parse_elevation_forecast, parse_snow_conditions};
use powdercast::store::SnapshotStore;
use std::collections::BTreeMap;
use tempfile::TempDir;

/// Two days (spans 3 + 2) over five aligned columns, with the full row set
/// a real page carries.
const PAGE: &str = r#"
<html><body>
<table class="forecast-table__table">
  <tr data-row="days">
    <td class="forecast-table-days__cell" colspan="3">
      <div class="forecast-table-days__name">Wednesday</div>
      <div class="forecast-table-days__date">26/11</div>
    </td>
    <td class="forecast-table-days__cell" colspan="2">
      <div class="forecast-table-days__name">Thursday</div>
      <div class="forecast-table-days__date">27/11</div>
    </td>
  </tr>
  <tr data-row="time">
    <td class="forecast-table__cell">AM</td>
    <td class="forecast-table__cell">PM</td>
    <td class="forecast-table__cell">night</td>
    <td class="forecast-table__cell">AM</td>
    <td class="forecast-table__cell">PM</td>
  </tr>
  <tr data-row="weather">
    <td class="forecast-table__cell"><img alt="light snow" src="/i/lsnow.png"></td>
    <td class="forecast-table__cell"><img alt="clear" src="/i/clear.png"></td>
    <td class="forecast-table__cell"></td>
    <td class="forecast-table__cell"><img alt="heavy snow" src="/i/hsnow.png"></td>
    <td class="forecast-table__cell"><img alt="snow showers" src="/i/shower.png"></td>
  </tr>
  <tr data-row="temperature-max">
    <td class="forecast-table__cell"><div data-value="-4">-4</div></td>
    <td class="forecast-table__cell"><div data-value="-2">-2</div></td>
    <td class="forecast-table__cell"><div data-value="-8">-8</div></td>
    <td class="forecast-table__cell">-6 &deg;C</td>
    <td class="forecast-table__cell">&mdash;</td>
  </tr>
  <tr data-row="snow">
    <td class="forecast-table__cell"><span class="snow-amount__value">2</span></td>
    <td class="forecast-table__cell"><span class="snow-amount__value">0</span></td>
    <td class="forecast-table__cell">&mdash;</td>
    <td class="forecast-table__cell"><span class="snow-amount__value">1</span></td>
    <td class="forecast-table__cell"><span class="snow-amount__value">4</span></td>
  </tr>
  <tr data-row="rain">
    <td class="forecast-table__cell">&mdash;</td>
    <td class="forecast-table__cell">&mdash;</td>
    <td class="forecast-table__cell">&mdash;</td>
    <td class="forecast-table__cell"><span class="rain-amount__value">0.4</span></td>
    <td class="forecast-table__cell">&mdash;</td>
  </tr>
  <tr data-row="wind">
    <td class="forecast-table__cell">
      <div class="wind-icon" data-direction="NW">
        <span class="wind-icon__val">15</span>
        <span class="wind-icon__tooltip">NW</span>
      </div>
    </td>
    <td class="forecast-table__cell">
      <div class="wind-icon" data-direction="W"><span class="wind-icon__val">20</span></div>
    </td>
    <td class="forecast-table__cell"></td>
    <td class="forecast-table__cell">
      <div class="wind-icon" data-direction="SW">
        <span class="wind-icon__val">35</span>
        <span class="wind-icon__tooltip">SW</span>
      </div>
    </td>
    <td class="forecast-table__cell">
      <div class="wind-icon" data-direction="S">
        <span class="wind-icon__val">30</span>
        <span class="wind-icon__tooltip">S</span>
      </div>
    </td>
  </tr>
  <tr data-row="freezing-level">
    <td class="forecast-table__cell"><div class="level-value" data-value="2250"></div></td>
    <td class="forecast-table__cell"><div class="level-value" data-value="2400"></div></td>
    <td class="forecast-table__cell"><div class="level-value" data-value="1900"></div></td>
    <td class="forecast-table__cell">1500</td>
    <td class="forecast-table__cell">&mdash;</td>
  </tr>
  <tr data-row="humidity">
    <td class="forecast-table__cell">70</td>
    <td class="forecast-table__cell">65</td>
    <td class="forecast-table__cell">85</td>
    <td class="forecast-table__cell">95</td>
    <td class="forecast-table__cell">90</td>
  </tr>
</table>
<table class="snow-depths-table__table">
  <tr><th>Fresh snowfall depth:</th><td>25cm</td></tr>
  <tr><th>Last snowfall:</th><td>24 Nov 2026</td></tr>
</table>
</body></html>"#;

fn secondary_for_wed() -> SecondaryForecast {
    SecondaryForecast {
        resort: "Val-Thorens".to_string(),
        elevation: Elevation::Mid,
        coordinates: Coordinates {
            lat: 45.2975,
            lon: 6.5875,
        },
        daily: vec![SecondaryDay {
            date: NaiveDate::from_ymd_opt(2026, 11, 26).unwrap(),
            day_name: "Wednesday".to_string(),
            day_short: "Wed".to_string(),
            temp: ValueRange {
                min: -8.0,
                max: -2.0,
                avg: -4.5,
            },
            feels_like: ValueRange {
                min: -13.0,
                max: -6.0,
                avg: -9.0,
            },
            snow_cm: 4.6,
            rain_mm: 0.0,
            condition: "Light Snow".to_string(),
            clouds: 90,
            humidity: 82,
            wind_speed: 4.2,
            wind_deg: 280,
            pressure: 1009,
            pop: 85,
        }],
        retrieved_at: Utc::now(),
        source: "OpenWeatherMap 5-Day / 3-Hour Forecast".to_string(),
    }
}

#[test]
fn full_page_parses_into_day_records() {
    let forecast = parse_elevation_forecast(PAGE, Elevation::Mid, 2765).unwrap();
    assert_eq!(forecast.elevation_meters, 2765);
    assert_eq!(forecast.days.len(), 2);

    let wed = &forecast.days[0];
    assert_eq!(wed.name, "Wednesday");
    assert_eq!(wed.date, "26/11");
    assert_eq!(wed.filled_slots(), 3);

    let morning = wed.morning.as_ref().unwrap();
    assert_eq!(morning.time_label, "AM");
    assert_eq!(morning.condition.text, "light snow");
    assert_eq!(morning.temperature, Some(-4.0));
    assert_eq!(morning.snow, 2.0);
    let wind = morning.wind.as_ref().unwrap();
    assert_eq!(wind.speed, 15.0);
    assert_eq!(wind.direction.as_deref(), Some("NW"));
    assert_eq!(
        morning.freezing_level.as_ref().and_then(|v| v.as_number()),
        Some(2250.0)
    );

    // Placeholder snow cell on Wednesday night reads as zero
    assert_eq!(wed.night.as_ref().unwrap().snow, 0.0);
    assert_eq!(wed.snow_total(), 2.0);

    // Thursday spans two columns: night stays empty
    let thu = &forecast.days[1];
    assert_eq!(thu.filled_slots(), 2);
    assert!(thu.night.is_none());
    assert_eq!(thu.morning.as_ref().unwrap().temperature, Some(-6.0));
    assert_eq!(thu.afternoon.as_ref().unwrap().temperature, None);
    assert_eq!(thu.snow_total(), 5.0);
}

#[test]
fn reconciliation_attaches_cross_check_to_matched_day() {
    let forecast = parse_elevation_forecast(PAGE, Elevation::Mid, 2765).unwrap();
    let secondary = secondary_for_wed();
    let combined = reconcile(forecast.days, Some(&secondary));

    let wed = &combined[0];
    let check = wed.cross_check.as_ref().unwrap();
    assert_eq!(check.primary_snow_total, 2.0);
    assert_eq!(check.secondary_snow_cm, 4.6);
    assert_eq!(check.average_snow, 3.3);
    assert_eq!(check.secondary.day_short, "Wed");

    // Thursday has no secondary counterpart and passes through unchanged
    assert!(combined[1].cross_check.is_none());
    assert_eq!(combined[1].day.name, "Thursday");
}

#[test]
fn snapshot_survives_a_store_round_trip() {
    let forecast = parse_elevation_forecast(PAGE, Elevation::Mid, 2765).unwrap();
    let secondary = secondary_for_wed();
    let snapshot = ElevationSnapshot {
        resort: "Val-Thorens".to_string(),
        elevation: Elevation::Mid,
        days: reconcile(forecast.days, Some(&secondary)),
        snow_conditions: parse_snow_conditions(PAGE),
        sources: vec![
            "snow-forecast.com".to_string(),
            secondary.source.clone(),
        ],
        last_updated: Utc::now(),
    };

    let dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(&StorageConfig {
        data_dir: dir.path().to_string_lossy().into_owned(),
        freshness_hours: 3,
    })
    .unwrap();

    store.write_unit(&snapshot).unwrap();
    assert!(store.is_fresh("Val-Thorens", Elevation::Mid));

    let read = store.read_unit("Val-Thorens", Elevation::Mid).unwrap().unwrap();
    assert_eq!(read.days.len(), 2);
    let check = read.days[0].cross_check.as_ref().unwrap();
    assert_eq!(check.average_snow, 3.3);
    assert_eq!(read.snow_conditions["Fresh snowfall depth"], "25cm");
    assert_eq!(read.sources.len(), 2);
}

#[test]
fn snow_conditions_come_from_their_own_table() {
    let conditions = parse_snow_conditions(PAGE);
    assert_eq!(conditions.len(), 2);
    assert_eq!(conditions["Last snowfall"], "24 Nov 2026");
}

#[test]
fn page_without_forecast_table_fails_structurally() {
    let result = parse_elevation_forecast(
        "<html><body><p>scheduled maintenance</p></body></html>",
        Elevation::Bottom,
        2300,
    );
    assert!(matches!(result, Err(ForecastError::Structure { .. })));
}

#[test]
fn misaligned_row_fails_instead_of_shifting_columns() {
    // Snow row one cell short of the five time columns
    let page = r#"
    <table class="forecast-table__table">
      <tr data-row="days">
        <td class="forecast-table-days__cell" colspan="3">
          <div class="forecast-table-days__name">Wednesday</div>
        </td>
        <td class="forecast-table-days__cell" colspan="2">
          <div class="forecast-table-days__name">Thursday</div>
        </td>
      </tr>
      <tr data-row="time">
        <td class="forecast-table__cell">AM</td>
        <td class="forecast-table__cell">PM</td>
        <td class="forecast-table__cell">night</td>
        <td class="forecast-table__cell">AM</td>
        <td class="forecast-table__cell">PM</td>
      </tr>
      <tr data-row="snow">
        <td class="forecast-table__cell">1</td>
        <td class="forecast-table__cell">2</td>
        <td class="forecast-table__cell">3</td>
        <td class="forecast-table__cell">4</td>
      </tr>
    </table>"#;
    let err = parse_elevation_forecast(page, Elevation::Top, 3230).unwrap_err();
    assert!(matches!(err, ForecastError::Structure { .. }));
    assert!(err.to_string().contains("snow"));
}
