//! Refresh orchestration: fetch, parse, cross-check, persist
//!
//! A refresh cycle walks every registry resort and elevation station. Each
//! resort/elevation pair is one unit of work; a unit failing to fetch or
//! parse is logged and skipped, and only a cycle where every unit failed
//! comes back as an error.

use crate::combine;
use crate::config::PowdercastConfig;
use crate::error::ForecastError;
use crate::models::{ComprehensiveForecast, ElevationSnapshot};
use crate::resorts::{self, Elevation, Resort};
use crate::scrape::{self, ScrapeClient};
use crate::secondary::{self, SecondaryProvider};
use crate::store::{SnapshotStore, StoreMetadata};
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Provenance tag for the scraped site
const PRIMARY_SOURCE: &str = "snow-forecast.com";

/// What one refresh cycle produced
#[derive(Debug)]
pub struct RefreshOutcome {
    /// Units written, as `{resort}/{elevation}`
    pub written: Vec<String>,
    /// Units that failed, with their error text
    pub failures: BTreeMap<String, String>,
}

/// The whole forecast pipeline wired from configuration
pub struct Pipeline {
    scraper: ScrapeClient,
    secondary: Option<Box<dyn SecondaryProvider>>,
    store: SnapshotStore,
}

impl Pipeline {
    /// Build all pipeline stages from configuration
    pub fn from_config(config: &PowdercastConfig) -> Result<Self, ForecastError> {
        let scraper = ScrapeClient::new(&config.scrape)?;
        let secondary = secondary::provider_from_config(&config.weather)?;
        let store = SnapshotStore::new(&config.storage)?;
        if secondary.is_none() {
            info!("No weather API key configured; cross-checks disabled");
        }
        Ok(Self {
            scraper,
            secondary,
            store,
        })
    }

    /// The pipeline's snapshot store
    #[must_use]
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Refresh every registry unit and persist the results.
    ///
    /// Fails only when not a single unit produced a snapshot.
    pub async fn refresh_all(&self) -> Result<RefreshOutcome, ForecastError> {
        let mut snapshots = Vec::new();
        let mut written = Vec::new();
        let mut failures = BTreeMap::new();

        for resort in resorts::all() {
            let comprehensive = self
                .refresh_resort(resort, &mut snapshots, &mut written, &mut failures)
                .await?;
            if !comprehensive.elevations.is_empty() {
                self.store.write_comprehensive(&comprehensive)?;
            }
        }

        if written.is_empty() {
            return Err(ForecastError::NoData);
        }

        self.store.write_all(&snapshots)?;
        self.store.write_metadata(&StoreMetadata {
            updated_at: Utc::now(),
            units: written.clone(),
            failures: failures.clone(),
        })?;
        info!(
            "Refresh cycle complete: {} units written, {} failed",
            written.len(),
            failures.len()
        );
        Ok(RefreshOutcome { written, failures })
    }

    /// Refresh only when at least one unit snapshot is missing or stale
    pub async fn refresh_if_stale(&self) -> Result<Option<RefreshOutcome>, ForecastError> {
        let stale = resorts::all().iter().any(|resort| {
            Elevation::ALL
                .iter()
                .any(|&elevation| !self.store.is_fresh(resort.slug, elevation))
        });
        if !stale {
            return Ok(None);
        }
        self.refresh_all().await.map(Some)
    }

    async fn refresh_resort(
        &self,
        resort: &Resort,
        snapshots: &mut Vec<ElevationSnapshot>,
        written: &mut Vec<String>,
        failures: &mut BTreeMap<String, String>,
    ) -> Result<ComprehensiveForecast, ForecastError> {
        let pages = self.scraper.fetch_elevations(resort.slug).await;
        let mut comprehensive = ComprehensiveForecast {
            resort: resort.slug.to_string(),
            retrieved_at: Utc::now(),
            elevations: BTreeMap::new(),
            summaries: Vec::new(),
            snow_conditions: BTreeMap::new(),
        };

        for elevation in Elevation::ALL {
            let unit = format!("{}/{elevation}", resort.slug);
            let Some(html) = pages.get(&elevation) else {
                failures.insert(unit, "page fetch failed".to_string());
                continue;
            };

            let meters = resort.station(elevation).meters;
            let forecast = match scrape::parse_elevation_forecast(html, elevation, meters) {
                Ok(forecast) => forecast,
                Err(e) => {
                    warn!("Parse failed for {unit}: {e}");
                    failures.insert(unit, e.to_string());
                    continue;
                }
            };

            // Page-level extras live on the bottom-elevation page
            if elevation == Elevation::Bottom {
                comprehensive.summaries = scrape::parse_summaries(html);
                comprehensive.snow_conditions = scrape::parse_snow_conditions(html);
            }

            let cross = self.secondary_forecast(resort, elevation).await;
            let mut sources = vec![PRIMARY_SOURCE.to_string()];
            if let Some(cross) = &cross {
                sources.push(cross.source.clone());
            }

            let snapshot = ElevationSnapshot {
                resort: resort.slug.to_string(),
                elevation,
                days: combine::reconcile(forecast.days.clone(), cross.as_ref()),
                snow_conditions: comprehensive.snow_conditions.clone(),
                sources,
                last_updated: Utc::now(),
            };
            self.store.write_unit(&snapshot)?;
            snapshots.push(snapshot);
            written.push(unit);
            comprehensive.elevations.insert(elevation, forecast);
        }

        Ok(comprehensive)
    }

    /// Fetch the secondary forecast for one unit; its failure never fails
    /// the unit, it just drops the cross-check.
    async fn secondary_forecast(
        &self,
        resort: &Resort,
        elevation: Elevation,
    ) -> Option<crate::models::SecondaryForecast> {
        let provider = self.secondary.as_ref()?;
        match provider.daily_forecast(resort, elevation).await {
            Ok(forecast) => Some(forecast),
            Err(e) => {
                warn!(
                    "Secondary source failed for {}/{elevation}: {e}",
                    resort.slug
                );
                None
            }
        }
    }
}
