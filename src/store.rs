//! JSON snapshot persistence
//!
//! Every refresh cycle rewrites the snapshot files wholesale; there is no
//! history, and readers always see the latest complete write. Freshness is
//! judged from file modification time against a configured threshold.

use crate::config::StorageConfig;
use crate::error::ForecastError;
use crate::models::{ComprehensiveForecast, ElevationSnapshot};
use crate::resorts::Elevation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// Summary of the last refresh cycle, written alongside the snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// When the cycle finished
    pub updated_at: DateTime<Utc>,
    /// Units written as `{resort}/{elevation}`
    pub units: Vec<String>,
    /// Units that failed this cycle, with their error text
    #[serde(default)]
    pub failures: BTreeMap<String, String>,
}

/// Filesystem store for forecast snapshots
pub struct SnapshotStore {
    data_dir: PathBuf,
    freshness: Duration,
}

impl SnapshotStore {
    /// Create a store rooted at the configured data directory
    pub fn new(config: &StorageConfig) -> Result<Self, ForecastError> {
        let data_dir = PathBuf::from(&config.data_dir);
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            data_dir,
            freshness: Duration::from_secs(u64::from(config.freshness_hours) * 3600),
        })
    }

    /// Path of one unit's snapshot file: `{resort}-{elevation}.json`
    #[must_use]
    pub fn unit_path(&self, resort: &str, elevation: Elevation) -> PathBuf {
        self.data_dir
            .join(format!("{}-{elevation}.json", resort.to_lowercase()))
    }

    fn all_path(&self) -> PathBuf {
        self.data_dir.join("all-forecasts.json")
    }

    fn comprehensive_path(&self, resort: &str) -> PathBuf {
        self.data_dir
            .join(format!("comprehensive-{}.json", resort.to_lowercase()))
    }

    fn metadata_path(&self) -> PathBuf {
        self.data_dir.join("metadata.json")
    }

    /// Write one unit snapshot
    pub fn write_unit(&self, snapshot: &ElevationSnapshot) -> Result<(), ForecastError> {
        let path = self.unit_path(&snapshot.resort, snapshot.elevation);
        write_json(&path, snapshot)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    /// Read one unit snapshot, if present
    pub fn read_unit(
        &self,
        resort: &str,
        elevation: Elevation,
    ) -> Result<Option<ElevationSnapshot>, ForecastError> {
        read_json(&self.unit_path(resort, elevation))
    }

    /// Write the combined index of all unit snapshots
    pub fn write_all(&self, snapshots: &[ElevationSnapshot]) -> Result<(), ForecastError> {
        write_json(&self.all_path(), &snapshots)?;
        info!(
            "Wrote {} snapshots to {}",
            snapshots.len(),
            self.all_path().display()
        );
        Ok(())
    }

    /// Read the combined index, empty when never written
    pub fn read_all(&self) -> Result<Vec<ElevationSnapshot>, ForecastError> {
        Ok(read_json(&self.all_path())?.unwrap_or_default())
    }

    /// Write a resort's full multi-elevation forecast
    pub fn write_comprehensive(
        &self,
        forecast: &ComprehensiveForecast,
    ) -> Result<(), ForecastError> {
        write_json(&self.comprehensive_path(&forecast.resort), forecast)
    }

    /// Read a resort's full multi-elevation forecast, if present
    pub fn read_comprehensive(
        &self,
        resort: &str,
    ) -> Result<Option<ComprehensiveForecast>, ForecastError> {
        read_json(&self.comprehensive_path(resort))
    }

    /// Write the refresh-cycle metadata
    pub fn write_metadata(&self, metadata: &StoreMetadata) -> Result<(), ForecastError> {
        write_json(&self.metadata_path(), metadata)
    }

    /// Read the refresh-cycle metadata, if present
    pub fn read_metadata(&self) -> Result<Option<StoreMetadata>, ForecastError> {
        read_json(&self.metadata_path())
    }

    /// Whether a unit snapshot exists and is younger than the threshold.
    ///
    /// A missing file, an unreadable mtime, or an mtime in the future all
    /// count as stale; staleness only ever triggers a refresh.
    #[must_use]
    pub fn is_fresh(&self, resort: &str, elevation: Elevation) -> bool {
        file_age(&self.unit_path(resort, elevation)).is_some_and(|age| age <= self.freshness)
    }

    /// Age of the combined index, if it exists
    #[must_use]
    pub fn all_age(&self) -> Option<Duration> {
        file_age(&self.all_path())
    }
}

fn file_age(path: &Path) -> Option<Duration> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    SystemTime::now().duration_since(modified).ok()
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ForecastError> {
    let body = serde_json::to_vec_pretty(value)?;
    fs::write(path, body)?;
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>, ForecastError> {
    if !path.exists() {
        return Ok(None);
    }
    let body = fs::read(path)?;
    Ok(Some(serde_json::from_slice(&body)?))
}
