//! HTTP API handlers
//!
//! Thin serving surface over the snapshot store: read endpoints check
//! snapshot freshness and trigger a refresh before answering, so a served
//! forecast is never older than the configured threshold.

use crate::error::ForecastError;
use crate::pipeline::Pipeline;
use crate::resorts::{self, Elevation};
use crate::store::StoreMetadata;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, warn};

/// Shared handler state
pub type AppState = Arc<Pipeline>;

/// Error shape returned to API clients
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    error: String,
}

impl ApiError {
    fn not_found(what: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: what.into(),
        }
    }
}

impl From<ForecastError> for ApiError {
    fn from(e: ForecastError) -> Self {
        let status = match &e {
            ForecastError::Transport { .. }
            | ForecastError::Structure { .. }
            | ForecastError::NoData => StatusCode::BAD_GATEWAY,
            ForecastError::Config { .. }
            | ForecastError::Io(_)
            | ForecastError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            error: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("API error: {}", self.error);
        }
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub resort: Option<String>,
    pub elevation: Option<String>,
}

/// `GET /api/forecast` - unit snapshots, optionally narrowed by query
pub async fn get_forecasts(
    State(pipeline): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Response, ApiError> {
    refresh_if_stale(&pipeline).await;

    let elevation = query
        .elevation
        .as_deref()
        .map(|e| {
            Elevation::parse(e)
                .ok_or_else(|| ApiError::not_found(format!("unknown elevation '{e}'")))
        })
        .transpose()?;

    if let (Some(resort), Some(elevation)) = (&query.resort, elevation) {
        let snapshot = pipeline
            .store()
            .read_unit(resort, elevation)?
            .ok_or_else(|| ApiError::not_found(format!("no snapshot for {resort}/{elevation}")))?;
        return Ok(Json(snapshot).into_response());
    }

    let mut snapshots = pipeline.store().read_all()?;
    if let Some(resort) = &query.resort {
        snapshots.retain(|s| s.resort.eq_ignore_ascii_case(resort));
    }
    if let Some(elevation) = elevation {
        snapshots.retain(|s| s.elevation == elevation);
    }
    Ok(Json(snapshots).into_response())
}

/// `GET /api/comprehensive/{resort}` - full multi-elevation forecast
pub async fn get_comprehensive(
    State(pipeline): State<AppState>,
    Path(resort): Path<String>,
) -> Result<Response, ApiError> {
    refresh_if_stale(&pipeline).await;

    let forecast = pipeline
        .store()
        .read_comprehensive(&resort)?
        .ok_or_else(|| ApiError::not_found(format!("no comprehensive forecast for {resort}")))?;
    Ok(Json(forecast).into_response())
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub written: Vec<String>,
    pub failures: BTreeMap<String, String>,
}

/// `POST /api/refresh` - force a full refresh cycle
pub async fn post_refresh(State(pipeline): State<AppState>) -> Result<Response, ApiError> {
    let outcome = pipeline.refresh_all().await?;
    Ok(Json(RefreshResponse {
        written: outcome.written,
        failures: outcome.failures,
    })
    .into_response())
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub metadata: Option<StoreMetadata>,
    /// Freshness per unit, keyed `{resort}/{elevation}`
    pub fresh: BTreeMap<String, bool>,
}

/// `GET /api/status` - version, last cycle metadata, per-unit freshness
pub async fn get_status(State(pipeline): State<AppState>) -> Result<Response, ApiError> {
    let mut fresh = BTreeMap::new();
    for resort in resorts::all() {
        for elevation in Elevation::ALL {
            fresh.insert(
                format!("{}/{elevation}", resort.slug),
                pipeline.store().is_fresh(resort.slug, elevation),
            );
        }
    }
    Ok(Json(StatusResponse {
        version: crate::VERSION,
        metadata: pipeline.store().read_metadata()?,
        fresh,
    })
    .into_response())
}

/// Opportunistic refresh ahead of a read; a failed refresh is logged and
/// the read proceeds on whatever snapshots exist.
async fn refresh_if_stale(pipeline: &Pipeline) {
    if let Err(e) = pipeline.refresh_if_stale().await {
        warn!("Refresh before read failed: {e}");
    }
}
