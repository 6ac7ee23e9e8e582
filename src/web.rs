//! Web server assembly: router, middleware, bind loop

use crate::api;
use crate::config::ServerConfig;
use crate::error::ForecastError;
use crate::pipeline::Pipeline;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

/// Build the application router over a pipeline
pub fn router(pipeline: Arc<Pipeline>, static_dir: &str) -> Router {
    Router::new()
        .route("/api/forecast", get(api::get_forecasts))
        .route("/api/comprehensive/{resort}", get(api::get_comprehensive))
        .route("/api/refresh", post(api::post_refresh))
        .route("/api/status", get(api::get_status))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(pipeline)
}

/// Bind and serve until the process is stopped
pub async fn serve(pipeline: Arc<Pipeline>, config: &ServerConfig) -> Result<(), ForecastError> {
    let app = router(pipeline, &config.static_dir);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
