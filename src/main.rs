//! powdercast binary: refresh snow forecasts or serve them over HTTP

use anyhow::{Context, Result};
use powdercast::config::PowdercastConfig;
use powdercast::pipeline::Pipeline;
use powdercast::web;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = PowdercastConfig::load().with_context(|| "Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("powdercast={}", config.logging.level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("powdercast {} starting", powdercast::VERSION);

    let pipeline =
        Arc::new(Pipeline::from_config(&config).with_context(|| "Failed to build pipeline")?);

    match std::env::args().nth(1).as_deref() {
        Some("refresh") => {
            let outcome = pipeline.refresh_all().await?;
            info!(
                "Wrote {} snapshots ({} failures)",
                outcome.written.len(),
                outcome.failures.len()
            );
            for (unit, error) in &outcome.failures {
                info!("  failed {unit}: {error}");
            }
        }
        Some("serve") | None => {
            web::serve(pipeline, &config.server).await?;
        }
        Some(other) => {
            anyhow::bail!("unknown command '{other}'; expected 'serve' or 'refresh'");
        }
    }

    Ok(())
}
