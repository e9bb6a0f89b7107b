use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use marketplace_api::{ApiConfig, AppServices, build_app};
use marketplace_infra::{Repositories, seed_demo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, warnings) = ApiConfig::from_env();
    marketplace_observability::init(config.log_format);
    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    tracing::debug!(?config, "loaded configuration");

    let repos = Repositories::in_memory();
    if config.seed_demo_data {
        seed_demo(&repos, Utc::now()).context("failed to seed demo data")?;
    }

    let services = Arc::new(AppServices::new(repos));
    let app = build_app(&config, services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
