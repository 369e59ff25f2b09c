//! MTO Storefront - made-to-order pricing and sample requests

use anyhow::Result;
use mto_storefront::{api, catalog::SystemClock, Config};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SWEEP_INTERVAL_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env()?;
    let state = api::AppState::new(&config, Arc::new(SystemClock));
    for entry in config.load_seed_catalog()? {
        state.stock(entry)?;
    }

    let sweeper = state.clone();
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            ticks.tick().await;
            sweeper.sweep().await;
        }
    });

    let app = api::router(state);
    let addr = config.bind_addr();
    tracing::info!(currency = %config.currency, ttl_secs = config.price_cache_ttl_secs, "MTO storefront listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
