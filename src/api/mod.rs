//! HTTP surface

mod cart;
mod pricing;
mod samples;

use axum::{routing::{get, post, put}, Json, Router};
use chrono::Duration;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;
use crate::catalog::{CatalogEntry, Clock, PriceCache};
use crate::config::Config;
use crate::domain::aggregates::{Cart, SampleRequest};
use crate::domain::events::DomainEvent;
use crate::error::{Result, StorefrontError};

pub type SharedCache = Arc<PriceCache<Arc<dyn Clock>>>;

#[derive(Clone)]
pub struct AppState {
    pub currency: String,
    pub clock: Arc<dyn Clock>,
    pub cart_idle: Duration,
    pub cache: SharedCache,
    pub carts: Arc<RwLock<HashMap<String, Cart>>>,
    pub samples: Arc<RwLock<HashMap<Uuid, SampleRequest>>>,
}

impl AppState {
    pub fn new(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let secs = |s: i64| Duration::try_seconds(s).unwrap_or(Duration::MAX);
        Self {
            currency: config.currency.to_uppercase(),
            cache: Arc::new(PriceCache::new(clock.clone(), secs(config.price_cache_ttl_secs))),
            clock,
            cart_idle: secs(config.cart_idle_secs),
            carts: Arc::default(),
            samples: Arc::default(),
        }
    }

    /// Cache a catalog entry priced in the storefront currency.
    pub fn stock(&self, entry: CatalogEntry) -> Result<()> {
        if entry.base_price.currency() != self.currency {
            return Err(StorefrontError::BadRequest(format!("catalog is priced in {}, got {}", self.currency, entry.base_price.currency())));
        }
        self.cache.insert(entry);
        Ok(())
    }

    /// Drop expired catalog entries and carts idle longer than `cart_idle`.
    /// Returns `(entries, carts)` removed.
    pub async fn sweep(&self) -> (usize, usize) {
        let entries = self.cache.purge_expired();
        let Some(cutoff) = self.clock.now().checked_sub_signed(self.cart_idle) else { return (entries, 0) };
        let mut carts = self.carts.write().await;
        let before = carts.len();
        carts.retain(|_, cart| cart.updated_at() > cutoff);
        let removed = before - carts.len();
        if entries + removed > 0 { tracing::info!(entries, carts = removed, "swept idle state"); }
        (entries, removed)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "mto-storefront"})) }))
        .route("/api/v1/pricing/tiers", get(pricing::list_tiers))
        .route("/api/v1/pricing/quote", get(pricing::quote))
        .route("/api/v1/products", put(pricing::upsert_product))
        .route("/api/v1/products/:id/quote", get(pricing::product_quote))
        .route("/api/v1/cart/:session", get(cart::get_cart).post(cart::add_to_cart).delete(cart::clear_cart))
        .route("/api/v1/cart/:session/items/:product", put(cart::update_item))
        .route("/api/v1/samples", post(samples::submit))
        .route("/api/v1/samples/:id", get(samples::get_sample))
        .route("/api/v1/samples/:id/approve", post(samples::approve))
        .route("/api/v1/samples/:id/reject", post(samples::reject))
        .route("/api/v1/samples/:id/ship", post(samples::ship))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}

// No broker is wired up; events go to the log.
fn publish(events: Vec<DomainEvent>) {
    for event in events {
        tracing::info!(?event, "domain event");
    }
}
