//! Runtime configuration from the environment

use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};
use crate::catalog::CatalogEntry;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid value: {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("Could not read seed catalog {path}: {source}")]
    SeedRead { path: PathBuf, source: std::io::Error },
    #[error("Could not parse seed catalog {path}: {source}")]
    SeedParse { path: PathBuf, source: serde_json::Error },
}

/// Upper bound for every `*_SECS` setting: 30 days.
pub const MAX_TTL_SECS: i64 = 30 * 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub currency: String,
    pub price_cache_ttl_secs: i64,
    pub cart_idle_secs: i64,
    pub seed_catalog: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8083, currency: "USD".into(), price_cache_ttl_secs: 300, cart_idle_secs: 86_400, seed_catalog: None }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(host) = lookup("HOST") { config.host = host; }
        if let Some(port) = lookup("PORT") {
            config.port = port.parse().map_err(|_| ConfigError::Invalid { name: "PORT", value: port })?;
        }
        if let Some(currency) = lookup("CURRENCY") {
            let trimmed = currency.trim();
            if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ConfigError::Invalid { name: "CURRENCY", value: currency });
            }
            config.currency = trimmed.to_uppercase();
        }
        if let Some(ttl) = lookup("PRICE_CACHE_TTL_SECS") { config.price_cache_ttl_secs = parse_secs("PRICE_CACHE_TTL_SECS", ttl)?; }
        if let Some(idle) = lookup("CART_IDLE_SECS") { config.cart_idle_secs = parse_secs("CART_IDLE_SECS", idle)?; }
        config.seed_catalog = lookup("SEED_CATALOG").filter(|p| !p.is_empty()).map(PathBuf::from);
        if config.seed_catalog.is_none() {
            warn!("SEED_CATALOG not set; product quotes need entries pushed to /api/v1/products");
        }
        Ok(config)
    }

    pub fn bind_addr(&self) -> String { format!("{}:{}", self.host, self.port) }

    /// Catalog entries to warm the price cache with. Empty when unset.
    pub fn load_seed_catalog(&self) -> Result<Vec<CatalogEntry>, ConfigError> {
        let Some(path) = &self.seed_catalog else { return Ok(vec![]) };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::SeedRead { path: path.clone(), source })?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&raw).map_err(|source| ConfigError::SeedParse { path: path.clone(), source })?;
        info!(path = %path.display(), count = entries.len(), "loaded seed catalog");
        Ok(entries)
    }
}

fn parse_secs(name: &'static str, value: String) -> Result<i64, ConfigError> {
    match value.trim().parse::<i64>() {
        Ok(secs) if (1..=MAX_TTL_SECS).contains(&secs) => Ok(secs),
        _ => Err(ConfigError::Invalid { name, value }),
    }
}
