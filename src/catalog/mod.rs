//! Catalog price cache
//!
//! Base prices come from the hosted commerce platform. The storefront keeps
//! them for a bounded time so quotes do not refetch on every keystroke.

pub mod clock;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use crate::domain::value_objects::{Money, Sku};

pub use clock::{Clock, ManualClock, SystemClock};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub product_id: String,
    pub variant_id: Option<String>,
    pub title: String,
    pub sku: Sku,
    pub base_price: Money,
}

type Key = (String, Option<String>);

#[derive(Debug)]
struct Slot { entry: CatalogEntry, expires_at: DateTime<Utc> }

/// TTL cache of catalog entries keyed by product and variant.
pub struct PriceCache<C: Clock = SystemClock> {
    clock: C,
    ttl: Duration,
    slots: RwLock<HashMap<Key, Slot>>,
}

impl<C: Clock> PriceCache<C> {
    pub fn new(clock: C, ttl: Duration) -> Self {
        Self { clock, ttl, slots: RwLock::new(HashMap::new()) }
    }

    pub fn insert(&self, entry: CatalogEntry) {
        let key = (entry.product_id.clone(), entry.variant_id.clone());
        let expires_at = self.clock.now().checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        tracing::debug!(product_id = %key.0, variant_id = ?key.1, %expires_at, "caching catalog entry");
        self.slots.write().unwrap_or_else(|e| e.into_inner()).insert(key, Slot { entry, expires_at });
    }

    /// Live entry for the product/variant. Expired entries are evicted.
    pub fn get(&self, product_id: &str, variant_id: Option<&str>) -> Option<CatalogEntry> {
        let key = (product_id.to_string(), variant_id.map(str::to_string));
        let now = self.clock.now();
        {
            let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
            match slots.get(&key) {
                None => return None,
                Some(slot) if slot.expires_at > now => return Some(slot.entry.clone()),
                Some(_) => {}
            }
        }
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        // Another writer may have refreshed the slot in between.
        if slots.get(&key).is_some_and(|s| s.expires_at <= now) {
            slots.remove(&key);
            tracing::debug!(%product_id, "catalog entry expired");
            return None;
        }
        slots.get(&key).map(|s| s.entry.clone())
    }

    /// Live entry for the product, preferring the variant-less entry and
    /// otherwise the lowest variant id.
    pub fn get_any_variant(&self, product_id: &str) -> Option<CatalogEntry> {
        if let Some(entry) = self.get(product_id, None) { return Some(entry); }
        let now = self.clock.now();
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        slots.iter()
            .filter(|((id, _), slot)| id == product_id && slot.expires_at > now)
            .min_by(|(a, _), (b, _)| a.1.cmp(&b.1))
            .map(|(_, slot)| slot.entry.clone())
    }

    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        let before = slots.len();
        slots.retain(|_, s| s.expires_at > now);
        before - slots.len()
    }

    pub fn len(&self) -> usize { self.slots.read().unwrap_or_else(|e| e.into_inner()).len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn entry(product: &str, variant: Option<&str>) -> CatalogEntry {
        CatalogEntry {
            product_id: product.into(), variant_id: variant.map(Into::into), title: "Canvas Tote".into(),
            sku: Sku::new("TOTE-01").unwrap(), base_price: Money::usd(Decimal::new(1900, 2)),
        }
    }

    fn cache() -> (Arc<ManualClock>, PriceCache<Arc<ManualClock>>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        (clock.clone(), PriceCache::new(clock, Duration::seconds(60)))
    }

    #[test]
    fn test_hit_then_expire() {
        let (clock, cache) = cache();
        cache.insert(entry("P1", None));
        assert_eq!(cache.get("P1", None), Some(entry("P1", None)));
        clock.advance(Duration::seconds(59));
        assert!(cache.get("P1", None).is_some());
        clock.advance(Duration::seconds(1));
        assert!(cache.get("P1", None).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_variant_keys() {
        let (_, cache) = cache();
        cache.insert(entry("P1", Some("red")));
        assert!(cache.get("P1", None).is_none());
        assert!(cache.get("P1", Some("red")).is_some());
    }

    #[test]
    fn test_reinsert_refreshes_ttl() {
        let (clock, cache) = cache();
        cache.insert(entry("P1", None));
        clock.advance(Duration::seconds(45));
        cache.insert(entry("P1", None));
        clock.advance(Duration::seconds(45));
        assert!(cache.get("P1", None).is_some());
    }

    #[test]
    fn test_any_variant_lookup() {
        let (clock, cache) = cache();
        cache.insert(entry("P1", Some("red")));
        cache.insert(entry("P1", Some("blue")));
        assert_eq!(cache.get_any_variant("P1").unwrap().variant_id.as_deref(), Some("blue"));
        cache.insert(entry("P1", None));
        assert_eq!(cache.get_any_variant("P1").unwrap().variant_id, None);
        assert!(cache.get_any_variant("P2").is_none());
        clock.advance(Duration::seconds(61));
        assert!(cache.get_any_variant("P1").is_none());
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = PriceCache::new(clock, Duration::MAX);
        cache.insert(entry("P1", None));
        assert!(cache.get("P1", None).is_some());
    }

    #[test]
    fn test_purge_expired() {
        let (clock, cache) = cache();
        cache.insert(entry("P1", None));
        clock.advance(Duration::seconds(30));
        cache.insert(entry("P2", None));
        clock.advance(Duration::seconds(31));
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
    }
}
