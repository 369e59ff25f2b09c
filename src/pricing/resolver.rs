//! Tier resolution

use super::tiers::{PriceTier, PRICE_TIERS};

/// Resolve the tier for `quantity` against the published table.
///
/// Quantities below every tier fall back to the first tier.
pub fn resolve_tier(quantity: i64) -> &'static PriceTier {
    // PRICE_TIERS is a non-empty static.
    resolve_tier_in(&PRICE_TIERS, quantity).unwrap_or(&PRICE_TIERS[0])
}

/// Linear scan over an ascending table. `None` only for an empty table.
pub fn resolve_tier_in(table: &[PriceTier], quantity: i64) -> Option<&PriceTier> {
    table.iter().find(|t| t.contains(quantity)).or_else(|| table.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discount_for(q: i64) -> u8 { resolve_tier(q).discount_percent }

    #[test]
    fn test_each_band() {
        assert!((50..=199).all(|q| discount_for(q) == 0));
        assert!((200..=399).all(|q| discount_for(q) == 5));
        assert!((400..=599).all(|q| discount_for(q) == 10));
        assert!((600..=999).all(|q| discount_for(q) == 15));
        assert!([1000, 5000, 1_000_000, i64::MAX].iter().all(|&q| discount_for(q) == 20));
    }

    #[test]
    fn test_under_minimum_falls_back_to_first_tier() {
        for q in [49, 10, 1, 0, -5, i64::MIN] {
            assert_eq!(resolve_tier(q), &PRICE_TIERS[0], "quantity {q}");
        }
    }

    #[test]
    fn test_custom_table() {
        let table = [PriceTier::new(10, Some(19), 0), PriceTier::new(20, None, 30)];
        assert_eq!(resolve_tier_in(&table, 25).map(|t| t.discount_percent), Some(30));
        assert_eq!(resolve_tier_in(&table, 3).map(|t| t.min_qty), Some(10));
        assert!(resolve_tier_in(&[], 100).is_none());
    }
}
