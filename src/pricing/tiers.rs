//! Tier table

use serde::Serialize;

/// Smallest quantity a made-to-order line is priced at.
pub const MINIMUM_ORDER_QUANTITY: i64 = 50;

/// A contiguous quantity range and the discount it earns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PriceTier {
    pub min_qty: i64,
    /// Inclusive upper bound, `None` for the open-ended top tier.
    pub max_qty: Option<i64>,
    pub discount_percent: u8,
}

impl PriceTier {
    pub const fn new(min_qty: i64, max_qty: Option<i64>, discount_percent: u8) -> Self {
        Self { min_qty, max_qty, discount_percent }
    }

    pub fn contains(&self, quantity: i64) -> bool {
        quantity >= self.min_qty && self.max_qty.map_or(true, |max| quantity <= max)
    }

    pub fn is_unbounded(&self) -> bool { self.max_qty.is_none() }
}

/// Ordered by `min_qty`; contiguous; last tier unbounded.
pub static PRICE_TIERS: [PriceTier; 5] = [
    PriceTier::new(50, Some(199), 0),
    PriceTier::new(200, Some(399), 5),
    PriceTier::new(400, Some(599), 10),
    PriceTier::new(600, Some(999), 15),
    PriceTier::new(1000, None, 20),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_contiguous() {
        for pair in PRICE_TIERS.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            let max = lo.max_qty.expect("only the last tier may be unbounded");
            assert!(lo.min_qty <= max);
            assert_eq!(hi.min_qty, max + 1);
        }
        assert!(PRICE_TIERS.last().unwrap().is_unbounded());
    }

    #[test]
    fn test_table_starts_at_minimum_order() {
        assert_eq!(PRICE_TIERS[0].min_qty, MINIMUM_ORDER_QUANTITY);
    }

    #[test]
    fn test_discounts_in_range_and_increasing() {
        assert!(PRICE_TIERS.iter().all(|t| t.discount_percent < 100));
        assert!(PRICE_TIERS.windows(2).all(|p| p[0].discount_percent < p[1].discount_percent));
    }

    #[test]
    fn test_contains_bounds() {
        let tier = PRICE_TIERS[1];
        assert!(!tier.contains(199));
        assert!(tier.contains(200));
        assert!(tier.contains(399));
        assert!(!tier.contains(400));
        assert!(PRICE_TIERS[4].contains(i64::MAX));
    }
}
