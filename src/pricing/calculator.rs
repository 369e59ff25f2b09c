//! MTO price calculator

use rust_decimal::Decimal;
use serde::Serialize;
use super::resolver::resolve_tier;
use super::tiers::{PriceTier, MINIMUM_ORDER_QUANTITY};

/// Price breakdown for one made-to-order line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MtoPriceResult {
    /// Effective quantity, after clamping to the minimum order.
    pub quantity: i64,
    pub base_price: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub discount_percent: u8,
    pub tier: PriceTier,
}

impl MtoPriceResult {
    /// Amount saved against list price across the whole line.
    pub fn savings(&self) -> Decimal {
        (self.base_price - self.unit_price).saturating_mul(Decimal::from(self.quantity))
    }

    /// Copy with money fields rounded to `dp` places for display.
    pub fn rounded_for_display(&self, dp: u32) -> Self {
        Self {
            unit_price: self.unit_price.round_dp(dp),
            total_price: self.total_price.round_dp(dp),
            base_price: self.base_price.round_dp(dp),
            ..self.clone()
        }
    }
}

/// Price `quantity` units at `base_price` each.
///
/// Never fails: quantities below [`MINIMUM_ORDER_QUANTITY`] are priced as the
/// minimum, and zero or negative prices pass straight through. Results carry
/// full precision.
pub fn calculate_price(quantity: i64, base_price: Decimal) -> MtoPriceResult {
    let quantity = quantity.max(MINIMUM_ORDER_QUANTITY);
    let tier = resolve_tier(quantity);
    let factor = Decimal::ONE - Decimal::from(tier.discount_percent) / Decimal::ONE_HUNDRED;
    let unit_price = base_price.saturating_mul(factor);
    let total_price = unit_price.saturating_mul(Decimal::from(quantity));
    MtoPriceResult { quantity, base_price, unit_price, total_price, discount_percent: tier.discount_percent, tier: *tier }
}
