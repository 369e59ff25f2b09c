//! Volume pricing for made-to-order products
//!
//! Quotes are informational. Every quantity and every base price yields an
//! estimate: quantities under the minimum are priced as the minimum order,
//! and no currency rounding is applied until display.

pub mod tiers;
pub mod resolver;
pub mod calculator;

pub use tiers::{PriceTier, PRICE_TIERS, MINIMUM_ORDER_QUANTITY};
pub use resolver::{resolve_tier, resolve_tier_in};
pub use calculator::{calculate_price, MtoPriceResult};
