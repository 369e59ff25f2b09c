//! MTO Storefront
//!
//! Storefront service for made-to-order products sold in volume.
//!
//! ## Features
//! - Tiered volume pricing with a minimum order quantity
//! - Quote cart priced through the volume tiers
//! - Free sample requests
//! - Catalog price cache with expiry

pub mod api;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod pricing;

pub use config::Config;
pub use error::{Result, StorefrontError};
pub use pricing::{calculate_price, resolve_tier, MtoPriceResult, PriceTier};
