use axum::{extract::{Path, Query, State}, http::StatusCode, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use super::AppState;
use crate::catalog::CatalogEntry;
use crate::error::{Result, StorefrontError};
use crate::pricing::{calculate_price, MtoPriceResult, PriceTier, PRICE_TIERS};

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub quantity: i64,
    pub base_price: Decimal,
    /// Round money fields to this many places for display.
    pub round: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuoteParams { pub quantity: i64, pub variant: Option<String>, pub round: Option<u32> }

#[derive(Debug, Serialize)]
pub struct ProductQuote { pub product: CatalogEntry, pub quote: MtoPriceResult }

fn for_display(quote: MtoPriceResult, round: Option<u32>) -> MtoPriceResult {
    match round {
        Some(dp) => quote.rounded_for_display(dp),
        None => quote,
    }
}

pub async fn list_tiers() -> Json<&'static [PriceTier]> { Json(&PRICE_TIERS[..]) }

pub async fn quote(Query(p): Query<QuoteParams>) -> Json<MtoPriceResult> {
    Json(for_display(calculate_price(p.quantity, p.base_price), p.round))
}

pub async fn product_quote(State(s): State<AppState>, Path(id): Path<String>, Query(p): Query<ProductQuoteParams>) -> Result<Json<ProductQuote>> {
    let product = s.cache.get(&id, p.variant.as_deref()).ok_or(StorefrontError::ProductNotFound)?;
    let quote = for_display(calculate_price(p.quantity, product.base_price.amount()), p.round);
    Ok(Json(ProductQuote { product, quote }))
}

pub async fn upsert_product(State(s): State<AppState>, Json(entry): Json<CatalogEntry>) -> Result<StatusCode> {
    s.stock(entry)?;
    Ok(StatusCode::NO_CONTENT)
}
