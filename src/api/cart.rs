use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use super::{publish, AppState};
use crate::domain::aggregates::{Cart, CartItem};
use crate::domain::value_objects::{Money, Quantity};
use crate::error::{Result, StorefrontError};
use crate::pricing::MtoPriceResult;

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest { pub product_id: String, pub variant_id: Option<String>, pub quantity: u32 }

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest { pub variant_id: Option<String>, pub quantity: u32 }

#[derive(Debug, Serialize)]
pub struct CartLine<'a> {
    #[serde(flatten)]
    pub item: &'a CartItem,
    pub quote: MtoPriceResult,
}

#[derive(Debug, Serialize)]
pub struct CartView<'a> {
    pub id: &'a str,
    pub currency: &'a str,
    pub lines: Vec<CartLine<'a>>,
    pub subtotal: &'a Money,
    pub savings: Money,
}

impl<'a> CartView<'a> {
    fn of(cart: &'a Cart) -> Self {
        Self {
            id: cart.id(), currency: cart.currency(),
            lines: cart.items().iter().map(|item| CartLine { item, quote: cart.line_quote(item) }).collect(),
            subtotal: cart.subtotal(), savings: cart.total_savings(),
        }
    }
}

type CartJson = Json<serde_json::Value>;

fn render(cart: &Cart) -> Result<CartJson> {
    serde_json::to_value(CartView::of(cart)).map(Json).map_err(|e| StorefrontError::BadRequest(e.to_string()))
}

pub async fn get_cart(State(s): State<AppState>, Path(session): Path<String>) -> Result<CartJson> {
    let carts = s.carts.read().await;
    render(carts.get(&session).ok_or(StorefrontError::CartNotFound)?)
}

pub async fn add_to_cart(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<AddToCartRequest>) -> Result<(StatusCode, CartJson)> {
    // Price from the catalog, never from the client.
    let product = s.cache.get(&r.product_id, r.variant_id.as_deref()).ok_or(StorefrontError::ProductNotFound)?;
    let item = CartItem {
        product_id: product.product_id, variant_id: product.variant_id, name: product.title,
        sku: product.sku, quantity: Quantity::new(r.quantity), base_price: product.base_price,
    };
    let mut carts = s.carts.write().await;
    let cart = carts.entry(session.clone()).or_insert_with(|| Cart::for_session(session.clone(), &s.currency));
    if let Err(e) = cart.add_item(item) {
        if cart.is_empty() { carts.remove(&session); }
        return Err(e.into());
    }
    publish(cart.take_events());
    Ok((StatusCode::CREATED, render(cart)?))
}

pub async fn update_item(State(s): State<AppState>, Path((session, product)): Path<(String, String)>, Json(r): Json<UpdateQuantityRequest>) -> Result<CartJson> {
    let mut carts = s.carts.write().await;
    let cart = carts.get_mut(&session).ok_or(StorefrontError::CartNotFound)?;
    cart.update_quantity(&product, r.variant_id.as_deref(), r.quantity)?;
    publish(cart.take_events());
    render(cart)
}

pub async fn clear_cart(State(s): State<AppState>, Path(session): Path<String>) -> Result<StatusCode> {
    if let Some(mut cart) = s.carts.write().await.remove(&session) {
        cart.clear();
        publish(cart.take_events());
    }
    Ok(StatusCode::NO_CONTENT)
}
