//! Quote cart aggregate
//!
//! Lines hold the list (base) price of the selected variant. Line totals are
//! always derived through the MTO calculator, so volume discounts and the
//! minimum-order clamp apply per line.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::{Money, Quantity, Sku};
use crate::pricing::{calculate_price, MtoPriceResult};

#[derive(Clone, Debug, Serialize)]
pub struct Cart {
    id: String,
    session_id: Option<String>,
    items: Vec<CartItem>,
    subtotal: Money,
    currency: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartItem {
    pub product_id: String,
    pub variant_id: Option<String>,
    pub name: String,
    pub sku: Sku,
    pub quantity: Quantity,
    pub base_price: Money,
}

impl CartItem {
    pub fn quote(&self) -> MtoPriceResult {
        calculate_price(i64::from(self.quantity.value()), self.base_price.amount())
    }

    fn matches(&self, product_id: &str, variant_id: Option<&str>) -> bool {
        self.product_id == product_id && self.variant_id.as_deref() == variant_id
    }
}

impl Cart {
    pub fn new(currency: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(), session_id: None, items: vec![],
            subtotal: Money::zero(currency), currency: currency.to_uppercase(),
            created_at: now, updated_at: now, events: vec![],
        }
    }

    pub fn for_session(session_id: impl Into<String>, currency: &str) -> Self {
        let mut cart = Self::new(currency);
        cart.session_id = Some(session_id.into());
        cart
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn session_id(&self) -> Option<&str> { self.session_id.as_deref() }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn subtotal(&self) -> &Money { &self.subtotal }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    pub fn line_quote(&self, item: &CartItem) -> MtoPriceResult { item.quote() }

    /// Difference between list price and tiered price over every line.
    pub fn total_savings(&self) -> Money {
        let saved = self.items.iter().map(|i| i.quote().savings()).fold(Decimal::ZERO, |acc, s| acc + s);
        Money::new(saved, &self.currency)
    }

    pub fn add_item(&mut self, item: CartItem) -> Result<(), CartError> {
        if item.quantity.value() == 0 { return Err(CartError::ZeroQuantity); }
        if item.base_price.currency() != self.currency {
            return Err(CartError::CurrencyMismatch { cart: self.currency.clone(), item: item.base_price.currency().to_string() });
        }
        let (product_id, sku, added) = (item.product_id.clone(), item.sku.clone(), item.quantity.value());
        let existing = self.items.iter().position(|i| i.matches(&item.product_id, item.variant_id.as_deref()));
        let idx = match existing {
            Some(idx) => {
                let existing = &mut self.items[idx];
                existing.quantity = existing.quantity.add(added);
                existing.base_price = item.base_price;
                idx
            }
            None => { self.items.push(item); self.items.len() - 1 }
        };
        let line_total = self.items[idx].quote().total_price;
        self.recalculate();
        tracing::debug!(cart_id = %self.id, %product_id, quantity = added, "item added to cart");
        self.raise_event(DomainEvent::Cart(CartEvent::ItemAdded { cart_id: self.id.clone(), product_id, sku, quantity: added, line_total }));
        Ok(())
    }

    /// Set a line's quantity. Zero removes the line.
    pub fn update_quantity(&mut self, product_id: &str, variant_id: Option<&str>, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 { return self.remove_item(product_id, variant_id); }
        let item = self.items.iter_mut().find(|i| i.matches(product_id, variant_id)).ok_or(CartError::ItemNotFound)?;
        item.quantity = Quantity::new(quantity);
        self.recalculate();
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str, variant_id: Option<&str>) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| !i.matches(product_id, variant_id));
        if self.items.len() == before { return Err(CartError::ItemNotFound); }
        self.recalculate();
        self.raise_event(DomainEvent::Cart(CartEvent::ItemRemoved { cart_id: self.id.clone(), product_id: product_id.to_string() }));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.recalculate();
        self.raise_event(DomainEvent::Cart(CartEvent::Cleared { cart_id: self.id.clone() }));
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }

    // Unrounded; display rounding happens at the edge.
    fn recalculate(&mut self) {
        let total = self.items.iter().map(|i| i.quote().total_price).fold(Decimal::ZERO, |acc, t| acc + t);
        self.subtotal = Money::new(total, &self.currency);
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Item not found")]
    ItemNotFound,
    #[error("Cart is priced in {cart}, item is priced in {item}")]
    CurrencyMismatch { cart: String, item: String },
    #[error("Quantity must be at least 1")]
    ZeroQuantity,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product: &str, variant: Option<&str>, qty: u32, price: Decimal) -> CartItem {
        CartItem {
            product_id: product.into(), variant_id: variant.map(Into::into), name: "Tote".into(),
            sku: Sku::new(format!("{product}-SKU")).unwrap(), quantity: Quantity::new(qty), base_price: Money::usd(price),
        }
    }

    #[test]
    fn test_cart_operations() {
        let mut cart = Cart::new("USD");
        cart.add_item(item("P1", None, 100, Decimal::new(10, 0))).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.subtotal().amount(), Decimal::new(1000, 0));
        cart.add_item(item("P1", None, 150, Decimal::new(10, 0))).unwrap();
        assert_eq!(cart.items()[0].quantity.value(), 250); // Merged
        // 250 units crosses into the 5% tier
        assert_eq!(cart.subtotal().amount(), Decimal::new(2375, 0));
        assert_eq!(cart.total_savings().amount(), Decimal::new(125, 0));
    }

    #[test]
    fn test_variants_are_separate_lines() {
        let mut cart = Cart::for_session("sess-1", "usd");
        cart.add_item(item("P1", Some("red"), 60, Decimal::new(5, 0))).unwrap();
        cart.add_item(item("P1", Some("blue"), 60, Decimal::new(5, 0))).unwrap();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.session_id(), Some("sess-1"));
        cart.remove_item("P1", Some("red")).unwrap();
        assert_eq!(cart.items()[0].variant_id.as_deref(), Some("blue"));
        assert_eq!(cart.remove_item("P1", Some("red")), Err(CartError::ItemNotFound));
    }

    #[test]
    fn test_under_minimum_line_is_priced_at_minimum() {
        let mut cart = Cart::new("USD");
        cart.add_item(item("P2", None, 10, Decimal::new(100, 0))).unwrap();
        assert_eq!(cart.items()[0].quantity.value(), 10);
        assert_eq!(cart.subtotal().amount(), Decimal::new(5000, 0));
    }

    #[test]
    fn test_multi_line_subtotal_is_unrounded() {
        let mut cart = Cart::new("USD");
        cart.add_item(item("A", None, 600, Decimal::new(1999, 2))).unwrap();
        cart.add_item(item("B", None, 200, Decimal::new(333, 2))).unwrap();
        // 10194.9 + 632.7
        assert_eq!(cart.subtotal().amount(), Decimal::new(108276, 1));
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new("USD");
        cart.add_item(item("P1", None, 50, Decimal::new(20, 0))).unwrap();
        cart.update_quantity("P1", None, 1000).unwrap();
        assert_eq!(cart.subtotal().amount(), Decimal::new(16000, 0));
        cart.update_quantity("P1", None, 0).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.update_quantity("P1", None, 5), Err(CartError::ItemNotFound));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut cart = Cart::new("USD");
        assert_eq!(cart.add_item(item("P1", None, 0, Decimal::new(10, 0))), Err(CartError::ZeroQuantity));
        assert!(cart.is_empty());
        cart.add_item(item("P1", None, 60, Decimal::new(10, 0))).unwrap();
        assert_eq!(cart.add_item(item("P1", None, 0, Decimal::new(10, 0))), Err(CartError::ZeroQuantity));
        assert_eq!(cart.items()[0].quantity.value(), 60);
        assert_eq!(cart.take_events().len(), 1);
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let mut cart = Cart::new("EUR");
        let err = cart.add_item(item("P1", None, 50, Decimal::ONE)).unwrap_err();
        assert!(matches!(err, CartError::CurrencyMismatch { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_events() {
        let mut cart = Cart::new("USD");
        cart.add_item(item("P1", None, 50, Decimal::new(2, 0))).unwrap();
        cart.clear();
        let events = cart.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], DomainEvent::Cart(CartEvent::ItemAdded { line_total, .. }) if *line_total == Decimal::new(100, 0)));
        assert!(cart.take_events().is_empty());
    }
}
