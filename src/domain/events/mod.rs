//! Domain events
use crate::domain::value_objects::Sku;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Cart(CartEvent),
    SampleRequest(SampleRequestEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CartEvent {
    ItemAdded { cart_id: String, product_id: String, sku: Sku, quantity: u32, line_total: Decimal },
    ItemRemoved { cart_id: String, product_id: String },
    Cleared { cart_id: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SampleRequestEvent {
    Submitted { request_id: Uuid, email: String, product_count: usize },
    Approved { request_id: Uuid },
    Rejected { request_id: Uuid, reason: String },
    Shipped { request_id: Uuid, tracking: Option<String> },
}
