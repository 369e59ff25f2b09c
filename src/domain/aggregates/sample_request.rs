//! Free sample request aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};
use crate::domain::events::{DomainEvent, SampleRequestEvent};
use crate::pricing::{calculate_price, MtoPriceResult};

/// Upper bound on product ids in one request.
pub const MAX_SAMPLES_PER_REQUEST: usize = 5;

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct SampleRequestForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 100))]
    pub company: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(min = 1, max = "MAX_SAMPLES_PER_REQUEST"))]
    pub product_ids: Vec<String>,
    #[validate(range(min = 1))]
    pub estimated_quantity: Option<i64>,
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SampleStatus {
    Submitted,
    Approved,
    Rejected { reason: String },
    Shipped { tracking: Option<String> },
}

impl SampleStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected { .. } => "rejected",
            Self::Shipped { .. } => "shipped",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SampleRequest {
    id: Uuid,
    name: String,
    email: String,
    company: Option<String>,
    address: String,
    product_ids: Vec<String>,
    estimated_quantity: Option<i64>,
    estimate: Option<MtoPriceResult>,
    note: Option<String>,
    #[serde(flatten)]
    status: SampleStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

impl SampleRequest {
    pub fn submit(form: SampleRequestForm) -> Result<Self, SampleRequestError> {
        form.validate()?;
        let mut product_ids: Vec<String> = Vec::with_capacity(form.product_ids.len());
        for id in form.product_ids {
            let id = id.trim().to_string();
            if id.is_empty() { return Err(SampleRequestError::BlankProductId); }
            if !product_ids.contains(&id) { product_ids.push(id); }
        }
        let now = Utc::now();
        let mut request = Self {
            id: Uuid::now_v7(), name: form.name, email: form.email.trim().to_lowercase(), company: form.company,
            address: form.address, product_ids, estimated_quantity: form.estimated_quantity, estimate: None,
            note: form.note, status: SampleStatus::Submitted, created_at: now, updated_at: now, events: vec![],
        };
        request.raise_event(DomainEvent::SampleRequest(SampleRequestEvent::Submitted {
            request_id: request.id, email: request.email.clone(), product_count: request.product_ids.len(),
        }));
        Ok(request)
    }

    pub fn id(&self) -> Uuid { self.id }
    pub fn email(&self) -> &str { &self.email }
    pub fn product_ids(&self) -> &[String] { &self.product_ids }
    pub fn status(&self) -> &SampleStatus { &self.status }
    pub fn estimate(&self) -> Option<&MtoPriceResult> { self.estimate.as_ref() }

    /// Attach an informational quote for the buyer's estimated volume.
    /// Returns `None` when the buyer gave no estimate.
    pub fn attach_estimate(&mut self, base_price: Decimal) -> Option<&MtoPriceResult> {
        let quantity = self.estimated_quantity?;
        self.estimate = Some(calculate_price(quantity, base_price));
        self.touch();
        self.estimate.as_ref()
    }

    pub fn approve(&mut self) -> Result<(), SampleRequestError> {
        self.transition(SampleStatus::Approved, |s| matches!(s, SampleStatus::Submitted))?;
        self.raise_event(DomainEvent::SampleRequest(SampleRequestEvent::Approved { request_id: self.id }));
        Ok(())
    }

    pub fn reject(&mut self, reason: impl Into<String>) -> Result<(), SampleRequestError> {
        let reason = reason.into();
        self.transition(SampleStatus::Rejected { reason: reason.clone() }, |s| matches!(s, SampleStatus::Submitted | SampleStatus::Approved))?;
        self.raise_event(DomainEvent::SampleRequest(SampleRequestEvent::Rejected { request_id: self.id, reason }));
        Ok(())
    }

    pub fn ship(&mut self, tracking: Option<String>) -> Result<(), SampleRequestError> {
        self.transition(SampleStatus::Shipped { tracking: tracking.clone() }, |s| matches!(s, SampleStatus::Approved))?;
        self.raise_event(DomainEvent::SampleRequest(SampleRequestEvent::Shipped { request_id: self.id, tracking }));
        Ok(())
    }

    fn transition(&mut self, to: SampleStatus, allowed_from: impl Fn(&SampleStatus) -> bool) -> Result<(), SampleRequestError> {
        if !allowed_from(&self.status) {
            return Err(SampleRequestError::InvalidTransition { from: self.status.name(), to: to.name() });
        }
        tracing::info!(request_id = %self.id, from = self.status.name(), to = to.name(), "sample request transition");
        self.status = to;
        self.touch();
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Error)]
pub enum SampleRequestError {
    #[error("Invalid sample request: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Product id must not be blank")]
    BlankProductId,
    #[error("Cannot move sample request from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },
}
