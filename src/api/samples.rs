use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;
use super::{publish, AppState};
use crate::domain::aggregates::{SampleRequest, SampleRequestError, SampleRequestForm};
use crate::error::{Result, StorefrontError};

#[derive(Debug, Deserialize)]
pub struct RejectRequest { pub reason: String }

#[derive(Debug, Default, Deserialize)]
pub struct ShipRequest { pub tracking: Option<String> }

pub async fn submit(State(s): State<AppState>, Json(form): Json<SampleRequestForm>) -> Result<(StatusCode, Json<SampleRequest>)> {
    let mut request = SampleRequest::submit(form)?;
    // The estimate uses the first requested product with any cached price.
    let base_price = request.product_ids().iter().find_map(|id| s.cache.get_any_variant(id)).map(|p| p.base_price.amount());
    if let Some(price) = base_price { request.attach_estimate(price); }
    publish(request.take_events());
    tracing::info!(request_id = %request.id(), "sample request submitted");
    s.samples.write().await.insert(request.id(), request.clone());
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn get_sample(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SampleRequest>> {
    s.samples.read().await.get(&id).cloned().map(Json).ok_or(StorefrontError::SampleRequestNotFound)
}

async fn update(s: &AppState, id: Uuid, f: impl FnOnce(&mut SampleRequest) -> std::result::Result<(), SampleRequestError>) -> Result<Json<SampleRequest>> {
    let mut samples = s.samples.write().await;
    let request = samples.get_mut(&id).ok_or(StorefrontError::SampleRequestNotFound)?;
    f(request)?;
    publish(request.take_events());
    Ok(Json(request.clone()))
}

pub async fn approve(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SampleRequest>> {
    update(&s, id, |r| r.approve()).await
}

pub async fn reject(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<RejectRequest>) -> Result<Json<SampleRequest>> {
    update(&s, id, |req| req.reject(r.reason)).await
}

pub async fn ship(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<ShipRequest>) -> Result<Json<SampleRequest>> {
    update(&s, id, |req| req.ship(r.tracking)).await
}
