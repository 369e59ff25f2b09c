//! Crate-level errors and their HTTP mapping

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use thiserror::Error;
use crate::domain::aggregates::{CartError, SampleRequestError};

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Product not found in catalog cache")]
    ProductNotFound,

    #[error("Cart not found")]
    CartNotFound,

    #[error("Sample request not found")]
    SampleRequestNotFound,

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    SampleRequest(#[from] SampleRequestError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl StorefrontError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ProductNotFound | Self::CartNotFound | Self::SampleRequestNotFound => StatusCode::NOT_FOUND,
            Self::Cart(CartError::ItemNotFound) => StatusCode::NOT_FOUND,
            Self::Cart(CartError::CurrencyMismatch { .. }) => StatusCode::CONFLICT,
            Self::Cart(CartError::ZeroQuantity) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::SampleRequest(SampleRequestError::InvalidTransition { .. }) => StatusCode::CONFLICT,
            Self::SampleRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() { tracing::error!(error = %self, "request failed"); }
        else { tracing::debug!(error = %self, %status, "request rejected"); }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(StorefrontError::ProductNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(StorefrontError::from(CartError::CurrencyMismatch { cart: "USD".into(), item: "EUR".into() }).status(), StatusCode::CONFLICT);
        assert_eq!(StorefrontError::from(SampleRequestError::BlankProductId).status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(StorefrontError::from(CartError::ZeroQuantity).status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(StorefrontError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    }
}
