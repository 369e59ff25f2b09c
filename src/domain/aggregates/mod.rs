//! Aggregates module
pub mod cart;
pub mod sample_request;

pub use cart::{Cart, CartError, CartItem};
pub use sample_request::{SampleRequest, SampleRequestError, SampleRequestForm, SampleStatus, MAX_SAMPLES_PER_REQUEST};
