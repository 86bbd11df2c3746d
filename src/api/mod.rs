//! Backend proxy fronting the payment gateway.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! The proxy keeps gateway credentials server-side: the browser posts order
//! details here, the proxy creates the gateway transaction and hands back
//! the token, and the slow reconciliation cadence asks this layer for
//! transaction status.

mod error;
mod http;

pub use error::PaymentApiError;
pub use http::{router, serve, PaymentApi, PaymentRequest, PaymentRequestItem, PaymentResponse};
