//! HTTP routes for the payment proxy.
//!
//! ## Routes
//!
//! - `POST /api/payment` — create a gateway transaction for an order.
//!   Body = JSON order details; 400 listing the offending fields.
//! - `GET /api/payment/status?orderId=...` — proxy a transaction-status
//!   lookup; 400 when `orderId` is missing.
//! - `GET /health` — health check returning `{ "ok": true }`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use greencart::api::{self, PaymentApi};
//!
//! let api = Arc::new(PaymentApi::new(Arc::new(gateway)));
//!
//! // Get the router to compose with other axum routes
//! let app = api::router(api.clone());
//!
//! // Or serve directly
//! api::serve(api, "0.0.0.0:3000").await?;
//! ```

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::gateway::{CustomerDetails, GatewayClient, OrderItem, OrderSubmission, StatusReport};

use super::error::PaymentApiError;

/// Shared state for the payment routes: the gateway client behind the proxy.
pub struct PaymentApi<G> {
    gateway: Arc<G>,
}

impl<G> PaymentApi<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        PaymentApi { gateway }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }
}

/// Build an axum `Router` exposing the payment proxy.
pub fn router<G: GatewayClient + 'static>(api: Arc<PaymentApi<G>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/payment", post(create_payment_handler))
        .route("/api/payment/status", get(payment_status_handler))
        .with_state(api)
}

/// Serve the proxy over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<G: GatewayClient + 'static>(
    api: Arc<PaymentApi<G>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(api);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// `POST /api/payment` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    pub amount: Option<f64>,
    #[serde(rename = "customerName")]
    pub customer_name: Option<String>,
    #[serde(rename = "customerEmail")]
    pub customer_email: Option<String>,
    #[serde(rename = "customerPhone")]
    pub customer_phone: Option<String>,
    #[serde(rename = "customerAddress")]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub items: Vec<PaymentRequestItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequestItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// `POST /api/payment` response body.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub token: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn create_payment_handler<G: GatewayClient + 'static>(
    State(api): State<Arc<PaymentApi<G>>>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<PaymentResponse>, PaymentApiError> {
    let order = validate(&request)?;
    let credential = api.gateway.create_transaction(&order)?;

    Ok(Json(PaymentResponse {
        token: credential.token,
        order_id: order.order_id,
        redirect_url: credential.redirect_url,
    }))
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    #[serde(rename = "orderId")]
    order_id: Option<String>,
}

async fn payment_status_handler<G: GatewayClient + 'static>(
    State(api): State<Arc<PaymentApi<G>>>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusReport>, PaymentApiError> {
    let order_id = match query.order_id.as_deref().map(str::trim) {
        Some(order_id) if !order_id.is_empty() => order_id.to_string(),
        _ => return Err(PaymentApiError::MissingOrderId),
    };

    let report = api.gateway.transaction_status(&order_id)?;
    Ok(Json(report))
}

/// Check the request body and shape it into an `OrderSubmission`. Every
/// missing or invalid field is reported, not just the first.
fn validate(request: &PaymentRequest) -> Result<OrderSubmission, PaymentApiError> {
    let mut offending = Vec::new();

    let amount = match request.amount {
        Some(amount) if amount > 0.0 => Some(amount),
        _ => {
            offending.push("amount");
            None
        }
    };

    let name = request
        .customer_name
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if name.is_empty() {
        offending.push("customerName");
    }

    let email = request
        .customer_email
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if email.is_empty() || !email.contains('@') {
        offending.push("customerEmail");
    }

    if request.items.is_empty()
        || request
            .items
            .iter()
            .any(|item| item.quantity < 1 || item.price < 0.0)
    {
        offending.push("items");
    }

    if !offending.is_empty() {
        return Err(PaymentApiError::MissingFields(offending));
    }

    let customer = CustomerDetails {
        name: name.to_string(),
        email: email.to_string(),
        phone: request
            .customer_phone
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        address: request
            .customer_address
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
    };

    Ok(OrderSubmission {
        order_id: crate::gateway::generated_order_id(),
        amount: amount.unwrap_or_default().round() as i64,
        customer,
        items: request
            .items
            .iter()
            .map(|item| OrderItem {
                id: item.id.clone(),
                name: item.name.clone(),
                price: item.price.round() as i64,
                quantity: item.quantity,
            })
            .collect(),
    })
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = match &self {
            PaymentApiError::MissingFields(fields) => {
                json!({ "error": self.to_string(), "fields": fields })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
