use std::fmt;

use serde::{Deserialize, Serialize};

use super::{OrderSubmission, StatusReport};

/// Credential handed back by the gateway for a created transaction. The
/// token drives the embedded payment UI; the redirect URL is the hosted
/// fallback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayToken {
    pub token: String,
    pub redirect_url: Option<String>,
}

/// The payment-gateway collaborator.
pub trait GatewayClient: Send + Sync {
    fn create_transaction(&self, order: &OrderSubmission) -> Result<GatewayToken, GatewayError>;

    fn transaction_status(&self, order_id: &str) -> Result<StatusReport, GatewayError>;
}

/// Outcome of one run of the gateway's embedded payment UI.
///
/// The UI reports back exactly one of these per invocation; `Closed` means
/// the user dismissed it without completing, which is a first-class
/// transition rather than an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Pending,
    Error(String),
    Closed,
}

/// The gateway's embedded payment UI, driven with a transaction token.
pub trait PaymentPrompt: Send + Sync {
    fn pay(&self, token: &str) -> PaymentOutcome;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    Network(String),
    /// The gateway integration is not loaded or not configured.
    Unavailable,
    Malformed(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Network(message) => write!(f, "gateway request failed: {}", message),
            GatewayError::Unavailable => write!(f, "payment gateway unavailable"),
            GatewayError::Malformed(message) => {
                write!(f, "gateway response malformed: {}", message)
            }
        }
    }
}

impl std::error::Error for GatewayError {}
