use std::fmt;
use std::sync::Arc;

use crate::gateway::{GatewayClient, GatewayError, StatusReport};

/// Error from a status probe. Probe failures are failures of the check, not
/// of the payment: they are retried or ignored, never treated as a terminal
/// transaction state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    Network(String),
    Malformed(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Network(message) => write!(f, "status probe failed: {}", message),
            ProbeError::Malformed(message) => {
                write!(f, "status probe response malformed: {}", message)
            }
        }
    }
}

impl std::error::Error for ProbeError {}

impl From<GatewayError> for ProbeError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Network(message) => ProbeError::Network(message),
            GatewayError::Unavailable => ProbeError::Network("gateway unavailable".to_string()),
            GatewayError::Malformed(message) => ProbeError::Malformed(message),
        }
    }
}

/// A source of transaction status for an order.
///
/// The fast reconciliation cadence probes the gateway directly; the slow
/// cadence goes through the backend proxy. Both feed the same decision
/// function.
pub trait StatusProbe: Send + Sync {
    fn probe(&self, order_id: &str) -> Result<StatusReport, ProbeError>;
}

impl<P: StatusProbe + ?Sized> StatusProbe for Arc<P> {
    fn probe(&self, order_id: &str) -> Result<StatusReport, ProbeError> {
        (**self).probe(order_id)
    }
}

/// Probe that asks the gateway client directly.
pub struct GatewayProbe<G> {
    gateway: Arc<G>,
}

impl<G> GatewayProbe<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        GatewayProbe { gateway }
    }
}

impl<G: GatewayClient> StatusProbe for GatewayProbe<G> {
    fn probe(&self, order_id: &str) -> Result<StatusReport, ProbeError> {
        Ok(self.gateway.transaction_status(order_id)?)
    }
}
