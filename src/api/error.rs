//! Error type for the payment proxy endpoints.

use std::error::Error;
use std::fmt;

use crate::gateway::GatewayError;

#[derive(Debug)]
pub enum PaymentApiError {
    /// Request body fields that were missing or invalid, by name.
    MissingFields(Vec<&'static str>),
    /// The status endpoint was called without an order id.
    MissingOrderId,
    /// The gateway rejected or failed the proxied call.
    Gateway(GatewayError),
}

impl fmt::Display for PaymentApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentApiError::MissingFields(fields) => {
                write!(f, "missing or invalid fields: {}", fields.join(", "))
            }
            PaymentApiError::MissingOrderId => write!(f, "orderId query parameter is required"),
            PaymentApiError::Gateway(err) => write!(f, "{}", err),
        }
    }
}

impl Error for PaymentApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PaymentApiError::Gateway(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GatewayError> for PaymentApiError {
    fn from(err: GatewayError) -> Self {
        PaymentApiError::Gateway(err)
    }
}

impl PaymentApiError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentApiError::MissingFields(_) => 400,
            PaymentApiError::MissingOrderId => 400,
            PaymentApiError::Gateway(_) => 502,
        }
    }
}
