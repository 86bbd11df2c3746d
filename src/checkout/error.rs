use std::fmt;

use crate::error::StorageError;
use crate::gateway::{GatewayError, TransactionStatus};

use super::flow::CheckoutState;

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutError {
    /// Checkout requested with nothing in the cart.
    EmptyCart,
    /// A payment session is already active; resume or resolve it first.
    PaymentInProgress,
    /// A line item's requested quantity exceeds the stock snapshot.
    InsufficientStock {
        id: String,
        name: String,
        available: u32,
    },
    /// Required customer fields were blank.
    MissingFields(Vec<&'static str>),
    /// The gateway accepted the order but returned no payment token.
    MissingToken,
    /// Resume requested with no persisted session.
    NoPendingPayment,
    /// The persisted session reached a terminal state and cannot be resumed.
    NotResumable(TransactionStatus),
    /// The operation is not legal in the current checkout state.
    InvalidState {
        operation: &'static str,
        state: CheckoutState,
    },
    Gateway(GatewayError),
    Storage(StorageError),
}

impl fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutError::EmptyCart => write!(f, "cart is empty"),
            CheckoutError::PaymentInProgress => {
                write!(f, "a payment is already in progress")
            }
            CheckoutError::InsufficientStock {
                id,
                name,
                available,
            } => write!(
                f,
                "not enough stock for {} ({}): only {} available",
                name, id, available
            ),
            CheckoutError::MissingFields(fields) => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
            CheckoutError::MissingToken => {
                write!(f, "gateway response did not include a payment token")
            }
            CheckoutError::NoPendingPayment => write!(f, "no pending payment to resume"),
            CheckoutError::NotResumable(status) => {
                write!(f, "payment can no longer be resumed (status: {})", status)
            }
            CheckoutError::InvalidState { operation, state } => {
                write!(f, "cannot {} while checkout is {:?}", operation, state)
            }
            CheckoutError::Gateway(err) => write!(f, "{}", err),
            CheckoutError::Storage(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CheckoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckoutError::Gateway(err) => Some(err),
            CheckoutError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GatewayError> for CheckoutError {
    fn from(err: GatewayError) -> Self {
        CheckoutError::Gateway(err)
    }
}

impl From<StorageError> for CheckoutError {
    fn from(err: StorageError) -> Self {
        CheckoutError::Storage(err)
    }
}
