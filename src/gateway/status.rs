use std::fmt;

use serde::{Deserialize, Serialize};

/// Transaction status vocabulary of the payment gateway.
///
/// The gateway reports statuses as strings; `parse` folds the wire spellings
/// into this enum and keeps anything unrecognized verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionStatus {
    Success,
    Pending,
    Failure,
    Expired,
    Cancel,
    Unknown(String),
}

impl TransactionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "settlement" | "capture" | "success" => TransactionStatus::Success,
            "pending" => TransactionStatus::Pending,
            "deny" | "failure" => TransactionStatus::Failure,
            "expire" | "expired" => TransactionStatus::Expired,
            "cancel" | "cancelled" => TransactionStatus::Cancel,
            _ => TransactionStatus::Unknown(raw.to_string()),
        }
    }

    /// A terminal status is one from which no further transition is expected.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Success
                | TransactionStatus::Failure
                | TransactionStatus::Expired
                | TransactionStatus::Cancel
        )
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Success => write!(f, "success"),
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Failure => write!(f, "failure"),
            TransactionStatus::Expired => write!(f, "expired"),
            TransactionStatus::Cancel => write!(f, "cancelled"),
            TransactionStatus::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// Raw status response from the gateway, kept wire-faithful. `status()`
/// parses the string into the enum.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub transaction_status: String,
    pub status_code: String,
    pub order_id: String,
}

impl StatusReport {
    pub fn status(&self) -> TransactionStatus {
        TransactionStatus::parse(&self.transaction_status)
    }
}
