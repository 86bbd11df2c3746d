use std::fmt;
use std::sync::Arc;

use crate::cart::CartStore;
use crate::error::StorageError;
use crate::gateway::TransactionStatus;
use crate::notice::NoticeCenter;
use crate::session::SessionManager;
use crate::storage::Storage;

use super::probe::{ProbeError, StatusProbe};

/// What a reconciliation pass decided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Payment confirmed: cart cleared, session cleared.
    Completed,
    /// Terminal non-success: session cleared, cart preserved for retry.
    Reverted(TransactionStatus),
    /// Nothing to decide yet.
    StillPending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    Probe(ProbeError),
    Storage(StorageError),
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::Probe(err) => write!(f, "{}", err),
            ReconcileError::Storage(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ReconcileError {}

impl From<ProbeError> for ReconcileError {
    fn from(err: ProbeError) -> Self {
        ReconcileError::Probe(err)
    }
}

impl From<StorageError> for ReconcileError {
    fn from(err: StorageError) -> Self {
        ReconcileError::Storage(err)
    }
}

/// The single decision function for payment outcomes.
///
/// Every path that learns a transaction status (the embedded UI, the fast
/// poll, the slow poll, the resume check) routes it through `resolve`, so
/// there is exactly one place that clears the cart and the session. The
/// session is cleared with an order-id match, which makes a stale resolution
/// against an already-replaced session a no-op.
pub struct Reconciler<S> {
    cart: Arc<CartStore<S>>,
    sessions: Arc<SessionManager<S>>,
    notices: Arc<NoticeCenter>,
}

impl<S> Clone for Reconciler<S> {
    fn clone(&self) -> Self {
        Reconciler {
            cart: Arc::clone(&self.cart),
            sessions: Arc::clone(&self.sessions),
            notices: Arc::clone(&self.notices),
        }
    }
}

impl<S: Storage> Reconciler<S> {
    pub fn new(
        cart: Arc<CartStore<S>>,
        sessions: Arc<SessionManager<S>>,
        notices: Arc<NoticeCenter>,
    ) -> Self {
        Reconciler {
            cart,
            sessions,
            notices,
        }
    }

    pub fn cart(&self) -> &Arc<CartStore<S>> {
        &self.cart
    }

    pub fn sessions(&self) -> &Arc<SessionManager<S>> {
        &self.sessions
    }

    pub fn notices(&self) -> &Arc<NoticeCenter> {
        &self.notices
    }

    /// Apply a known transaction status for `order_id` to the cart and the
    /// session.
    pub fn resolve(
        &self,
        order_id: &str,
        status: &TransactionStatus,
    ) -> Result<Resolution, StorageError> {
        match status {
            TransactionStatus::Success => {
                self.cart.clear()?;
                self.sessions.clear_if(order_id)?;
                self.notices
                    .success("Payment successful! Thank you for your order.");
                Ok(Resolution::Completed)
            }
            TransactionStatus::Failure | TransactionStatus::Expired | TransactionStatus::Cancel => {
                self.sessions.clear_if(order_id)?;
                self.notices.error(revert_message(status));
                Ok(Resolution::Reverted(status.clone()))
            }
            TransactionStatus::Pending | TransactionStatus::Unknown(_) => {
                Ok(Resolution::StillPending)
            }
        }
    }

    /// One reconciliation pass against the active session. Returns `None`
    /// when no payment is in progress.
    pub fn run_once<P: StatusProbe + ?Sized>(
        &self,
        probe: &P,
    ) -> Result<Option<Resolution>, ReconcileError> {
        let session = match self.sessions.current().map_err(ReconcileError::Storage)? {
            Some(session) => session,
            None => return Ok(None),
        };

        let report = probe.probe(&session.order_id)?;
        let resolution = self
            .resolve(&session.order_id, &report.status())
            .map_err(ReconcileError::Storage)?;
        Ok(Some(resolution))
    }
}

fn revert_message(status: &TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Expired => "Your payment session expired. Please check out again.",
        TransactionStatus::Cancel => "Your payment was cancelled. Please check out again.",
        _ => "Payment failed. Please check out again.",
    }
}
