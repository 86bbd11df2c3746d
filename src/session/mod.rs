use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::record::StoredRecord;
use crate::storage::Storage;

const SESSION_KEY: &str = "greencart.payment";
const SESSION_RECORD: &str = "PaymentSession";

/// The token / order-id pair identifying one in-flight checkout attempt at
/// the payment gateway. Both fields exist together by construction; there is
/// no representable state with a token but no order id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub token: String,
    pub order_id: String,
}

/// Owns the lifecycle of the single in-flight payment session.
///
/// The session is persisted under a fixed key so an interrupted checkout can
/// be resumed after a reload. Cleared on terminal success, terminal failure,
/// or when reconciliation discovers the order is stale.
pub struct SessionManager<S> {
    storage: Arc<S>,
    session: RwLock<Option<ActiveSession>>,
}

impl<S: Storage> SessionManager<S> {
    pub fn open(storage: Arc<S>) -> Self {
        let session = rehydrate(storage.as_ref());
        SessionManager {
            storage,
            session: RwLock::new(session),
        }
    }

    /// Store both fields atomically and persist the record.
    pub fn begin(
        &self,
        token: impl Into<String>,
        order_id: impl Into<String>,
    ) -> Result<(), StorageError> {
        let next = ActiveSession {
            token: token.into(),
            order_id: order_id.into(),
        };

        let mut session = self
            .session
            .write()
            .map_err(|_| StorageError::LockPoisoned("session write"))?;

        let record = StoredRecord::encode(SESSION_RECORD, &next)?;
        self.storage.set(SESSION_KEY, &record.to_json()?)?;
        *session = Some(next);
        Ok(())
    }

    /// Drop the session and remove the persisted record.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut session = self
            .session
            .write()
            .map_err(|_| StorageError::LockPoisoned("session write"))?;
        self.storage.remove(SESSION_KEY)?;
        *session = None;
        Ok(())
    }

    /// Clear only when the active session matches the given order id.
    ///
    /// Resolvers act on status they polled some time ago; the match guard
    /// stops a stale resolution from clobbering a newer session. Returns
    /// whether a session was cleared.
    pub fn clear_if(&self, order_id: &str) -> Result<bool, StorageError> {
        let mut session = self
            .session
            .write()
            .map_err(|_| StorageError::LockPoisoned("session write"))?;

        let matches = session
            .as_ref()
            .map(|active| active.order_id == order_id)
            .unwrap_or(false);
        if !matches {
            return Ok(false);
        }

        self.storage.remove(SESSION_KEY)?;
        *session = None;
        Ok(true)
    }

    pub fn current(&self) -> Result<Option<ActiveSession>, StorageError> {
        let session = self
            .session
            .read()
            .map_err(|_| StorageError::LockPoisoned("session read"))?;
        Ok(session.clone())
    }

    pub fn is_payment_in_progress(&self) -> Result<bool, StorageError> {
        Ok(self.current()?.is_some())
    }
}

fn rehydrate<S: Storage>(storage: &S) -> Option<ActiveSession> {
    let raw = match storage.get(SESSION_KEY) {
        Ok(Some(raw)) => raw,
        _ => return None,
    };

    match StoredRecord::from_json(&raw).and_then(|record| record.decode::<ActiveSession>()) {
        Ok(session) if !session.token.is_empty() && !session.order_id.is_empty() => Some(session),
        // A record missing either half identifies nothing; drop it.
        _ => {
            let _ = storage.remove(SESSION_KEY);
            None
        }
    }
}
