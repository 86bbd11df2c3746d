use crate::error::StorageError;

/// Durable key-value persistence scoped to the current browser session.
///
/// Values survive page reloads; the cart and the pending-payment record are
/// both kept here under fixed keys. Implementations are expected to be cheap
/// enough to write on every cart mutation.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
