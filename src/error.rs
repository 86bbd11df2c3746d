use std::fmt;

/// Error type for durable client storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    LockPoisoned(&'static str),
    /// A persisted record could not be encoded or decoded.
    Codec(String),
    /// The storage backend refused or failed the operation.
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::LockPoisoned(operation) => {
                write!(f, "storage lock poisoned during {}", operation)
            }
            StorageError::Codec(message) => {
                write!(f, "stored record codec error: {}", message)
            }
            StorageError::Backend(message) => {
                write!(f, "storage backend error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}
