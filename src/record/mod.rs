use std::fmt;
use std::time::SystemTime;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Error when encoding or decoding a stored record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordError {
    pub message: String,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record error: {}", self.message)
    }
}

impl std::error::Error for RecordError {}

impl From<RecordError> for crate::error::StorageError {
    fn from(err: RecordError) -> Self {
        crate::error::StorageError::Codec(err.message)
    }
}

/// At-rest envelope for a persisted snapshot.
///
/// The payload is serialized with bitcode for compact storage and carried as
/// a base64 string inside the JSON envelope, so the whole record fits a
/// string-valued key-value store.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct StoredRecord {
    pub name: String,
    #[serde(with = "payload_serde")]
    pub payload: Vec<u8>,
    pub saved_at: SystemTime,
}

mod payload_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(payload: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        STANDARD.encode(payload).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

impl StoredRecord {
    /// Serialize a snapshot into a named record.
    pub fn encode<T: Serialize>(name: impl Into<String>, value: &T) -> Result<Self, RecordError> {
        let payload = bitcode::serialize(value).map_err(|e| RecordError {
            message: e.to_string(),
        })?;
        Ok(StoredRecord {
            name: name.into(),
            payload,
            saved_at: SystemTime::now(),
        })
    }

    /// Deserialize the payload into the specified type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, RecordError> {
        bitcode::deserialize(&self.payload).map_err(|e| RecordError {
            message: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        serde_json::to_string(self).map_err(|e| RecordError {
            message: e.to_string(),
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, RecordError> {
        serde_json::from_str(raw).map_err(|e| RecordError {
            message: e.to_string(),
        })
    }
}
