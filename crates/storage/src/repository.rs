use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Injected key-value persistence capability.
///
/// Values are primitive-typed per key: an integer or an instant. An absent
/// key reads as `None` so callers can fall back to their zero defaults.
/// The store performs no internal locking beyond per-call atomicity;
/// read-modify-write callers serialize externally.
#[async_trait]
pub trait DefaultsStore: Send + Sync {
    /// Reads an integer value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the key holds a non-integer.
    async fn get_int(&self, key: &str) -> Result<Option<i64>, StorageError>;

    /// Writes an integer value, replacing any previous value for the key.
    ///
    /// The write is durable before the call returns.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set_int(&self, key: &str, value: i64) -> Result<(), StorageError>;

    /// Reads an instant value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the key holds a non-instant.
    async fn get_instant(&self, key: &str) -> Result<Option<DateTime<Utc>>, StorageError>;

    /// Writes an instant value, replacing any previous value for the key.
    ///
    /// The write is durable before the call returns.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set_instant(&self, key: &str, value: DateTime<Utc>) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DefaultsValue {
    Int(i64),
    Instant(DateTime<Utc>),
}

/// Simple in-memory defaults store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryDefaults {
    entries: Arc<Mutex<HashMap<String, DefaultsValue>>>,
}

impl InMemoryDefaults {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl DefaultsStore for InMemoryDefaults {
    async fn get_int(&self, key: &str) -> Result<Option<i64>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.get(key) {
            None => Ok(None),
            Some(DefaultsValue::Int(v)) => Ok(Some(*v)),
            Some(DefaultsValue::Instant(_)) => Err(StorageError::Serialization(format!(
                "key {key} holds an instant, not an integer"
            ))),
        }
    }

    async fn set_int(&self, key: &str, value: i64) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), DefaultsValue::Int(value));
        Ok(())
    }

    async fn get_instant(&self, key: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.get(key) {
            None => Ok(None),
            Some(DefaultsValue::Instant(v)) => Ok(Some(*v)),
            Some(DefaultsValue::Int(_)) => Err(StorageError::Serialization(format!(
                "key {key} holds an integer, not an instant"
            ))),
        }
    }

    async fn set_instant(&self, key: &str, value: DateTime<Utc>) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), DefaultsValue::Instant(value));
        Ok(())
    }
}

/// Aggregates the persistence capabilities behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub defaults: Arc<dyn DefaultsStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            defaults: Arc::new(InMemoryDefaults::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn absent_keys_read_as_none() {
        let store = InMemoryDefaults::new();
        assert_eq!(store.get_int("gamesCount").await.unwrap(), None);
        assert_eq!(store.get_instant("bestGameDate").await.unwrap(), None);
    }

    #[tokio::test]
    async fn int_round_trips_and_overwrites() {
        let store = InMemoryDefaults::new();
        store.set_int("correct", 6).await.unwrap();
        store.set_int("correct", 16).await.unwrap();
        assert_eq!(store.get_int("correct").await.unwrap(), Some(16));
    }

    #[tokio::test]
    async fn instant_round_trips() {
        let store = InMemoryDefaults::new();
        let at = Utc.with_ymd_and_hms(2024, 7, 3, 9, 46, 40).unwrap();
        store.set_instant("bestGameDate", at).await.unwrap();
        assert_eq!(store.get_instant("bestGameDate").await.unwrap(), Some(at));
    }

    #[tokio::test]
    async fn type_mismatch_is_a_serialization_error() {
        let store = InMemoryDefaults::new();
        store.set_int("bestGameDate", 1).await.unwrap();
        let err = store.get_instant("bestGameDate").await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
