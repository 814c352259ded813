//! In-process store, used as a test double.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MessageStore, StoredRecord};
use crate::error::RelayError;

/// Keeps records in a `Vec` behind a [`RwLock`].
///
/// [`InMemoryStore::set_available`] simulates a backend outage: while
/// unavailable, both `insert` and `ping` fail with
/// [`RelayError::PersistenceError`].
#[derive(Debug)]
pub struct InMemoryStore {
    records: RwLock<Vec<StoredRecord>>,
    available: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates an empty, available store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Toggles simulated availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns a copy of all records in insertion order.
    pub async fn records(&self) -> Vec<StoredRecord> {
        self.records.read().await.clone()
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns `true` if nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), RelayError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RelayError::PersistenceError(
                "in-memory store unavailable".to_string(),
            ))
        }
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn insert(&self, record: &StoredRecord) -> Result<(), RelayError> {
        self.check_available()?;
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), RelayError> {
        self.check_available()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn insert_appends_in_order() {
        let store = InMemoryStore::new();
        let first = StoredRecord::new(json!(1), Utc::now());
        let second = StoredRecord::new(json!(1), Utc::now());

        assert!(store.insert(&first).await.is_ok());
        assert!(store.insert(&second).await.is_ok());

        let records = store.records().await;
        assert_eq!(records, vec![first, second]);
    }

    #[tokio::test]
    async fn unavailable_store_rejects_writes() {
        let store = InMemoryStore::new();
        store.set_available(false);

        let record = StoredRecord::new(json!({"foo": 1}), Utc::now());
        let Err(err) = store.insert(&record).await else {
            panic!("insert should fail while unavailable");
        };
        assert!(matches!(err, RelayError::PersistenceError(_)));
        assert!(store.ping().await.is_err());
        assert!(store.is_empty().await);

        store.set_available(true);
        assert!(store.insert(&record).await.is_ok());
        assert_eq!(store.len().await, 1);
    }
}
