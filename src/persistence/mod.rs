//! Persistence layer: append-only storage of relayed messages.
//!
//! Connection handlers only see the [`MessageStore`] trait; the concrete
//! store is chosen once at startup and injected through
//! [`crate::app_state::AppState`]. [`postgres::PostgresStore`] is the
//! production backend, [`memory::InMemoryStore`] backs tests, and
//! [`NoopStore`] is used when persistence is switched off.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

pub use memory::InMemoryStore;
pub use models::StoredRecord;
pub use postgres::PostgresStore;

use crate::error::RelayError;

/// Append-only sink for [`StoredRecord`]s, shared by every connection.
///
/// Implementations must tolerate concurrent calls from many connections
/// without external locking. Inserts are not ordered across connections.
#[async_trait]
pub trait MessageStore: Send + Sync + std::fmt::Debug {
    /// Appends a record.
    ///
    /// # Errors
    ///
    /// Returns a [`RelayError::PersistenceError`] if the backend rejects
    /// the write or is unreachable.
    async fn insert(&self, record: &StoredRecord) -> Result<(), RelayError>;

    /// Checks that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns a [`RelayError::PersistenceError`] if it is not.
    async fn ping(&self) -> Result<(), RelayError>;

    /// Releases backend resources. Called once during shutdown.
    async fn close(&self) {}
}

/// Store used when persistence is disabled: accepts and discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStore;

#[async_trait]
impl MessageStore for NoopStore {
    async fn insert(&self, _record: &StoredRecord) -> Result<(), RelayError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), RelayError> {
        Ok(())
    }
}
