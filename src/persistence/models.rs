//! Database models for relayed messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row in the `messages` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Surrogate key, generated on receipt.
    pub id: Uuid,
    /// The parsed inbound message, stored as JSON.
    pub content: serde_json::Value,
    /// Receipt timestamp.
    pub created_at: DateTime<Utc>,
}

impl StoredRecord {
    /// Creates a record for `content` received at `created_at`.
    #[must_use]
    pub fn new(content: serde_json::Value, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            created_at,
        }
    }
}
