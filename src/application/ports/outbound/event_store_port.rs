//! Event store port - The canonical collection of emotion reports
//!
//! Two interchangeable backends implement this: a local durable keyed store
//! shared by viewing contexts on one machine, and a remote HTTP store.
//! Writes are whole-collection or single-append operations with no version
//! token, so concurrent writers can lose each other's additions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::EmotionEvent;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Store rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A fetched collection plus the time the store last wrote it, when known
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredCollection {
    pub events: Vec<EmotionEvent>,
    /// `None` when the store has never been written or cannot say
    pub written_at: Option<DateTime<Utc>>,
}

/// Acknowledgement of a completed write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReceipt {
    pub written_at: DateTime<Utc>,
}

#[async_trait]
pub trait EventStorePort: Send + Sync {
    /// Fetch the full current collection
    async fn fetch(&self) -> Result<StoredCollection, StoreError>;

    /// Append one event to the collection
    async fn append(&self, event: &EmotionEvent) -> Result<WriteReceipt, StoreError>;

    /// Replace the whole collection
    async fn replace_all(&self, events: &[EmotionEvent]) -> Result<WriteReceipt, StoreError>;

    /// Remove every event
    async fn clear(&self) -> Result<WriteReceipt, StoreError>;

    /// Fetch only the events
    async fn fetch_all(&self) -> Result<Vec<EmotionEvent>, StoreError> {
        Ok(self.fetch().await?.events)
    }
}
