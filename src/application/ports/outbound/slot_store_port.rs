use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::ports::outbound::StoreError;

/// Raw contents of a named slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSlot {
    pub body: String,
    pub written_at: DateTime<Utc>,
}

/// Durable keyed storage holding one serialized value per slot name
#[async_trait]
pub trait SlotStorePort: Send + Sync {
    /// Read a slot; `None` if it was never written
    async fn read(&self, slot: &str) -> Result<Option<StoredSlot>, StoreError>;

    /// Overwrite a slot, returning the write time later reads will report
    async fn write(&self, slot: &str, body: &str) -> Result<DateTime<Utc>, StoreError>;
}
