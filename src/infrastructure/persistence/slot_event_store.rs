//! Event store over a single named slot
//!
//! The whole collection lives in one slot as a JSON array. Appends read the
//! array, push, and write it back. Writes through one store are serialized;
//! separate stores sharing a slot have no version check, so two of them
//! racing can still drop one of the additions.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::application::ports::outbound::{
    EventStorePort, SlotStorePort, StoreError, StoredCollection, WriteReceipt,
};
use crate::application::services::{decode_collection, encode_collection};
use crate::domain::entities::EmotionEvent;

/// Slot name used for the shared collection
pub const DEFAULT_SLOT: &str = "emotions";

pub struct SlotEventStore {
    slots: Arc<dyn SlotStorePort>,
    slot: String,
    /// Held across every read-modify-write of the slot
    write_lock: Mutex<()>,
}

impl SlotEventStore {
    pub fn new(slots: Arc<dyn SlotStorePort>, slot: impl Into<String>) -> Self {
        Self {
            slots,
            slot: slot.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Current events for a write; an unreadable slot is an error rather than empty
    async fn read_for_update(&self) -> Result<Vec<EmotionEvent>, StoreError> {
        match self.slots.read(&self.slot).await? {
            Some(stored) => decode_collection(&stored.body)
                .map_err(|e| StoreError::Serialization(format!("slot `{}`: {}", self.slot, e))),
            None => Ok(Vec::new()),
        }
    }

    async fn write(&self, events: &[EmotionEvent]) -> Result<WriteReceipt, StoreError> {
        let body = encode_collection(events).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let written_at = self.slots.write(&self.slot, &body).await?;
        Ok(WriteReceipt { written_at })
    }
}

#[async_trait]
impl EventStorePort for SlotEventStore {
    async fn fetch(&self) -> Result<StoredCollection, StoreError> {
        let Some(stored) = self.slots.read(&self.slot).await? else {
            return Ok(StoredCollection::default());
        };

        let events = match decode_collection(&stored.body) {
            Ok(events) => events,
            Err(e) => {
                warn!(slot = %self.slot, error = %e, "Unreadable collection in slot, treating as empty");
                Vec::new()
            }
        };

        Ok(StoredCollection {
            events,
            written_at: Some(stored.written_at),
        })
    }

    async fn append(&self, event: &EmotionEvent) -> Result<WriteReceipt, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut events = self.read_for_update().await?;
        events.push(event.clone());
        self.write(&events).await
    }

    async fn replace_all(&self, events: &[EmotionEvent]) -> Result<WriteReceipt, StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write(events).await
    }

    async fn clear(&self) -> Result<WriteReceipt, StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write(&[]).await
    }
}
