//! Change notification port - Cross-context push of collection updates

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::domain::entities::EmotionEvent;
use crate::domain::value_objects::ContextId;

/// Payload sent to sibling viewing contexts after a local write
#[derive(Debug, Clone)]
pub struct ChangeNotification {
    /// Full collection after the write
    pub collection: Arc<Vec<EmotionEvent>>,
    /// Sender's wall-clock time when the collection was persisted
    pub sent_at: DateTime<Utc>,
    pub sender: ContextId,
}

pub trait ChangeNotifierPort: Send + Sync {
    /// Deliver a notification to every current subscriber, returning how many received it
    fn publish(&self, notification: ChangeNotification) -> usize;

    /// Start receiving notifications published from now on
    fn subscribe(&self) -> broadcast::Receiver<ChangeNotification>;
}
