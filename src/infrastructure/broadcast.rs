//! In-process change notifications between viewing contexts

use tokio::sync::broadcast;

use crate::application::ports::outbound::{ChangeNotification, ChangeNotifierPort};

const CHANNEL_CAPACITY: usize = 32;

/// Fan-out of collection updates to every subscribed viewing context
///
/// Delivery is best effort. A context that falls behind loses the oldest
/// notifications and catches up on its next poll.
pub struct BroadcastNotifier {
    sender: broadcast::Sender<ChangeNotification>,
}

impl BroadcastNotifier {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifierPort for BroadcastNotifier {
    fn publish(&self, notification: ChangeNotification) -> usize {
        // No subscribers is not an error; nobody else is viewing
        self.sender.send(notification).unwrap_or(0)
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeNotification> {
        self.sender.subscribe()
    }
}
