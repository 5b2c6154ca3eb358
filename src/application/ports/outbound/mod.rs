//! Outbound ports - Interfaces that the application requires from external systems

mod event_store_port;
mod notification_port;
mod slot_store_port;

pub use event_store_port::{EventStorePort, StoreError, StoredCollection, WriteReceipt};
pub use notification_port::{ChangeNotification, ChangeNotifierPort};
pub use slot_store_port::{SlotStorePort, StoredSlot};
