//! Persistence adapters
//!
//! Slot stores hold one serialized value per name: SQLite for the local
//! keyed store, plain files for the REST server. [`SlotEventStore`] puts the
//! emotion collection on top of either.

mod file_slot_store;
mod slot_event_store;
mod sqlite_slot_store;

pub use file_slot_store::FileSlotStore;
pub use slot_event_store::{SlotEventStore, DEFAULT_SLOT};
pub use sqlite_slot_store::SqliteSlotStore;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;

/// Connect to the local SQLite store and prepare its schema
pub async fn connect_sqlite(url: &str) -> Result<SqliteSlotStore> {
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect(url)
        .await
        .with_context(|| format!("Failed to open local store at {url}"))?;
    SqliteSlotStore::new(pool)
        .await
        .context("Failed to initialize local store schema")
}
