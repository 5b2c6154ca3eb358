use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::application::ports::outbound::{SlotStorePort, StoreError, StoredSlot};

/// Local durable keyed store shared by viewing contexts on one machine
pub struct SqliteSlotStore {
    pool: SqlitePool,
}

impl SqliteSlotStore {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        // Create table if not exists
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
        "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl SlotStorePort for SqliteSlotStore {
    async fn read(&self, slot: &str) -> Result<Option<StoredSlot>, StoreError> {
        let row: Option<(String, DateTime<Utc>)> =
            sqlx::query_as("SELECT value, updated_at FROM slots WHERE key = ?")
                .bind(slot)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(row.map(|(body, written_at)| StoredSlot { body, written_at }))
    }

    async fn write(&self, slot: &str, body: &str) -> Result<DateTime<Utc>, StoreError> {
        let written_at = Utc::now();
        sqlx::query("INSERT OR REPLACE INTO slots (key, value, updated_at) VALUES (?, ?, ?)")
            .bind(slot)
            .bind(body)
            .bind(written_at)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(written_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn store() -> SqliteSlotStore {
        // One connection, otherwise each pooled connection gets its own in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SqliteSlotStore::new(pool).await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_slot_reads_none() {
        let store = store().await;
        assert!(store.read("emotions").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_keeps_body_and_time() {
        let store = store().await;
        let written_at = store.write("emotions", "[]").await.unwrap();

        let slot = store.read("emotions").await.unwrap().unwrap();
        assert_eq!(slot.body, "[]");
        assert_eq!(slot.written_at, written_at);
    }

    #[tokio::test]
    async fn test_write_overwrites_previous_value() {
        let store = store().await;
        let first = store.write("emotions", "[1]").await.unwrap();
        let second = store.write("emotions", "[2]").await.unwrap();
        store.write("other", "[3]").await.unwrap();

        let slot = store.read("emotions").await.unwrap().unwrap();
        assert_eq!(slot.body, "[2]");
        assert_eq!(slot.written_at, second);
        assert!(slot.written_at >= first);
    }
}
