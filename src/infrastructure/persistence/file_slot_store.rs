//! File-backed slots: one JSON document per slot in a data directory
//!
//! Writes go to a temporary sibling and are renamed into place, so a reader
//! sees either the previous document or the new one, never a partial file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;

use crate::application::ports::outbound::{SlotStorePort, StoreError, StoredSlot};

pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }

    fn temp_path_for(&self, slot: &str) -> PathBuf {
        self.dir
            .join(format!(".{slot}.json.{}.tmp", uuid::Uuid::new_v4().simple()))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io(format!("{}: {}", path.display(), e))
}

/// The file's modification time is its write time
async fn modified_at(path: &Path) -> Result<DateTime<Utc>, StoreError> {
    fs::metadata(path)
        .await
        .and_then(|meta| meta.modified())
        .map(DateTime::<Utc>::from)
        .map_err(|e| io_error(path, e))
}

#[async_trait]
impl SlotStorePort for FileSlotStore {
    async fn read(&self, slot: &str) -> Result<Option<StoredSlot>, StoreError> {
        let path = self.path_for(slot);
        let body = match fs::read_to_string(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        let written_at = modified_at(&path).await?;

        Ok(Some(StoredSlot { body, written_at }))
    }

    async fn write(&self, slot: &str, body: &str) -> Result<DateTime<Utc>, StoreError> {
        let path = self.path_for(slot);
        let temp = self.temp_path_for(slot);

        if let Err(e) = fs::write(&temp, body).await {
            let _ = fs::remove_file(&temp).await;
            return Err(io_error(&temp, e));
        }
        if let Err(e) = fs::rename(&temp, &path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(io_error(&path, e));
        }

        modified_at(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("emodus-{name}-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_open_creates_directory() {
        let dir = temp_dir("open");
        let store = FileSlotStore::open(&dir).await.unwrap();
        assert!(store.dir().is_dir());
        assert!(store.read("emotions").await.unwrap().is_none());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = temp_dir("write");
        let store = FileSlotStore::open(&dir).await.unwrap();
        let written_at = store.write("emotions", "[]").await.unwrap();

        let slot = store.read("emotions").await.unwrap().unwrap();
        assert_eq!(slot.body, "[]");
        assert_eq!(slot.written_at, written_at);
        assert!(dir.join("emotions.json").is_file());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_overwrite_leaves_no_temp_files() {
        let dir = temp_dir("overwrite");
        let store = FileSlotStore::open(&dir).await.unwrap();
        store.write("emotions", "[1]").await.unwrap();
        let second = store.write("emotions", "[2]").await.unwrap();

        let slot = store.read("emotions").await.unwrap().unwrap();
        assert_eq!(slot.body, "[2]");
        assert_eq!(slot.written_at, second);

        let names: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["emotions.json"]);
        let _ = std::fs::remove_dir_all(dir);
    }
}
