use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::models::{cache::CacheEntry, error::Error};

const IMAGE_DIR: &str = "circuit_images";

/// One file per cache key under a single directory. No locking: only one
/// widget renders at a time.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    pub fn image_path(&self, key: &str) -> PathBuf {
        self.root.join(IMAGE_DIR).join(format!("{key}.png"))
    }

    /// Missing, unreadable and corrupt files all read as `None`.
    pub async fn read(&self, key: &str) -> Option<CacheEntry> {
        let path = self.entry_path(key);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!("No cache for {key}: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Ignoring corrupt cache file {}: {e}", path.display());
                None
            }
        }
    }

    pub async fn write(&self, key: &str, entry: &CacheEntry) -> Result<(), Error> {
        tokio::fs::create_dir_all(&self.root).await?;
        let body = serde_json::to_string(entry)?;
        tokio::fs::write(self.entry_path(key), body).await?;
        Ok(())
    }

    /// Age of a cached image by its modification time.
    pub async fn image_age(&self, key: &str, now: DateTime<Utc>) -> Option<Duration> {
        let meta = tokio::fs::metadata(self.image_path(key)).await.ok()?;
        let modified: DateTime<Utc> = meta.modified().ok()?.into();
        Some(now - modified)
    }

    pub async fn write_image(&self, key: &str, bytes: &[u8]) -> Result<PathBuf, Error> {
        let path = self.image_path(key);
        tokio::fs::create_dir_all(self.root.join(IMAGE_DIR)).await?;
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

/// File-safe cache key for a display name, e.g. `Circuit de Monaco` -> `circuit_de_monaco`.
pub fn image_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace(['/', '\\'], "_")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn write_then_read_entry() {
        let dir = TempDir::new().expect("create tempdir");
        let store = CacheStore::new(dir.path().join("nested"));
        let entry = CacheEntry::new(json!({"MRData": {"total": "24"}}), Utc::now());

        store.write("f1_races", &entry).await.unwrap();
        let read = store.read("f1_races").await.expect("entry present");
        assert_eq!(read.data, entry.data);
        assert_eq!(
            read.timestamp.timestamp_millis(),
            entry.timestamp.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn corrupt_or_missing_file_reads_as_none() {
        let dir = TempDir::new().expect("create tempdir");
        let store = CacheStore::new(dir.path());
        assert!(store.read("absent").await.is_none());

        std::fs::write(store.entry_path("broken"), "{\"timestamp\": \"yesterday\"").unwrap();
        assert!(store.read("broken").await.is_none());
    }

    #[tokio::test]
    async fn image_age_tracks_write_time() {
        let dir = TempDir::new().expect("create tempdir");
        let store = CacheStore::new(dir.path());
        assert!(store.image_age("monza", Utc::now()).await.is_none());

        let path = store.write_image("monza", b"\x89PNG").await.unwrap();
        assert!(path.ends_with("circuit_images/monza.png"));
        let age = store.image_age("monza", Utc::now()).await.unwrap();
        assert!(age < Duration::minutes(1));
    }

    #[test]
    fn image_key_collapses_whitespace() {
        assert_eq!(image_key("Circuit de  Monaco"), "circuit_de_monaco");
        assert_eq!(image_key("Autódromo José Carlos Pace"), "autódromo_josé_carlos_pace");
    }
}
