//! The watched-sender list.
//!
//! An ordered set of address strings with exact-equality uniqueness,
//! persisted as one JSON array. The file is read fully before each use
//! and rewritten fully on every change; there is no partial update.

use std::path::PathBuf;

use crate::{Error, Result};

/// Whole-file JSON store for the sender list.
#[derive(Debug, Clone)]
pub struct SenderStore {
    path: PathBuf,
}

impl SenderStore {
    /// Creates a store backed by the given file. The file need not exist
    /// yet; a missing file reads as an empty list.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the full list in stored order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] on I/O failure other than a
    /// missing file, [`Error::Serde`] on malformed JSON.
    pub async fn list(&self) -> Result<Vec<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(Error::Persistence(e)),
        }
    }

    /// Appends an address. Returns false without writing when the exact
    /// string is already present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] or [`Error::Serde`] on read/write
    /// failure.
    pub async fn add(&self, address: &str) -> Result<bool> {
        let mut senders = self.list().await?;
        if senders.iter().any(|s| s == address) {
            return Ok(false);
        }
        senders.push(address.to_string());
        self.save(&senders).await?;
        Ok(true)
    }

    /// Removes an address. Returns false without writing when the exact
    /// string is not present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] or [`Error::Serde`] on read/write
    /// failure.
    pub async fn remove(&self, address: &str) -> Result<bool> {
        let mut senders = self.list().await?;
        let before = senders.len();
        senders.retain(|s| s != address);
        if senders.len() == before {
            return Ok(false);
        }
        self.save(&senders).await?;
        Ok(true)
    }

    /// Rewrites the whole file.
    async fn save(&self, senders: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(senders)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> SenderStore {
        SenderStore::new(dir.path().join("senders.json"))
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(&dir).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        assert!(store.add("b@y.com").await.unwrap());
        assert!(store.add("a@x.com").await.unwrap());

        assert_eq!(store.list().await.unwrap(), vec!["b@y.com", "a@x.com"]);
    }

    #[tokio::test]
    async fn test_duplicate_add_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        assert!(store.add("a@x.com").await.unwrap());
        assert!(!store.add("a@x.com").await.unwrap());

        // The persisted set has exactly one entry.
        assert_eq!(store.list().await.unwrap(), vec!["a@x.com"]);
    }

    #[tokio::test]
    async fn test_uniqueness_is_exact_string_equality() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        assert!(store.add("a@x.com").await.unwrap());
        // A case variant is a different string, so it is accepted.
        assert!(store.add("A@X.COM").await.unwrap());
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store.add("a@x.com").await.unwrap();
        store.add("b@y.com").await.unwrap();

        assert!(store.remove("a@x.com").await.unwrap());
        assert!(!store.remove("a@x.com").await.unwrap());
        assert_eq!(store.list().await.unwrap(), vec!["b@y.com"]);
    }

    #[tokio::test]
    async fn test_malformed_file_is_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("senders.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let err = SenderStore::new(path).list().await.err().unwrap();
        assert!(matches!(err, Error::Serde(_)));
    }
}
