//! Blob Storage
//!
//! Opaque blob store keyed by name. The production implementation keeps
//! blobs as plain files under one directory; the seam exists so the file
//! service never touches paths directly.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncRead;

use crate::error::ApiError;

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write a blob, replacing any previous content under the same name
    async fn put(&self, name: &str, data: &[u8]) -> Result<(), ApiError>;

    /// Open a blob for streaming reads
    async fn open(&self, name: &str) -> Result<Box<dyn AsyncRead + Send + Unpin>, ApiError>;
}

/// Local-disk blob store
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the storage directory if it does not exist
    pub async fn init(&self) -> Result<(), ApiError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    fn path(&self, name: &str) -> PathBuf {
        // blob names are derived from numeric ids plus a sanitized
        // extension, so a join cannot escape the root
        self.root.join(Path::new(name).file_name().unwrap_or_default())
    }
}

#[async_trait]
impl FileStore for DiskStore {
    async fn put(&self, name: &str, data: &[u8]) -> Result<(), ApiError> {
        fs::write(self.path(name), data).await?;
        Ok(())
    }

    async fn open(&self, name: &str) -> Result<Box<dyn AsyncRead + Send + Unpin>, ApiError> {
        let file = fs::File::open(self.path(name)).await?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_put_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        store.init().await.unwrap();

        store.put("1.txt", b"hello").await.unwrap();

        let mut reader = store.open("1.txt").await.unwrap();
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).await.unwrap();
        assert_eq!(contents, b"hello");
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        store.init().await.unwrap();

        store.put("1.txt", b"first").await.unwrap();
        store.put("1.txt", b"second").await.unwrap();

        let mut reader = store.open("1.txt").await.unwrap();
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).await.unwrap();
        assert_eq!(contents, b"second");
    }

    #[tokio::test]
    async fn test_missing_blob_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        store.init().await.unwrap();

        let err = store.open("nope.bin").await.err().unwrap();
        assert!(matches!(err, ApiError::Storage(_)));
    }

    #[tokio::test]
    async fn test_blob_names_cannot_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        store.init().await.unwrap();

        store.put("../escape.txt", b"x").await.unwrap();
        assert!(dir.path().join("escape.txt").exists());
        assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
    }
}
