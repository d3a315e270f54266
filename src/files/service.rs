//! File Service
//!
//! Metadata rows in the database, bytes in the blob store. The metadata row
//! is inserted first so its generated id can key the blob.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::io::AsyncRead;

use crate::error::ApiError;
use crate::files::models::FileRecord;
use crate::files::storage::FileStore;

pub struct FileService {
    db: PgPool,
    store: Arc<dyn FileStore>,
}

impl FileService {
    pub fn new(db: PgPool, store: Arc<dyn FileStore>) -> Self {
        Self { db, store }
    }

    /// List metadata rows, oldest first
    pub async fn list(&self, list_size: i64, page: i64) -> Result<Vec<FileRecord>, ApiError> {
        let offset = (page - 1) * list_size;

        let files = sqlx::query_as(
            "SELECT * FROM files ORDER BY id ASC LIMIT $1 OFFSET $2",
        )
        .bind(list_size)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(files)
    }

    /// Fetch one metadata row
    pub async fn get(&self, id: i64) -> Result<FileRecord, ApiError> {
        let file = sqlx::query_as("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(ApiError::NotFound("file"))?;

        Ok(file)
    }

    /// Register a new file and store its blob
    pub async fn upload(
        &self,
        filename: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<FileRecord, ApiError> {
        let ext = normalized_ext(filename);

        let record: FileRecord = sqlx::query_as(
            r#"
            INSERT INTO files (name, ext, mime_type, size)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(filename)
        .bind(&ext)
        .bind(mime_type)
        .bind(data.len() as i64)
        .fetch_one(&self.db)
        .await?;

        self.store.put(&record.blob_name(), &data).await?;

        tracing::info!(file_id = record.id, size = record.size, "File uploaded");

        Ok(record)
    }

    /// Replace an existing file's metadata and blob
    pub async fn replace(
        &self,
        id: i64,
        filename: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<FileRecord, ApiError> {
        let ext = normalized_ext(filename);

        let record: FileRecord = sqlx::query_as(
            r#"
            UPDATE files SET name = $2, ext = $3, mime_type = $4, size = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(filename)
        .bind(&ext)
        .bind(mime_type)
        .bind(data.len() as i64)
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::NotFound("file"))?;

        self.store.put(&record.blob_name(), &data).await?;

        tracing::info!(file_id = record.id, size = record.size, "File replaced");

        Ok(record)
    }

    /// Fetch a metadata row together with a reader over its blob
    pub async fn download(
        &self,
        id: i64,
    ) -> Result<(FileRecord, Box<dyn AsyncRead + Send + Unpin>), ApiError> {
        let record = self.get(id).await?;
        let reader = self.store.open(&record.blob_name()).await?;
        Ok((record, reader))
    }
}

/// Extension of the client filename, lowercased with the leading dot,
/// or empty when absent or suspicious
fn normalized_ext(filename: &str) -> String {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 7 && ext.bytes().all(|b| b.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_ext() {
        assert_eq!(normalized_ext("report.PDF"), ".pdf");
        assert_eq!(normalized_ext("archive.tar.gz"), ".gz");
        assert_eq!(normalized_ext("no-extension"), "");
        assert_eq!(normalized_ext(".hidden"), "");
        assert_eq!(normalized_ext("weird.ex!t"), "");
        assert_eq!(normalized_ext("too.longextension"), "");
    }
}
