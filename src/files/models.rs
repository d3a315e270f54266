//! File Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// File metadata row
///
/// The numeric id doubles as the blob-store key; the blob itself lives
/// outside the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: i64,
    pub name: String,
    pub ext: String,
    pub mime_type: String,
    pub size: i64,
    pub registration_date: DateTime<Utc>,
}

impl FileRecord {
    /// Name of the blob backing this record
    pub fn blob_name(&self) -> String {
        format!("{}{}", self.id, self.ext)
    }
}

/// GET /file/list query parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FileListQuery {
    #[validate(range(min = 1, message = "list_size must be positive"))]
    pub list_size: Option<i64>,

    #[validate(range(min = 1, message = "page must be positive"))]
    pub page: Option<i64>,
}

/// Upload/update response
#[derive(Debug, Clone, Serialize)]
pub struct FileIdResponse {
    pub id: i64,
}
