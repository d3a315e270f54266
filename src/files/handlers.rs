//! File Handlers
//!
//! Upload, listing, metadata, download, and replacement. All routes sit
//! behind the access guard.

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tokio_util::io::ReaderStream;
use validator::Validate;

use crate::error::ApiError;
use crate::files::models::{FileIdResponse, FileListQuery};
use crate::AppState;

/// Max upload size: 10MB
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// GET /file/list - List file metadata
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<FileListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query
        .validate()
        .map_err(|err| ApiError::Validation(err.to_string()))?;

    let list_size = query.list_size.unwrap_or(10);
    let page = query.page.unwrap_or(1);

    let files = state.files.list(list_size, page).await?;
    Ok(Json(files))
}

/// GET /file/:id - File metadata
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_positive(id)?;

    let file = state.files.get(id).await?;
    Ok(Json(file))
}

/// GET /file/download/:id - Stream file contents
pub async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    ensure_positive(id)?;

    let (record, reader) = state.files.download(id).await?;

    Response::builder()
        .header(header::CONTENT_TYPE, record.mime_type.as_str())
        .header(header::CONTENT_LENGTH, record.size)
        .body(Body::from_stream(ReaderStream::new(reader)))
        .map_err(|_| ApiError::Internal)
}

/// POST /file/upload - Upload a file
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (filename, mime_type, data) = read_file_field(multipart).await?;
    let record = state.files.upload(&filename, &mime_type, data).await?;
    Ok(Json(FileIdResponse { id: record.id }))
}

/// PUT /file/update/:id - Replace a file
pub async fn update_file(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    ensure_positive(id)?;

    let (filename, mime_type, data) = read_file_field(multipart).await?;
    let record = state.files.replace(id, &filename, &mime_type, data).await?;
    Ok(Json(FileIdResponse { id: record.id }))
}

/// Pull the first file field out of a multipart body
async fn read_file_field(
    mut multipart: Multipart,
) -> Result<(String, String, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Validation(err.to_string()))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| mime_guess::from_path(&filename).first_or_octet_stream().to_string());

        let data = field
            .bytes()
            .await
            .map_err(|err| ApiError::Validation(err.to_string()))?
            .to_vec();

        if data.len() > MAX_FILE_SIZE {
            return Err(ApiError::Validation(format!(
                "file too large, max {} bytes",
                MAX_FILE_SIZE
            )));
        }

        return Ok((filename, mime_type, data));
    }

    Err(ApiError::Validation("no file field in request".to_string()))
}

fn ensure_positive(id: i64) -> Result<(), ApiError> {
    if id < 1 {
        return Err(ApiError::Validation("id must be positive".to_string()));
    }
    Ok(())
}
