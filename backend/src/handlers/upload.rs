//! Multipart helpers shared by the upload handlers.

use axum::extract::multipart::{Field, MultipartError};

use crate::error::AppError;

pub struct UploadedFile {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub fn multipart_error(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
}

pub async fn read_file(field: Field<'_>) -> Result<UploadedFile, AppError> {
    let content_type = field
        .content_type()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "application/octet-stream".into());
    let bytes = field.bytes().await.map_err(multipart_error)?;
    Ok(UploadedFile {
        content_type,
        bytes: bytes.to_vec(),
    })
}

pub async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field.text().await.map_err(multipart_error)
}
