use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use docchat_extract::pdf::{looks_like_pdf, PDF_CONTENT_TYPE};

use crate::error::ApiError;
use crate::state::AppState;

/// Largest accepted document.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub text: String,
}

/// Extract the text of an uploaded PDF. Nothing is stored; the client keeps
/// the text and sends it along with later chat queries.
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart =
        multipart.map_err(|e| ApiError::BadRequest(format!("Expected a multipart upload: {e}")))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Could not read the upload: {}", e.body_text())))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("document.pdf").to_string();
        if !is_pdf_content_type(field.content_type()) {
            return Err(ApiError::BadRequest("Only PDF files are supported.".to_string()));
        }

        let bytes = field.bytes().await.map_err(|e| {
            ApiError::BadRequest(format!("Could not read the upload: {}", e.body_text()))
        })?;

        if bytes.is_empty() {
            return Err(ApiError::BadRequest("The uploaded file is empty.".to_string()));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::BadRequest(format!(
                "The uploaded file exceeds the {} MiB limit.",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }
        if !looks_like_pdf(&bytes) {
            return Err(ApiError::BadRequest(
                "The uploaded file is not a valid PDF.".to_string(),
            ));
        }

        let size = bytes.len();
        let text = state.extractor.extract_text(bytes.to_vec(), &filename).await?;
        info!(filename = %filename, size, text_len = text.len(), "document uploaded");

        return Ok(Json(UploadResponse { text }));
    }

    Err(ApiError::BadRequest("No file was uploaded.".to_string()))
}

/// Compare the media type only, ignoring parameters and case.
fn is_pdf_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
}
