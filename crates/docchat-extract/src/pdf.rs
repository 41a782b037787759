use async_trait::async_trait;
use tracing::info;

use crate::error::ExtractError;
use crate::DocumentExtractor;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Every PDF file starts with this header.
const PDF_MAGIC: &[u8] = b"%PDF-";

pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Local PDF text extraction with `pdf-extract`.
///
/// Parsing is CPU-bound and runs on the blocking pool. The parser can
/// panic on malformed input; a panic is reported as a corrupted document.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl DocumentExtractor for PdfTextExtractor {
    async fn extract_text(&self, bytes: Vec<u8>, filename: &str) -> Result<String, ExtractError> {
        if !looks_like_pdf(&bytes) {
            return Err(ExtractError::Corrupted("missing PDF header".to_string()));
        }

        let size = bytes.len();
        let parsed = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    ExtractError::Corrupted("PDF parser rejected the document".to_string())
                } else {
                    ExtractError::Failed(e.to_string())
                }
            })?;

        let text = parsed.map_err(|e| match e {
            pdf_extract::OutputError::PdfError(inner) => ExtractError::Corrupted(inner.to_string()),
            other => ExtractError::Failed(other.to_string()),
        })?;

        info!(filename, size, text_len = text.len(), "pdf text extraction complete");

        Ok(text)
    }
}
