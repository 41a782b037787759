//! Document text extraction via the Bedrock Converse API.
//!
//! Sends the PDF to a Claude model as a `DocumentBlock` and asks for pure
//! text extraction. The Converse API parses the document natively; a
//! document it cannot parse comes back as a `ValidationException`.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, DocumentBlock, DocumentFormat, DocumentSource, Message,
    SystemContentBlock,
};
use tracing::info;

use docchat_extract::error::ExtractError;
use docchat_extract::DocumentExtractor;

const EXTRACTION_SYSTEM_PROMPT: &str = "\
Extract the complete text content from this document. \
Return only the plain text, preserving paragraph structure. \
Do not add commentary, headers, or formatting.";

/// [`DocumentExtractor`] that delegates parsing to a Bedrock model.
#[derive(Clone)]
pub struct BedrockDocumentExtractor {
    client: Client,
    model_id: String,
}

impl BedrockDocumentExtractor {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl DocumentExtractor for BedrockDocumentExtractor {
    async fn extract_text(&self, bytes: Vec<u8>, filename: &str) -> Result<String, ExtractError> {
        let doc_block = pdf_document_block(bytes, filename)?;

        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Document(doc_block))
            .content(ContentBlock::Text(
                "Extract the full text from this document.".to_string(),
            ))
            .build()
            .map_err(|e| ExtractError::Failed(e.to_string()))?;

        info!(model_id = %self.model_id, filename, "extracting text from document");

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(
                EXTRACTION_SYSTEM_PROMPT.to_string(),
            ))
            .messages(message)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_validation_exception() {
                    ExtractError::Corrupted(err.to_string())
                } else {
                    ExtractError::Failed(err.to_string())
                }
            })?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| ExtractError::Failed("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(t) = block {
                    Some(t.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        info!(
            model_id = %self.model_id,
            filename,
            text_len = text.len(),
            "document text extraction complete"
        );

        Ok(text)
    }
}

/// Sanitize a filename for use as a Bedrock `DocumentBlock` name.
///
/// The name field only allows alphanumeric characters, single whitespace,
/// hyphens, parentheses, and square brackets. An empty result falls back to
/// `"document"`.
pub fn sanitize_document_name(filename: &str) -> String {
    let mut result = String::with_capacity(filename.len());
    let mut prev_space = false;

    for c in filename.chars() {
        let keep = c.is_alphanumeric() || matches!(c, '-' | '(' | ')' | '[' | ']');
        if keep {
            result.push(c);
            prev_space = false;
        } else if !prev_space {
            result.push(' ');
            prev_space = true;
        }
    }

    let trimmed = result.trim();
    if trimmed.is_empty() {
        "document".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Wrap uploaded bytes as a PDF `DocumentBlock`. Uploads are validated as
/// PDF before they get here, so the filename only supplies the block name.
pub fn pdf_document_block(bytes: Vec<u8>, filename: &str) -> Result<DocumentBlock, ExtractError> {
    DocumentBlock::builder()
        .format(DocumentFormat::Pdf)
        .name(sanitize_document_name(filename))
        .source(DocumentSource::Bytes(aws_smithy_types::Blob::new(bytes)))
        .build()
        .map_err(|e| ExtractError::Failed(e.to_string()))
}
