use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The bytes are not a readable document of the expected format.
    #[error("document is corrupted or unreadable: {0}")]
    Corrupted(String),

    /// Extraction itself failed for reasons unrelated to the input.
    #[error("text extraction failed: {0}")]
    Failed(String),
}
