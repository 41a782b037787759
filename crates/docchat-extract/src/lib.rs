//! docchat-extract
//!
//! Plain-text extraction from uploaded documents.

pub mod error;
pub mod pdf;

use async_trait::async_trait;

use crate::error::ExtractError;

/// Turns raw document bytes into plain text.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(&self, bytes: Vec<u8>, filename: &str) -> Result<String, ExtractError>;
}
