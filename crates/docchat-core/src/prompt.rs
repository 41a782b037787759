//! Prompt construction for chat turns.
//!
//! A turn either asks the bare question or embeds uploaded document text in
//! a structured block and instructs the model to answer only from it.

/// Maximum number of characters of document text embedded in a prompt.
pub const MAX_DOCUMENT_CHARS: usize = 70_000;

/// Appended after the embedded text when the document was cut short.
pub const TRUNCATION_MARKER: &str = "\n[... document truncated ...]";

pub const DOCUMENT_START: &str = "<document>";
pub const DOCUMENT_END: &str = "</document>";

const DOCUMENT_INSTRUCTIONS: &str = "\
Answer the question using only the document text provided below. \
Do not use outside knowledge. If the document does not contain the answer, \
say explicitly that the answer is not in the provided document.";

/// A prompt ready to send, with what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub context: PromptContext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptContext {
    None,
    Document { embedded_chars: usize, truncated: bool },
}

impl Prompt {
    pub fn context_used(&self) -> bool {
        matches!(self.context, PromptContext::Document { .. })
    }
}

/// Build the prompt for `query`, embedding `document_text` when it has
/// non-whitespace content.
pub fn build_prompt(query: &str, document_text: Option<&str>) -> Prompt {
    match document_text.filter(|text| has_content(text)) {
        Some(document) => {
            let (embedded, truncated) = truncate_document(document);
            let marker = if truncated { TRUNCATION_MARKER } else { "" };
            let text = format!(
                "{DOCUMENT_INSTRUCTIONS}\n\n{DOCUMENT_START}\n{embedded}{marker}\n{DOCUMENT_END}\n\nQuestion: {query}"
            );
            Prompt {
                text,
                context: PromptContext::Document {
                    embedded_chars: embedded.chars().count(),
                    truncated,
                },
            }
        }
        None => Prompt {
            text: query.to_string(),
            context: PromptContext::None,
        },
    }
}

/// True when `text` contains anything other than whitespace.
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Cut `document` to at most [`MAX_DOCUMENT_CHARS`] characters, never
/// splitting a character. Returns the kept slice and whether anything was cut.
pub fn truncate_document(document: &str) -> (&str, bool) {
    match document.char_indices().nth(MAX_DOCUMENT_CHARS) {
        Some((byte_offset, _)) => (&document[..byte_offset], true),
        None => (document, false),
    }
}
