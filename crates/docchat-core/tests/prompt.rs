use docchat_core::prompt::{
    build_prompt, truncate_document, PromptContext, DOCUMENT_END, DOCUMENT_START,
    MAX_DOCUMENT_CHARS, TRUNCATION_MARKER,
};

#[test]
fn bare_question_has_no_document_framing() {
    let prompt = build_prompt("What is the capital of France?", None);

    assert_eq!(prompt.text, "What is the capital of France?");
    assert_eq!(prompt.context, PromptContext::None);
    assert!(!prompt.context_used());
    assert!(!prompt.text.contains(DOCUMENT_START));
}

#[test]
fn whitespace_document_counts_as_no_context() {
    let prompt = build_prompt("Summarize this.", Some("  \n\t "));

    assert_eq!(prompt.context, PromptContext::None);
    assert!(!prompt.text.contains(DOCUMENT_START));
}

#[test]
fn document_is_embedded_with_instructions() {
    let prompt = build_prompt("Who signed the lease?", Some("The lease was signed by Ada Lovelace."));

    assert!(prompt.context_used());
    assert!(prompt.text.contains(DOCUMENT_START));
    assert!(prompt.text.contains(DOCUMENT_END));
    assert!(prompt.text.contains("The lease was signed by Ada Lovelace."));
    assert!(prompt.text.contains("not in the provided document"));
    assert!(prompt.text.ends_with("Question: Who signed the lease?"));
    assert!(!prompt.text.contains(TRUNCATION_MARKER));
}

#[test]
fn long_document_is_truncated_to_the_limit() {
    // Multi-byte characters make sure the limit counts characters, not bytes.
    let document = "€".repeat(MAX_DOCUMENT_CHARS + 5);
    let prompt = build_prompt("What does it say?", Some(&document));

    assert!(prompt.text.contains(TRUNCATION_MARKER));
    assert_eq!(prompt.text.matches('€').count(), MAX_DOCUMENT_CHARS);
    assert_eq!(
        prompt.context,
        PromptContext::Document {
            embedded_chars: MAX_DOCUMENT_CHARS,
            truncated: true,
        }
    );
}

#[test]
fn document_at_exact_limit_is_not_truncated() {
    let document = "x".repeat(MAX_DOCUMENT_CHARS);
    let (kept, truncated) = truncate_document(&document);

    assert!(!truncated);
    assert_eq!(kept.len(), MAX_DOCUMENT_CHARS);
}
