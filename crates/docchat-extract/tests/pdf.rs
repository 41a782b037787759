use docchat_extract::error::ExtractError;
use docchat_extract::pdf::{looks_like_pdf, PdfTextExtractor};
use docchat_extract::DocumentExtractor;

#[test]
fn pdf_header_is_recognized() {
    assert!(looks_like_pdf(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n"));
    assert!(!looks_like_pdf(b"PK\x03\x04 not a pdf"));
    assert!(!looks_like_pdf(b""));
}

#[tokio::test]
async fn non_pdf_bytes_are_corrupted() {
    let err = PdfTextExtractor
        .extract_text(b"hello, plain text".to_vec(), "notes.pdf")
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractError::Corrupted(_)));
}

#[tokio::test]
async fn truncated_pdf_is_not_an_internal_failure() {
    let err = PdfTextExtractor
        .extract_text(b"%PDF-1.4\n1 0 obj\n<< /Type /Cat".to_vec(), "broken.pdf")
        .await
        .unwrap_err();

    assert!(!matches!(err, ExtractError::Failed(_)), "got {err:?}");
}
