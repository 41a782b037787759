use docchat_bedrock::extract::{pdf_document_block, sanitize_document_name};

#[test]
fn document_names_keep_only_allowed_characters() {
    assert_eq!(sanitize_document_name("lease_2024 (final).pdf"), "lease 2024 (final) pdf");
    assert_eq!(sanitize_document_name("a__b..c"), "a b c");
}

#[test]
fn empty_document_names_fall_back() {
    assert_eq!(sanitize_document_name("...."), "document");
}

#[test]
fn uploads_are_always_sent_as_pdf_whatever_the_extension() {
    for filename in ["report.pdf", "report.docx", "notes.doc", "no-extension"] {
        let block = pdf_document_block(b"%PDF-1.7\n".to_vec(), filename).unwrap();

        let format = format!("{:?}", block.format());
        assert!(format.contains("Pdf"), "{filename}: {format}");
        assert!(!format.contains("Doc"), "{filename}: {format}");
    }
}
