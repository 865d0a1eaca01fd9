//! Document text extraction for uploads: PDF, DOCX, and plain text.
//!
//! The format is chosen by file extension alone. Unsupported extensions yield
//! empty text rather than an error, so the upload still gets a (thin) summary.
//! PDF parsing is CPU-bound; callers run `extract_text` inside `spawn_blocking`.

use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::study::markup::decode_entities;

const DOCX_BODY_PART: &str = "word/document.xml";
/// Uncompressed ceiling for `word/document.xml`; guards against zip bombs.
const MAX_DOCX_BODY_BYTES: u64 = 64 * 1024 * 1024;

static DOCX_PARAGRAPH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*?)?(?:/>|>(.*?)</w:p>)").expect("paragraph regex should compile")
});
static DOCX_TEXT_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>").expect("text run regex should compile")
});
// Bare <w:tab/> only; tab stops inside <w:tabs> always carry attributes.
static DOCX_TAB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<w:tab\s*/>").expect("tab regex should compile"));
static DOCX_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<w:(?:br|cr)\b[^>]*/>").expect("break regex should compile"));

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not open DOCX archive: {0}")]
    Docx(#[from] zip::result::ZipError),

    #[error("could not read DOCX body: {0}")]
    Io(#[from] std::io::Error),

    #[error("DOCX body is too large ({0} bytes uncompressed)")]
    DocxTooLarge(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
    Unsupported,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            DocumentKind::Pdf
        } else if lower.ends_with(".docx") {
            DocumentKind::Docx
        } else if lower.ends_with(".txt") {
            DocumentKind::PlainText
        } else {
            DocumentKind::Unsupported
        }
    }
}

/// Extracts the text of an uploaded file.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
    match DocumentKind::from_filename(filename) {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
        }
        DocumentKind::Docx => extract_docx(bytes, MAX_DOCX_BODY_BYTES),
        DocumentKind::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
        DocumentKind::Unsupported => Ok(String::new()),
    }
}

/// One line per body paragraph, in document order.
fn extract_docx(bytes: &[u8], max_body_bytes: u64) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let body = archive.by_name(DOCX_BODY_PART)?;
    if body.size() > max_body_bytes {
        return Err(ExtractError::DocxTooLarge(body.size()));
    }
    // The declared size can lie; never read past the ceiling either way.
    let mut xml = String::new();
    body.take(max_body_bytes).read_to_string(&mut xml)?;

    let mut text = String::new();
    for paragraph in DOCX_PARAGRAPH.captures_iter(&xml) {
        if let Some(inner) = paragraph.get(1) {
            let inner = DOCX_TAB.replace_all(inner.as_str(), "<w:t>\t</w:t>");
            let inner = DOCX_BREAK.replace_all(&inner, "<w:t>\n</w:t>");
            for run in DOCX_TEXT_RUN.captures_iter(&inner) {
                text.push_str(&decode_entities(&run[1]));
            }
        }
        text.push('\n');
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_docx(body: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCX_BODY_PART, zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(body.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_kind_from_filename_is_case_insensitive() {
        assert_eq!(DocumentKind::from_filename("Report.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("cv.docx"), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_filename("notes.Txt"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_filename("data.csv"), DocumentKind::Unsupported);
        assert_eq!(DocumentKind::from_filename("legacy.doc"), DocumentKind::Unsupported);
    }

    #[test]
    fn test_unsupported_extension_yields_empty_text() {
        let text = extract_text(b"name,score\nada,99\n", "scores.csv").unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_plain_text_is_passed_through() {
        let text = extract_text("Chapter 1\nIt was a dark night.".as_bytes(), "book.txt").unwrap();
        assert_eq!(text, "Chapter 1\nIt was a dark night.");
    }

    #[test]
    fn test_plain_text_replaces_invalid_utf8() {
        let text = extract_text(&[b'o', b'k', 0xff], "bad.txt").unwrap();
        assert_eq!(text, "ok\u{fffd}");
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Jane Doe</w:t></w:r></w:p>
<w:p w:rsidR="00A1"><w:r><w:t xml:space="preserve">Rust </w:t></w:r><w:r><w:t>&amp; Go engineer</w:t></w:r></w:p>
<w:p w:rsidR="00B2"/>
<w:p><w:r><w:t>Skills:</w:t><w:tab/><w:t>Tokio</w:t><w:br/><w:t>Axum</w:t></w:r></w:p>
</w:body></w:document>"#;

        let text = extract_text(&build_docx(xml), "resume.DOCX").unwrap();
        assert_eq!(text, "Jane Doe\nRust & Go engineer\n\nSkills:\tTokio\nAxum\n");
    }

    #[test]
    fn test_oversized_docx_body_is_rejected() {
        let docx = build_docx("<w:body><w:p><w:r><w:t>padding</w:t></w:r></w:p></w:body>");
        let err = extract_docx(&docx, 16).unwrap_err();
        assert!(matches!(err, ExtractError::DocxTooLarge(size) if size > 16));
    }

    #[test]
    fn test_garbage_pdf_is_an_error() {
        let err = extract_text(b"not a pdf", "a.pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
        assert!(err.to_string().starts_with("could not read PDF"));
    }

    #[test]
    fn test_corrupt_docx_is_an_error() {
        let err = extract_text(b"definitely not a zip", "broken.docx").unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));
    }
}
