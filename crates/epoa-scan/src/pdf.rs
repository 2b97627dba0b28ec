use std::path::Path;

use epoa_core::UnreadablePdfError;
use lopdf::Document;

/// Text of one page, 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageText {
    pub page: u32,
    pub text: String,
}

/// Pull the text out of every page. Corrupt, encrypted, and text-free
/// documents are errors rather than an empty result.
pub fn extract_pages(path: &Path) -> Result<Vec<PageText>, UnreadablePdfError> {
    let doc = Document::load(path).map_err(|e| UnreadablePdfError::Corrupt(format!("{}: {e}", path.display())))?;
    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(UnreadablePdfError::Encrypted);
    }

    let mut pages = Vec::new();
    for page in doc.get_pages().keys().copied() {
        let text = doc
            .extract_text(&[page])
            .map_err(|e| UnreadablePdfError::Corrupt(format!("page {page}: {e}")))?;
        pages.push(PageText { page, text });
    }

    if pages.iter().all(|p| p.text.trim().is_empty()) {
        return Err(UnreadablePdfError::NoText);
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{mark_encrypted, write_text_pdf};
    use tempfile::tempdir;

    #[test]
    fn extracts_each_page_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posting.pdf");
        write_text_pdf(&path, &["Senior Engineer", "Benefits\nCompetitive salary package"]).unwrap();
        let pages = extract_pages(&path).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page, 1);
        assert!(pages[0].text.contains("Senior Engineer"));
        assert!(pages[1].text.contains("Competitive salary package"));
    }

    #[test]
    fn garbage_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posting.pdf");
        std::fs::write(&path, b"<html>not a pdf</html>").unwrap();
        assert!(matches!(extract_pages(&path), Err(UnreadablePdfError::Corrupt(_))));
    }

    #[test]
    fn encrypted_document_is_refused() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posting.pdf");
        write_text_pdf(&path, &["Compensation: $120,000"]).unwrap();
        mark_encrypted(&path).unwrap();
        assert_eq!(extract_pages(&path), Err(UnreadablePdfError::Encrypted));
    }

    #[test]
    fn blank_pages_have_no_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("posting.pdf");
        write_text_pdf(&path, &[""]).unwrap();
        assert_eq!(extract_pages(&path), Err(UnreadablePdfError::NoText));
    }
}
