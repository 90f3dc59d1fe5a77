use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
}

/// Trait for PDF text extraction backends.
///
/// Implementors provide the per-page extraction step; the provided
/// [`extract_text`](PdfBackend::extract_text) method joins pages via
/// [`join_pages`] into the single string the pipeline consumes.
pub trait PdfBackend: Send + Sync {
    /// Extract the text of each page, in document order.
    ///
    /// A page with no extractable text yields an empty string, not an
    /// error. Unparseable documents fail with [`BackendError`].
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>, BackendError>;

    /// Extract the full document text.
    fn extract_text(&self, data: &[u8]) -> Result<String, BackendError> {
        Ok(join_pages(&self.extract_pages(data)?))
    }
}

/// Join per-page texts into one document string.
///
/// Pages whose text is blank contribute nothing (no placeholder line);
/// every other page is appended followed by a newline. The result is
/// trimmed of leading and trailing whitespace, so a document with no
/// extractable text at all joins to the empty string.
pub fn join_pages(pages: &[String]) -> String {
    let mut text = String::new();
    for page in pages {
        if page.trim().is_empty() {
            continue;
        }
        text.push_str(page);
        text.push('\n');
    }
    text.trim().to_string()
}
