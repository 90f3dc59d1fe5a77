//! PDF text extraction via the pure-Rust `pdf-extract` crate.
//!
//! `pdf_extract` can panic on malformed input rather than returning an
//! error, so every call is wrapped in [`std::panic::catch_unwind`] and
//! panics are converted into [`BackendError`]. Callers always see a
//! `Result`, never an abort.

use std::panic::{self, AssertUnwindSafe};

use skimmer_core::{BackendError, PdfBackend};

/// [`PdfBackend`] implementation over `pdf_extract`.
///
/// Pages with no text layer (scanned or image-only pages) come back as
/// empty strings; the core's page joining drops them.
#[derive(Debug, Default)]
pub struct PdfExtractBackend;

impl PdfExtractBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for PdfExtractBackend {
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>, BackendError> {
        let data = data.to_vec(); // owned copy for the unwind boundary
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&data)
        }));
        match result {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(BackendError::OpenError(e.to_string())),
            Err(_) => Err(BackendError::ExtractionError(
                "PDF extraction panicked (malformed document)".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a valid single-column PDF with one page per text entry, using
    /// lopdf (the same library pdf-extract parses with).
    fn make_test_pdf(page_texts: &[&str]) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::new();
        for text in page_texts {
            let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! {
                        "F1" => font_id,
                    },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn extracts_text_from_single_page() {
        let pdf = make_test_pdf(&["Hello world."]);
        let pages = PdfExtractBackend::new().extract_pages(&pdf).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("Hello world."), "got: {:?}", pages[0]);
    }

    #[test]
    fn extracts_pages_in_document_order() {
        let pdf = make_test_pdf(&["First page here.", "Second page here."]);
        let pages = PdfExtractBackend::new().extract_pages(&pdf).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("First page here."));
        assert!(pages[1].contains("Second page here."));
    }

    #[test]
    fn extract_text_joins_and_trims() {
        let pdf = make_test_pdf(&["Hello world.", "Second page."]);
        let text = PdfExtractBackend::new().extract_text(&pdf).unwrap();
        assert!(text.contains("Hello world."));
        assert!(text.contains("Second page."));
        assert_eq!(text, text.trim());
    }

    #[test]
    fn invalid_bytes_return_error() {
        let result = PdfExtractBackend::new().extract_pages(b"not a pdf at all");
        assert!(result.is_err());
    }

    #[test]
    fn empty_input_returns_error() {
        let result = PdfExtractBackend::new().extract_pages(b"");
        assert!(result.is_err());
    }

    #[test]
    fn truncated_pdf_is_an_error_not_a_panic() {
        let mut pdf = make_test_pdf(&["Some content."]);
        pdf.truncate(pdf.len() / 2);
        let result = PdfExtractBackend::new().extract_pages(&pdf);
        assert!(result.is_err());
    }
}
