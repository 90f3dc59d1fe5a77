use std::io::Write;

use owo_colors::OwoColorize;
use skimmer_core::{DocumentSummary, PipelineError, ServiceError};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the extraction result: character/page counts and the text preview.
pub fn print_preview(
    w: &mut dyn Write,
    preview: &str,
    pages: usize,
    chars: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let pages_word = if pages == 1 { "page" } else { "pages" };
    writeln!(w, "Extracted {} characters from {} {}", chars, pages, pages_word)?;
    writeln!(w)?;

    if color.enabled() {
        writeln!(w, "{}", "Preview:".bold())?;
        for line in preview.lines() {
            writeln!(w, "  {}", line.dimmed())?;
        }
    } else {
        writeln!(w, "Preview:")?;
        for line in preview.lines() {
            writeln!(w, "  {}", line)?;
        }
    }

    if chars > preview.chars().count() {
        writeln!(w, "  ...")?;
    }
    writeln!(w)?;
    Ok(())
}

/// Print the final summary report.
pub fn print_report(
    w: &mut dyn Write,
    file_name: &str,
    summary: &DocumentSummary,
    color: ColorMode,
) -> std::io::Result<()> {
    let sep = "=".repeat(60);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{} ({})", summary.style.label().bold().cyan(), file_name)?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "{} ({})", summary.style.label(), file_name)?;
        writeln!(w, "{}", sep)?;
    }
    writeln!(w)?;
    writeln!(w, "{}", summary.summary)?;
    writeln!(w)?;

    let pages_word = if summary.pages == 1 { "page" } else { "pages" };
    let stats = format!(
        "({} {}, {} characters analyzed)",
        summary.pages,
        pages_word,
        summary.extracted_text.chars().count()
    );
    if color.enabled() {
        writeln!(w, "{}", stats.dimmed())?;
    } else {
        writeln!(w, "{}", stats)?;
    }
    Ok(())
}

/// Print the full extracted text after the report, for `--full-text`.
pub fn print_full_text(w: &mut dyn Write, text: &str, color: ColorMode) -> std::io::Result<()> {
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", "Extracted text:".bold())?;
    } else {
        writeln!(w, "Extracted text:")?;
    }
    writeln!(w, "{}", text)?;
    Ok(())
}

/// Print a user-facing message for a failed pipeline run.
///
/// Each failure class gets its own message: invalid PDF, no extractable
/// text, and remote-service failures (with a transient-vs-permanent hint).
pub fn print_pipeline_error(
    w: &mut dyn Write,
    error: &PipelineError,
    color: ColorMode,
) -> std::io::Result<()> {
    match error {
        PipelineError::Extraction(e) => {
            let msg = format!("Invalid PDF: {}", e);
            if color.enabled() {
                writeln!(w, "{} {}", "ERROR:".red().bold(), msg)?;
            } else {
                writeln!(w, "ERROR: {}", msg)?;
            }
        }
        PipelineError::EmptyText => {
            if color.enabled() {
                writeln!(w, "{} {}", "ERROR:".red().bold(), error)?;
            } else {
                writeln!(w, "ERROR: {}", error)?;
            }
            writeln!(w, "OCR is not supported; only PDFs with a text layer work.")?;
        }
        PipelineError::Service(e) => {
            let msg = format!("Summarization service error: {}", e);
            if color.enabled() {
                writeln!(w, "{} {}", "ERROR:".red().bold(), msg)?;
            } else {
                writeln!(w, "ERROR: {}", msg)?;
            }
            let hint = match e {
                ServiceError::Auth { .. } => "Check your Groq API key (--api-key or GROQ_API_KEY).",
                _ if e.is_transient() => "This may be temporary; try again in a moment.",
                _ => "Check your configuration and try again.",
            };
            if color.enabled() {
                writeln!(w, "{}", hint.dimmed())?;
            } else {
                writeln!(w, "{}", hint)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skimmer_core::{BackendError, SummaryStyle};
    use std::time::Duration;

    fn render<F: Fn(&mut dyn Write) -> std::io::Result<()>>(f: F) -> String {
        let mut buf: Vec<u8> = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn sample_summary() -> DocumentSummary {
        DocumentSummary {
            style: SummaryStyle::Brief,
            pages: 2,
            extracted_text: "Hello world.\nSecond page.".to_string(),
            summary: "A two-page greeting.".to_string(),
        }
    }

    #[test]
    fn report_contains_style_label_and_summary() {
        let out = render(|w| print_report(w, "doc.pdf", &sample_summary(), ColorMode(false)));
        assert!(out.contains("Brief Summary (doc.pdf)"));
        assert!(out.contains("A two-page greeting."));
        assert!(out.contains("(2 pages, 25 characters analyzed)"));
    }

    #[test]
    fn report_uses_singular_for_one_page() {
        let summary = DocumentSummary {
            pages: 1,
            ..sample_summary()
        };
        let out = render(|w| print_report(w, "doc.pdf", &summary, ColorMode(false)));
        assert!(out.contains("(1 page,"));
    }

    #[test]
    fn preview_shows_counts_and_lines() {
        let out = render(|w| print_preview(w, "line one\nline two", 3, 17, ColorMode(false)));
        assert!(out.contains("Extracted 17 characters from 3 pages"));
        assert!(out.contains("  line one"));
        assert!(out.contains("  line two"));
        assert!(!out.contains("..."));
    }

    #[test]
    fn truncated_preview_shows_ellipsis() {
        let out = render(|w| print_preview(w, "short", 1, 5000, ColorMode(false)));
        assert!(out.contains("  ..."));
    }

    #[test]
    fn empty_text_error_mentions_ocr() {
        let out =
            render(|w| print_pipeline_error(w, &PipelineError::EmptyText, ColorMode(false)));
        assert!(out.contains("ERROR:"));
        assert!(out.contains("no text could be extracted"));
        assert!(out.contains("OCR is not supported"));
    }

    #[test]
    fn extraction_error_reads_as_invalid_pdf() {
        let err = PipelineError::Extraction(BackendError::OpenError("bad xref".to_string()));
        let out = render(|w| print_pipeline_error(w, &err, ColorMode(false)));
        assert!(out.contains("Invalid PDF"));
        assert!(out.contains("bad xref"));
    }

    #[test]
    fn auth_error_points_at_the_key() {
        let err = PipelineError::Service(ServiceError::Auth {
            status: 401,
            message: "Invalid API Key".to_string(),
        });
        let out = render(|w| print_pipeline_error(w, &err, ColorMode(false)));
        assert!(out.contains("Summarization service error"));
        assert!(out.contains("GROQ_API_KEY"));
    }

    #[test]
    fn transient_error_suggests_retrying() {
        let err = PipelineError::Service(ServiceError::Timeout(Duration::from_secs(60)));
        let out = render(|w| print_pipeline_error(w, &err, ColorMode(false)));
        assert!(out.contains("may be temporary"));
    }

    #[test]
    fn report_writes_to_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        {
            let mut w = std::fs::File::create(file.path()).unwrap();
            print_report(&mut w, "doc.pdf", &sample_summary(), ColorMode(false)).unwrap();
        }
        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.contains("A two-page greeting."));
    }
}
