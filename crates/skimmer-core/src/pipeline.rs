//! The document-to-summary pipeline: extract, check, summarize.

use std::sync::Arc;

use crate::backend::{BackendError, PdfBackend, join_pages};
use crate::client::{ChatRequest, LlmClient, ServiceError};
use crate::prompt::{self, SummaryStyle};
use crate::{Config, DocumentSummary, PipelineError, ProgressEvent, text_preview};

/// The summarization component: prompt construction plus one service call.
///
/// The client is injected at construction so tests (and alternative
/// providers) can substitute their own implementation.
pub struct Summarizer {
    client: Arc<dyn LlmClient>,
    config: Config,
}

impl Summarizer {
    pub fn new(client: Arc<dyn LlmClient>, config: Config) -> Self {
        Self { client, config }
    }

    /// Request a summary of `text` in the given style and return the
    /// service's completion, trimmed.
    ///
    /// Emptiness is not re-validated here; the pipeline rejects empty
    /// text before this call. Exactly one request is made, no retries.
    pub async fn summarize(
        &self,
        text: &str,
        style: SummaryStyle,
    ) -> Result<String, ServiceError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: prompt::build_messages(style, text),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        tracing::debug!(
            provider = self.client.name(),
            model = %request.model,
            style = %style,
            "requesting summary"
        );

        let content = self.client.chat(&request).await?;
        Ok(content.trim().to_string())
    }
}

/// Run the full pipeline over one document.
///
/// Phases run in order: extraction (on a blocking thread, the PDF engine
/// is synchronous), the empty-text check, then the summarization request.
/// An empty extraction halts with [`PipelineError::EmptyText`] before any
/// service call.
pub async fn summarize_document(
    data: Vec<u8>,
    style: SummaryStyle,
    backend: Arc<dyn PdfBackend>,
    client: Arc<dyn LlmClient>,
    config: &Config,
    progress: impl Fn(ProgressEvent) + Send + Sync + 'static,
) -> Result<DocumentSummary, PipelineError> {
    progress(ProgressEvent::Extracting);

    let (pages, text) = tokio::task::spawn_blocking(move || {
        let page_texts = backend.extract_pages(&data)?;
        Ok::<_, BackendError>((page_texts.len(), join_pages(&page_texts)))
    })
    .await
    .map_err(|e| BackendError::ExtractionError(format!("extraction task failed: {}", e)))??;

    if text.is_empty() {
        tracing::warn!(pages, "document yielded no extractable text");
        return Err(PipelineError::EmptyText);
    }

    let chars = text.chars().count();
    tracing::debug!(pages, chars, "extracted text");

    progress(ProgressEvent::Extracted {
        pages,
        chars,
        preview: text_preview(&text),
    });

    progress(ProgressEvent::Summarizing { style });

    let summarizer = Summarizer::new(client, config.clone());
    let summary = summarizer.summarize(&text, style).await?;

    Ok(DocumentSummary {
        style,
        pages,
        extracted_text: text,
        summary,
    })
}
