use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub mod backend;
pub mod client;
pub mod config_file;
pub mod mock;
pub mod pipeline;
pub mod prompt;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend, join_pages};
pub use client::{ChatMessage, ChatRequest, GroqClient, LlmClient, ServiceError};
pub use pipeline::Summarizer;
pub use prompt::{SYSTEM_PROMPT, SummaryStyle};

/// Chat model used for summarization requests.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Groq's OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Sampling temperature for summarization requests.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Upper bound on generated tokens per summary.
pub const DEFAULT_MAX_TOKENS: u32 = 600;

/// Seconds to wait for the inference service before giving up.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Characters shown in the extracted-text preview.
pub const PREVIEW_CHARS: usize = 1000;

/// The outcome of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct DocumentSummary {
    pub style: SummaryStyle,
    /// Total pages in the document, including pages that yielded no text.
    pub pages: usize,
    pub extracted_text: String,
    pub summary: String,
}

/// Progress events emitted during a pipeline run.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Text extraction has started.
    Extracting,
    /// Extraction finished with non-empty text. `preview` holds the first
    /// [`PREVIEW_CHARS`] characters.
    Extracted {
        pages: usize,
        chars: usize,
        preview: String,
    },
    /// The summarization request is in flight.
    Summarizing { style: SummaryStyle },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The document parsed but yielded no text (e.g. scanned or image-based).
    #[error("no text could be extracted from this PDF; it may be scanned or image-based")]
    EmptyText,
    #[error("PDF extraction failed: {0}")]
    Extraction(#[from] BackendError),
    #[error("summarization failed: {0}")]
    Service(#[from] ServiceError),
}

/// Configuration for the summarization pipeline.
#[derive(Clone)]
pub struct Config {
    /// Groq API key. `None` is not rejected here; it surfaces as an
    /// authentication error on the first request.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// First [`PREVIEW_CHARS`] characters of `text`, on char boundaries.
pub fn text_preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

/// Summarize a PDF document.
///
/// Extracts text via `backend` off the async runtime, halts with
/// [`PipelineError::EmptyText`] before any service call if nothing is
/// extractable, then requests a summary in the selected style from the
/// injected client. Progress events are emitted via the callback.
pub async fn summarize_document(
    data: Vec<u8>,
    style: SummaryStyle,
    backend: Arc<dyn PdfBackend>,
    client: Arc<dyn LlmClient>,
    config: &Config,
    progress: impl Fn(ProgressEvent) + Send + Sync + 'static,
) -> Result<DocumentSummary, PipelineError> {
    pipeline::summarize_document(data, style, backend, client, config, progress).await
}
