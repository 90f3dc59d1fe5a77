use axum::response::sse::Event;
use serde::Serialize;
use skimmer_core::PipelineError;

// ── SSE event structs ───────────────────────────────────────────────────

/// Extraction has started.
#[derive(Serialize)]
pub struct ExtractingEvent {}

/// Extraction finished with non-empty text.
#[derive(Serialize)]
pub struct ExtractionCompleteEvent {
    pub pages: usize,
    pub chars: usize,
    pub preview: String,
}

/// The summarization request is in flight.
#[derive(Serialize)]
pub struct SummarizingEvent {
    pub style: String,
}

/// The run finished; carries the final summary.
#[derive(Serialize)]
pub struct CompleteEvent {
    pub summary: String,
    pub style: String,
    pub pages: usize,
    pub chars: usize,
}

/// The run failed. `kind` distinguishes the failure classes so the client
/// can render each one differently; `transient` marks failures worth
/// retrying by hand.
#[derive(Serialize, Debug)]
pub struct ErrorEvent {
    pub message: String,
    pub kind: String,
    pub transient: bool,
}

impl ErrorEvent {
    /// A malformed or incomplete upload request.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        ErrorEvent {
            message: message.into(),
            kind: "invalid_request".to_string(),
            transient: false,
        }
    }

    /// A server-side fault unrelated to the document or the service.
    pub fn internal(message: impl Into<String>) -> Self {
        ErrorEvent {
            message: message.into(),
            kind: "internal".to_string(),
            transient: false,
        }
    }
}

impl From<&PipelineError> for ErrorEvent {
    fn from(e: &PipelineError) -> Self {
        let (kind, transient) = match e {
            PipelineError::EmptyText => ("empty_text", false),
            PipelineError::Extraction(_) => ("invalid_pdf", false),
            PipelineError::Service(se) => ("service", se.is_transient()),
        };
        ErrorEvent {
            message: e.to_string(),
            kind: kind.to_string(),
            transient,
        }
    }
}

// ── SSE helper ──────────────────────────────────────────────────────────

pub fn sse_event<T: Serialize>(event_type: &str, data: &T) -> Event {
    Event::default()
        .event(event_type)
        .data(serde_json::to_string(data).unwrap_or_default())
}
