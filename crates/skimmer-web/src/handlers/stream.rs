use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use skimmer_core::{Config, GroqClient, ProgressEvent};
use skimmer_pdf::PdfExtractBackend;

use crate::models::*;
use crate::state::AppState;
use crate::upload::{self, FormFields};

pub async fn stream(State(state): State<Arc<AppState>>, multipart: Multipart) -> impl IntoResponse {
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(64);

    tokio::spawn(async move {
        if let Err(e) = handle_stream(state, multipart, tx.clone()).await {
            let _ = tx.send(Ok(sse_event("error", &e))).await;
        }
    });

    Sse::new(ReceiverStream::new(rx)).keep_alive(KeepAlive::default())
}

async fn handle_stream(
    state: Arc<AppState>,
    multipart: Multipart,
    tx: mpsc::Sender<Result<Event, Infallible>>,
) -> Result<(), ErrorEvent> {
    let fields = upload::parse_multipart(multipart)
        .await
        .map_err(ErrorEvent::invalid_request)?;

    tracing::info!(
        filename = %fields.file.filename,
        style = %fields.style,
        bytes = fields.file.data.len(),
        "summarization request"
    );

    let config = build_config(&state, &fields);
    let backend = Arc::new(PdfExtractBackend::new());
    let client = Arc::new(GroqClient::new(&config));

    // Forward pipeline progress as SSE. The callback runs in a sync
    // context, so try_send; a full or closed channel just drops the event.
    let tx_progress = tx.clone();
    let progress = move |event: ProgressEvent| {
        let sse = match event {
            ProgressEvent::Extracting => sse_event("extracting", &ExtractingEvent {}),
            ProgressEvent::Extracted {
                pages,
                chars,
                preview,
            } => sse_event(
                "extraction_complete",
                &ExtractionCompleteEvent {
                    pages,
                    chars,
                    preview,
                },
            ),
            ProgressEvent::Summarizing { style } => sse_event(
                "summarizing",
                &SummarizingEvent {
                    style: style.label().to_string(),
                },
            ),
        };
        let _ = tx_progress.try_send(Ok(sse));
    };

    let style = fields.style;
    let data = fields.file.data;

    // Run the pipeline in its own task so a client disconnect can be
    // noticed while it is in flight.
    let pipeline = tokio::spawn(async move {
        skimmer_core::summarize_document(data, style, backend, client, &config, progress).await
    });

    let result = tokio::select! {
        result = pipeline => {
            result.map_err(|e| ErrorEvent::internal(format!("pipeline task failed: {}", e)))?
        }
        _ = tx.closed() => {
            tracing::debug!("client disconnected mid-run");
            return Ok(());
        }
    };

    let summary = result.map_err(|e| ErrorEvent::from(&e))?;

    let event = CompleteEvent {
        chars: summary.extracted_text.chars().count(),
        pages: summary.pages,
        style: summary.style.label().to_string(),
        summary: summary.summary,
    };
    // A send failure means the client is gone; nothing left to do.
    let _ = tx.send(Ok(sse_event("complete", &event))).await;

    Ok(())
}

/// Build the per-request config: form fields override server defaults.
fn build_config(state: &AppState, fields: &FormFields) -> Config {
    let defaults = &state.defaults;
    Config {
        api_key: fields.api_key.clone().or_else(|| defaults.api_key.clone()),
        model: fields
            .model
            .clone()
            .unwrap_or_else(|| defaults.model.clone()),
        ..defaults.clone()
    }
}
