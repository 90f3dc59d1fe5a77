//! Chat-completion client trait and the Groq implementation.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Config;

/// One entry in the chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for the chat completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Failure modes of the remote summarization service.
///
/// [`is_transient`](ServiceError::is_transient) separates failures worth
/// re-running by hand (rate limits, timeouts, network trouble) from
/// configuration problems (bad credentials, malformed requests). Nothing
/// here retries automatically.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// 401/403 from the service: missing or invalid API key.
    #[error("authentication failed (HTTP {status}): {message}")]
    Auth { status: u16, message: String },
    /// 429 from the service.
    #[error("rate limited (429){}", fmt_retry_after(.retry_after))]
    RateLimited { retry_after: Option<Duration> },
    /// The request exceeded the configured timeout.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    /// Any other non-success HTTP status.
    #[error("service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// Transport-level failure before an HTTP status was received.
    #[error("network error: {0}")]
    Network(String),
    /// The service answered 200 but the body was not usable.
    #[error("unexpected response from service: {0}")]
    MalformedResponse(String),
}

fn fmt_retry_after(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(d) => format!(", retry after {:.1}s", d.as_secs_f64()),
        None => String::new(),
    }
}

impl ServiceError {
    /// Whether the failure is plausibly transient rather than a
    /// configuration problem.
    pub fn is_transient(&self) -> bool {
        match self {
            ServiceError::RateLimited { .. }
            | ServiceError::Timeout(_)
            | ServiceError::Network(_) => true,
            ServiceError::Http { status, .. } => *status >= 500,
            ServiceError::Auth { .. } | ServiceError::MalformedResponse(_) => false,
        }
    }
}

/// A chat-completion client for the summarization service.
///
/// The pipeline holds a `dyn LlmClient` so tests can substitute
/// [`MockLlm`](crate::mock::MockLlm) for the real service.
pub trait LlmClient: Send + Sync {
    /// Provider name used in logs (e.g. "Groq").
    fn name(&self) -> &str;

    /// Send one chat completion request and return the first choice's
    /// message content, untrimmed.
    fn chat<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, ServiceError>> + Send + 'a>>;
}

/// Client for Groq's OpenAI-compatible chat completions API.
pub struct GroqClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl GroqClient {
    /// Build a client from configuration. The key is not validated here;
    /// an absent or bad key surfaces as [`ServiceError::Auth`] on the
    /// first request.
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: config.timeout(),
        }
    }
}

impl LlmClient for GroqClient {
    fn name(&self) -> &str {
        "Groq"
    }

    fn chat<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, ServiceError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{}/chat/completions", self.base_url);

            tracing::debug!(model = %request.model, "sending chat completion request");

            let mut req = self.client.post(&url).timeout(self.timeout).json(request);
            if let Some(ref key) = self.api_key {
                req = req.bearer_auth(key);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| transport_error(e, self.timeout))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(error_from_response(resp).await);
            }

            let parsed: ChatResponse = resp
                .json()
                .await
                .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;

            first_choice_content(parsed)
        })
    }
}

/// Map a reqwest transport error to the service taxonomy.
fn transport_error(e: reqwest::Error, timeout: Duration) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Timeout(timeout)
    } else if e.is_connect() {
        ServiceError::Network(format!("connection failed: {}", e))
    } else {
        ServiceError::Network(e.to_string())
    }
}

/// Classify a non-success response, consuming its body for the message.
async fn error_from_response(resp: reqwest::Response) -> ServiceError {
    let status = resp.status();

    if status.as_u16() == 429 {
        let retry_after = resp
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        return ServiceError::RateLimited { retry_after };
    }

    let body = resp.text().await.unwrap_or_default();
    let message = api_error_message(&body)
        .unwrap_or_else(|| truncate_body(&body))
        .trim()
        .to_string();
    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        message
    };

    match status.as_u16() {
        401 | 403 => ServiceError::Auth {
            status: status.as_u16(),
            message,
        },
        _ => ServiceError::Http {
            status: status.as_u16(),
            message,
        },
    }
}

/// Parse a Retry-After header value (seconds or HTTP-date).
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    // Try parsing as integer seconds first
    if let Ok(secs) = value.trim().parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    // Date strings get a conservative fallback
    if value.contains(',') || value.contains("GMT") {
        return Some(Duration::from_secs(5));
    }
    None
}

/// Pull the human-readable message out of an OpenAI-style error body
/// (`{"error": {"message": "...", ...}}`).
fn api_error_message(body: &str) -> Option<String> {
    let data: serde_json::Value = serde_json::from_str(body).ok()?;
    data["error"]["message"].as_str().map(String::from)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let head: String = body.chars().take(MAX).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

/// The generated text of the first completion choice.
fn first_choice_content(resp: ChatResponse) -> Result<String, ServiceError> {
    resp.choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| ServiceError::MalformedResponse("response contained no choices".to_string()))
}
