//! Mock LLM client for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::client::{ChatRequest, LlmClient, ServiceError};

/// A configurable response for [`MockLlm`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this content string.
    Content(String),
    /// Fail with an authentication error.
    AuthFailure,
    /// Fail with a 429 rate-limit error.
    RateLimited { retry_after: Option<Duration> },
    /// Fail with a timeout error.
    Timeout(Duration),
    /// Fail with a generic network error.
    Error(String),
}

/// A hand-rolled mock implementing [`LlmClient`] for tests.
///
/// Supports:
/// - A fixed response (used for every call).
/// - Optional per-call latency.
/// - Call counting via [`call_count()`](MockLlm::call_count).
/// - Request capture via [`last_request()`](MockLlm::last_request).
pub struct MockLlm {
    response: MockResponse,
    delay: Option<Duration>,
    call_count: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockLlm {
    /// Create a mock that always returns `response`.
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            delay: None,
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Shorthand for a mock that returns fixed content.
    pub fn with_content(content: &str) -> Self {
        Self::new(MockResponse::Content(content.to_string()))
    }

    /// Set simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `chat()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// The most recent captured request, if any call was made.
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl LlmClient for MockLlm {
    fn name(&self) -> &str {
        "Mock"
    }

    fn chat<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, ServiceError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let response = self.response.clone();
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }

            match response {
                MockResponse::Content(content) => Ok(content),
                MockResponse::AuthFailure => Err(ServiceError::Auth {
                    status: 401,
                    message: "Invalid API Key".to_string(),
                }),
                MockResponse::RateLimited { retry_after } => {
                    Err(ServiceError::RateLimited { retry_after })
                }
                MockResponse::Timeout(after) => Err(ServiceError::Timeout(after)),
                MockResponse::Error(msg) => Err(ServiceError::Network(msg)),
            }
        })
    }
}
