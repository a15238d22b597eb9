//! Gemini client — transport to the remote generative-analysis service
//!
//! Defines the client trait and the request/response types for a single
//! `generateContent` call. Two implementations:
//! - `GeminiClient`: HTTPS via reqwest (production)
//! - `MockClient`: returns scripted responses and records requests (testing)

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::config::AnalyzerConfig;

/// One structured-output request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Natural-language instruction, including the user's content or URL
    pub prompt: String,
    /// JSON Schema the response must conform to
    pub response_schema: Value,
    /// Grant the model its own web search
    pub enable_search: bool,
}

impl GenerateRequest {
    /// Serialize into the `generateContent` request body.
    pub fn to_body(&self) -> Value {
        let mut body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": self.prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseJsonSchema": self.response_schema,
            },
        });
        if self.enable_search {
            body["tools"] = serde_json::json!([{ "google_search": {} }]);
        }
        body
    }
}

/// Errors from reaching the remote service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("API key not configured (set GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("network error: {0}")]
    Transport(String),
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("request blocked by the service: {0}")]
    Blocked(String),
    #[error("service returned no candidates")]
    EmptyResponse,
}

/// Client trait for the remote model.
///
/// Abstracts over transport so the analyzer doesn't depend on how the
/// service is reached. Returns the raw response text.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Model identifier, for logging.
    fn model(&self) -> &str;

    /// Issue one request. Exactly one attempt.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, RequestError>;
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Pull the human-readable message out of a Google API error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}

/// Map a non-success HTTP status to a request error.
pub fn http_error(status: u16, body: &str) -> RequestError {
    let message = error_message(body);
    match status {
        401 | 403 => RequestError::Authentication(message),
        _ => RequestError::Api { status, message },
    }
}

/// Concatenate the text parts of the first candidate.
fn response_text(response: GenerateContentResponse) -> Result<String, RequestError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(RequestError::Blocked(reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(RequestError::EmptyResponse)?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        if let Some(reason) = candidate.finish_reason.filter(|r| r != "STOP") {
            return Err(RequestError::Blocked(reason));
        }
    }

    Ok(text)
}

/// Production client talking to the Gemini REST API.
pub struct GeminiClient {
    config: AnalyzerConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, RequestError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(RequestError::MissingApiKey)?;

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request.to_body())
            .send()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(http_error(status, &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            RequestError::Api {
                status,
                message: format!("unreadable response envelope: {}", e),
            }
        })?;

        response_text(parsed)
    }
}

// ---------------------------------------------------------------------------
// Mock client
// ---------------------------------------------------------------------------

/// Mock client for testing — replays scripted responses in order.
///
/// When the script runs out, the last scripted outcome repeats. Every
/// request is recorded.
pub struct MockClient {
    script: Mutex<VecDeque<Result<String, RequestError>>>,
    last: Mutex<Option<Result<String, RequestError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
    calls: AtomicUsize,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a successful response text.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queue a failure.
    pub fn with_failure(self, error: RequestError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, outcome: Result<String, RequestError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(outcome);
        }
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// All requests received, oldest first.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeClient for MockClient {
    fn model(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, RequestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let mut last = self
            .last
            .lock()
            .map_err(|_| RequestError::Transport("mock state poisoned".to_string()))?;
        match next {
            Some(outcome) => {
                *last = Some(outcome.clone());
                outcome
            }
            None => last.clone().unwrap_or(Err(RequestError::Transport(
                "no mock response scripted".to_string(),
            ))),
        }
    }
}
