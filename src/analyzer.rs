//! Analysis requester — turns user input into one model call
//!
//! The analyzer:
//! 1. Rejects blank input without touching the client
//! 2. Builds a mode-specific prompt
//! 3. Declares the response schema (and, for URLs, grants web search)
//! 4. Issues exactly one request
//! 5. Parses the response text into a validated `AnalysisResult`
//!
//! No retry, timeout or backoff. Factual accuracy of the model's output is
//! not checked; only its structure is.

use crate::analysis::{parse_analysis, response_schema, AnalysisResult};
use crate::gemini::{GenerateRequest, GenerativeClient, RequestError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Longest slice of a raw response quoted in logs.
const LOG_PREVIEW_CHARS: usize = 200;

/// How the user's content should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputMode {
    /// Content is an address the model should fetch or search for
    Url,
    /// Content is the article text itself
    Text,
}

impl InputMode {
    /// Whether the model is granted its own retrieval.
    pub fn grants_search(&self) -> bool {
        matches!(self, InputMode::Url)
    }
}

/// Errors from a single `analyze` call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyzeError {
    #[error("nothing to analyze: input is empty")]
    Validation,
    #[error("analysis request failed: {0}")]
    Request(#[from] RequestError),
    #[error("could not read analysis: {message}")]
    Schema { message: String, raw: String },
    #[error("an analysis is already in progress")]
    Busy,
}

impl AnalyzeError {
    /// The raw model response, for schema failures.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            AnalyzeError::Schema { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Build the natural-language instruction for the model.
pub fn build_prompt(content: &str, mode: InputMode) -> String {
    match mode {
        InputMode::Url => format!(
            "Analyze the article at this URL: {}. If you cannot access it directly, \
             search for the content on Mpelembe Network (mpelembe.net).",
            content
        ),
        InputMode::Text => format!(
            "Analyze the following article content from Mpelembe Network: \n\n{}",
            content
        ),
    }
}

/// Build the full request for `content` in `mode`.
pub fn build_request(content: &str, mode: InputMode) -> GenerateRequest {
    GenerateRequest {
        prompt: build_prompt(content, mode),
        response_schema: response_schema(),
        enable_search: mode.grants_search(),
    }
}

fn preview(raw: &str) -> &str {
    match raw.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}

/// Stateless requester. Safe to share and to call concurrently.
#[derive(Clone)]
pub struct Analyzer {
    client: Arc<dyn GenerativeClient>,
}

impl Analyzer {
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self { client }
    }

    /// Analyze a URL or a block of article text.
    pub async fn analyze(
        &self,
        content: &str,
        mode: InputMode,
    ) -> Result<AnalysisResult, AnalyzeError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AnalyzeError::Validation);
        }

        let request = build_request(content, mode);
        debug!(
            model = self.client.model(),
            ?mode,
            search = request.enable_search,
            prompt_len = request.prompt.len(),
            "sending analysis request"
        );

        let raw = self.client.generate(&request).await.map_err(|e| {
            warn!(error = %e, "analysis request failed");
            AnalyzeError::from(e)
        })?;

        match parse_analysis(&raw) {
            Ok(result) => {
                info!(
                    title = %result.title,
                    sentiment = %result.sentiment,
                    score = result.sentiment_score,
                    "analysis complete"
                );
                Ok(result)
            }
            Err(failure) => {
                warn!(
                    reason = %failure.message,
                    raw = preview(&raw),
                    "model response rejected"
                );
                Err(AnalyzeError::Schema {
                    message: failure.message,
                    raw,
                })
            }
        }
    }
}
