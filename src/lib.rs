//! Mpelembe Insights: structured article analysis
//!
//! Submits a URL or pasted article text to the Gemini API and returns a
//! structured analysis: summary, key takeaways, sentiment, category, tags,
//! reading time, named entities and complexity.
//!
//! # Core Concepts
//!
//! - **Analyzer**: builds one schema-constrained request per call and
//!   validates the response into an [`AnalysisResult`]
//! - **History**: the ten most recent successful analyses, newest first
//! - **Session**: ties the two together and allows one analysis in flight
//!
//! # Example
//!
//! ```
//! use mpelembe_insights::{Analyzer, InputMode, MockClient, Session};
//! use std::sync::Arc;
//!
//! let client = Arc::new(MockClient::new());
//! let session = Session::new(Analyzer::new(client));
//! assert!(session.history().is_empty());
//! # let _ = InputMode::Url;
//! ```

pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod gemini;
pub mod history;
pub mod render;
pub mod session;

pub use analysis::{AnalysisResult, Complexity, Entities, Sentiment};
pub use analyzer::{AnalyzeError, Analyzer, InputMode};
pub use config::AnalyzerConfig;
pub use gemini::{GeminiClient, GenerateRequest, GenerativeClient, MockClient, RequestError};
pub use history::{HistoryCache, HistoryEntry, HistoryId};
pub use session::{InFlightGuard, Session};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
