//! Session: the caller side of an analysis
//!
//! Owns the history and the currently displayed result, and allows at most
//! one analysis in flight. A failed analysis leaves both untouched.

use crate::analysis::AnalysisResult;
use crate::analyzer::{AnalyzeError, Analyzer, InputMode};
use crate::history::{HistoryCache, HistoryEntry, HistoryId, PASTED_TEXT_LABEL};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Shared busy flag marking an analysis in flight.
///
/// Clones share state. Acquiring returns a permit that releases the flag
/// when dropped, including when the owning future is dropped mid-request.
#[derive(Debug, Clone, Default)]
pub struct InFlightGuard {
    busy: Arc<AtomicBool>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an analysis is currently pending.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the flag, or `None` if already claimed.
    pub fn try_acquire(&self) -> Option<InFlightPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightPermit {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Proof of holding the in-flight flag.
#[derive(Debug)]
pub struct InFlightPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// What is currently displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct Displayed {
    pub label: String,
    pub result: Arc<AnalysisResult>,
}

/// An interactive analysis session.
pub struct Session {
    analyzer: Analyzer,
    history: HistoryCache,
    current: Option<Displayed>,
    guard: InFlightGuard,
}

impl Session {
    pub fn new(analyzer: Analyzer) -> Self {
        Self::with_history(analyzer, HistoryCache::new())
    }

    pub fn with_history(analyzer: Analyzer, history: HistoryCache) -> Self {
        Self {
            analyzer,
            history,
            current: None,
            guard: InFlightGuard::new(),
        }
    }

    /// Handle to the busy flag, for front-ends that disable input while busy.
    pub fn guard(&self) -> InFlightGuard {
        self.guard.clone()
    }

    /// Analyze `content`; on success record it and make it current.
    pub async fn submit(
        &mut self,
        content: &str,
        mode: InputMode,
    ) -> Result<Arc<AnalysisResult>, AnalyzeError> {
        if content.trim().is_empty() {
            return Err(AnalyzeError::Validation);
        }
        let _permit = self.guard.try_acquire().ok_or(AnalyzeError::Busy)?;

        let result = Arc::new(self.analyzer.analyze(content, mode).await?);

        let label = match mode {
            InputMode::Url => content.trim().to_string(),
            InputMode::Text => PASTED_TEXT_LABEL.to_string(),
        };
        let entry = HistoryEntry::new(label.clone(), Arc::clone(&result));
        debug!(id = %entry.id, label = %entry.label, "recorded analysis");
        self.history.record(entry);
        self.current = Some(Displayed {
            label,
            result: Arc::clone(&result),
        });

        Ok(result)
    }

    /// Redisplay a past analysis. Does not change the history.
    pub fn select(&mut self, id: &HistoryId) -> Option<Arc<AnalysisResult>> {
        let entry = self.history.get(id)?;
        let shown = Displayed {
            label: entry.label.clone(),
            result: Arc::clone(&entry.result),
        };
        let result = Arc::clone(&shown.result);
        self.current = Some(shown);
        Some(result)
    }

    /// Drop the displayed result. History is kept.
    pub fn clear_current(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Displayed> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{MockClient, RequestError};

    const VALID: &str = r#"{
        "title": "Harvest festival",
        "summary": "A harvest festival drew crowds.",
        "keyTakeaways": ["Crowds", "Music", "Local food"],
        "sentiment": "Positive",
        "sentimentScore": 90,
        "category": "Culture",
        "tags": ["festival"],
        "readingTime": "3 min",
        "entities": { "people": [], "locations": ["Chipata"], "organizations": [] },
        "complexity": "Simple"
    }"#;

    fn session(client: MockClient) -> (Session, Arc<MockClient>) {
        let client = Arc::new(client);
        (Session::new(Analyzer::new(client.clone())), client)
    }

    #[test]
    fn guard_is_exclusive_until_permit_dropped() {
        let guard = InFlightGuard::new();
        let permit = guard.try_acquire().unwrap();
        assert!(guard.is_busy());
        assert!(guard.clone().try_acquire().is_none());
        drop(permit);
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().is_some());
    }

    #[tokio::test]
    async fn success_records_and_displays() {
        let (mut session, _) = session(MockClient::new().with_response(VALID));
        let result = session
            .submit("https://mpelembe.net/festival", InputMode::Url)
            .await
            .unwrap();

        assert_eq!(result.title, "Harvest festival");
        assert_eq!(session.history().len(), 1);
        assert_eq!(
            session.history().nth(0).unwrap().label,
            "https://mpelembe.net/festival"
        );
        let current = session.current().unwrap();
        assert!(Arc::ptr_eq(&current.result, &result));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn pasted_text_is_labelled() {
        let (mut session, _) = session(MockClient::new().with_response(VALID));
        session.submit("Some article body", InputMode::Text).await.unwrap();
        assert_eq!(session.history().nth(0).unwrap().label, PASTED_TEXT_LABEL);
    }

    #[tokio::test]
    async fn failure_leaves_state_untouched() {
        let (mut session, _) = session(
            MockClient::new()
                .with_response(VALID)
                .with_failure(RequestError::Authentication("bad key".into())),
        );
        session.submit("first", InputMode::Text).await.unwrap();
        let before_history = session.history().list();
        let before_current = session.current().cloned();

        let err = session.submit("second", InputMode::Text).await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Request(_)));
        assert_eq!(session.history().list(), before_history);
        assert_eq!(session.current().cloned(), before_current);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn busy_session_rejects_without_request() {
        let (mut session, client) = session(MockClient::new().with_response(VALID));
        let _held = session.guard().try_acquire().unwrap();

        let err = session.submit("text", InputMode::Text).await.unwrap_err();
        assert_eq!(err, AnalyzeError::Busy);
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn select_redisplays_without_mutating_history() {
        let (mut session, _) = session(MockClient::new().with_response(VALID));
        session.submit("https://a", InputMode::Url).await.unwrap();
        session.submit("https://b", InputMode::Url).await.unwrap();
        session.clear_current();
        assert!(session.current().is_none());

        let before = session.history().list();
        let oldest = before[1].id.clone();
        let shown = session.select(&oldest).unwrap();

        assert!(Arc::ptr_eq(&shown, &before[1].result));
        assert_eq!(session.current().unwrap().label, "https://a");
        assert_eq!(session.history().list(), before);
        assert!(session.select(&HistoryId::from("nope")).is_none());
    }
}
