//! Common test utilities: response fixtures and session builders

#![allow(dead_code)]

use mpelembe_insights::{Analyzer, MockClient, Session};
use std::sync::Arc;

/// A complete, schema-conforming model response.
pub fn valid_response(title: &str) -> String {
    serde_json::json!({
        "title": title,
        "summary": "Community radio stations expanded coverage across the region.",
        "keyTakeaways": [
            "Coverage reached three new districts",
            "Programming is broadcast in local languages",
            "Funding comes from listener groups"
        ],
        "sentiment": "Positive",
        "sentimentScore": 78,
        "category": "News",
        "tags": ["radio", "community", "media"],
        "readingTime": "5 min",
        "entities": {
            "people": ["Mwila Banda"],
            "locations": ["Kasama", "Mansa"],
            "organizations": ["Mpelembe Network"]
        },
        "complexity": "Intermediate"
    })
    .to_string()
}

/// A mock client answering every call with a valid response titled `title`.
pub fn mock_answering(title: &str) -> Arc<MockClient> {
    Arc::new(MockClient::new().with_response(valid_response(title)))
}

/// A session backed by `client`.
pub fn session_with(client: &Arc<MockClient>) -> Session {
    Session::new(Analyzer::new(client.clone()))
}
