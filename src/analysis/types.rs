//! AnalysisResult: the structured description of one article

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// General emotional tone of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Sentiment {
    #[serde(alias = "positive")]
    Positive,
    #[serde(alias = "neutral")]
    Neutral,
    #[serde(alias = "negative")]
    Negative,
}

impl Sentiment {
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How demanding the article is to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Complexity {
    #[serde(alias = "simple")]
    Simple,
    #[serde(alias = "intermediate")]
    Intermediate,
    #[serde(alias = "advanced")]
    Advanced,
}

impl Complexity {
    pub fn label(&self) -> &'static str {
        match self {
            Complexity::Simple => "Simple",
            Complexity::Intermediate => "Intermediate",
            Complexity::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Named entities mentioned in the article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Entities {
    /// People mentioned in the article
    pub people: Vec<String>,
    /// Places mentioned in the article
    pub locations: Vec<String>,
    /// Organizations mentioned in the article
    pub organizations: Vec<String>,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.locations.is_empty() && self.organizations.is_empty()
    }
}

/// Structured analysis returned by the model.
///
/// Field names are camelCase on the wire. Every field is required: serde
/// rejects a document missing any of them, so a partially populated
/// result cannot be constructed from a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// The title of the article
    pub title: String,
    /// A concise 3-4 sentence summary
    pub summary: String,
    /// List of 3-5 major points from the article
    pub key_takeaways: Vec<String>,
    /// General emotional tone (Positive, Neutral, Negative)
    pub sentiment: Sentiment,
    /// Numerical score from 0 (negative) to 100 (positive)
    #[schemars(range(min = 0, max = 100))]
    pub sentiment_score: f64,
    /// Main category (e.g., News, Education, Tech, Politics)
    pub category: String,
    /// Relevant keywords
    pub tags: Vec<String>,
    /// Estimated reading time (e.g., 5 min)
    pub reading_time: String,
    /// People, locations and organizations mentioned in the article
    pub entities: Entities,
    /// Complexity level (Simple, Intermediate, Advanced)
    pub complexity: Complexity,
}

impl AnalysisResult {
    /// Share of the sentiment gauge that is not positive (100 - score).
    pub fn negative_share(&self) -> f64 {
        100.0 - self.sentiment_score
    }

    /// Checks the constraints serde cannot express.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        if !self.sentiment_score.is_finite() {
            return Err("sentimentScore is not a finite number".to_string());
        }
        if !(0.0..=100.0).contains(&self.sentiment_score) {
            return Err(format!(
                "sentimentScore {} is outside [0, 100]",
                self.sentiment_score
            ));
        }
        Ok(())
    }
}
