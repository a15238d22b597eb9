//! Analysis data model and the response contract

mod schema;
mod types;

pub use schema::{parse_analysis, response_schema, ParseFailure};
pub use types::{AnalysisResult, Complexity, Entities, Sentiment};
