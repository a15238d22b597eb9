//! Response schema declaration and response parsing
//!
//! The schema sent to the model is derived from [`AnalysisResult`], so the
//! declared shape and the type the response is parsed into stay in step.

use super::types::AnalysisResult;
use serde_json::Value;

/// JSON Schema for the expected model output.
///
/// Object-typed, with all ten fields listed under `required`. The
/// `$schema` meta key is removed because the Gemini endpoint does not
/// accept it.
pub fn response_schema() -> Value {
    let schema = schemars::schema_for!(AnalysisResult);
    let mut value = schema.to_value();
    if let Some(obj) = value.as_object_mut() {
        obj.remove("$schema");
    }
    value
}

/// Why a response could not become an [`AnalysisResult`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    pub message: String,
}

impl ParseFailure {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Locate the JSON object in the model's response text.
///
/// With a JSON response MIME type the text is normally the bare object.
/// When the search tool is active the model occasionally wraps it in a
/// markdown fence, so a ```json or ``` block is accepted as well.
fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();

    if let Ok(v) = serde_json::from_str::<Value>(trimmed) {
        return Some(v);
    }

    let fenced = if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        after.find("```").map(|end| &after[..end])
    } else if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        after.find("```").map(|end| &after[..end])
    } else {
        None
    };

    fenced.and_then(|block| serde_json::from_str::<Value>(block.trim()).ok())
}

/// Parse and validate a model response.
///
/// Fails on malformed JSON, a non-object document, a missing or mistyped
/// field, an out-of-set enum value, or a score outside [0, 100].
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, ParseFailure> {
    if text.trim().is_empty() {
        return Err(ParseFailure::new("response text is empty"));
    }

    let value = extract_json(text)
        .ok_or_else(|| ParseFailure::new("response is not valid JSON"))?;

    if !value.is_object() {
        return Err(ParseFailure::new("response JSON is not an object"));
    }

    let result: AnalysisResult = serde_json::from_value(value)
        .map_err(|e| ParseFailure::new(format!("response does not match schema: {}", e)))?;

    result.check_invariants().map_err(ParseFailure::new)?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::Sentiment;

    const VALID: &str = r#"{
        "title": "Copper output rises",
        "summary": "Copper production increased this quarter.",
        "keyTakeaways": ["Output up 8%", "Exports steady", "New mine opened"],
        "sentiment": "Positive",
        "sentimentScore": 81.5,
        "category": "Business",
        "tags": ["copper", "mining"],
        "readingTime": "4 min",
        "entities": {
            "people": ["Jane Phiri"],
            "locations": ["Copperbelt"],
            "organizations": ["ZCCM"]
        },
        "complexity": "Intermediate"
    }"#;

    #[test]
    fn schema_is_object_with_all_fields_required() {
        let schema = response_schema();
        assert_eq!(schema["type"], "object");
        assert!(schema.get("$schema").is_none());

        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        for field in [
            "title",
            "summary",
            "keyTakeaways",
            "sentiment",
            "sentimentScore",
            "category",
            "tags",
            "readingTime",
            "entities",
            "complexity",
        ] {
            assert!(required.contains(&field), "{} should be required", field);
        }
        assert_eq!(required.len(), 10);
    }

    #[test]
    fn schema_carries_field_descriptions() {
        let schema = response_schema();
        let summary = &schema["properties"]["summary"];
        assert_eq!(summary["type"], "string");
        assert!(summary["description"]
            .as_str()
            .unwrap()
            .contains("summary"));
    }

    #[test]
    fn parses_bare_object() {
        let result = parse_analysis(VALID).unwrap();
        assert_eq!(result.title, "Copper output rises");
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.entities.organizations, vec!["ZCCM".to_string()]);
    }

    #[test]
    fn parses_fenced_object() {
        let text = format!("Here is the analysis:\n```json\n{}\n```", VALID);
        let result = parse_analysis(&text).unwrap();
        assert_eq!(result.category, "Business");
    }

    #[test]
    fn incomplete_object_fails() {
        let err = parse_analysis(r#"{"title": "X"}"#).unwrap_err();
        assert!(err.message.contains("does not match schema"));
    }

    #[test]
    fn malformed_json_fails() {
        let err = parse_analysis("{\"title\": ").unwrap_err();
        assert_eq!(err.message, "response is not valid JSON");
    }

    #[test]
    fn array_document_fails() {
        let err = parse_analysis("[1, 2, 3]").unwrap_err();
        assert_eq!(err.message, "response JSON is not an object");
    }

    #[test]
    fn empty_text_fails() {
        assert!(parse_analysis("   ").is_err());
    }

    #[test]
    fn wrong_type_fails() {
        let text = VALID.replace("81.5", "\"high\"");
        assert!(parse_analysis(&text).is_err());
    }

    #[test]
    fn out_of_range_score_fails() {
        let text = VALID.replace("81.5", "140");
        let err = parse_analysis(&text).unwrap_err();
        assert!(err.message.contains("outside [0, 100]"));
    }
}
