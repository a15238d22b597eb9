//! Plain-text rendering of analyses and history

use crate::analysis::AnalysisResult;
use crate::history::HistoryEntry;
use std::fmt::Write;

const NONE_DETECTED: &str = "None detected";

fn entity_line(out: &mut String, heading: &str, names: &[String]) {
    let names = if names.is_empty() {
        NONE_DETECTED.to_string()
    } else {
        names.join(", ")
    };
    let _ = writeln!(out, "  {:<14} {}", heading, names);
}

/// Render a full report of one analysis.
pub fn render_result(result: &AnalysisResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", result.title);
    let _ = writeln!(out, "{}", "=".repeat(result.title.chars().count().max(1)));
    let _ = writeln!(
        out,
        "[{}]  {}  |  {}",
        result.category, result.reading_time, result.complexity
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", result.summary);

    if !result.tags.is_empty() {
        let tags: Vec<String> = result.tags.iter().map(|t| format!("#{}", t)).collect();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", tags.join(" "));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Sentiment");
    let _ = writeln!(
        out,
        "  {} ({:.0}/100; positive {:.0}%, negative {:.0}%)",
        result.sentiment,
        result.sentiment_score,
        result.sentiment_score,
        result.negative_share()
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Key takeaways");
    for (idx, point) in result.key_takeaways.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", idx + 1, point);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Mentioned entities");
    entity_line(&mut out, "People", &result.entities.people);
    entity_line(&mut out, "Locations", &result.entities.locations);
    entity_line(&mut out, "Organizations", &result.entities.organizations);

    out
}

/// Render the history list, numbered from 1 (most recent).
pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No recent analyses.\n".to_string();
    }
    let mut out = String::new();
    for (idx, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {}  {}  ({})",
            idx + 1,
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.result.title,
            entry.label
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Complexity, Entities, Sentiment};
    use std::sync::Arc;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            title: "Budget passed".to_string(),
            summary: "Parliament passed the budget.".to_string(),
            key_takeaways: vec!["Spending up".to_string(), "Taxes flat".to_string()],
            sentiment: Sentiment::Neutral,
            sentiment_score: 55.0,
            category: "Politics".to_string(),
            tags: vec!["budget".to_string(), "parliament".to_string()],
            reading_time: "6 min".to_string(),
            entities: Entities {
                people: vec![],
                locations: vec!["Lusaka".to_string()],
                organizations: vec!["National Assembly".to_string()],
            },
            complexity: Complexity::Advanced,
        }
    }

    #[test]
    fn report_contains_every_section() {
        let text = render_result(&sample());
        assert!(text.starts_with("Budget passed\n============="));
        assert!(text.contains("[Politics]  6 min  |  Advanced"));
        assert!(text.contains("#budget #parliament"));
        assert!(text.contains("Neutral (55/100; positive 55%, negative 45%)"));
        assert!(text.contains("  1. Spending up"));
        assert!(text.contains("  2. Taxes flat"));
        assert!(text.contains("Lusaka"));
    }

    #[test]
    fn empty_entity_list_shows_placeholder() {
        let text = render_result(&sample());
        let people = text.lines().find(|l| l.trim_start().starts_with("People")).unwrap();
        assert!(people.ends_with(NONE_DETECTED));
    }

    #[test]
    fn history_lists_most_recent_first() {
        let older = HistoryEntry::new("https://a", Arc::new(sample()));
        let mut newer_result = sample();
        newer_result.title = "Second".to_string();
        let newer = HistoryEntry::new("Pasted Text", Arc::new(newer_result));

        let text = render_history(&[newer, older]);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with(" 1."));
        assert!(lines[0].contains("Second  (Pasted Text)"));
        assert!(lines[1].contains("Budget passed  (https://a)"));
    }

    #[test]
    fn empty_history_message() {
        assert_eq!(render_history(&[]), "No recent analyses.\n");
    }
}
