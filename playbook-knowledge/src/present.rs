use std::collections::HashSet;

use serde::Serialize;

use crate::SearchDefaults;
use crate::models::{RankedSection, SearchOutcome};

/// Appended to section content cut at the character budget.
pub const TRUNCATION_MARKER: &str = "\n...[truncated]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentedSection {
    pub main_topic: String,
    pub sub_topic: String,
    pub content: String,
}

/// Caller-facing view of a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<PresentedSection>,
    /// Set when nothing is shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Presentation {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Drop sections whose content already appeared, keeping the first.
pub fn dedupe_by_content(sections: Vec<RankedSection>) -> Vec<RankedSection> {
    let mut seen = HashSet::new();
    sections
        .into_iter()
        .filter(|ranked| seen.insert(ranked.section.content.clone()))
        .collect()
}

/// Cut `content` to `max_chars` characters, marking the cut.
pub fn truncate_content(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &content[..cut], TRUNCATION_MARKER),
        None => content.to_string(),
    }
}

pub fn present(
    outcome: &SearchOutcome,
    label: &str,
    default_message: &str,
    limits: &SearchDefaults,
) -> Presentation {
    let (ranked, message) = match outcome {
        SearchOutcome::Matches(ranked) => (ranked.clone(), None),
        SearchOutcome::NoMatch => (Vec::new(), Some(default_message.to_string())),
        SearchOutcome::Unavailable { reason } => {
            (Vec::new(), Some(format!("No knowledge available: {reason}")))
        }
    };

    let sections: Vec<PresentedSection> = dedupe_by_content(ranked)
        .into_iter()
        .take(limits.max_display)
        .map(|ranked| PresentedSection {
            content: truncate_content(&ranked.section.content, limits.max_content_chars),
            main_topic: ranked.section.main_topic,
            sub_topic: ranked.section.sub_topic,
        })
        .collect();

    let message = match message {
        None if sections.is_empty() => Some(default_message.to_string()),
        other => other,
    };

    Presentation {
        label: label.to_string(),
        sections,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;

    fn ranked(main: &str, content: &str, score: f64) -> RankedSection {
        RankedSection {
            section: Section {
                main_topic: main.to_string(),
                sub_topic: main.to_string(),
                content: content.to_string(),
                search_key: main.to_lowercase(),
            },
            title_score: score,
            content_score: score,
            score,
        }
    }

    #[test]
    fn dedupes_caps_and_keeps_order() {
        let outcome = SearchOutcome::Matches(vec![
            ranked("A", "one", 90.0),
            ranked("B", "one", 80.0),
            ranked("C", "two", 70.0),
            ranked("D", "three", 60.0),
        ]);
        let limits = SearchDefaults {
            max_display: 2,
            ..SearchDefaults::default()
        };
        let shown = present(&outcome, "q", "none", &limits);
        let mains: Vec<_> = shown.sections.iter().map(|s| s.main_topic.as_str()).collect();
        assert_eq!(mains, vec!["A", "C"]);
        assert_eq!(shown.message, None);
    }

    #[test]
    fn truncates_on_character_boundaries() {
        assert_eq!(truncate_content("héllo", 2), format!("hé{TRUNCATION_MARKER}"));
        assert_eq!(truncate_content("short", 5), "short");

        let long = "x".repeat(2001);
        let outcome = SearchOutcome::Matches(vec![ranked("A", &long, 90.0)]);
        let shown = present(&outcome, "q", "none", &SearchDefaults::default());
        let content = &shown.sections[0].content;
        assert!(content.ends_with(TRUNCATION_MARKER));
        assert_eq!(content.chars().count(), 2000 + TRUNCATION_MARKER.chars().count());
    }

    #[test]
    fn empty_outcomes_carry_messages() {
        let limits = SearchDefaults::default();
        let none = present(&SearchOutcome::NoMatch, "q", "No matching solution found.", &limits);
        assert!(none.is_empty());
        assert_eq!(none.message.as_deref(), Some("No matching solution found."));

        let missing = SearchOutcome::Unavailable {
            reason: "document not found at playbook.docx".to_string(),
        };
        let shown = present(&missing, "q", "unused", &limits);
        insta::assert_snapshot!(
            shown.message.unwrap_or_default(),
            @"No knowledge available: document not found at playbook.docx"
        );
    }

    #[test]
    fn serializes_without_empty_fields() {
        let shown = present(&SearchOutcome::NoMatch, "retention", "nothing", &SearchDefaults::default());
        let json = serde_json::to_value(&shown).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"label": "retention", "message": "nothing"})
        );
    }
}
