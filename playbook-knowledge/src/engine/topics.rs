//! Structural overview of the indexed document.

use std::collections::HashMap;

use crate::models::{IndexLookup, Overview, Section, TopicOverview};

use super::KnowledgeEngine;

pub(crate) async fn overview(engine: &KnowledgeEngine) -> Overview {
    match engine.cache().get_index().await {
        IndexLookup::Ready(index) => Overview {
            topics: group_topics(index.sections()),
            available: true,
        },
        IndexLookup::Unavailable { .. } => Overview {
            topics: Vec::new(),
            available: false,
        },
    }
}

/// Group sub-topics under their main topic, both in first-seen order.
pub(crate) fn group_topics(sections: &[Section]) -> Vec<TopicOverview> {
    let mut topics: Vec<TopicOverview> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for section in sections {
        let position = *positions
            .entry(section.main_topic.as_str())
            .or_insert_with(|| {
                topics.push(TopicOverview {
                    main_topic: section.main_topic.clone(),
                    sub_topics: Vec::new(),
                });
                topics.len() - 1
            });
        let subs = &mut topics[position].sub_topics;
        if !subs.contains(&section.sub_topic) {
            subs.push(section.sub_topic.clone());
        }
    }

    topics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(main: &str, sub: &str) -> Section {
        Section {
            main_topic: main.to_string(),
            sub_topic: sub.to_string(),
            content: "x".to_string(),
            search_key: String::new(),
        }
    }

    #[test]
    fn groups_in_first_seen_order_without_duplicates() {
        let topics = group_topics(&[
            section("GA4 Limits", "GA4 Limits"),
            section("GA4 Limits", "Retention"),
            section("Cookie Restrictions", "Consent"),
            section("GA4 Limits", "Retention"),
            section("GA4 Limits", "Quotas"),
        ]);
        assert_eq!(
            topics,
            vec![
                TopicOverview {
                    main_topic: "GA4 Limits".to_string(),
                    sub_topics: vec![
                        "GA4 Limits".to_string(),
                        "Retention".to_string(),
                        "Quotas".to_string(),
                    ],
                },
                TopicOverview {
                    main_topic: "Cookie Restrictions".to_string(),
                    sub_topics: vec!["Consent".to_string()],
                },
            ]
        );
    }
}
