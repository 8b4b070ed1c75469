//! Weighted fuzzy ranking of sections against a free-text query.

use crate::fuzz::{partial_ratio, wratio};
use crate::models::{IndexLookup, RankedSection, SearchOutcome, Section};

/// Scores at or below this are not relevant.
pub const RELEVANCE_FLOOR: f64 = 40.0;
pub const TITLE_WEIGHT: f64 = 0.7;
pub const CONTENT_WEIGHT: f64 = 0.3;

pub fn combine(title_score: f64, content_score: f64) -> f64 {
    TITLE_WEIGHT * title_score + CONTENT_WEIGHT * content_score
}

pub fn is_relevant(score: f64) -> bool {
    score > RELEVANCE_FLOOR
}

/// Score one section. `query_lower` must be the lowercased query.
///
/// The title comparison keeps case; the content comparison is done on
/// lowercased text.
fn score_section(query: &str, query_lower: &str, section: &Section) -> RankedSection {
    let title_score = wratio(query, &section.sub_topic);
    let content_score = partial_ratio(query_lower, &section.content.to_lowercase());
    RankedSection {
        section: section.clone(),
        title_score,
        content_score,
        score: combine(title_score, content_score),
    }
}

/// Rank sections by descending score, keeping at most `top_k` relevant ones.
///
/// With `main_filter`, only sections whose main topic contains it
/// (case-insensitively) are scored. Ties keep document order.
pub fn rank(
    sections: &[Section],
    query: &str,
    main_filter: Option<&str>,
    top_k: usize,
) -> Vec<RankedSection> {
    let query_lower = query.to_lowercase();
    let filter = main_filter.map(str::to_lowercase);

    let mut ranked: Vec<RankedSection> = sections
        .iter()
        .filter(|section| match &filter {
            Some(filter) => section.main_topic.to_lowercase().contains(filter.as_str()),
            None => true,
        })
        .map(|section| score_section(query, &query_lower, section))
        .filter(|ranked| is_relevant(ranked.score))
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(top_k);
    ranked
}

/// Rank against a cache lookup, keeping "no document" apart from "no match".
pub fn search_lookup(
    lookup: &IndexLookup,
    query: &str,
    main_filter: Option<&str>,
    top_k: usize,
) -> SearchOutcome {
    match lookup {
        IndexLookup::Unavailable { reason } => SearchOutcome::Unavailable {
            reason: reason.clone(),
        },
        IndexLookup::Ready(index) => {
            let ranked = rank(index.sections(), query, main_filter, top_k);
            if ranked.is_empty() {
                SearchOutcome::NoMatch
            } else {
                SearchOutcome::Matches(ranked)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::SystemTime;

    use super::*;
    use crate::models::KnowledgeIndex;

    fn section(main: &str, sub: &str, content: &str) -> Section {
        Section {
            main_topic: main.to_string(),
            sub_topic: sub.to_string(),
            content: content.to_string(),
            search_key: format!("{main} {sub}").to_lowercase(),
        }
    }

    fn playbook() -> Vec<Section> {
        vec![
            section("Pricing", "Pricing", "$150k / yr"),
            section("GA4 Limits", "Data retention", "Event data is kept for 14 months."),
            section("Cookie Restrictions", "Consent", "Cookie retention depends on consent."),
        ]
    }

    #[test]
    fn floor_is_exclusive() {
        assert!(!is_relevant(40.0));
        assert!(is_relevant(40.01));
        assert!(!is_relevant(0.0));
    }

    #[test]
    fn higher_content_score_wins_on_equal_titles() {
        assert!(combine(80.0, 50.0) > combine(80.0, 40.0));
        assert!((combine(100.0, 100.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn ranks_relevant_sections_first_and_drops_the_rest() {
        let ranked = rank(&playbook(), "retention", None, 5);
        assert!(!ranked.is_empty());
        assert_eq!(ranked[0].section.sub_topic, "Data retention");
        assert!((ranked[0].title_score - 90.0).abs() < 1e-9);
        assert!(ranked.iter().all(|r| r.section.main_topic != "Pricing"));
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn filter_matches_main_topic_case_insensitively() {
        let ranked = rank(&playbook(), "retention", Some("LIMITS"), 5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].section.main_topic, "GA4 Limits");

        assert!(rank(&playbook(), "retention", Some("nowhere"), 5).is_empty());
    }

    #[test]
    fn top_k_truncates_and_ties_keep_document_order() {
        let sections = vec![
            section("A", "Retention", "same"),
            section("B", "Retention", "same"),
            section("C", "Retention", "same"),
        ];
        let ranked = rank(&sections, "Retention", None, 2);
        let mains: Vec<_> = ranked.iter().map(|r| r.section.main_topic.as_str()).collect();
        assert_eq!(mains, vec!["A", "B"]);
    }

    #[test]
    fn lookup_outcomes_distinguish_no_match_from_unavailable() {
        let ready = IndexLookup::Ready(Arc::new(KnowledgeIndex::new(
            playbook(),
            SystemTime::UNIX_EPOCH,
        )));
        assert!(matches!(
            search_lookup(&ready, "retention", None, 2),
            SearchOutcome::Matches(ref r) if r.len() <= 2
        ));
        assert_eq!(search_lookup(&ready, "zzzz", None, 2), SearchOutcome::NoMatch);

        let missing = IndexLookup::Unavailable {
            reason: "document not found".to_string(),
        };
        assert!(search_lookup(&missing, "retention", None, 2).is_unavailable());
    }
}
