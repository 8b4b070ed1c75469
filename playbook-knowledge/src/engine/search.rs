use crate::models::SearchOutcome;
use crate::present::dedupe_by_content;
use crate::ranker::search_lookup;

use super::KnowledgeEngine;

pub(crate) async fn search(
    engine: &KnowledgeEngine,
    query: &str,
    main_filter: Option<&str>,
    top_k: Option<usize>,
) -> SearchOutcome {
    let top_k = top_k.unwrap_or(engine.settings().search.top_k);
    let lookup = engine.cache().get_index().await;
    search_lookup(&lookup, query, main_filter, top_k)
}

/// All terms are ranked against one snapshot, so a rebuild in between cannot
/// mix two versions of the document.
pub(crate) async fn search_filtered(
    engine: &KnowledgeEngine,
    topic: &str,
    filter_terms: &[&str],
) -> SearchOutcome {
    let top_k = engine.settings().search.top_k;
    let lookup = engine.cache().get_index().await;

    let mut merged = Vec::new();
    for &term in filter_terms {
        match search_lookup(&lookup, topic, Some(term), top_k) {
            SearchOutcome::Matches(ranked) => merged.extend(ranked),
            SearchOutcome::NoMatch => {}
            unavailable @ SearchOutcome::Unavailable { .. } => return unavailable,
        }
    }

    let merged = dedupe_by_content(merged);
    if merged.is_empty() {
        SearchOutcome::NoMatch
    } else {
        SearchOutcome::Matches(merged)
    }
}
