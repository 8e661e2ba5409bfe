//! Keyphrase cleanup for ranked output.

use std::collections::HashSet;
use tracing::instrument;

/// Lowercases, trims and deduplicates phrases, keeping the first occurrence.
///
/// Unlike a sorted topic list, rank order is preserved.
#[must_use]
#[instrument(skip(phrases), fields(count = phrases.len()))]
pub fn dedupe_phrases(phrases: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut deduped = Vec::with_capacity(phrases.len());

    for phrase in phrases {
        let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        if normalized.is_empty() {
            continue;
        }
        if seen.insert(normalized.clone()) {
            deduped.push(normalized);
        }
    }

    deduped
}
