//! Keyphrase ranking using the RAKE (Rapid Automatic Keyword Extraction) algorithm.

use anyhow::Result;
use rake::{Rake, StopWords};
use tracing::instrument;

use super::normalizer::dedupe_phrases;
use crate::language::Language;

/// Ranks the keyphrases that describe a group of sentences.
pub trait KeyphraseRanker: Send + Sync {
    /// Returns distinct phrases in descending relevance.
    ///
    /// # Errors
    /// Implementations backed by external models may fail.
    fn rank(&self, sentences: &[String]) -> Result<Vec<String>>;
}

/// Punctuation outside ASCII that should still split phrases.
const EXTRA_DELIMITERS: &[char] = &['«', '»', '—', '–', '…', '“', '”', '„', '№'];

/// RAKE ranker with the stop word list of one language.
pub struct RakeRanker {
    /// Cached RAKE instance with pre-built stop words.
    rake: Rake,
    language: Language,
}

impl std::fmt::Debug for RakeRanker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RakeRanker")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl RakeRanker {
    /// Creates a ranker with the stop words for `language`.
    #[must_use]
    #[instrument]
    pub fn new(language: Language) -> Self {
        let mut stop_words = StopWords::new();
        for word in language.stop_words() {
            stop_words.insert(word);
        }
        Self {
            rake: Rake::new(stop_words),
            language,
        }
    }

    /// Ranks the phrases of a single text.
    ///
    /// Ties in score are ordered by phrase text.
    #[must_use]
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub fn extract(&self, text: &str) -> Vec<String> {
        let prepared = prepare(text);
        if !prepared.chars().any(char::is_alphanumeric) {
            return Vec::new();
        }

        let mut scored = self.rake.run(&prepared);
        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.keyword.cmp(&b.keyword))
        });
        dedupe_phrases(scored.into_iter().map(|k| k.keyword).collect())
    }
}

impl KeyphraseRanker for RakeRanker {
    fn rank(&self, sentences: &[String]) -> Result<Vec<String>> {
        Ok(self.extract(&sentences.join(". ")))
    }
}

/// Lowercases and turns punctuation (except inner hyphens) into sentence breaks.
fn prepare(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if (c.is_ascii_punctuation() && c != '-') || EXTRA_DELIMITERS.contains(&c) {
                '.'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sentences(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_rank_finds_shared_topic() {
        let ranker = RakeRanker::new(Language::Russian);
        let phrases = ranker
            .rank(&sentences(&[
                "Когда придет стипендия?",
                "Почему не пришла стипендия",
                "Размер стипендии в этом семестре",
            ]))
            .unwrap();
        assert!(!phrases.is_empty());
        assert!(
            phrases.iter().any(|p| p.contains("стипенд")),
            "got {phrases:?}"
        );
    }

    #[test]
    fn test_rank_empty_input_returns_empty() {
        let ranker = RakeRanker::new(Language::Russian);
        assert!(ranker.rank(&[]).unwrap().is_empty());
        assert!(ranker.extract("   ").is_empty());
        assert!(ranker.extract("?!...").is_empty());
    }

    #[test]
    fn test_phrases_are_lowercase_and_distinct() {
        let ranker = RakeRanker::new(Language::English);
        let phrases = ranker.extract("Library Hours. library hours! LIBRARY HOURS?");
        let unique: std::collections::HashSet<&String> = phrases.iter().collect();
        assert_eq!(unique.len(), phrases.len());
        assert!(phrases.iter().all(|p| p.to_lowercase() == *p));
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let ranker = RakeRanker::new(Language::English);
        let text = "Machine learning approaches. Natural language processing. Climate change";
        let first = ranker.extract(text);
        for _ in 0..5 {
            assert_eq!(ranker.extract(text), first);
        }
    }

    #[test]
    fn test_prepare_maps_punctuation_but_keeps_hyphens() {
        assert_eq!(prepare("Где «корпус» №5?"), "где .корпус. .5.");
        assert_eq!(prepare("E-learning, да"), "e-learning. да");
    }
}
