//! Reduction of question text to base word forms.

use std::collections::HashSet;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use rust_stemmers::Stemmer;
use tracing::instrument;

use crate::language::Language;

/// Turns a text into an ordered list of base forms (lemmas).
///
/// Stop words are dropped; repeated words are kept.
pub trait Lemmatizer: Send + Sync {
    /// Lemmatizes `text`.
    ///
    /// # Errors
    /// Implementations backed by external models may fail.
    fn lemmatize(&self, text: &str) -> Result<Vec<String>>;
}

/// Word tokens: letter/digit runs, optionally joined by inner hyphens.
#[allow(clippy::expect_used)]
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:-[\p{L}\p{N}]+)*").expect("word regex is valid")
});

/// Snowball-stemmer lemmatizer.
///
/// Stems are an approximation of dictionary lemmas: inflected forms of the
/// same word collapse to one token, which is what the vectorizer needs.
pub struct SnowballLemmatizer {
    language: Language,
    stemmer: Stemmer,
    stop_words: HashSet<String>,
}

impl std::fmt::Debug for SnowballLemmatizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowballLemmatizer")
            .field("language", &self.language)
            .field("stop_words", &self.stop_words.len())
            .finish_non_exhaustive()
    }
}

impl SnowballLemmatizer {
    /// Creates a lemmatizer with the stop word list for `language`.
    #[must_use]
    #[instrument]
    pub fn new(language: Language) -> Self {
        Self {
            language,
            stemmer: Stemmer::create(language.stemmer_algorithm()),
            stop_words: language.stop_words(),
        }
    }

    /// Returns the configured language.
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }
}

impl Lemmatizer for SnowballLemmatizer {
    fn lemmatize(&self, text: &str) -> Result<Vec<String>> {
        let lower = text.to_lowercase();
        Ok(WORD_PATTERN
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|word| !self.stop_words.contains(*word))
            .map(|word| self.stemmer.stem(word).into_owned())
            .filter(|lemma| !lemma.is_empty())
            .collect())
    }
}
