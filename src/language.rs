//! Target language for the built-in lemmatizer and keyphrase ranker.

use std::collections::HashSet;
use std::fmt;

use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};
use stop_words::{LANGUAGE, get};

/// Languages the bundled NLP components ship stop word lists and stemmers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Russian,
    English,
}

impl Language {
    /// Returns the lowercase stop word set for this language.
    #[must_use]
    pub fn stop_words(self) -> HashSet<String> {
        let list = match self {
            Self::Russian => get(LANGUAGE::Russian),
            Self::English => get(LANGUAGE::English),
        };
        list.into_iter().map(|word| word.to_lowercase()).collect()
    }

    /// Returns the Snowball algorithm for this language.
    #[must_use]
    pub fn stemmer_algorithm(self) -> Algorithm {
        match self {
            Self::Russian => Algorithm::Russian,
            Self::English => Algorithm::English,
        }
    }

    /// Returns the stable config label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Russian => "russian",
            Self::English => "english",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_words_are_lowercase_and_non_empty() {
        for language in [Language::Russian, Language::English] {
            let words = language.stop_words();
            assert!(!words.is_empty(), "{language} stop words should load");
            assert!(words.iter().all(|w| w.to_lowercase() == *w));
        }
    }

    #[test]
    fn test_common_stop_words_present() {
        assert!(Language::English.stop_words().contains("the"));
        assert!(Language::Russian.stop_words().contains("и"));
    }

    #[test]
    fn test_language_labels() {
        assert_eq!(Language::Russian.as_str(), "russian");
        assert_eq!(Language::English.to_string(), "english");
        assert_eq!(Language::default(), Language::Russian);
    }
}
