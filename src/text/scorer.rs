//! Token plausibility scoring: "is this a real word?"

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

/// Scores how likely a token is to be a genuine word of the target language.
///
/// Implementations are built once and shared read-only across pipeline runs.
pub trait PlausibilityScorer: Send + Sync {
    /// Returns a confidence in `[0, 1]`.
    ///
    /// # Errors
    /// Implementations backed by external models may fail; the pipeline
    /// reports such failures as an external model error.
    fn score(&self, token: &str) -> Result<f64>;
}

const VOWELS: &str = "аеёиоуыэюяaeiouy";
const MAX_CONSONANT_RUN: usize = 4;
const MAX_VOWEL_RUN: usize = 3;
const MAX_REPEATED_CHAR: usize = 2;
const MIN_VOWEL_RATIO: f64 = 0.2;

/// Orthographic scorer that needs no dictionary.
///
/// Penalizes the shapes keyboard mashing tends to produce: mixed Latin and
/// Cyrillic letters, words without vowels, long consonant or vowel runs and
/// repeated characters. Numbers are treated as real tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    /// Scores a token without failing.
    #[must_use]
    pub fn plausibility(token: &str) -> f64 {
        let lower = token.to_lowercase();
        let chars: Vec<char> = lower.chars().collect();
        if chars.is_empty() {
            return 0.0;
        }
        if chars.iter().all(|c| c.is_numeric()) {
            return 1.0;
        }
        if !chars.iter().all(|c| c.is_alphabetic() || *c == '-') {
            return 0.3;
        }

        let has_cyrillic = chars.iter().any(|c| is_cyrillic(*c));
        let has_latin = chars.iter().any(char::is_ascii_alphabetic);
        if has_cyrillic && has_latin {
            return 0.1;
        }

        let letters: Vec<char> = chars.into_iter().filter(|c| c.is_alphabetic()).collect();
        let vowel_count = letters.iter().filter(|c| is_vowel(**c)).count();
        if letters.len() >= 2 && vowel_count == 0 {
            return 0.2;
        }

        let mut score = 1.0;
        if longest_run(&letters, |c| !is_vowel(c)) > MAX_CONSONANT_RUN {
            score *= 0.4;
        }
        if longest_run(&letters, is_vowel) > MAX_VOWEL_RUN {
            score *= 0.5;
        }
        if longest_repeat(&letters) > MAX_REPEATED_CHAR {
            score *= 0.3;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = vowel_count as f64 / letters.len() as f64;
        if letters.len() >= 5 && ratio < MIN_VOWEL_RATIO {
            score *= 0.5;
        }
        score
    }
}

impl PlausibilityScorer for HeuristicScorer {
    fn score(&self, token: &str) -> Result<f64> {
        Ok(Self::plausibility(token))
    }
}

fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

fn is_cyrillic(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
}

fn longest_run(letters: &[char], predicate: impl Fn(char) -> bool) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for &c in letters {
        if predicate(c) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn longest_repeat(letters: &[char]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;
    for &c in letters {
        if previous == Some(c) {
            current += 1;
        } else {
            current = 1;
            previous = Some(c);
        }
        longest = longest.max(current);
    }
    longest
}

/// Dictionary-backed scorer: known words score 1.0, everything else scores
/// `unknown_score`.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashSet<String>,
    unknown_score: f64,
}

impl LexiconScorer {
    /// Builds a scorer from an in-memory word list (case-insensitive).
    #[must_use]
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            unknown_score: 0.0,
        }
    }

    /// Loads a word list with one word per line. Blank lines and lines
    /// starting with `#` are skipped.
    ///
    /// # Errors
    /// Returns error if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read lexicon file '{}'", path.display()))?;
        Ok(Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        ))
    }

    /// Sets the score given to words missing from the lexicon.
    #[must_use]
    pub fn with_unknown_score(mut self, score: f64) -> Self {
        self.unknown_score = score.clamp(0.0, 1.0);
        self
    }

    /// Number of known words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the lexicon has no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl PlausibilityScorer for LexiconScorer {
    fn score(&self, token: &str) -> Result<f64> {
        if self.words.contains(&token.to_lowercase()) {
            Ok(1.0)
        } else {
            Ok(self.unknown_score)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_heuristic_accepts_ordinary_words() {
        for word in ["стипендия", "сессию", "здравствуйте", "Когда", "library", "в"] {
            let score = HeuristicScorer::plausibility(word);
            assert!(score >= 0.6, "{word} scored {score}");
        }
    }

    #[test]
    fn test_heuristic_accepts_numbers() {
        assert!((HeuristicScorer::plausibility("2024") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_heuristic_rejects_mashing_shapes() {
        for token in ["ршщзхъ", "ппппп", "dfghjkl", "фыdf", "аааааа", "кц3ф"] {
            let score = HeuristicScorer::plausibility(token);
            assert!(score < 0.6, "{token} scored {score}");
        }
    }

    #[test]
    fn test_heuristic_empty_token_scores_zero() {
        assert!(HeuristicScorer::plausibility("").abs() < f64::EPSILON);
    }

    #[test]
    fn test_lexicon_known_and_unknown() {
        let scorer = LexiconScorer::new(["Стипендия", "сессия"]);
        assert!((scorer.score("стипендия").unwrap() - 1.0).abs() < f64::EPSILON);
        assert!((scorer.score("СЕССИЯ").unwrap() - 1.0).abs() < f64::EPSILON);
        assert!(scorer.score("ывапр").unwrap().abs() < f64::EPSILON);
        assert_eq!(scorer.len(), 2);
    }

    #[test]
    fn test_lexicon_unknown_score_is_clamped() {
        let scorer = LexiconScorer::new(["a"]).with_unknown_score(3.0);
        assert!((scorer.score("zzz").unwrap() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lexicon_from_file_skips_comments_and_blanks() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# lexicon").unwrap();
        writeln!(file, "стипендия").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  сессия  ").unwrap();

        let scorer = LexiconScorer::from_file(file.path()).unwrap();
        assert_eq!(scorer.len(), 2);
        assert!(!scorer.is_empty());
    }

    #[test]
    fn test_lexicon_from_missing_file_errors() {
        assert!(LexiconScorer::from_file(Path::new("/nonexistent/lexicon.txt")).is_err());
    }
}
