//! Question records fed into the clustering pipeline.
//!
//! This module defines the typed input unit ([`QuestionRecord`]), the label
//! that explains why a question ended up in the review backlog
//! ([`QuestionLabel`]), and the loaders and selection filters that turn an
//! exported question file into a batch for [`crate::cluster_questions`].
//!
//! # Example
//!
//! ```
//! use question_clusters::question::{QuestionLabel, parse_delimited};
//!
//! let records = parse_delimited("Когда придет стипендия --- 2024-03-01 --- 0\n").unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].label, QuestionLabel::NoAnswer);
//! ```

mod error;
mod input;
mod selection;

pub use error::InputError;
pub use input::{InputFormat, load_questions, parse_delimited, parse_json};
pub use selection::QuestionSelection;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Why a question was collected for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionLabel {
    /// The chatbot produced no answer.
    NoAnswer,
    /// The user rated the answer poorly.
    LowScore,
    /// The user rated the answer well.
    HighScore,
    /// An answer was given but never rated.
    NoScore,
}

impl QuestionLabel {
    /// All labels in the order selections are concatenated.
    pub const ALL: [Self; 4] = [Self::NoAnswer, Self::LowScore, Self::HighScore, Self::NoScore];

    /// Maps the numeric code used by the question export (`0`, `1`, `2`, other).
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::NoAnswer,
            1 => Self::LowScore,
            2 => Self::HighScore,
            _ => Self::NoScore,
        }
    }

    /// Returns the human-readable badge text.
    #[must_use]
    pub fn badge(self) -> &'static str {
        match self {
            Self::NoAnswer => "no answer",
            Self::LowScore => "low score",
            Self::HighScore => "high score",
            Self::NoScore => "no score",
        }
    }
}

impl fmt::Display for QuestionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.badge())
    }
}

/// A single user question as exported from the chatbot store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Raw question text as typed by the user
    pub text: String,
    /// Day the question was received
    pub date: NaiveDate,
    /// Review category
    pub label: QuestionLabel,
}

impl QuestionRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(text: impl Into<String>, date: NaiveDate, label: QuestionLabel) -> Self {
        Self {
            text: text.into(),
            date,
            label,
        }
    }
}

/// A question that passed the junk filter, with its lemma text attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedQuestion {
    /// The normalized, accepted question
    pub record: QuestionRecord,
    /// Space-joined lemmas produced by the lemmatizer
    pub lemma_text: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_code_maps_known_codes() {
        assert_eq!(QuestionLabel::from_code(0), QuestionLabel::NoAnswer);
        assert_eq!(QuestionLabel::from_code(1), QuestionLabel::LowScore);
        assert_eq!(QuestionLabel::from_code(2), QuestionLabel::HighScore);
    }

    #[test]
    fn test_label_from_code_unknown_is_no_score() {
        assert_eq!(QuestionLabel::from_code(3), QuestionLabel::NoScore);
        assert_eq!(QuestionLabel::from_code(-1), QuestionLabel::NoScore);
        assert_eq!(QuestionLabel::from_code(99), QuestionLabel::NoScore);
    }

    #[test]
    fn test_label_display_uses_badge() {
        assert_eq!(QuestionLabel::NoAnswer.to_string(), "no answer");
        assert_eq!(QuestionLabel::LowScore.to_string(), "low score");
        assert_eq!(QuestionLabel::HighScore.to_string(), "high score");
        assert_eq!(QuestionLabel::NoScore.to_string(), "no score");
    }

    #[test]
    fn test_label_serializes_snake_case() {
        let json = serde_json::to_string(&QuestionLabel::LowScore).unwrap();
        assert_eq!(json, "\"low_score\"");
        let parsed: QuestionLabel = serde_json::from_str("\"no_answer\"").unwrap();
        assert_eq!(parsed, QuestionLabel::NoAnswer);
    }

    #[test]
    fn test_record_serializes_iso_date() {
        let record = QuestionRecord::new(
            "где столовая",
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            QuestionLabel::NoScore,
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"2024-03-05\""), "got {json}");
        assert!(json.contains("\"no_score\""), "got {json}");
    }
}
