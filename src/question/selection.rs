//! Date-window and label selection over a loaded question batch.

use chrono::NaiveDate;
use tracing::{debug, instrument};

use super::{QuestionLabel, QuestionRecord};

/// Which questions to hand to the pipeline.
///
/// Selected categories are concatenated in [`QuestionLabel::ALL`] order;
/// within a category the input order is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSelection {
    /// Earliest date to keep (inclusive)
    pub since: Option<NaiveDate>,
    /// Latest date to keep (inclusive)
    pub until: Option<NaiveDate>,
    /// Keep questions the chatbot could not answer
    pub no_answer: bool,
    /// Keep questions with a low user rating
    pub low_score: bool,
    /// Keep questions with a high user rating
    pub high_score: bool,
    /// Keep answered but unrated questions
    pub no_score: bool,
}

impl Default for QuestionSelection {
    fn default() -> Self {
        Self {
            since: None,
            until: None,
            no_answer: true,
            low_score: false,
            high_score: false,
            no_score: false,
        }
    }
}

impl QuestionSelection {
    /// Returns true if questions with `label` are selected.
    #[must_use]
    pub fn includes(&self, label: QuestionLabel) -> bool {
        match label {
            QuestionLabel::NoAnswer => self.no_answer,
            QuestionLabel::LowScore => self.low_score,
            QuestionLabel::HighScore => self.high_score,
            QuestionLabel::NoScore => self.no_score,
        }
    }

    fn in_window(&self, date: NaiveDate) -> bool {
        self.since.is_none_or(|since| date >= since) && self.until.is_none_or(|until| date <= until)
    }

    /// Applies the selection, returning owned copies of the kept records.
    #[must_use]
    #[instrument(skip(self, records), fields(input = records.len()))]
    pub fn apply(&self, records: &[QuestionRecord]) -> Vec<QuestionRecord> {
        let mut selected = Vec::new();
        for label in QuestionLabel::ALL {
            if !self.includes(label) {
                continue;
            }
            selected.extend(
                records
                    .iter()
                    .filter(|record| record.label == label && self.in_window(record.date))
                    .cloned(),
            );
        }
        debug!(selected = selected.len(), "Applied question selection");
        selected
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn batch() -> Vec<QuestionRecord> {
        vec![
            QuestionRecord::new("q1", day(1), QuestionLabel::NoScore),
            QuestionRecord::new("q2", day(2), QuestionLabel::LowScore),
            QuestionRecord::new("q3", day(3), QuestionLabel::NoAnswer),
            QuestionRecord::new("q4", day(4), QuestionLabel::LowScore),
            QuestionRecord::new("q5", day(5), QuestionLabel::HighScore),
            QuestionRecord::new("q6", day(6), QuestionLabel::NoAnswer),
        ]
    }

    fn texts(records: &[QuestionRecord]) -> Vec<&str> {
        records.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_default_selects_no_answer_only() {
        let selected = QuestionSelection::default().apply(&batch());
        assert_eq!(texts(&selected), vec!["q3", "q6"]);
    }

    #[test]
    fn test_categories_concatenate_in_fixed_order() {
        let selection = QuestionSelection {
            no_answer: true,
            low_score: true,
            high_score: true,
            no_score: true,
            ..QuestionSelection::default()
        };
        let selected = selection.apply(&batch());
        assert_eq!(texts(&selected), vec!["q3", "q6", "q2", "q4", "q5", "q1"]);
    }

    #[test]
    fn test_no_flags_selects_nothing() {
        let selection = QuestionSelection {
            no_answer: false,
            ..QuestionSelection::default()
        };
        assert!(selection.apply(&batch()).is_empty());
    }

    #[test]
    fn test_date_window_is_inclusive() {
        let selection = QuestionSelection {
            since: Some(day(2)),
            until: Some(day(4)),
            no_answer: true,
            low_score: true,
            ..QuestionSelection::default()
        };
        let selected = selection.apply(&batch());
        assert_eq!(texts(&selected), vec!["q3", "q2", "q4"]);
    }

    #[test]
    fn test_open_ended_window() {
        let selection = QuestionSelection {
            since: Some(day(4)),
            ..QuestionSelection::default()
        };
        assert_eq!(texts(&selection.apply(&batch())), vec!["q6"]);
    }
}
