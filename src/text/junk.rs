//! Filters questions that are mostly garbled, non-word input.

use std::collections::HashSet;

use tracing::trace;

use super::scorer::PlausibilityScorer;
use crate::config::PipelineConfig;
use crate::pipeline::{Capability, PipelineError};

/// Majority-of-real-words filter for short user questions.
///
/// A token counts as valid when its plausibility reaches the configured
/// threshold, or when its lowercase form is a whitelisted abbreviation. A
/// question is kept iff `token_count * meaningful_token_ratio < valid_count`,
/// where `token_count` is taken before punctuation is stripped.
pub struct JunkFilter<'a> {
    scorer: &'a dyn PlausibilityScorer,
    abbreviations: HashSet<String>,
    threshold: f64,
    token_ratio: f64,
}

impl std::fmt::Debug for JunkFilter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JunkFilter")
            .field("abbreviations", &self.abbreviations.len())
            .field("threshold", &self.threshold)
            .field("token_ratio", &self.token_ratio)
            .finish_non_exhaustive()
    }
}

impl<'a> JunkFilter<'a> {
    /// Creates a filter from the pipeline configuration.
    #[must_use]
    pub fn new(scorer: &'a dyn PlausibilityScorer, config: &PipelineConfig) -> Self {
        Self {
            scorer,
            abbreviations: config
                .abbreviations
                .iter()
                .map(|word| word.to_lowercase())
                .collect(),
            threshold: config.plausibility_threshold,
            token_ratio: config.meaningful_token_ratio,
        }
    }

    /// Returns the original text if it is mostly made of real words.
    ///
    /// Punctuation is stripped only for scoring; the token count comes from
    /// the original text, so punctuation-only tokens still count against it.
    ///
    /// # Errors
    /// Returns [`PipelineError::ExternalModel`] if the scorer fails.
    pub fn is_meaningful(&self, text: &str) -> Result<Option<String>, PipelineError> {
        if text.is_empty() {
            return Ok(None);
        }

        let token_count = text.split_whitespace().count();
        let stripped: String = text.chars().filter(|c| !c.is_ascii_punctuation()).collect();

        let mut valid = 0usize;
        for token in stripped.split_whitespace() {
            let score = if self.abbreviations.contains(&token.to_lowercase()) {
                1.0
            } else {
                self.scorer
                    .score(token)
                    .map_err(|source| PipelineError::external(Capability::PlausibilityScorer, source))?
            };
            if score >= self.threshold {
                valid += 1;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let half = token_count as f64 * self.token_ratio;
        #[allow(clippy::cast_precision_loss)]
        let accepted = half < valid as f64;
        trace!(tokens = token_count, valid, accepted, "Scored question");

        Ok(accepted.then(|| text.to_string()))
    }
}
