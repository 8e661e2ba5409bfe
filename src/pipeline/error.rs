//! Error types for the clustering pipeline.

use std::fmt;

use thiserror::Error;

/// External NLP capabilities the pipeline calls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Token "is this a real word" scoring
    PlausibilityScorer,
    /// Base-form reduction
    Lemmatizer,
    /// Per-cluster keyphrase ranking
    KeyphraseRanker,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlausibilityScorer => "plausibility scorer",
            Self::Lemmatizer => "lemmatizer",
            Self::KeyphraseRanker => "keyphrase ranker",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while clustering a question batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No term reached the minimum document frequency.
    ///
    /// [`crate::cluster_questions`] turns this into an empty result; it only
    /// surfaces when the vectorizer is used directly.
    #[error("vocabulary is empty: no term appears in at least {min_df} questions")]
    EmptyVocabulary {
        /// The document frequency cutoff in effect
        min_df: usize,
    },

    /// The feature matrix cannot be clustered.
    #[error("clustering failed: {reason}")]
    ClusteringFailure {
        /// What was wrong with the matrix
        reason: String,
    },

    /// An NLP capability returned an error.
    #[error("{capability} failed\n  Suggestion: Check that the {capability} model is installed and loads correctly")]
    ExternalModel {
        /// Which capability failed
        capability: Capability,
        /// The capability's own error
        #[source]
        source: anyhow::Error,
    },

    /// A configuration value is out of range.
    #[error("invalid pipeline configuration: {reason}")]
    InvalidConfig {
        /// Which value is wrong and why
        reason: String,
    },
}

impl PipelineError {
    /// Creates a [`PipelineError::ExternalModel`] error.
    #[must_use]
    pub fn external(capability: Capability, source: anyhow::Error) -> Self {
        Self::ExternalModel { capability, source }
    }

    /// Creates a [`PipelineError::ClusteringFailure`] error.
    #[must_use]
    pub fn clustering(reason: impl Into<String>) -> Self {
        Self::ClusteringFailure {
            reason: reason.into(),
        }
    }

    /// Creates a [`PipelineError::InvalidConfig`] error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
