//! Question Clusters Library
//!
//! Groups chatbot questions that went unanswered or were rated poorly into
//! thematic clusters, so support staff can see which topics the bot is
//! missing. Each cluster comes with its member questions, keyphrases and the
//! date span it covers.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`question`] - Question records, file loaders and selection filters
//! - [`text`] - Normalization, junk filtering and lemmatization
//! - [`cluster`] - TF-IDF vectors and adaptive hierarchical clustering
//! - [`keyphrase`] - RAKE keyphrases per cluster
//! - [`pipeline`] - The end-to-end [`cluster_questions`] entry point
//! - [`config`] - Pipeline parameters and the TOML config file
//! - [`render`] - Text and JSON output
//!
//! # Example
//!
//! ```
//! use question_clusters::{Language, NlpModels, PipelineConfig, cluster_questions};
//! use question_clusters::question::parse_delimited;
//!
//! let records = parse_delimited("Когда придет стипендия --- 2024-03-01 --- 0\n").unwrap();
//! let models = NlpModels::bundled(Language::Russian);
//! let result = cluster_questions(&records, &models, &PipelineConfig::default()).unwrap();
//! // A single question cannot be clustered.
//! assert!(result.is_empty());
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cluster;
pub mod config;
pub mod keyphrase;
pub mod language;
pub mod pipeline;
pub mod question;
pub mod render;
pub mod text;

// Re-export commonly used types
pub use config::{
    DEFAULT_FALLBACK_THRESHOLD, DEFAULT_MAX_KEYPHRASES, DEFAULT_SWEEP_STEP, FileConfig, MIN_SWEEP_STEP, PipelineConfig,
};
pub use keyphrase::{KeyphraseRanker, RakeRanker};
pub use language::Language;
pub use pipeline::{
    Capability, ClusterMember, ClusterResult, DateRange, DegenerateReason, NlpModels, PipelineError,
    PipelineResult, cluster_questions,
};
pub use question::{InputError, InputFormat, QuestionLabel, QuestionRecord, QuestionSelection, load_questions};
pub use render::{OutputFormat, render};
pub use text::{HeuristicScorer, Lemmatizer, LexiconScorer, PlausibilityScorer, SnowballLemmatizer};
