//! Text preparation stages: normalization, junk filtering and lemmatization.
//!
//! The plausibility scorer and the lemmatizer are capability traits so the
//! pipeline can run against morphology models other than the bundled ones.

mod junk;
mod lemmatizer;
mod normalizer;
mod scorer;

pub use junk::JunkFilter;
pub use lemmatizer::{Lemmatizer, SnowballLemmatizer};
pub use normalizer::normalize;
pub use scorer::{HeuristicScorer, LexiconScorer, PlausibilityScorer};
