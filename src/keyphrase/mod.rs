//! Keyphrases that summarize a cluster of questions.
//!
//! The bundled [`RakeRanker`] scores phrases with RAKE over the cluster's
//! sentences joined into one text. Other rankers plug in through
//! [`KeyphraseRanker`].

mod extractor;
mod normalizer;

pub use extractor::{KeyphraseRanker, RakeRanker};
pub use normalizer::dedupe_phrases;
