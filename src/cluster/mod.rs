//! Vectorization and hierarchical clustering of lemmatized questions.
//!
//! - [`TfIdfVectorizer`] and [`standardize`] turn lemma texts into a dense
//!   feature matrix.
//! - [`ClusterEngine`] builds a complete-linkage cosine tree over the rows
//!   and flattens it at the cut height with the best silhouette.

mod engine;
mod linkage;
mod silhouette;
mod tfidf;

pub use engine::{ClusterAssignment, ClusterEngine, ZERO_ROW_NUDGE, guard_zero_rows};
pub use linkage::{Dendrogram, Merge, cosine_distances};
pub use silhouette::silhouette_score;
pub use tfidf::{FeatureMatrix, TfIdfVectorizer, standardize};
