//! TF-IDF vectorization of lemma texts and per-feature standardization.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use ndarray::{Array2, Axis};
use regex::Regex;
use tracing::{debug, instrument};

use crate::pipeline::PipelineError;

/// Terms are runs of two or more word characters.
#[allow(clippy::expect_used)]
static TERM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w\w+").expect("term regex is valid"));

/// Scale factors below this are treated as zero variance.
const ZERO_SCALE: f64 = 10.0 * f64::EPSILON;

/// Dense document-term matrix with its column labels.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    /// Column terms in lexicographic order
    pub vocabulary: Vec<String>,
    /// One row per document
    pub values: Array2<f64>,
}

/// TF-IDF vectorizer with smoothed IDF and L2-normalized rows.
///
/// Weights are `count * (ln((1 + n) / (1 + df)) + 1)`, where `n` is the number
/// of documents and `df` the number of documents containing the term.
#[derive(Debug, Clone, Copy)]
pub struct TfIdfVectorizer {
    min_df: usize,
}

impl TfIdfVectorizer {
    /// Creates a vectorizer that keeps terms found in at least `min_df` documents.
    #[must_use]
    pub fn new(min_df: usize) -> Self {
        Self { min_df }
    }

    /// Builds the vocabulary from `documents` and returns their weight matrix.
    ///
    /// # Errors
    /// Returns [`PipelineError::EmptyVocabulary`] when no term survives the
    /// document frequency cutoff.
    #[instrument(skip(self, documents), fields(documents = documents.len(), min_df = self.min_df))]
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<FeatureMatrix, PipelineError> {
        let counts: Vec<HashMap<String, usize>> =
            documents.iter().map(|doc| term_counts(doc.as_ref())).collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let n = documents.len() as f64;
        let mut vocabulary = Vec::new();
        let mut idf = Vec::new();
        for (term, df) in document_frequency {
            if df >= self.min_df {
                vocabulary.push(term.to_string());
                #[allow(clippy::cast_precision_loss)]
                idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            }
        }
        if vocabulary.is_empty() {
            return Err(PipelineError::EmptyVocabulary {
                min_df: self.min_df,
            });
        }
        debug!(vocabulary = vocabulary.len(), "Built vocabulary");

        let column: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(index, term)| (term.as_str(), index))
            .collect();

        let mut values = Array2::<f64>::zeros((documents.len(), vocabulary.len()));
        for (row, doc) in counts.iter().enumerate() {
            for (term, count) in doc {
                if let Some(&col) = column.get(term.as_str()) {
                    #[allow(clippy::cast_precision_loss)]
                    let weight = *count as f64 * idf[col];
                    values[[row, col]] = weight;
                }
            }
            let mut row_view = values.row_mut(row);
            let norm = row_view.dot(&row_view).sqrt();
            if norm > 0.0 {
                row_view /= norm;
            }
        }

        Ok(FeatureMatrix { vocabulary, values })
    }
}

fn term_counts(text: &str) -> HashMap<String, usize> {
    let lower = text.to_lowercase();
    let mut counts = HashMap::new();
    for term in TERM_PATTERN.find_iter(&lower) {
        *counts.entry(term.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Centers each column on its mean and divides by its population standard
/// deviation. Constant columns are only centered.
pub fn standardize(values: &mut Array2<f64>) {
    if values.nrows() == 0 {
        return;
    }
    for mut column in values.axis_iter_mut(Axis(1)) {
        let mean = column.mean().unwrap_or(0.0);
        let scale = column.std(0.0);
        let scale = if scale < ZERO_SCALE { 1.0 } else { scale };
        column.mapv_inplace(|x| (x - mean) / scale);
    }
}
