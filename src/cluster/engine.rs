//! Hierarchical clustering with an adaptive, silhouette-driven cut height.

use ndarray::Array2;
use tracing::{debug, info, instrument};

use super::linkage::{Dendrogram, cosine_distances};
use super::silhouette::silhouette_score;
use crate::config::PipelineConfig;
use crate::pipeline::PipelineError;

/// Value written into the first coordinate of an all-zero row.
pub const ZERO_ROW_NUDGE: f64 = 1e-20;

/// Flat clustering of the vectorized questions.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAssignment {
    /// Cluster id per row, numbered by first appearance
    pub labels: Vec<usize>,
    /// Cut height the tree was flattened at
    pub threshold: f64,
    /// Silhouette of the chosen partition (0 when the fallback was used)
    pub silhouette: f64,
}

impl ClusterAssignment {
    /// Number of distinct clusters.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.labels.iter().max().map_or(0, |max| max + 1)
    }

    /// Row indices grouped by cluster id, in discovery order.
    #[must_use]
    pub fn groups(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.cluster_count()];
        for (row, &label) in self.labels.iter().enumerate() {
            groups[label].push(row);
        }
        groups
    }
}

/// Complete-linkage cosine clustering with a threshold sweep.
///
/// Candidate heights are `step, 2*step, ...` strictly below the tallest merge.
/// The first height with the highest silhouette wins; if no candidate scores
/// above zero the fallback height is used.
#[derive(Debug, Clone, Copy)]
pub struct ClusterEngine {
    sweep_step: f64,
    fallback_threshold: f64,
}

impl ClusterEngine {
    /// Creates an engine with explicit sweep parameters.
    #[must_use]
    pub fn new(sweep_step: f64, fallback_threshold: f64) -> Self {
        Self {
            sweep_step,
            fallback_threshold,
        }
    }

    /// Creates an engine from the pipeline configuration.
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.sweep_step, config.fallback_threshold)
    }

    /// Clusters the rows of `vectors`.
    ///
    /// # Errors
    /// Returns [`PipelineError::ClusteringFailure`] for fewer than two rows,
    /// no columns, or non-finite values.
    #[instrument(skip(self, vectors), fields(rows = vectors.nrows(), cols = vectors.ncols()))]
    pub fn cluster(&self, vectors: &Array2<f64>) -> Result<ClusterAssignment, PipelineError> {
        if vectors.nrows() < 2 {
            return Err(PipelineError::clustering(format!(
                "need at least 2 vectors, got {}",
                vectors.nrows()
            )));
        }
        if vectors.ncols() == 0 {
            return Err(PipelineError::clustering("vectors have no features"));
        }
        if vectors.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::clustering("vectors contain non-finite values"));
        }

        let mut guarded = vectors.clone();
        let nudged = guard_zero_rows(&mut guarded);
        if nudged > 0 {
            debug!(nudged, "Nudged all-zero rows");
        }

        let distances = cosine_distances(guarded.view());
        let tree = Dendrogram::complete(&distances)?;
        let (threshold, silhouette) = self.select_threshold(&tree, &distances);
        let labels = tree.cut(threshold);

        let assignment = ClusterAssignment {
            labels,
            threshold,
            silhouette,
        };
        info!(
            threshold,
            silhouette,
            clusters = assignment.cluster_count(),
            "Selected cut height"
        );
        Ok(assignment)
    }

    fn select_threshold(&self, tree: &Dendrogram, distances: &Array2<f64>) -> (f64, f64) {
        let max_height = tree.max_height();
        let mut best = (self.fallback_threshold, 0.0);
        let mut candidates = 0usize;

        loop {
            #[allow(clippy::cast_precision_loss)]
            let height = self.sweep_step + candidates as f64 * self.sweep_step;
            if height >= max_height {
                break;
            }
            candidates += 1;

            let score = silhouette_score(distances, &tree.cut(height));
            if score > best.1 {
                best = (height, score);
            }
        }

        debug!(candidates, max_height, "Swept cut heights");
        best
    }
}

/// Sets the first coordinate of every all-zero row to [`ZERO_ROW_NUDGE`].
/// Returns how many rows were changed.
pub fn guard_zero_rows(vectors: &mut Array2<f64>) -> usize {
    let mut nudged = 0;
    for mut row in vectors.rows_mut() {
        if !row.is_empty() && row.iter().all(|v| *v == 0.0) {
            row[0] = ZERO_ROW_NUDGE;
            nudged += 1;
        }
    }
    nudged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ndarray::array;

    fn engine() -> ClusterEngine {
        ClusterEngine::from_config(&PipelineConfig::default())
    }

    #[test]
    fn test_two_directions_form_two_clusters() {
        let vectors = array![[1.0, 0.0], [0.0, 1.0], [1.0, 0.01], [0.01, 1.0]];
        let assignment = engine().cluster(&vectors).unwrap();
        assert_eq!(assignment.labels, vec![0, 1, 0, 1]);
        assert_eq!(assignment.groups(), vec![vec![0, 2], vec![1, 3]]);
        assert!(assignment.silhouette > 0.9);
        assert!(assignment.threshold < 0.1);
    }

    #[test]
    fn test_identical_groups_pick_first_step() {
        let vectors = array![[1.0, 0.0], [1.0, 0.0], [-1.0, 0.5], [-1.0, 0.5]];
        let assignment = engine().cluster(&vectors).unwrap();
        assert!((assignment.threshold - 0.01).abs() < 1e-12);
        assert!((assignment.silhouette - 1.0).abs() < 1e-12);
        assert_eq!(assignment.cluster_count(), 2);
    }

    #[test]
    fn test_fallback_when_no_candidate_scores_above_zero() {
        // Two identical rows: the only merge is at height 0, so no candidates.
        let vectors = array![[1.0, 2.0], [1.0, 2.0]];
        let assignment = engine().cluster(&vectors).unwrap();
        assert!((assignment.threshold - 0.59).abs() < f64::EPSILON);
        assert_eq!(assignment.labels, vec![0, 0]);
        assert!(assignment.silhouette.abs() < f64::EPSILON);
    }

    #[test]
    fn test_fallback_cut_splits_distant_pair() {
        let vectors = array![[1.0, 0.0], [0.0, 1.0]];
        let assignment = engine().cluster(&vectors).unwrap();
        // Silhouette is undefined for every candidate; fallback 0.59 < 1.0
        assert_eq!(assignment.labels, vec![0, 1]);
    }

    #[test]
    fn test_zero_rows_are_nudged_not_rejected() {
        let mut vectors = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        assert_eq!(guard_zero_rows(&mut vectors), 1);
        assert!((vectors[[0, 0]] - ZERO_ROW_NUDGE).abs() < f64::EPSILON);

        let zero = array![[0.0, 0.0], [0.0, 0.0], [0.0, 3.0]];
        let assignment = engine().cluster(&zero).unwrap();
        assert_eq!(assignment.labels.len(), 3);
        assert_eq!(assignment.labels[0], assignment.labels[1]);
    }

    #[test]
    fn test_single_row_is_clustering_failure() {
        let err = engine().cluster(&array![[1.0, 0.0]]).unwrap_err();
        assert!(matches!(err, PipelineError::ClusteringFailure { .. }));
    }

    #[test]
    fn test_non_finite_value_is_clustering_failure() {
        let err = engine()
            .cluster(&array![[1.0, f64::INFINITY], [0.0, 1.0]])
            .unwrap_err();
        assert!(matches!(err, PipelineError::ClusteringFailure { .. }));
    }

    #[test]
    fn test_clustering_is_deterministic() {
        let vectors = array![
            [1.0, 0.2, 0.0],
            [0.9, 0.1, 0.1],
            [0.0, 1.0, 0.3],
            [0.1, 0.8, 0.2],
            [0.0, 0.1, 1.0]
        ];
        let first = engine().cluster(&vectors).unwrap();
        let second = engine().cluster(&vectors).unwrap();
        assert_eq!(first, second);
    }
}
