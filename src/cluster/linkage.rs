//! Complete-linkage agglomerative clustering over cosine distances.
//!
//! The merge tree is built with the nearest-neighbour chain algorithm, which
//! is exact for complete linkage because the linkage is reducible.

use ndarray::{Array2, ArrayView2};

use crate::pipeline::PipelineError;

/// Pairwise cosine distances, clamped to `[0, 2]`, with a zero diagonal.
///
/// Rows must be non-zero; callers guard against zero rows first.
#[must_use]
pub fn cosine_distances(values: ArrayView2<'_, f64>) -> Array2<f64> {
    let n = values.nrows();
    let norms: Vec<f64> = values.rows().into_iter().map(|row| row.dot(&row).sqrt()).collect();
    let mut distances = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            let similarity = values.row(i).dot(&values.row(j)) / (norms[i] * norms[j]);
            let distance = (1.0 - similarity).clamp(0.0, 2.0);
            distances[[i, j]] = distance;
            distances[[j, i]] = distance;
        }
    }
    distances
}

/// One agglomeration step: the clusters represented by `left` and `right`
/// (original observation indices) join at `height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// Representative of the surviving cluster
    pub left: usize,
    /// Representative of the absorbed cluster
    pub right: usize,
    /// Complete-linkage distance between the two clusters
    pub height: f64,
}

/// The `n - 1` merges of a hierarchical clustering, sorted by height.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    observations: usize,
    merges: Vec<Merge>,
}

impl Dendrogram {
    /// Builds the complete-linkage tree from a square distance matrix.
    ///
    /// # Errors
    /// Returns [`PipelineError::ClusteringFailure`] for fewer than two
    /// observations, a non-square matrix or non-finite distances.
    pub fn complete(distances: &Array2<f64>) -> Result<Self, PipelineError> {
        let n = distances.nrows();
        if n != distances.ncols() {
            return Err(PipelineError::clustering(format!(
                "distance matrix must be square, got {}x{}",
                n,
                distances.ncols()
            )));
        }
        if n < 2 {
            return Err(PipelineError::clustering(format!(
                "need at least 2 observations, got {n}"
            )));
        }
        if distances.iter().any(|d| !d.is_finite()) {
            return Err(PipelineError::clustering("distance matrix has non-finite values"));
        }

        let mut d = distances.clone();
        let mut active = vec![true; n];
        let mut chain: Vec<usize> = Vec::with_capacity(n);
        let mut merges = Vec::with_capacity(n - 1);

        while merges.len() < n - 1 {
            if chain.is_empty() {
                let Some(first) = active.iter().position(|a| *a) else {
                    break;
                };
                chain.push(first);
            }

            loop {
                let a = chain[chain.len() - 1];
                let previous = chain.len().checked_sub(2).map(|i| chain[i]);

                // The previous chain element wins ties so the chain terminates.
                let mut nearest = previous;
                let mut nearest_distance = previous.map_or(f64::INFINITY, |p| d[[a, p]]);
                for (k, is_active) in active.iter().enumerate() {
                    if *is_active && k != a && d[[a, k]] < nearest_distance {
                        nearest = Some(k);
                        nearest_distance = d[[a, k]];
                    }
                }
                let Some(b) = nearest else {
                    return Err(PipelineError::clustering("no active neighbour left to merge"));
                };

                if Some(b) == previous {
                    chain.truncate(chain.len() - 2);
                    let (keep, drop) = (a.min(b), a.max(b));
                    for k in 0..n {
                        if active[k] && k != keep && k != drop {
                            let farthest = d[[keep, k]].max(d[[drop, k]]);
                            d[[keep, k]] = farthest;
                            d[[k, keep]] = farthest;
                        }
                    }
                    active[drop] = false;
                    merges.push(Merge {
                        left: keep,
                        right: drop,
                        height: nearest_distance,
                    });
                    break;
                }
                chain.push(b);
            }
        }

        merges.sort_by(|x, y| x.height.total_cmp(&y.height));
        Ok(Self {
            observations: n,
            merges,
        })
    }

    /// Number of clustered observations.
    #[must_use]
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Merges in ascending height order.
    #[must_use]
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Height of the final merge.
    #[must_use]
    pub fn max_height(&self) -> f64 {
        self.merges.last().map_or(0.0, |m| m.height)
    }

    /// Flat clustering: applies every merge with `height <= threshold`.
    ///
    /// Labels are numbered from 0 in order of first appearance.
    #[must_use]
    pub fn cut(&self, threshold: f64) -> Vec<usize> {
        let mut parent: Vec<usize> = (0..self.observations).collect();
        for merge in self.merges.iter().take_while(|m| m.height <= threshold) {
            let left = find(&mut parent, merge.left);
            let right = find(&mut parent, merge.right);
            if left != right {
                parent[left.max(right)] = left.min(right);
            }
        }

        let mut label_of_root = vec![usize::MAX; self.observations];
        let mut next = 0;
        let mut labels = Vec::with_capacity(self.observations);
        for i in 0..self.observations {
            let root = find(&mut parent, i);
            if label_of_root[root] == usize::MAX {
                label_of_root[root] = next;
                next += 1;
            }
            labels.push(label_of_root[root]);
        }
        labels
    }
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ndarray::array;

    fn line_distances(points: &[f64]) -> Array2<f64> {
        let n = points.len();
        Array2::from_shape_fn((n, n), |(i, j)| (points[i] - points[j]).abs())
    }

    #[test]
    fn test_cosine_distances_basic_angles() {
        let values = array![[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0], [2.0, 0.0]];
        let d = cosine_distances(values.view());
        assert!((d[[0, 1]] - 1.0).abs() < 1e-12);
        assert!((d[[0, 2]] - 2.0).abs() < 1e-12);
        assert!(d[[0, 3]].abs() < 1e-12);
        assert!(d[[2, 2]].abs() < f64::EPSILON);
        assert!((d[[1, 0]] - d[[0, 1]]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_complete_linkage_heights_on_a_line() {
        // {0,1} at 1, {10,12} at 2, then everything at max span 12
        let tree = Dendrogram::complete(&line_distances(&[0.0, 1.0, 10.0, 12.0])).unwrap();
        let heights: Vec<f64> = tree.merges().iter().map(|m| m.height).collect();
        assert_eq!(heights, vec![1.0, 2.0, 12.0]);
        assert!((tree.max_height() - 12.0).abs() < f64::EPSILON);
        assert_eq!(tree.observations(), 4);
    }

    #[test]
    fn test_complete_linkage_uses_farthest_member() {
        // 0 joins {2, 2.5} at its farthest member (2.5), not the nearest (2.0)
        let tree = Dendrogram::complete(&line_distances(&[0.0, 2.0, 2.5, 5.5])).unwrap();
        let heights: Vec<f64> = tree.merges().iter().map(|m| m.height).collect();
        assert_eq!(heights, vec![0.5, 2.5, 5.5]);
    }

    #[test]
    fn test_cut_applies_merges_up_to_threshold_inclusive() {
        let tree = Dendrogram::complete(&line_distances(&[0.0, 1.0, 10.0, 12.0])).unwrap();
        assert_eq!(tree.cut(0.5), vec![0, 1, 2, 3]);
        assert_eq!(tree.cut(1.0), vec![0, 0, 1, 2]);
        assert_eq!(tree.cut(2.0), vec![0, 0, 1, 1]);
        assert_eq!(tree.cut(100.0), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_cut_labels_follow_first_appearance() {
        let tree = Dendrogram::complete(&line_distances(&[10.0, 0.0, 10.5, 0.5])).unwrap();
        assert_eq!(tree.cut(1.0), vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_identical_points_merge_at_zero() {
        let tree = Dendrogram::complete(&line_distances(&[3.0, 3.0, 3.0])).unwrap();
        assert!(tree.merges().iter().all(|m| m.height == 0.0));
        assert_eq!(tree.cut(0.0), vec![0, 0, 0]);
    }

    #[test]
    fn test_single_observation_is_clustering_failure() {
        let err = Dendrogram::complete(&line_distances(&[1.0])).unwrap_err();
        assert!(matches!(err, PipelineError::ClusteringFailure { .. }));
    }

    #[test]
    fn test_non_finite_distance_is_clustering_failure() {
        let mut d = line_distances(&[0.0, 1.0, 2.0]);
        d[[0, 2]] = f64::NAN;
        assert!(Dendrogram::complete(&d).is_err());
    }
}
