//! Mean silhouette coefficient over a precomputed distance matrix.

use ndarray::Array2;

/// Mean silhouette of `labels` (dense ids starting at 0).
///
/// A singleton cluster contributes 0. Partitions with fewer than two or more
/// than `n - 1` clusters have no defined silhouette and score 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn silhouette_score(distances: &Array2<f64>, labels: &[usize]) -> f64 {
    let n = labels.len();
    let cluster_count = labels.iter().max().map_or(0, |max| max + 1);
    if cluster_count < 2 || cluster_count >= n {
        return 0.0;
    }

    let mut sizes = vec![0usize; cluster_count];
    for &label in labels {
        sizes[label] += 1;
    }

    let mut total = 0.0;
    let mut sums = vec![0.0; cluster_count];
    for i in 0..n {
        let own = labels[i];
        if sizes[own] == 1 {
            continue;
        }

        sums.iter_mut().for_each(|s| *s = 0.0);
        for j in 0..n {
            sums[labels[j]] += distances[[i, j]];
        }

        let intra = sums[own] / (sizes[own] - 1) as f64;
        let nearest = (0..cluster_count)
            .filter(|&c| c != own)
            .map(|c| sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);

        let spread = intra.max(nearest);
        if spread > 0.0 {
            total += (nearest - intra) / spread;
        }
    }

    total / n as f64
}
