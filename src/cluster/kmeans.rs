// Seeded k-means: k-means++ initialization, Lloyd iterations, several
// restarts keeping the lowest inertia.
//
// All randomness comes from one StdRng seeded by the caller, so the same
// rows, k and seed always produce the same labels.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Tuning knobs for a k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansParams {
    pub n_clusters: usize,
    /// Seed for centroid initialization
    pub seed: u64,
    /// Lloyd iteration cap per restart (default 300)
    pub max_iterations: usize,
    /// Convergence threshold, relative to the mean per-column variance (default 1e-4)
    pub tolerance: f64,
    /// Number of independent initializations (default 10)
    pub n_init: usize,
}

impl KMeansParams {
    pub fn new(n_clusters: usize, seed: u64) -> Self {
        Self {
            n_clusters,
            seed,
            max_iterations: 300,
            tolerance: 1e-4,
            n_init: 10,
        }
    }
}

/// Result of the best restart.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster label per input row
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances from each row to its centroid
    pub inertia: f64,
    /// Lloyd iterations used by the winning restart
    pub iterations: usize,
}

/// Cluster `rows` into `params.n_clusters` groups.
///
/// Callers guarantee `1 <= n_clusters <= rows.len()` and equal row widths.
pub fn fit(rows: &[Vec<f64>], params: &KMeansParams) -> KMeansFit {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let tolerance = scaled_tolerance(rows, params.tolerance);

    let mut best: Option<KMeansFit> = None;
    for restart in 0..params.n_init.max(1) {
        let centroids = init_plus_plus(rows, params.n_clusters, &mut rng);
        let run = lloyd(rows, centroids, params.max_iterations, tolerance);
        debug!(restart, inertia = run.inertia, iterations = run.iterations, "k-means restart");

        // Strictly lower inertia wins, so the earliest restart keeps ties
        if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
            best = Some(run);
        }
    }

    best.unwrap_or_else(|| KMeansFit {
        labels: vec![0; rows.len()],
        centroids: Vec::new(),
        inertia: 0.0,
        iterations: 0,
    })
}

pub(crate) fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Absolute convergence threshold: `tolerance * mean column variance`.
fn scaled_tolerance(rows: &[Vec<f64>], tolerance: f64) -> f64 {
    let Some(width) = rows.first().map(Vec::len) else {
        return 0.0;
    };
    if width == 0 {
        return 0.0;
    }

    let n = rows.len() as f64;
    let mut total_variance = 0.0;
    for col in 0..width {
        let mean = rows.iter().map(|r| r[col]).sum::<f64>() / n;
        total_variance += rows.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / n;
    }
    tolerance * total_variance / width as f64
}

/// k-means++ seeding: first centroid uniform, each next one drawn with
/// probability proportional to its squared distance from the nearest
/// centroid chosen so far.
fn init_plus_plus(rows: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(rows[rng.random_range(0..rows.len())].clone());

    let mut nearest: Vec<f64> = rows
        .iter()
        .map(|r| squared_distance(r, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();
        let pick = if total > 0.0 {
            let target = rng.random::<f64>() * total;
            let mut acc = 0.0;
            let mut chosen = None;
            for (i, &d) in nearest.iter().enumerate() {
                acc += d;
                if d > 0.0 && acc > target {
                    chosen = Some(i);
                    break;
                }
            }
            // Rounding can leave target just past the final sum
            chosen.unwrap_or_else(|| nearest.iter().rposition(|&d| d > 0.0).unwrap_or(0))
        } else {
            // Every row coincides with a centroid already
            rng.random_range(0..rows.len())
        };

        let centroid = rows[pick].clone();
        for (d, row) in nearest.iter_mut().zip(rows) {
            *d = d.min(squared_distance(row, &centroid));
        }
        centroids.push(centroid);
    }

    centroids
}

/// Index of the closest centroid; the lowest index wins ties.
fn nearest_centroid(row: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, c) in centroids.iter().enumerate() {
        let d = squared_distance(row, c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

fn assign(rows: &[Vec<f64>], centroids: &[Vec<f64>]) -> (Vec<usize>, f64) {
    let mut inertia = 0.0;
    let labels = rows
        .iter()
        .map(|r| {
            let (label, d) = nearest_centroid(r, centroids);
            inertia += d;
            label
        })
        .collect();
    (labels, inertia)
}

fn lloyd(
    rows: &[Vec<f64>],
    mut centroids: Vec<Vec<f64>>,
    max_iterations: usize,
    tolerance: f64,
) -> KMeansFit {
    let width = centroids.first().map(Vec::len).unwrap_or(0);
    let mut iterations = 0;

    while iterations < max_iterations {
        iterations += 1;
        let (labels, _) = assign(rows, &centroids);

        let mut sums = vec![vec![0.0; width]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];
        for (row, &label) in rows.iter().zip(&labels) {
            counts[label] += 1;
            for (s, x) in sums[label].iter_mut().zip(row) {
                *s += x;
            }
        }

        let mut shift = 0.0;
        for ((centroid, sum), &count) in centroids.iter_mut().zip(sums).zip(&counts) {
            // An empty cluster keeps its previous centroid
            if count == 0 {
                continue;
            }
            let updated: Vec<f64> = sum.into_iter().map(|s| s / count as f64).collect();
            shift += squared_distance(centroid, &updated);
            *centroid = updated;
        }

        if shift <= tolerance {
            break;
        }
    }

    let (labels, inertia) = assign(rows, &centroids);
    KMeansFit {
        labels,
        centroids,
        inertia,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f64>> {
        vec![
            vec![1.0, 2.0],
            vec![1.5, 1.8],
            vec![5.0, 8.0],
            vec![8.0, 8.0],
            vec![1.0, 0.6],
            vec![9.0, 11.0],
        ]
    }

    #[test]
    fn test_separates_two_blobs() {
        let fit = fit(&blobs(), &KMeansParams::new(2, 42));
        let l = &fit.labels;
        assert_eq!(l[0], l[1]);
        assert_eq!(l[0], l[4]);
        assert_eq!(l[2], l[3]);
        assert_eq!(l[2], l[5]);
        assert_ne!(l[0], l[2]);
    }

    #[test]
    fn test_same_seed_same_result() {
        let params = KMeansParams::new(3, 7);
        assert_eq!(fit(&blobs(), &params), fit(&blobs(), &params));
    }

    #[test]
    fn test_one_cluster_centroid_is_mean() {
        let rows = vec![vec![0.0, 0.0], vec![2.0, 4.0]];
        let fit = fit(&rows, &KMeansParams::new(1, 1));
        assert_eq!(fit.labels, vec![0, 0]);
        assert!((fit.centroids[0][0] - 1.0).abs() < 1e-12);
        assert!((fit.centroids[0][1] - 2.0).abs() < 1e-12);
        assert!((fit.inertia - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_k_equals_n_gives_zero_inertia() {
        let fit = fit(&blobs(), &KMeansParams::new(6, 3));
        assert!(fit.inertia.abs() < 1e-12, "Expected 0 inertia, got {}", fit.inertia);
        let mut labels = fit.labels.clone();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 6);
    }

    #[test]
    fn test_identical_rows_do_not_panic() {
        let rows = vec![vec![1.0, 1.0]; 4];
        let fit = fit(&rows, &KMeansParams::new(2, 42));
        assert_eq!(fit.labels.len(), 4);
        assert!(fit.inertia.abs() < 1e-12);
    }
}
