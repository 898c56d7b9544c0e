// Cluster engine — group every user with k-means over cluster-raw rows.
//
// Each call rebuilds the vocabulary and matrix from the corpus and reruns
// k-means from the given seed. Nothing is cached between calls. Labels are
// only comparable within one run.

pub mod kmeans;

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::corpus::Corpus;
use crate::encoding::cluster_raw::{encode_user, Vocabulary};
use crate::encoding::{FeatureVector, VectorKind};
use crate::error::RecommendError;
use kmeans::KMeansParams;

/// Seed used when the caller has no reason to pick another.
pub const DEFAULT_SEED: u64 = 42;

/// One cluster-raw row per user, all sharing the same column layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterMatrix {
    user_ids: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl ClusterMatrix {
    /// Build the vocabulary from the corpus, then encode every user against it.
    pub fn build(corpus: &Corpus) -> Self {
        let vocab = Vocabulary::build(corpus);
        let (user_ids, rows) = corpus
            .iter()
            .map(|(id, user)| (id.to_string(), encode_user(user, &vocab).into_values()))
            .unzip();

        debug!(
            users = corpus.len(),
            columns = vocab.dimension(),
            "Built cluster matrix"
        );
        Self { user_ids, rows }
    }

    /// Assemble a matrix from pre-encoded rows.
    ///
    /// Every row must be a cluster-raw vector and all rows must be the same width.
    pub fn from_rows(rows: Vec<(String, FeatureVector)>) -> Result<Self> {
        let width = rows.first().map(|(_, v)| v.len());
        let mut user_ids = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len());

        for (user_id, row) in rows {
            if row.kind() != VectorKind::ClusterRaw {
                anyhow::bail!(
                    "Row for {user_id} is a {} vector; the cluster matrix needs cluster-raw rows",
                    row.kind()
                );
            }
            if Some(row.len()) != width {
                anyhow::bail!(
                    "Row for {user_id} has {} columns, expected {}",
                    row.len(),
                    width.unwrap_or(0)
                );
            }
            user_ids.push(user_id);
            values.push(row.into_values());
        }

        Ok(Self {
            user_ids,
            rows: values,
        })
    }

    pub fn user_ids(&self) -> &[String] {
        &self.user_ids
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The queried user's cluster and everyone else in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub user_id: String,
    pub label: usize,
    /// Users sharing the label, in corpus order, target included
    pub members: Vec<String>,
    /// Label of every user in corpus order
    pub labels: IndexMap<String, usize>,
    /// Sum of squared distances to assigned centroids
    pub inertia: f64,
}

/// Cluster the whole corpus and report the group containing `target_id`.
pub fn cluster_for(
    corpus: &Corpus,
    target_id: &str,
    n_clusters: usize,
    seed: u64,
) -> Result<ClusterAssignment, RecommendError> {
    cluster_matrix_for(&ClusterMatrix::build(corpus), target_id, n_clusters, seed)
}

/// Cluster an already-built matrix and report the group containing `target_id`.
pub fn cluster_matrix_for(
    matrix: &ClusterMatrix,
    target_id: &str,
    n_clusters: usize,
    seed: u64,
) -> Result<ClusterAssignment, RecommendError> {
    let target_index = matrix
        .user_ids
        .iter()
        .position(|id| id == target_id)
        .ok_or_else(|| RecommendError::UserNotFound(target_id.to_string()))?;

    if n_clusters == 0 || n_clusters > matrix.len() {
        return Err(RecommendError::InvalidClusterCount {
            requested: n_clusters,
            corpus_size: matrix.len(),
        });
    }

    let fit = kmeans::fit(&matrix.rows, &KMeansParams::new(n_clusters, seed));
    let label = fit.labels[target_index];

    let labels: IndexMap<String, usize> = matrix
        .user_ids
        .iter()
        .cloned()
        .zip(fit.labels.iter().copied())
        .collect();
    let members: Vec<String> = labels
        .iter()
        .filter(|(_, &l)| l == label)
        .map(|(id, _)| id.clone())
        .collect();

    info!(
        target = target_id,
        label,
        members = members.len(),
        n_clusters,
        inertia = fit.inertia,
        "Clustered corpus"
    );

    Ok(ClusterAssignment {
        user_id: target_id.to_string(),
        label,
        members,
        labels,
        inertia: fit.inertia,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Corpus {
        Corpus::from_json_str(
            r#"{"users": {
                "a": {"bio": {"interests": ["ml"]}, "behaviour": {"logins_per_week": 1}},
                "b": {"bio": {"interests": ["ml"]}, "behaviour": {"logins_per_week": 2}},
                "c": {"bio": {"interests": ["art"]}, "behaviour": {"logins_per_week": 40}},
                "d": {"bio": {"interests": ["art"]}, "behaviour": {"logins_per_week": 41}}
            }}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_matrix_rows_follow_corpus_order() {
        let m = ClusterMatrix::build(&corpus());
        assert_eq!(m.user_ids(), &["a", "b", "c", "d"]);
        assert_eq!(m.rows()[0].len(), 2 + 6);
    }

    #[test]
    fn test_cluster_for_groups_similar_users() {
        let result = cluster_for(&corpus(), "a", 2, DEFAULT_SEED).unwrap();
        assert_eq!(result.members, vec!["a", "b"]);
        assert_eq!(result.labels.len(), 4);
        assert_eq!(result.labels["c"], result.labels["d"]);
        assert_ne!(result.labels["a"], result.labels["c"]);
    }

    #[test]
    fn test_single_cluster_holds_everyone() {
        let result = cluster_for(&corpus(), "c", 1, DEFAULT_SEED).unwrap();
        assert_eq!(result.label, 0);
        assert_eq!(result.members.len(), 4);
    }

    #[test]
    fn test_unknown_user() {
        assert_eq!(
            cluster_for(&corpus(), "zz", 2, DEFAULT_SEED),
            Err(RecommendError::UserNotFound("zz".to_string()))
        );
    }

    #[test]
    fn test_invalid_cluster_counts() {
        for k in [0, 5] {
            assert_eq!(
                cluster_for(&corpus(), "a", k, DEFAULT_SEED),
                Err(RecommendError::InvalidClusterCount {
                    requested: k,
                    corpus_size: 4
                })
            );
        }
    }

    #[test]
    fn test_from_rows_rejects_embedding_vectors() {
        let rows = vec![(
            "a".to_string(),
            FeatureVector::new(VectorKind::Unified, vec![1.0, 0.0]),
        )];
        assert!(ClusterMatrix::from_rows(rows).is_err());
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let rows = vec![
            ("a".to_string(), FeatureVector::new(VectorKind::ClusterRaw, vec![1.0])),
            ("b".to_string(), FeatureVector::new(VectorKind::ClusterRaw, vec![1.0, 2.0])),
        ];
        assert!(ClusterMatrix::from_rows(rows).is_err());
    }

    #[test]
    fn test_from_rows_clusters() {
        let row = |v: Vec<f64>| FeatureVector::new(VectorKind::ClusterRaw, v);
        let m = ClusterMatrix::from_rows(vec![
            ("x".to_string(), row(vec![0.0, 0.0])),
            ("y".to_string(), row(vec![10.0, 10.0])),
            ("z".to_string(), row(vec![0.1, 0.0])),
        ])
        .unwrap();
        let result = cluster_matrix_for(&m, "z", 2, DEFAULT_SEED).unwrap();
        assert_eq!(result.members, vec!["x", "z"]);
    }
}
