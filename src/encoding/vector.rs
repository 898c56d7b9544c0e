// Tagged feature vectors and the vector math shared by the encoders.
//
// A FeatureVector carries the kind of encoder output it holds. The embedding
// store only accepts bio/behaviour/graph/unified vectors and the cluster
// matrix only accepts cluster-raw rows, so one encoder's output can't be fed
// to the other's consumer by accident.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which encoder (and which feature family) produced a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VectorKind {
    Bio,
    Behaviour,
    Graph,
    Unified,
    ClusterRaw,
}

impl fmt::Display for VectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VectorKind::Bio => "bio",
            VectorKind::Behaviour => "behaviour",
            VectorKind::Graph => "graph",
            VectorKind::Unified => "unified",
            VectorKind::ClusterRaw => "cluster-raw",
        };
        f.write_str(name)
    }
}

/// An ordered sequence of reals plus the kind tag of the encoder that made it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    kind: VectorKind,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(kind: VectorKind, values: Vec<f64>) -> Self {
        Self { kind, values }
    }

    pub fn kind(&self) -> VectorKind {
        self.kind
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cosine similarity against a vector of the same kind.
    ///
    /// Returns None when the kinds differ, since comparing e.g. a bio vector
    /// with a graph vector is meaningless.
    pub fn cosine(&self, other: &FeatureVector) -> Option<f64> {
        (self.kind == other.kind).then(|| cosine_similarity(&self.values, &other.values))
    }
}

/// Euclidean (L2) norm.
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Scale a vector to unit length. The zero vector comes back unchanged.
pub fn normalize(v: &[f64]) -> Vec<f64> {
    let norm = l2_norm(v);
    if norm == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}

/// Right-pad with zeros up to `len`. Longer inputs are returned as-is.
pub fn pad_to(v: &[f64], len: usize) -> Vec<f64> {
    let mut padded = v.to_vec();
    if padded.len() < len {
        padded.resize(len, 0.0);
    }
    padded
}

/// Cosine similarity: dot(a, b) / (|a| * |b|).
///
/// Defined as 0.0 when either vector has zero norm. Vectors of different
/// lengths never come from the same encoder, so they also score 0.0.
/// Unlike a clamped similarity, opposite directions keep their negative sign.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (norm_a * norm_b)
}
