// Similarity recommender — rank other users by weighted cosine similarity.
//
// Each candidate is compared to the target on the bio, behaviour and graph
// embeddings independently; the three similarities are blended with fixed
// weights. The unified vector is not used for ranking.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::round_to;
use crate::error::RecommendError;
use crate::store::EmbeddingStore;

/// Decimal places kept on every reported similarity.
const SCORE_DECIMALS: u32 = 4;

/// Blend weights for the final user score.
///
/// `final = bio * bio_similarity + behaviour * behaviour_similarity
///        + graph * graph_similarity`
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityWeights {
    /// Weight on bio cosine similarity (default 0.5)
    pub bio: f64,
    /// Weight on behaviour cosine similarity (default 0.3)
    pub behaviour: f64,
    /// Weight on graph cosine similarity (default 0.2)
    pub graph: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            bio: 0.5,
            behaviour: 0.3,
            graph: 0.2,
        }
    }
}

/// One ranked candidate user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub user_id: String,
    pub bio_similarity: f64,
    pub behaviour_similarity: f64,
    pub graph_similarity: f64,
    pub final_score: f64,
}

/// Rank every other user in the store against `target_id` with default weights.
pub fn recommend_users(
    store: &EmbeddingStore,
    target_id: &str,
    top_k: usize,
) -> Result<Vec<RecommendationResult>, RecommendError> {
    recommend_users_with(store, target_id, top_k, &SimilarityWeights::default())
}

/// Rank every other user in the store against `target_id`.
///
/// Results are sorted by final score descending. The sort is stable, so equal
/// scores keep store order. At most `top_k` results are returned and every
/// number is rounded to four decimal places.
pub fn recommend_users_with(
    store: &EmbeddingStore,
    target_id: &str,
    top_k: usize,
    weights: &SimilarityWeights,
) -> Result<Vec<RecommendationResult>, RecommendError> {
    let target = store
        .get(target_id)
        .ok_or_else(|| RecommendError::UserNotFound(target_id.to_string()))?;

    let mut results: Vec<RecommendationResult> = store
        .iter()
        .filter(|(user_id, _)| *user_id != target_id)
        .map(|(user_id, other)| {
            let bio = similarity(target.bio().cosine(other.bio()));
            let behaviour = similarity(target.behaviour().cosine(other.behaviour()));
            let graph = similarity(target.graph().cosine(other.graph()));
            let final_score =
                weights.bio * bio + weights.behaviour * behaviour + weights.graph * graph;

            RecommendationResult {
                user_id: user_id.to_string(),
                bio_similarity: round_to(bio, SCORE_DECIMALS),
                behaviour_similarity: round_to(behaviour, SCORE_DECIMALS),
                graph_similarity: round_to(graph, SCORE_DECIMALS),
                final_score: round_to(final_score, SCORE_DECIMALS),
            }
        })
        .collect();

    // Ranking uses the rounded score, so near-ties fall back to store order
    results.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    results.truncate(top_k);

    debug!(
        target = target_id,
        candidates = store.len().saturating_sub(1),
        returned = results.len(),
        "Ranked similar users"
    );

    Ok(results)
}

/// Records in the store always pair vectors of the same kind.
fn similarity(cosine: Option<f64>) -> f64 {
    cosine.unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{FeatureVector, VectorKind};
    use crate::store::EmbeddingRecord;

    fn record(bio: Vec<f64>, behaviour: Vec<f64>, graph: Vec<f64>) -> EmbeddingRecord {
        EmbeddingRecord::from_parts(
            FeatureVector::new(VectorKind::Bio, bio),
            FeatureVector::new(VectorKind::Behaviour, behaviour),
            FeatureVector::new(VectorKind::Graph, graph),
            FeatureVector::new(VectorKind::Unified, vec![]),
        )
        .unwrap()
    }

    fn store(records: Vec<(&str, EmbeddingRecord)>) -> EmbeddingStore {
        EmbeddingStore::from_records(records)
    }

    #[test]
    fn test_unknown_target() {
        let s = store(vec![("a", record(vec![1.0], vec![1.0], vec![1.0]))]);
        assert_eq!(
            recommend_users(&s, "missing", 5),
            Err(RecommendError::UserNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_weighted_final_score() {
        let s = store(vec![
            ("t", record(vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0])),
            // bio identical, behaviour orthogonal, graph identical
            ("c", record(vec![1.0, 0.0], vec![0.0, 1.0], vec![2.0, 0.0])),
        ]);
        let recs = recommend_users(&s, "t", 5).unwrap();
        assert_eq!(recs.len(), 1);
        let r = &recs[0];
        assert_eq!(r.user_id, "c");
        assert_eq!(r.bio_similarity, 1.0);
        assert_eq!(r.behaviour_similarity, 0.0);
        assert_eq!(r.graph_similarity, 1.0);
        assert!((r.final_score - 0.7).abs() < 1e-12, "Expected 0.7, got {}", r.final_score);
    }

    #[test]
    fn test_ties_keep_store_order() {
        let same = || record(vec![1.0], vec![1.0], vec![1.0]);
        let s = store(vec![("t", same()), ("b", same()), ("a", same()), ("c", same())]);
        let ids: Vec<String> = recommend_users(&s, "t", 10)
            .unwrap()
            .into_iter()
            .map(|r| r.user_id)
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_zero_vectors_score_zero() {
        let s = store(vec![
            ("t", record(vec![0.0, 0.0], vec![0.0], vec![0.0])),
            ("c", record(vec![1.0, 0.0], vec![1.0], vec![1.0])),
        ]);
        let recs = recommend_users(&s, "t", 1).unwrap();
        assert_eq!(recs[0].final_score, 0.0);
    }

    #[test]
    fn test_custom_weights() {
        let s = store(vec![
            ("t", record(vec![1.0], vec![1.0], vec![1.0])),
            ("c", record(vec![1.0], vec![1.0], vec![1.0])),
        ]);
        let weights = SimilarityWeights {
            bio: 1.0,
            behaviour: 0.0,
            graph: 0.0,
        };
        let recs = recommend_users_with(&s, "t", 1, &weights).unwrap();
        assert_eq!(recs[0].final_score, 1.0);
    }

    #[test]
    fn test_top_k_zero_is_empty() {
        let s = store(vec![
            ("t", record(vec![1.0], vec![1.0], vec![1.0])),
            ("c", record(vec![1.0], vec![1.0], vec![1.0])),
        ]);
        assert!(recommend_users(&s, "t", 0).unwrap().is_empty());
    }
}
