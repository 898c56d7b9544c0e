// Tag recommender — suggest tags held by users who overlap with the target.
//
// Similarity here is a weighted sum of raw overlap counts (shared interests,
// shared interactions, shared behaviour tags, shared edges), not a ratio.
// Every user with positive similarity adds that similarity to each tag they
// hold. Tags the target already holds are dropped at the end.

use std::collections::HashSet;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::round_to;
use crate::corpus::{Corpus, UserProfile};
use crate::error::RecommendError;

/// Decimal places kept on reported tag scores.
const SCORE_DECIMALS: u32 = 3;

/// Weights applied to each overlap count.
#[derive(Debug, Clone, PartialEq)]
pub struct TagWeights {
    /// Shared bio interests (default 0.45)
    pub interests: f64,
    /// Shared behaviour interactions (default 0.35)
    pub interactions: f64,
    /// Shared behaviour tags, given or received (default 0.10)
    pub tags: f64,
    /// Shared graph edges (default 0.10)
    pub edges: f64,
}

impl Default for TagWeights {
    fn default() -> Self {
        Self {
            interests: 0.45,
            interactions: 0.35,
            tags: 0.10,
            edges: 0.10,
        }
    }
}

/// A suggested tag and its accumulated score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecommendation {
    pub tag: String,
    pub score: f64,
}

/// Count of distinct elements two lists have in common.
fn overlap<T: Eq + Hash>(a: impl IntoIterator<Item = T>, b: impl IntoIterator<Item = T>) -> usize {
    let a: HashSet<T> = a.into_iter().collect();
    let b: HashSet<T> = b.into_iter().collect();
    a.intersection(&b).count()
}

/// Weighted overlap similarity between two users.
pub fn overlap_similarity(target: &UserProfile, other: &UserProfile, weights: &TagWeights) -> f64 {
    let interests = overlap(&target.bio.interests, &other.bio.interests);
    let interactions = overlap(&target.behaviour.interactions, &other.behaviour.interactions);
    let tags = overlap(
        target.behaviour.exchanged_tags(),
        other.behaviour.exchanged_tags(),
    );
    let edges = overlap(&target.graph.edges, &other.graph.edges);

    weights.interests * interests as f64
        + weights.interactions * interactions as f64
        + weights.tags * tags as f64
        + weights.edges * edges as f64
}

/// Recommend tags for `target_id` with default weights.
pub fn recommend_tags(
    corpus: &Corpus,
    target_id: &str,
    top_k: usize,
) -> Result<Vec<TagRecommendation>, RecommendError> {
    recommend_tags_with(corpus, target_id, top_k, &TagWeights::default())
}

/// Recommend tags for `target_id`.
///
/// Scores accumulate in first-seen order over the corpus. The final ranking
/// is by score descending with ties kept in that order; scores are rounded
/// to three decimal places.
pub fn recommend_tags_with(
    corpus: &Corpus,
    target_id: &str,
    top_k: usize,
    weights: &TagWeights,
) -> Result<Vec<TagRecommendation>, RecommendError> {
    let target = corpus
        .get(target_id)
        .ok_or_else(|| RecommendError::UserNotFound(target_id.to_string()))?;
    let held = target.held_tags();

    let scores = corpus
        .iter()
        .filter(|(user_id, _)| *user_id != target_id)
        .map(|(_, other)| (other, overlap_similarity(target, other, weights)))
        .filter(|(_, similarity)| *similarity > 0.0)
        .fold(IndexMap::<&str, f64>::new(), |mut scores, (other, similarity)| {
            for tag in other.held_tags() {
                *scores.entry(tag).or_insert(0.0) += similarity;
            }
            scores
        });

    let mut ranked: Vec<(&str, f64)> = scores
        .into_iter()
        .filter(|(tag, _)| !held.contains(tag))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(top_k);

    debug!(
        target = target_id,
        returned = ranked.len(),
        "Ranked candidate tags"
    );

    Ok(ranked
        .into_iter()
        .map(|(tag, score)| TagRecommendation {
            tag: tag.to_string(),
            score: round_to(score, SCORE_DECIMALS),
        })
        .collect())
}
