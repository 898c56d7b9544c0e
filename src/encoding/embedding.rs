// Embedding encoder — low-dimensional, unit-length vectors per feature family.
//
// Bio text is hashed, behaviour counters and graph counts are rescaled by
// fixed divisors, and each family is L2-normalized on its own. The unified
// vector blends the three with fixed weights. The hash is content-addressed
// (SHA-256) so identical text always lands on the same value, run after run.

use sha2::{Digest, Sha256};

use super::vector::{normalize, pad_to, FeatureVector, VectorKind};
use crate::corpus::{Behaviour, Bio, Graph};

/// Unified vector blend weights: bio, behaviour, graph.
pub const UNIFIED_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

/// Fixed behaviour rescaling divisors. Product constants, not learned.
const LOGINS_SCALE: f64 = 10.0;
const MESSAGES_SCALE: f64 = 50.0;
const VIEWS_SCALE: f64 = 100.0;
const TIME_SCALE: f64 = 500.0;
const COUNT_SCALE: f64 = 10.0;

/// Buckets for folding a text hash into [0, 1).
const HASH_BUCKETS: u64 = 1000;

/// Map a text field to a stable value in [0, 1).
///
/// First eight bytes of the SHA-256 digest as a big-endian integer, modulo
/// 1000, divided by 1000.
pub fn hash_text(text: &str) -> f64 {
    let digest = Sha256::digest(text.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % HASH_BUCKETS) as f64 / HASH_BUCKETS as f64
}

/// 4-dim bio vector: hashed profession, interests, given tags, received tags.
///
/// List fields are space-joined before hashing, so order matters.
pub fn encode_bio(bio: &Bio) -> FeatureVector {
    let fields = [
        bio.profession.clone(),
        bio.interests.join(" "),
        bio.tags_given.join(" "),
        bio.tags_received.join(" "),
    ];
    let raw: Vec<f64> = fields.iter().map(|f| hash_text(f)).collect();
    FeatureVector::new(VectorKind::Bio, normalize(&raw))
}

/// 7-dim behaviour vector of rescaled counters.
pub fn encode_behaviour(behaviour: &Behaviour) -> FeatureVector {
    let raw = [
        behaviour.logins_per_week / LOGINS_SCALE,
        behaviour.messages_sent / MESSAGES_SCALE,
        behaviour.profile_views / VIEWS_SCALE,
        behaviour.time_spent_minutes / TIME_SCALE,
        behaviour.tags_given.len() as f64 / COUNT_SCALE,
        behaviour.tags_received.len() as f64 / COUNT_SCALE,
        behaviour.interactions.len() as f64 / COUNT_SCALE,
    ];
    FeatureVector::new(VectorKind::Behaviour, normalize(&raw))
}

/// 2-dim graph vector: connectivity and tag-interaction richness.
///
/// Richness counts distinct neighbors with any tag interaction, not tags.
pub fn encode_graph(graph: &Graph) -> FeatureVector {
    let raw = [
        graph.edges.len() as f64 / COUNT_SCALE,
        graph.tag_interactions.len() as f64 / COUNT_SCALE,
    ];
    FeatureVector::new(VectorKind::Graph, normalize(&raw))
}

/// Blend bio, behaviour and graph vectors into one unit vector.
///
/// All three are right-padded with zeros to the longest length, combined as
/// 0.5 * bio + 0.3 * behaviour + 0.2 * graph, then renormalized.
pub fn build_unified_vector(
    bio: &FeatureVector,
    behaviour: &FeatureVector,
    graph: &FeatureVector,
) -> FeatureVector {
    let len = bio.len().max(behaviour.len()).max(graph.len());
    let parts = [
        pad_to(bio.values(), len),
        pad_to(behaviour.values(), len),
        pad_to(graph.values(), len),
    ];

    let mut unified = vec![0.0; len];
    for (part, weight) in parts.iter().zip(UNIFIED_WEIGHTS) {
        for (acc, x) in unified.iter_mut().zip(part) {
            *acc += weight * x;
        }
    }

    FeatureVector::new(VectorKind::Unified, normalize(&unified))
}
