// Cluster raw encoder — wide, unnormalized rows for k-means.
//
// Two phases: build a Vocabulary from the whole corpus, then encode each
// user against it. Column layout depends on every user in the corpus, so a
// Vocabulary is only valid for the corpus it was built from. Rebuild it
// whenever the corpus changes.

use std::collections::{BTreeSet, HashSet};

use super::vector::{FeatureVector, VectorKind};
use crate::corpus::{Corpus, UserProfile};

/// Number of trailing numeric columns: four behaviour counters, edge count,
/// tag-interaction total.
pub const NUMERIC_COLUMNS: usize = 6;

/// Corpus-wide column vocabularies, sorted lexicographically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    /// Every distinct bio interest.
    pub interests: Vec<String>,
    /// Every distinct bio or behaviour tag, given or received.
    pub tags: Vec<String>,
}

impl Vocabulary {
    /// Scan the whole corpus once and collect both vocabularies.
    pub fn build(corpus: &Corpus) -> Self {
        let mut interests = BTreeSet::new();
        let mut tags = BTreeSet::new();

        for (_, user) in corpus.iter() {
            interests.extend(user.bio.interests.iter().cloned());
            tags.extend(user.bio.tags_given.iter().cloned());
            tags.extend(user.bio.tags_received.iter().cloned());
            tags.extend(user.behaviour.tags_given.iter().cloned());
            tags.extend(user.behaviour.tags_received.iter().cloned());
        }

        Self {
            interests: interests.into_iter().collect(),
            tags: tags.into_iter().collect(),
        }
    }

    /// Row width produced by `encode_user` with this vocabulary.
    pub fn dimension(&self) -> usize {
        self.interests.len() + 2 * self.tags.len() + NUMERIC_COLUMNS
    }
}

/// Encode one user as a cluster-raw row.
///
/// Layout: interest one-hot, one-hot of tags the user gave or received
/// (bio and behaviour), one-hot of tags received (bio and behaviour), the
/// four raw behaviour counters, edge count, total tag-interaction entries.
pub fn encode_user(user: &UserProfile, vocab: &Vocabulary) -> FeatureVector {
    let interests: HashSet<&str> = user.bio.interests.iter().map(String::as_str).collect();

    let received: HashSet<&str> = user
        .bio
        .tags_received
        .iter()
        .chain(&user.behaviour.tags_received)
        .map(String::as_str)
        .collect();

    let mut given_or_received: HashSet<&str> = user
        .bio
        .tags_given
        .iter()
        .chain(&user.behaviour.tags_given)
        .map(String::as_str)
        .collect();
    given_or_received.extend(received.iter().copied());

    let mut row = Vec::with_capacity(vocab.dimension());
    row.extend(vocab.interests.iter().map(|i| one_hot(&interests, i)));
    row.extend(vocab.tags.iter().map(|t| one_hot(&given_or_received, t)));
    row.extend(vocab.tags.iter().map(|t| one_hot(&received, t)));

    row.push(user.behaviour.logins_per_week);
    row.push(user.behaviour.messages_sent);
    row.push(user.behaviour.profile_views);
    row.push(user.behaviour.time_spent_minutes);
    row.push(user.graph.edges.len() as f64);
    row.push(user.graph.tag_interaction_count() as f64);

    FeatureVector::new(VectorKind::ClusterRaw, row)
}

fn one_hot(set: &HashSet<&str>, column: &str) -> f64 {
    if set.contains(column) {
        1.0
    } else {
        0.0
    }
}
