// Raw user profile records as they appear in the corpus file.
//
// Every field is optional in the file. Missing counters read as 0 and
// missing collections as empty, so a sparse record never fails to parse.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// One user's full profile: static bio, usage telemetry, and social graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub bio: Bio,
    pub behaviour: Behaviour,
    pub graph: Graph,
}

/// Static profile attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bio {
    pub profession: String,
    pub interests: Vec<String>,
    pub tags_given: Vec<String>,
    pub tags_received: Vec<String>,
}

/// Usage telemetry. Counters are non-negative but may be fractional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Behaviour {
    pub logins_per_week: f64,
    pub messages_sent: f64,
    pub profile_views: f64,
    pub time_spent_minutes: f64,
    pub interactions: Vec<String>,
    pub tags_given: Vec<String>,
    pub tags_received: Vec<String>,
}

/// Direct connections plus the tags exchanged with each neighbor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Graph {
    pub edges: Vec<String>,
    pub tag_interactions: IndexMap<String, Vec<String>>,
}

impl Behaviour {
    /// Given and received behaviour tags as one de-duplicated set.
    pub fn exchanged_tags(&self) -> IndexSet<&str> {
        self.tags_given
            .iter()
            .chain(self.tags_received.iter())
            .map(String::as_str)
            .collect()
    }
}

impl Graph {
    /// Total number of tag entries across all neighbors (duplicates count).
    pub fn tag_interaction_count(&self) -> usize {
        self.tag_interactions.values().map(Vec::len).sum()
    }
}

impl UserProfile {
    /// Every tag-like signal a user holds: bio interests, behaviour tags given
    /// and received, and every tag exchanged over a graph edge.
    ///
    /// De-duplicated, in first-seen order. This is both the pool of tags a
    /// user can contribute to someone else's recommendations and the set a
    /// target user must never be recommended.
    pub fn held_tags(&self) -> IndexSet<&str> {
        self.bio
            .interests
            .iter()
            .chain(self.behaviour.tags_given.iter())
            .chain(self.behaviour.tags_received.iter())
            .chain(self.graph.tag_interactions.values().flatten())
            .map(String::as_str)
            .collect()
    }
}
