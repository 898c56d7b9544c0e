// Corpus — the raw user profiles every component reads from.
//
// The corpus file is `{"users": {"<id>": {...}}}`. User order is the key
// order of the file and is preserved end to end: it is the iteration order
// behind every stable tie-break in the recommenders.

pub mod models;

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use models::{Behaviour, Bio, Graph, UserProfile};

/// All user profiles keyed by user id, in corpus order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    users: IndexMap<String, UserProfile>,
}

impl Corpus {
    /// Build a corpus from (id, profile) pairs. A repeated id keeps its first
    /// position and takes the last profile.
    pub fn from_users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = (S, UserProfile)>,
        S: Into<String>,
    {
        Self {
            users: users.into_iter().map(|(id, p)| (id.into(), p)).collect(),
        }
    }

    /// Parse a corpus document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse corpus JSON")
    }

    /// Load the corpus file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus file {}", path.display()))?;
        let corpus: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse corpus file {}", path.display()))?;

        info!(users = corpus.len(), path = %path.display(), "Loaded corpus");
        Ok(corpus)
    }

    pub fn get(&self, user_id: &str) -> Option<&UserProfile> {
        self.users.get(user_id)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.users.contains_key(user_id)
    }

    /// Iterate (id, profile) pairs in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UserProfile)> {
        self.users.iter().map(|(id, p)| (id.as_str(), p))
    }

    pub fn user_ids(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
