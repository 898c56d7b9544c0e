// Embedding store — the persisted per-user embedding vectors.
//
// Rebuilt wholesale from the corpus and written as a single JSON document.
// Saves go to a temp file in the destination directory and are renamed over
// the old file, so a reader sees either the previous store or the new one,
// never a half-written file.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::corpus::{Corpus, UserProfile};
use crate::encoding::embedding::{
    build_unified_vector, encode_behaviour, encode_bio, encode_graph,
};
use crate::encoding::{FeatureVector, VectorKind};

/// One user's four embedding vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRecord {
    bio: FeatureVector,
    behaviour: FeatureVector,
    graph: FeatureVector,
    unified: FeatureVector,
}

impl EmbeddingRecord {
    /// Run the embedding encoder over one profile.
    pub fn encode(profile: &UserProfile) -> Self {
        let bio = encode_bio(&profile.bio);
        let behaviour = encode_behaviour(&profile.behaviour);
        let graph = encode_graph(&profile.graph);
        let unified = build_unified_vector(&bio, &behaviour, &graph);
        Self {
            bio,
            behaviour,
            graph,
            unified,
        }
    }

    /// Assemble a record from existing vectors, checking each one's kind.
    pub fn from_parts(
        bio: FeatureVector,
        behaviour: FeatureVector,
        graph: FeatureVector,
        unified: FeatureVector,
    ) -> Result<Self> {
        for (vector, expected) in [
            (&bio, VectorKind::Bio),
            (&behaviour, VectorKind::Behaviour),
            (&graph, VectorKind::Graph),
            (&unified, VectorKind::Unified),
        ] {
            if vector.kind() != expected {
                anyhow::bail!(
                    "Expected a {expected} vector in embedding record, got {}",
                    vector.kind()
                );
            }
        }
        Ok(Self {
            bio,
            behaviour,
            graph,
            unified,
        })
    }

    pub fn bio(&self) -> &FeatureVector {
        &self.bio
    }

    pub fn behaviour(&self) -> &FeatureVector {
        &self.behaviour
    }

    pub fn graph(&self) -> &FeatureVector {
        &self.graph
    }

    pub fn unified(&self) -> &FeatureVector {
        &self.unified
    }
}

/// On-disk shape of a record: four plain arrays.
#[derive(Serialize, Deserialize)]
struct StoredRecord {
    #[serde(default)]
    bio_vec: Vec<f64>,
    #[serde(default)]
    behaviour_vec: Vec<f64>,
    #[serde(default)]
    graph_vec: Vec<f64>,
    #[serde(default)]
    unified_vec: Vec<f64>,
}

impl From<&EmbeddingRecord> for StoredRecord {
    fn from(record: &EmbeddingRecord) -> Self {
        Self {
            bio_vec: record.bio.values().to_vec(),
            behaviour_vec: record.behaviour.values().to_vec(),
            graph_vec: record.graph.values().to_vec(),
            unified_vec: record.unified.values().to_vec(),
        }
    }
}

impl From<StoredRecord> for EmbeddingRecord {
    fn from(stored: StoredRecord) -> Self {
        Self {
            bio: FeatureVector::new(VectorKind::Bio, stored.bio_vec),
            behaviour: FeatureVector::new(VectorKind::Behaviour, stored.behaviour_vec),
            graph: FeatureVector::new(VectorKind::Graph, stored.graph_vec),
            unified: FeatureVector::new(VectorKind::Unified, stored.unified_vec),
        }
    }
}

/// Embedding records keyed by user id, in corpus order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingStore {
    records: IndexMap<String, EmbeddingRecord>,
}

impl EmbeddingStore {
    /// Encode every user in the corpus.
    pub fn build(corpus: &Corpus) -> Self {
        Self::build_with(corpus, |_| {})
    }

    /// Encode every user, calling `on_user` after each one (for progress display).
    pub fn build_with<F>(corpus: &Corpus, mut on_user: F) -> Self
    where
        F: FnMut(&str),
    {
        let mut records = IndexMap::with_capacity(corpus.len());
        for (user_id, profile) in corpus.iter() {
            records.insert(user_id.to_string(), EmbeddingRecord::encode(profile));
            on_user(user_id);
        }

        debug!(users = records.len(), "Built embedding records");
        Self { records }
    }

    /// Assemble a store from already-built records, keeping the given order.
    pub fn from_records<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = (S, EmbeddingRecord)>,
        S: Into<String>,
    {
        Self {
            records: records.into_iter().map(|(id, r)| (id.into(), r)).collect(),
        }
    }

    pub fn get(&self, user_id: &str) -> Option<&EmbeddingRecord> {
        self.records.get(user_id)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.records.contains_key(user_id)
    }

    /// Iterate (id, record) pairs in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EmbeddingRecord)> {
        self.records.iter().map(|(id, r)| (id.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize the whole store as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let stored: IndexMap<&str, StoredRecord> = self
            .records
            .iter()
            .map(|(id, r)| (id.as_str(), StoredRecord::from(r)))
            .collect();
        serde_json::to_string_pretty(&stored).context("Failed to serialize embedding store")
    }

    /// Parse a store document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let stored: IndexMap<String, StoredRecord> =
            serde_json::from_str(json).context("Failed to parse embedding store JSON")?;
        Ok(Self {
            records: stored
                .into_iter()
                .map(|(id, s)| (id, EmbeddingRecord::from(s)))
                .collect(),
        })
    }

    /// Write the store to `path`, replacing any previous file atomically.
    ///
    /// Any failure leaves the previous file in place.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .context("Failed to write embedding store")?;
        tmp.as_file()
            .sync_all()
            .context("Failed to flush embedding store")?;
        tmp.persist(path)
            .with_context(|| format!("Failed to replace embedding store {}", path.display()))?;

        info!(users = self.len(), path = %path.display(), "Saved embedding store");
        Ok(())
    }

    /// Read a whole store file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read embedding store {}", path.display()))?;
        let store = Self::from_json_str(&json)
            .with_context(|| format!("Invalid embedding store {}", path.display()))?;

        debug!(users = store.len(), path = %path.display(), "Loaded embedding store");
        Ok(store)
    }
}
