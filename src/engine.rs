// Engine — the four operations the display layer calls.
//
// The corpus is loaded once when the engine is opened. The embedding store
// is read from disk on every user recommendation, so a rebuild in another
// process is picked up on the next query. Saves replace the store file
// atomically, which means a query sees either the old store or the new one.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::cluster::{self, ClusterAssignment};
use crate::config::Config;
use crate::corpus::Corpus;
use crate::recommend::tags::{self, TagRecommendation};
use crate::recommend::users::{self, RecommendationResult};
use crate::store::EmbeddingStore;

pub struct Engine {
    corpus: Corpus,
    store_path: PathBuf,
}

impl Engine {
    pub fn new(corpus: Corpus, store_path: impl Into<PathBuf>) -> Self {
        Self {
            corpus,
            store_path: store_path.into(),
        }
    }

    /// Load the configured corpus.
    pub fn open(config: &Config) -> Result<Self> {
        config.require_corpus()?;
        let corpus = Corpus::load(&config.corpus_path)?;
        Ok(Self::new(corpus, config.store_path.clone()))
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Regenerate and persist the embedding store for the whole corpus.
    ///
    /// Always overwrites. Returns the number of users encoded.
    pub fn rebuild_embeddings(&self) -> Result<usize> {
        self.rebuild_embeddings_with(|_| {})
    }

    /// Same as `rebuild_embeddings`, reporting each encoded user to `on_user`.
    pub fn rebuild_embeddings_with<F>(&self, on_user: F) -> Result<usize>
    where
        F: FnMut(&str),
    {
        let store = EmbeddingStore::build_with(&self.corpus, on_user);
        store.save(&self.store_path)?;

        info!(users = store.len(), "Rebuilt embedding store");
        Ok(store.len())
    }

    /// Load the persisted store.
    pub fn load_store(&self) -> Result<EmbeddingStore> {
        EmbeddingStore::load(&self.store_path)
    }

    /// Rank users by similarity to `user_id` using the persisted store.
    pub fn recommend_users(&self, user_id: &str, top_k: usize) -> Result<Vec<RecommendationResult>> {
        let store = self.load_store()?;
        Ok(users::recommend_users(&store, user_id, top_k)?)
    }

    /// Suggest tags for `user_id` from overlapping users in the corpus.
    pub fn recommend_tags(&self, user_id: &str, top_k: usize) -> Result<Vec<TagRecommendation>> {
        Ok(tags::recommend_tags(&self.corpus, user_id, top_k)?)
    }

    /// Cluster the corpus and report the group containing `user_id`.
    pub fn cluster_for(&self, user_id: &str, n_clusters: usize, seed: u64) -> Result<ClusterAssignment> {
        Ok(cluster::cluster_for(&self.corpus, user_id, n_clusters, seed)?)
    }
}
