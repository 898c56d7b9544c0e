use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cluster::DEFAULT_SEED;

pub const DEFAULT_CORPUS_PATH: &str = "data/users.json";
pub const DEFAULT_STORE_PATH: &str = "embeddings/unified_embeddings.json";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every value
/// has a default, so an empty environment works against the standard layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Corpus JSON file (AFFINITY_CORPUS_PATH)
    pub corpus_path: PathBuf,
    /// Embedding store file written by `affinity build` (AFFINITY_STORE_PATH)
    pub store_path: PathBuf,
    /// k-means seed used when a command doesn't pass one (AFFINITY_CLUSTER_SEED)
    pub cluster_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from(DEFAULT_CORPUS_PATH),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            cluster_seed: DEFAULT_SEED,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let cluster_seed = match env::var("AFFINITY_CLUSTER_SEED") {
            Ok(raw) => raw.trim().parse().with_context(|| {
                format!("AFFINITY_CLUSTER_SEED must be a non-negative integer, got {raw:?}")
            })?,
            Err(_) => defaults.cluster_seed,
        };

        Ok(Self {
            corpus_path: env::var("AFFINITY_CORPUS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.corpus_path),
            store_path: env::var("AFFINITY_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            cluster_seed,
        })
    }

    /// Check that the corpus file exists.
    /// Call this before any operation that reads user profiles.
    pub fn require_corpus(&self) -> Result<()> {
        if !self.corpus_path.exists() {
            anyhow::bail!(
                "Corpus file not found at {}.\n\
                 Set AFFINITY_CORPUS_PATH in your .env file to point at your users.json.",
                self.corpus_path.display()
            );
        }
        Ok(())
    }

    /// Check that the embedding store has been built.
    pub fn require_store(&self) -> Result<()> {
        if !self.store_path.exists() {
            anyhow::bail!(
                "Embedding store not found at {}.\n\
                 Run `affinity build` to generate it.",
                self.store_path.display()
            );
        }
        Ok(())
    }
}
