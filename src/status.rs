// System status — corpus size, embedding store freshness.

use anyhow::Result;
use chrono::{DateTime, Local};
use colored::Colorize;

use crate::engine::Engine;

/// Snapshot of the corpus and the persisted store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStatus {
    pub corpus_users: usize,
    /// None when the store file doesn't exist yet
    pub stored_users: Option<usize>,
    pub last_built: Option<DateTime<Local>>,
    /// Corpus users with no stored embedding
    pub missing: Vec<String>,
    /// Stored users no longer in the corpus
    pub orphaned: Vec<String>,
}

impl StoreStatus {
    /// True when the store exists and covers exactly the corpus users.
    pub fn is_current(&self) -> bool {
        self.stored_users.is_some() && self.missing.is_empty() && self.orphaned.is_empty()
    }
}

/// Compare the corpus against the store on disk.
pub fn collect(engine: &Engine) -> Result<StoreStatus> {
    let corpus = engine.corpus();
    let path = engine.store_path();

    if !path.exists() {
        return Ok(StoreStatus {
            corpus_users: corpus.len(),
            stored_users: None,
            last_built: None,
            missing: corpus.user_ids().map(str::to_string).collect(),
            orphaned: Vec::new(),
        });
    }

    let store = engine.load_store()?;
    let last_built = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Local>::from);

    Ok(StoreStatus {
        corpus_users: corpus.len(),
        stored_users: Some(store.len()),
        last_built,
        missing: corpus
            .user_ids()
            .filter(|id| !store.contains(id))
            .map(str::to_string)
            .collect(),
        orphaned: store
            .iter()
            .map(|(id, _)| id)
            .filter(|id| !corpus.contains(id))
            .map(str::to_string)
            .collect(),
    })
}

/// Display system status to the terminal.
pub fn show(engine: &Engine, status: &StoreStatus) {
    println!("Corpus: {} users", status.corpus_users);
    println!("Embedding store: {}", engine.store_path().display());

    let Some(stored) = status.stored_users else {
        println!("  {}", "not built yet".yellow());
        println!("  Run `affinity build` to generate it");
        return;
    };

    match status.last_built {
        Some(built) => println!(
            "  {} users (built {})",
            stored,
            built.format("%Y-%m-%d %H:%M:%S")
        ),
        None => println!("  {} users", stored),
    }

    if status.is_current() {
        println!("  {}", "up to date with corpus".green());
        return;
    }

    if !status.missing.is_empty() {
        println!(
            "  {} {} corpus users have no embedding: {}",
            "!".yellow(),
            status.missing.len(),
            status.missing.join(", ").dimmed()
        );
    }
    if !status.orphaned.is_empty() {
        println!(
            "  {} {} stored users are no longer in the corpus: {}",
            "!".yellow(),
            status.orphaned.len(),
            status.orphaned.join(", ").dimmed()
        );
    }
    println!("  Run `affinity build` to refresh it");
}
