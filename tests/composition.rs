// Composition tests — the full flow from corpus file to every operation.
//
//   corpus file -> Engine -> embedding store file -> user recommendations
//   corpus file -> Engine -> tag recommendations / cluster assignment
//
// Files live in a temp directory per test.

use std::path::Path;

use affinity::cluster::DEFAULT_SEED;
use affinity::config::Config;
use affinity::engine::Engine;
use affinity::RecommendError;

const SCENARIO: &str = r#"{"users": {
    "u1": {"bio": {"interests": ["ml"]}, "graph": {"edges": ["u2"]}},
    "u2": {"bio": {"interests": ["ml", "nlp"]}, "graph": {"edges": ["u1"]}},
    "u3": {"bio": {"interests": ["cooking"]}, "graph": {"edges": []}}
}}"#;

fn engine_in(dir: &Path, corpus_json: &str) -> Engine {
    let corpus_path = dir.join("users.json");
    std::fs::write(&corpus_path, corpus_json).unwrap();
    let config = Config {
        corpus_path,
        store_path: dir.join("embeddings").join("unified_embeddings.json"),
        cluster_seed: DEFAULT_SEED,
    };
    Engine::open(&config).unwrap()
}

// ============================================================
// Three-user scenario
// ============================================================

#[test]
fn scenario_shared_interest_and_edge_ranks_u2_first() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path(), SCENARIO);
    engine.rebuild_embeddings().unwrap();

    let recs = engine.recommend_users("u1", 2).unwrap();
    let ids: Vec<&str> = recs.iter().map(|r| r.user_id.as_str()).collect();
    assert_eq!(ids, vec!["u2", "u3"]);
    assert!(recs[0].final_score > recs[1].final_score);

    // Mutual edges give identical graph vectors; u3 has none
    assert_eq!(recs[0].graph_similarity, 1.0);
    assert_eq!(recs[1].graph_similarity, 0.0);
}

#[test]
fn scenario_tags_include_nlp_and_exclude_ml() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path(), SCENARIO);

    let tags = engine.recommend_tags("u1", 5).unwrap();
    assert!(tags.iter().any(|t| t.tag == "nlp"), "nlp should be suggested: {tags:?}");
    assert!(tags.iter().all(|t| t.tag != "ml"), "ml is already held: {tags:?}");
    assert!(tags.iter().all(|t| t.tag != "cooking"), "u3 shares nothing with u1");

    let nlp = tags.iter().find(|t| t.tag == "nlp").unwrap();
    assert_eq!(nlp.score, 0.45);
}

#[test]
fn scenario_cluster_groups_u1_with_u2() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path(), SCENARIO);

    let assignment = engine.cluster_for("u1", 2, DEFAULT_SEED).unwrap();
    assert_eq!(assignment.members, vec!["u1", "u2"]);
    assert_ne!(assignment.labels["u3"], assignment.label);
}

// ============================================================
// Embedding store lifecycle
// ============================================================

#[test]
fn rebuild_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path(), SCENARIO);

    engine.rebuild_embeddings().unwrap();
    let first = std::fs::read(engine.store_path()).unwrap();
    engine.rebuild_embeddings().unwrap();
    let second = std::fs::read(engine.store_path()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn rebuild_overwrites_previous_store() {
    let dir = tempfile::tempdir().unwrap();
    engine_in(dir.path(), SCENARIO).rebuild_embeddings().unwrap();

    let engine = engine_in(dir.path(), r#"{"users": {"solo": {}, "duo": {}}}"#);
    assert_eq!(engine.rebuild_embeddings().unwrap(), 2);

    let store = engine.load_store().unwrap();
    assert!(store.contains("solo"));
    assert!(!store.contains("u1"));
}

#[test]
fn recommend_before_build_fails_without_panicking() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path(), SCENARIO);
    assert!(engine.recommend_users("u1", 3).is_err());
}

// ============================================================
// Error surface
// ============================================================

#[test]
fn unknown_user_is_the_same_error_everywhere() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path(), SCENARIO);
    engine.rebuild_embeddings().unwrap();

    let expected = RecommendError::UserNotFound("ghost".to_string());

    let err = engine.recommend_users("ghost", 3).unwrap_err();
    assert_eq!(err.downcast_ref::<RecommendError>(), Some(&expected));

    let err = engine.recommend_tags("ghost", 3).unwrap_err();
    assert_eq!(err.downcast_ref::<RecommendError>(), Some(&expected));

    let err = engine.cluster_for("ghost", 2, DEFAULT_SEED).unwrap_err();
    assert_eq!(err.downcast_ref::<RecommendError>(), Some(&expected));
}

#[test]
fn cluster_count_above_corpus_size_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path(), SCENARIO);

    let err = engine.cluster_for("u1", 4, DEFAULT_SEED).unwrap_err();
    assert_eq!(
        err.downcast_ref::<RecommendError>(),
        Some(&RecommendError::InvalidClusterCount {
            requested: 4,
            corpus_size: 3
        })
    );
}
