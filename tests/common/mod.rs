// Shared fixtures for integration tests.

#![allow(dead_code)]

use affinity::corpus::{Corpus, UserProfile};

const INTERESTS: &[&str] = &["ml", "nlp", "rust", "cooking", "hiking", "chess", "jazz"];
const TAGS: &[&str] = &["helpful", "kind", "mentor", "funny", "expert"];
const PROFESSIONS: &[&str] = &["engineer", "chef", "teacher", ""];

fn pick(pool: &[&str], i: usize, count: usize) -> Vec<String> {
    (0..count)
        .map(|j| pool[(i * 3 + j * 2) % pool.len()].to_string())
        .collect()
}

/// A deterministic corpus of `n` users with overlapping interests, tags and
/// edges, built from index arithmetic so every run sees the same data.
pub fn synthetic_corpus(n: usize) -> Corpus {
    Corpus::from_users((0..n).map(|i| {
        let mut user = UserProfile::default();
        user.bio.profession = PROFESSIONS[i % PROFESSIONS.len()].to_string();
        user.bio.interests = pick(INTERESTS, i, 1 + i % 3);
        user.bio.tags_received = pick(TAGS, i + 1, i % 2);

        user.behaviour.logins_per_week = (i % 7) as f64;
        user.behaviour.messages_sent = (i * 13 % 90) as f64;
        user.behaviour.profile_views = (i * 29 % 200) as f64;
        user.behaviour.time_spent_minutes = (i * 47 % 600) as f64;
        user.behaviour.interactions = (0..i % 4).map(|j| format!("post{}", (i + j) % 5)).collect();
        user.behaviour.tags_given = pick(TAGS, i, i % 3);
        user.behaviour.tags_received = pick(TAGS, i + 2, 1);

        user.graph.edges = (1..=i % 3).map(|d| format!("user{}", (i + d) % n)).collect();
        if i % 2 == 0 {
            let neighbor = format!("user{}", (i + 1) % n);
            user.graph
                .tag_interactions
                .insert(neighbor, pick(TAGS, i + 3, 2));
        }

        (format!("user{i}"), user)
    }))
}
