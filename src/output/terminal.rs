// Colored terminal output for user, tag and cluster results.
//
// main.rs delegates all result rendering here.

use colored::Colorize;

use crate::cluster::ClusterAssignment;
use crate::corpus::Corpus;
use crate::recommend::tags::TagRecommendation;
use crate::recommend::users::RecommendationResult;

/// Display the corpus user ids, one per line.
pub fn display_user_list(corpus: &Corpus) {
    println!(
        "\n{}",
        format!("=== Users ({}) ===", corpus.len()).bold()
    );
    for (id, profile) in corpus.iter() {
        let profession = if profile.bio.profession.is_empty() {
            "-".dimmed().to_string()
        } else {
            profile.bio.profession.clone()
        };
        println!("  {:<20} {}", id, profession);
    }
}

/// Display a ranked list of similar users.
pub fn display_recommendations(target: &str, recs: &[RecommendationResult]) {
    if recs.is_empty() {
        println!("No recommendations found for {target}.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Users similar to {target} ===").bold()
    );
    println!();
    println!(
        "  {:>4}  {:<20} {:>7}  {:>7}  {:>9}  {:>7}",
        "Rank".dimmed(),
        "User".dimmed(),
        "Score".dimmed(),
        "Bio".dimmed(),
        "Behaviour".dimmed(),
        "Graph".dimmed(),
    );
    println!("  {}", "-".repeat(66).dimmed());

    for (i, rec) in recs.iter().enumerate() {
        println!(
            "  {:>4}. {:<20} {:>7.4}  {:>7.4}  {:>9.4}  {:>7.4}  {}",
            i + 1,
            rec.user_id,
            rec.final_score,
            rec.bio_similarity,
            rec.behaviour_similarity,
            rec.graph_similarity,
            colorize_bar(rec.final_score),
        );
    }
    println!();
}

/// Display recommended tags with their accumulated scores.
pub fn display_tags(target: &str, tags: &[TagRecommendation]) {
    if tags.is_empty() {
        println!("No tag recommendations for {target}.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Tags recommended for {target} ===").bold()
    );
    println!();
    for (i, rec) in tags.iter().enumerate() {
        println!("  {:>2}. {:<24} score: {:.3}", i + 1, rec.tag.bold(), rec.score);
    }
    println!();
}

/// Display the queried user's cluster and its members.
pub fn display_cluster(assignment: &ClusterAssignment, n_clusters: usize) {
    println!(
        "\n{}",
        format!(
            "=== {} belongs to cluster {} (of {}) ===",
            assignment.user_id, assignment.label, n_clusters
        )
        .bold()
    );
    println!();
    println!("  Users in same cluster:");
    for member in &assignment.members {
        if *member == assignment.user_id {
            println!("   - {} {}", member.bold(), "(you)".dimmed());
        } else {
            println!("   - {member}");
        }
    }
    println!(
        "\n  {}",
        format!(
            "{} of {} users, inertia {:.2}",
            assignment.members.len(),
            assignment.labels.len(),
            assignment.inertia
        )
        .dimmed()
    );
}

/// Color a score bar by strength.
fn colorize_bar(score: f64) -> colored::ColoredString {
    let bar = super::score_bar(score, 10);
    if score >= 0.75 {
        bar.bright_green()
    } else if score >= 0.4 {
        bar.bright_yellow()
    } else {
        bar.bright_blue()
    }
}
