// Output formatting — terminal display for recommendations and clusters.

pub mod terminal;

/// Fixed-width text bar for a score in [0, 1]. Out-of-range scores are clamped.
pub fn score_bar(score: f64, width: usize) -> String {
    let filled = (score.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("[{}{}]", "=".repeat(filled), " ".repeat(width - filled))
}
