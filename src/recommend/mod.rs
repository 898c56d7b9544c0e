// Recommenders — ranked users from the embedding store, ranked tags from
// the raw corpus.

pub mod tags;
pub mod users;

/// Round to a fixed number of decimal places, half away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
