// Affinity: user, tag and cluster recommendations from profile data
//
// This is the library root. Each module corresponds to a stage of the
// recommendation flow: corpus -> encoders -> store -> recommenders, with
// the cluster engine reading the corpus directly.

pub mod cluster;
pub mod config;
pub mod corpus;
pub mod encoding;
pub mod engine;
pub mod error;
pub mod output;
pub mod recommend;
pub mod status;
pub mod store;

pub use error::RecommendError;
