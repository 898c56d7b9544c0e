// Feature encoders — two independent ways of turning a profile into numbers.
//
// `embedding` feeds the embedding store and the similarity recommender.
// `cluster_raw` feeds the cluster engine. Their outputs are tagged with
// different VectorKinds and are never mixed.

pub mod cluster_raw;
pub mod embedding;
pub mod vector;

pub use vector::{FeatureVector, VectorKind};
