//! Similarity Engine (spec §4.5): ranks candidates by a weighted
//! combination of role-vector and stats-vector cosine similarity, with
//! per-result attribution.

mod attribution;
mod engine;

pub use attribution::{Attribution, MetricContribution, RoleBlockContribution};
pub use engine::{CandidateVectors, SimilarityEngine, SimilarityResult};
