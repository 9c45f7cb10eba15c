use super::attribution::{build_attribution, Attribution};
use crate::config::SimilarityConfig;
use crate::domain::PlayerId;
use crate::error::CoreError;
use crate::role::RoleVector;
use serde::Serialize;

/// One candidate's role and stats vectors, as assembled by the caller
/// from the Role Engine and Metric Engine (spec §2 control flow: the
/// Executor fetches both before handing them to the Similarity Engine).
#[derive(Debug, Clone)]
pub struct CandidateVectors {
    pub player_id: PlayerId,
    pub role: RoleVector,
    pub role_sufficient: bool,
    pub stats: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityResult {
    pub candidate: PlayerId,
    pub total: f64,
    pub role_component: f64,
    pub stats_component: f64,
    pub attribution: Attribution,
}

pub struct SimilarityEngine;

impl SimilarityEngine {
    /// Rank `candidates` by similarity to `reference` (spec §4.5).
    /// `metric_ids` labels `stats` for attribution only; vectors must
    /// already be aligned to it by the caller.
    pub fn similar_to(
        reference: &CandidateVectors,
        candidates: &[CandidateVectors],
        metric_ids: &[String],
        config: &SimilarityConfig,
        limit: usize,
    ) -> Result<Vec<SimilarityResult>, CoreError> {
        if !reference.role_sufficient {
            return Err(CoreError::ReferenceRoleInsufficient);
        }

        let pool_size = candidates.len() + 1;
        if pool_size < 2 {
            return Err(CoreError::CohortTooSmall { size: pool_size, minimum: 2 });
        }

        let others: Vec<&CandidateVectors> =
            candidates.iter().filter(|c| c.player_id != reference.player_id).collect();
        let self_and_others: Vec<&CandidateVectors> = std::iter::once(reference).chain(others).collect();

        if self_and_others.is_empty() {
            return Err(CoreError::NoCandidates);
        }

        let (w_role, w_stats) = config.normalized();

        let mut results: Vec<SimilarityResult> = self_and_others
            .iter()
            .map(|candidate| {
                let role_cos = reference.role.cosine(&candidate.role);
                let stats_cos = cosine(&reference.stats, &candidate.stats);

                let role_clamped = if config.clamp_negative { role_cos.max(0.0) } else { role_cos };
                let stats_clamped = if config.clamp_negative { stats_cos.max(0.0) } else { stats_cos };

                let role_component = w_role * role_clamped;
                let stats_component = w_stats * stats_clamped;
                let total = (role_component + stats_component).clamp(0.0, 1.0);

                let attribution = build_attribution(&reference.role, &candidate.role, &reference.stats, &candidate.stats, metric_ids);

                SimilarityResult {
                    candidate: candidate.player_id,
                    total,
                    role_component,
                    stats_component,
                    attribution,
                }
            })
            .collect();

        // Stable ordering by player id breaks ties deterministically (spec §5).
        results.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.candidate.0.cmp(&b.candidate.0))
        });
        results.truncate(limit);
        Ok(results)
    }
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    let denom = norm_a * norm_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn candidate(id: Uuid, role_seed: f64, stats: Vec<f64>) -> CandidateVectors {
        let mut raw = [0.0; 20];
        raw[0] = role_seed;
        raw[5] = 1.0 - role_seed;
        CandidateVectors {
            player_id: PlayerId(id),
            role: RoleVector(raw).normalized(),
            role_sufficient: true,
            stats,
        }
    }

    #[test]
    fn self_similarity_is_exactly_one() {
        let reference = candidate(Uuid::new_v4(), 0.7, vec![1.0, -0.5, 2.0]);
        let config = SimilarityConfig::default();
        let metric_ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let results = SimilarityEngine::similar_to(&reference, &[], &metric_ids, &config, 10);
        // A lone reference with no candidates is a CohortTooSmall error...
        assert!(matches!(results, Err(CoreError::CohortTooSmall { .. })));

        // ...but with one other candidate present, self still ranks 1.0.
        let other = candidate(Uuid::new_v4(), 0.2, vec![0.1, 0.2, 0.3]);
        let results = SimilarityEngine::similar_to(&reference, &[other], &metric_ids, &config, 10).unwrap();
        let self_row = results.iter().find(|r| r.candidate == reference.player_id).unwrap();
        assert!((self_row.total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn monotonicity_in_weights_isolates_each_component() {
        let reference = candidate(Uuid::new_v4(), 0.7, vec![1.0, 0.5, 2.0]);
        let other = candidate(Uuid::new_v4(), 0.3, vec![0.2, 1.5, -1.0]);
        let metric_ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let stats_only = SimilarityConfig { role_weight: 0.0, stats_weight: 1.0, clamp_negative: true };
        let role_only = SimilarityConfig { role_weight: 1.0, stats_weight: 0.0, clamp_negative: true };

        let results_stats =
            SimilarityEngine::similar_to(&reference, &[other.clone()], &metric_ids, &stats_only, 10).unwrap();
        let results_role =
            SimilarityEngine::similar_to(&reference, &[other], &metric_ids, &role_only, 10).unwrap();

        let other_stats_row = results_stats.iter().find(|r| r.candidate != reference.player_id).unwrap();
        let other_role_row = results_role.iter().find(|r| r.candidate != reference.player_id).unwrap();

        assert_eq!(other_stats_row.role_component, 0.0);
        assert_eq!(other_role_row.stats_component, 0.0);
    }
}
