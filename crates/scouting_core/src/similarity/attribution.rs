use crate::role::RoleVector;
use serde::Serialize;

/// Per-metric contribution to the stats-vector dot product, used both
/// to rank "closest" and "most differs" metrics in attribution output.
#[derive(Debug, Clone, Serialize)]
pub struct MetricContribution {
    pub metric_id: String,
    pub contribution: f64,
}

/// Per-block contribution to the role-vector dot product.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoleBlockContribution {
    pub block: &'static str,
    pub contribution: f64,
}

/// A short attribution for one similarity result (spec §4.5): the top
/// three metrics where the candidate is closest to the reference, the
/// top three where it most differs, and the role-vector block
/// breakdown behind the role component.
#[derive(Debug, Clone, Serialize)]
pub struct Attribution {
    pub closest_metrics: Vec<MetricContribution>,
    pub differing_metrics: Vec<MetricContribution>,
    pub role_blocks: Vec<RoleBlockContribution>,
}

pub fn metric_contributions(
    reference_stats: &[f64],
    candidate_stats: &[f64],
    metric_ids: &[String],
) -> Vec<MetricContribution> {
    metric_ids
        .iter()
        .zip(reference_stats.iter().zip(candidate_stats.iter()))
        .map(|(id, (r, c))| MetricContribution { metric_id: id.clone(), contribution: r * c })
        .collect()
}

pub fn role_block_contributions(reference_role: &RoleVector, candidate_role: &RoleVector) -> Vec<RoleBlockContribution> {
    use crate::role::{PASS_DIRECTION_RANGE, POSITION_RANGE, SPREAD_RANGE, ZONE_RANGE};
    let blocks = [
        ("position", POSITION_RANGE),
        ("spread", SPREAD_RANGE),
        ("zone", ZONE_RANGE),
        ("pass_direction", PASS_DIRECTION_RANGE),
    ];
    blocks
        .into_iter()
        .map(|(name, range)| {
            let contribution: f64 = reference_role
                .block(range.clone())
                .iter()
                .zip(candidate_role.block(range))
                .map(|(r, c)| r * c)
                .sum();
            RoleBlockContribution { block: name, contribution }
        })
        .collect()
}

impl Attribution {
    /// Render as a short human-readable explanation, for a scout reading
    /// the result rather than a program consuming `closest_metrics` and
    /// `differing_metrics` directly.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push("closest on:".to_string());
        lines.extend(self.closest_metrics.iter().map(|m| format!("  {} ({:+.3})", m.metric_id, m.contribution)));
        lines.push("differs most on:".to_string());
        lines.extend(self.differing_metrics.iter().map(|m| format!("  {} ({:+.3})", m.metric_id, m.contribution)));
        lines.push("role blocks:".to_string());
        lines.extend(self.role_blocks.iter().map(|b| format!("  {}: {:+.3}", b.block, b.contribution)));
        lines
    }
}

impl std::fmt::Display for Attribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lines().join("\n"))
    }
}

pub fn build_attribution(
    reference_role: &RoleVector,
    candidate_role: &RoleVector,
    reference_stats: &[f64],
    candidate_stats: &[f64],
    metric_ids: &[String],
) -> Attribution {
    let mut contributions = metric_contributions(reference_stats, candidate_stats, metric_ids);
    contributions.sort_by(|a, b| b.contribution.partial_cmp(&a.contribution).unwrap_or(std::cmp::Ordering::Equal));
    let closest_metrics = contributions.iter().take(3).cloned().collect();
    let differing_metrics = contributions.iter().rev().take(3).cloned().collect();

    let role_blocks = role_block_contributions(reference_role, candidate_role);

    Attribution { closest_metrics, differing_metrics, role_blocks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_attribution_ranks_closest_and_differing_by_contribution() {
        let reference_stats = vec![2.0, 1.0, -1.0];
        let candidate_stats = vec![2.0, -1.0, 1.0];
        let metric_ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let role = RoleVector::zero();

        let attribution = build_attribution(&role, &role, &reference_stats, &candidate_stats, &metric_ids);
        assert_eq!(attribution.closest_metrics[0].metric_id, "a");
        assert_eq!(attribution.differing_metrics[0].metric_id, "b");
    }

    #[test]
    fn to_lines_covers_both_metric_sections_and_role_blocks() {
        let reference_stats = vec![1.0];
        let candidate_stats = vec![1.0];
        let metric_ids = vec!["a".to_string()];
        let role = RoleVector::zero();

        let attribution = build_attribution(&role, &role, &reference_stats, &candidate_stats, &metric_ids);
        let lines = attribution.to_lines();
        assert!(lines.iter().any(|l| l.contains("closest on")));
        assert!(lines.iter().any(|l| l.contains("differs most on")));
        assert!(lines.iter().any(|l| l.contains("role blocks")));
    }
}
