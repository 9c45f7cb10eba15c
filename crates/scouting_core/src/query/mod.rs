//! The `StructuredQuery` schema shared by the Parser and the Executor
//! (spec §3, §4.6, §4.7). This is the only vocabulary either of them
//! speaks: a query is either built directly by a caller, or produced by
//! the Parser and validated by the Catalogue before it ever reaches the
//! Executor.

use crate::domain::{PlayerId, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Similarity,
    Leaderboard,
    Comparison,
    Filter,
}

/// Filters defining a cohort: the reference frame for percentiles,
/// standardisation, and candidate pools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CohortFilters {
    pub leagues: Vec<String>,
    pub season: Option<String>,
    pub positions: Vec<Position>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub min_minutes: Option<f64>,
}

/// Either a named preset from the Catalogue, or an explicit list of
/// metric ids. Resolved to concrete ids by the Catalogue before any
/// engine sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSet {
    Preset(String),
    Explicit(Vec<String>),
}

/// Similarity weights. Validated non-negative and summing to a positive
/// number; normalised to sum to 1 by the Similarity Engine, never here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weights {
    pub role: f64,
    pub stats: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self { role: 0.6, stats: 0.4 }
    }
}

/// A validated specification of what the caller wants (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredQuery {
    pub kind: QueryKind,
    pub reference: Option<PlayerId>,
    /// Second player for `Comparison` queries; the first is `reference`.
    pub comparison_other: Option<PlayerId>,
    pub cohort_filters: CohortFilters,
    pub metric_set: MetricSet,
    pub weights: Weights,
    pub limit: usize,
}

impl StructuredQuery {
    pub fn similarity(
        reference: PlayerId,
        cohort_filters: CohortFilters,
        metric_set: MetricSet,
        weights: Weights,
        limit: usize,
    ) -> Self {
        Self {
            kind: QueryKind::Similarity,
            reference: Some(reference),
            comparison_other: None,
            cohort_filters,
            metric_set,
            weights,
            limit,
        }
    }

    pub fn leaderboard(cohort_filters: CohortFilters, metric_set: MetricSet, limit: usize) -> Self {
        Self {
            kind: QueryKind::Leaderboard,
            reference: None,
            comparison_other: None,
            cohort_filters,
            metric_set,
            weights: Weights::default(),
            limit,
        }
    }

    pub fn filter(cohort_filters: CohortFilters, metric_set: MetricSet, limit: usize) -> Self {
        Self {
            kind: QueryKind::Filter,
            reference: None,
            comparison_other: None,
            cohort_filters,
            metric_set,
            weights: Weights::default(),
            limit,
        }
    }

    pub fn comparison(
        a: PlayerId,
        b: PlayerId,
        cohort_filters: CohortFilters,
        metric_set: MetricSet,
    ) -> Self {
        Self {
            kind: QueryKind::Comparison,
            reference: Some(a),
            comparison_other: Some(b),
            cohort_filters,
            metric_set,
            weights: Weights::default(),
            limit: 2,
        }
    }
}
