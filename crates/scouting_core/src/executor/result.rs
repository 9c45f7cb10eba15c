use crate::domain::PlayerId;
use crate::metrics::MetricValue;
use crate::query::{CohortFilters, StructuredQuery};
use crate::similarity::SimilarityResult;
use serde::Serialize;
use std::collections::HashMap;

/// The cohort that produced a result, as a first-class, reportable value
/// (spec §6 "Diagnostics") rather than something a caller has to
/// re-derive from the filters alone.
#[derive(Debug, Clone, Serialize)]
pub struct CohortDescriptor {
    pub filters: CohortFilters,
    pub size: usize,
    pub min_minutes_applied: f64,
}

/// Flags accompanying a result that are not failures of the system, but
/// conditions the caller should know about (spec §7 "data-sufficiency
/// conditions").
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub degraded: bool,
    pub some_insufficient_minutes: bool,
    pub warnings: Vec<String>,
}

/// One player's requested metric values, by metric id. Used by
/// `leaderboard`, `comparison`, and `filter` results — an explicit
/// alignment between a player and the metric-id list the caller asked
/// for, rather than an ad-hoc positional vector (spec §9).
#[derive(Debug, Clone, Serialize)]
pub struct MetricRow {
    pub player_id: PlayerId,
    pub values: HashMap<String, MetricValue>,
}

/// One leaderboard row: a [`MetricRow`] plus its rank under the primary
/// metric, with ties broken by player id (spec §5 ordering guarantee).
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub row: MetricRow,
}

/// The typed result of one executed query (spec §4.7): the query as
/// actually run (after validation/resolution), the cohort it ran
/// against, any diagnostic flags, and the payload for its kind.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutedQuery {
    pub query: StructuredQuery,
    pub cohort: CohortDescriptor,
    pub diagnostics: Diagnostics,
    pub payload: ResultPayload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultPayload {
    Similarity(Vec<SimilarityResult>),
    Leaderboard(Vec<LeaderboardRow>),
    Comparison { reference: MetricRow, other: MetricRow },
    Filter(Vec<MetricRow>),
}
