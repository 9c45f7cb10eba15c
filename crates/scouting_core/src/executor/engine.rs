use super::result::{
    CohortDescriptor, Diagnostics, ExecutedQuery, LeaderboardRow, MetricRow, ResultPayload,
};
use crate::catalog::{Catalogue, Direction};
use crate::config::{EngineConfig, SimilarityConfig};
use crate::domain::PlayerSeason;
use crate::error::CoreError;
use crate::metrics::{fetch_player_season, MetricEngine, MetricValue};
use crate::query::{QueryKind, StructuredQuery};
use crate::role::RoleEngine;
use crate::similarity::{CandidateVectors, SimilarityEngine};
use crate::store::StoreGateway;

/// Clip applied to standardised stats-vector dimensions (spec §4.4
/// "stats_vector"). Not a caller-facing tunable, unlike the options in
/// spec §6, so it lives as a constant here rather than on
/// [`EngineConfig`].
const STATS_VECTOR_CLIP: f64 = 3.0;

/// Dispatches a validated [`StructuredQuery`] to the right engine and
/// assembles a typed result (spec §4.7). The only component that knows
/// about all four query kinds at once; every engine it calls stays
/// ignorant of the others.
pub struct QueryExecutor<'a> {
    catalogue: &'a Catalogue,
    gateway: &'a dyn StoreGateway,
    config: &'a EngineConfig,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(catalogue: &'a Catalogue, gateway: &'a dyn StoreGateway, config: &'a EngineConfig) -> Self {
        Self { catalogue, gateway, config }
    }

    pub async fn execute(&self, query: StructuredQuery) -> Result<ExecutedQuery, Vec<CoreError>> {
        let metric_ids = self.catalogue.validate_query(&query)?;

        match query.kind {
            QueryKind::Similarity => self.execute_similarity(query, metric_ids).await,
            QueryKind::Leaderboard => self.execute_leaderboard(query, metric_ids).await,
            QueryKind::Comparison => self.execute_comparison(query, metric_ids).await,
            QueryKind::Filter => self.execute_filter(query, metric_ids).await,
        }
    }

    async fn cohort_rows(&self, query: &StructuredQuery) -> Result<Vec<PlayerSeason>, Vec<CoreError>> {
        let engine = MetricEngine::new(self.catalogue, self.config);
        engine
            .cohort(self.gateway, &query.cohort_filters)
            .await
            .map_err(|e| vec![e])
    }

    fn cohort_descriptor(&self, query: &StructuredQuery, size: usize) -> CohortDescriptor {
        CohortDescriptor {
            filters: query.cohort_filters.clone(),
            size,
            min_minutes_applied: query.cohort_filters.min_minutes.unwrap_or(self.config.min_minutes_default),
        }
    }

    fn metric_row(&self, engine: &MetricEngine<'_>, season: &PlayerSeason, metric_ids: &[String]) -> Result<MetricRow, CoreError> {
        let values = engine.values(season, metric_ids)?;
        Ok(MetricRow { player_id: season.player_id, values })
    }

    async fn execute_similarity(
        &self,
        query: StructuredQuery,
        metric_ids: Vec<String>,
    ) -> Result<ExecutedQuery, Vec<CoreError>> {
        let reference_id = query
            .reference
            .ok_or_else(|| vec![CoreError::ParseError(vec!["similarity query requires a reference player".into()])])?;

        let reference_season = fetch_player_season(self.gateway, reference_id, query.cohort_filters.season.as_deref())
            .await
            .map_err(|e| vec![e])?;

        let cohort = self.cohort_rows(&query).await?;
        let engine = MetricEngine::new(self.catalogue, self.config);

        let mut some_insufficient_minutes = false;
        let mut candidates = Vec::with_capacity(cohort.len());
        for season in &cohort {
            let values = engine.values(season, &metric_ids).map_err(|e| vec![e])?;
            if values.values().any(|v| matches!(v, MetricValue::Insufficient)) {
                some_insufficient_minutes = true;
            }
            let (role, diagnostics) = RoleEngine::role_vector(season, self.config.role_min_events);
            let stats = engine
                .stats_vector(season.player_id, &metric_ids, &cohort, STATS_VECTOR_CLIP)
                .map_err(|e| vec![e])?;
            candidates.push(CandidateVectors {
                player_id: season.player_id,
                role,
                role_sufficient: diagnostics.sufficient,
                stats,
            });
        }

        let (reference_role, reference_role_diag) =
            RoleEngine::role_vector(&reference_season, self.config.role_min_events);
        let reference_stats = engine
            .stats_vector(reference_id, &metric_ids, &cohort, STATS_VECTOR_CLIP)
            .map_err(|e| vec![e])?;
        let reference_vectors = CandidateVectors {
            player_id: reference_id,
            role: reference_role,
            role_sufficient: reference_role_diag.sufficient,
            stats: reference_stats,
        };

        // Weights travel on the query itself (spec §4.5 contract); only
        // the negative-cosine clamp switch is a deployment-wide setting.
        let weights = SimilarityConfig {
            role_weight: query.weights.role,
            stats_weight: query.weights.stats,
            clamp_negative: self.config.similarity.clamp_negative,
        };
        let results = SimilarityEngine::similar_to(
            &reference_vectors,
            &candidates,
            &metric_ids,
            &weights,
            query.limit,
        )
        .map_err(|e| vec![e])?;

        Ok(ExecutedQuery {
            cohort: self.cohort_descriptor(&query, candidates.len()),
            diagnostics: Diagnostics { degraded: false, some_insufficient_minutes, warnings: Vec::new() },
            query,
            payload: ResultPayload::Similarity(results),
        })
    }

    async fn execute_leaderboard(
        &self,
        query: StructuredQuery,
        metric_ids: Vec<String>,
    ) -> Result<ExecutedQuery, Vec<CoreError>> {
        let primary_metric = metric_ids
            .first()
            .cloned()
            .ok_or_else(|| vec![CoreError::ParseError(vec!["leaderboard query names no metric".into()])])?;
        let direction = self
            .catalogue
            .metric(&primary_metric)
            .map(|m| m.direction)
            .unwrap_or(Direction::HigherIsBetter);

        let cohort = self.cohort_rows(&query).await?;
        let engine = MetricEngine::new(self.catalogue, self.config);

        let mut rows = Vec::with_capacity(cohort.len());
        let mut some_insufficient_minutes = false;
        for season in &cohort {
            let row = self.metric_row(&engine, season, &metric_ids).map_err(|e| vec![e])?;
            if row.values.values().any(|v| matches!(v, MetricValue::Insufficient)) {
                some_insufficient_minutes = true;
            }
            rows.push(row);
        }

        rows.sort_by(|a, b| {
            let av = a.values.get(&primary_metric).and_then(MetricValue::as_option);
            let bv = b.values.get(&primary_metric).and_then(MetricValue::as_option);
            match (av, bv) {
                (Some(x), Some(y)) => {
                    let ord = x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal);
                    let ord = if direction == Direction::HigherIsBetter { ord.reverse() } else { ord };
                    ord.then_with(|| a.player_id.0.cmp(&b.player_id.0))
                }
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.player_id.0.cmp(&b.player_id.0),
            }
        });
        rows.truncate(query.limit);

        let leaderboard_rows: Vec<LeaderboardRow> =
            rows.into_iter().enumerate().map(|(i, row)| LeaderboardRow { rank: i + 1, row }).collect();

        Ok(ExecutedQuery {
            cohort: self.cohort_descriptor(&query, cohort.len()),
            diagnostics: Diagnostics { degraded: false, some_insufficient_minutes, warnings: Vec::new() },
            query,
            payload: ResultPayload::Leaderboard(leaderboard_rows),
        })
    }

    async fn execute_comparison(
        &self,
        query: StructuredQuery,
        metric_ids: Vec<String>,
    ) -> Result<ExecutedQuery, Vec<CoreError>> {
        let reference_id = query
            .reference
            .ok_or_else(|| vec![CoreError::ParseError(vec!["comparison query requires a reference player".into()])])?;
        let other_id = query
            .comparison_other
            .ok_or_else(|| vec![CoreError::ParseError(vec!["comparison query requires a second player".into()])])?;

        let season = query.cohort_filters.season.as_deref();
        let reference_season = fetch_player_season(self.gateway, reference_id, season).await.map_err(|e| vec![e])?;
        let other_season = fetch_player_season(self.gateway, other_id, season).await.map_err(|e| vec![e])?;

        let engine = MetricEngine::new(self.catalogue, self.config);
        let reference_row = self.metric_row(&engine, &reference_season, &metric_ids).map_err(|e| vec![e])?;
        let other_row = self.metric_row(&engine, &other_season, &metric_ids).map_err(|e| vec![e])?;

        let some_insufficient_minutes = [&reference_row, &other_row]
            .iter()
            .any(|row| row.values.values().any(|v| matches!(v, MetricValue::Insufficient)));

        Ok(ExecutedQuery {
            cohort: self.cohort_descriptor(&query, 2),
            diagnostics: Diagnostics { degraded: false, some_insufficient_minutes, warnings: Vec::new() },
            query,
            payload: ResultPayload::Comparison { reference: reference_row, other: other_row },
        })
    }

    async fn execute_filter(
        &self,
        query: StructuredQuery,
        metric_ids: Vec<String>,
    ) -> Result<ExecutedQuery, Vec<CoreError>> {
        let cohort = self.cohort_rows(&query).await?;
        let engine = MetricEngine::new(self.catalogue, self.config);

        let mut rows = Vec::with_capacity(cohort.len());
        let mut some_insufficient_minutes = false;
        for season in &cohort {
            let row = self.metric_row(&engine, season, &metric_ids).map_err(|e| vec![e])?;
            if row.values.values().any(|v| matches!(v, MetricValue::Insufficient)) {
                some_insufficient_minutes = true;
            }
            rows.push(row);
        }
        rows.sort_by(|a, b| a.player_id.0.cmp(&b.player_id.0));
        rows.truncate(query.limit);

        Ok(ExecutedQuery {
            cohort: self.cohort_descriptor(&query, cohort.len()),
            diagnostics: Diagnostics { degraded: false, some_insufficient_minutes, warnings: Vec::new() },
            query,
            payload: ResultPayload::Filter(rows),
        })
    }
}
