//! Query Executor (spec §4.7): dispatches a validated [`crate::query::StructuredQuery`]
//! to the right engine and assembles a typed, diagnosable result.
//!
//! | Query kind | Delegated to |
//! |---|---|
//! | `similarity` | Role Engine + Metric Engine + Similarity Engine (§4.5) |
//! | `leaderboard` | Metric Engine, ranked by the named metric's direction |
//! | `comparison` | Metric Engine, aligned vectors for two named players |
//! | `filter` | Metric Engine cohort construction, sorted by player id |

mod engine;
mod result;

pub use engine::QueryExecutor;
pub use result::{CohortDescriptor, Diagnostics, ExecutedQuery, LeaderboardRow, MetricRow, ResultPayload};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalogue, EMBEDDED_CATALOGUE_TOML};
    use crate::config::EngineConfig;
    use crate::domain::{LeagueId, PlayerId, PlayerSeason, Position, TeamId};
    use crate::domain::player_season::PositionalAggregates;
    use crate::query::{CohortFilters, MetricSet, StructuredQuery};
    use crate::store::fixture::InMemoryStoreGateway;
    use uuid::Uuid;

    fn season(player_id: Uuid, minutes: f64, goals: f64, events: u32) -> PlayerSeason {
        PlayerSeason {
            player_id: PlayerId(player_id),
            team_id: TeamId(Uuid::new_v4()),
            league_id: LeagueId(Uuid::new_v4()),
            season: "2024-25".to_string(),
            position: Position::ST,
            age: 24,
            minutes,
            matches: 20,
            goals,
            penalty_goals: 0.0,
            shots: 50.0,
            shots_on_target: 25.0,
            expected_goals: Some(goals * 0.9),
            passes_attempted: 300.0,
            passes_completed: 240.0,
            key_passes: 10.0,
            assists: 3.0,
            expected_assists: Some(2.5),
            progressive_passes: 20.0,
            passes_forward: 100.0,
            passes_backward: 100.0,
            passes_lateral: 100.0,
            tackles: 10.0,
            tackles_won: 6.0,
            interceptions: 5.0,
            clearances: 2.0,
            blocks: 1.0,
            aerial_duels_won: 20.0,
            aerial_duels_contested: 35.0,
            touches: 500.0,
            dribbles_attempted: 30.0,
            dribbles_completed: 18.0,
            dispossessed: 12.0,
            carries_progressive: 40.0,
            saves: None,
            goals_conceded: None,
            post_shot_expected_goals: None,
            positional: Some(PositionalAggregates {
                event_count: events,
                avg_longitudinal: 0.7,
                avg_lateral: 0.5,
                longitudinal_spread: 0.2,
                lateral_spread: 0.2,
                defensive_third: 0.1,
                middle_third: 0.3,
                attacking_third: 0.6,
                left_channel: 0.3,
                centre_channel: 0.4,
                right_channel: 0.3,
                own_box_share: 0.02,
                opposition_box_share: 0.3,
            }),
        }
    }

    fn season_to_row(ps: &PlayerSeason) -> crate::store::Row {
        let value = serde_json::to_value(ps).unwrap();
        let mut row = crate::store::Row::new();
        if let serde_json::Value::Object(map) = value {
            for (k, v) in map {
                row.insert(k, v);
            }
        }
        row
    }

    fn seed_gateway(seasons: &[PlayerSeason]) -> InMemoryStoreGateway {
        let gw = InMemoryStoreGateway::new();
        let rows: Vec<crate::store::Row> = seasons.iter().map(season_to_row).collect();
        gw.seed_rows("player_season_stats", vec![], rows);
        gw
    }

    fn catalogue() -> Catalogue {
        Catalogue::from_toml_str(EMBEDDED_CATALOGUE_TOML).unwrap()
    }

    #[tokio::test]
    async fn self_similarity_ranks_reference_first_with_total_one() {
        let reference = season(Uuid::new_v4(), 1800.0, 20.0, 500);
        let other_a = season(Uuid::new_v4(), 1500.0, 8.0, 400);
        let other_b = season(Uuid::new_v4(), 1600.0, 12.0, 450);
        let reference_id = reference.player_id;

        let gateway = seed_gateway(&[reference, other_a, other_b]);
        let catalogue = catalogue();
        let mut config = EngineConfig::default();
        config.min_cohort_size = 2;

        let executor = QueryExecutor::new(&catalogue, &gateway, &config);
        let query = StructuredQuery::similarity(
            reference_id,
            CohortFilters::default(),
            MetricSet::Preset("striker_profile".to_string()),
            Default::default(),
            10,
        );

        let executed = executor.execute(query).await.unwrap();
        let ResultPayload::Similarity(results) = executed.payload else { panic!("expected similarity payload") };
        assert_eq!(results[0].candidate, reference_id);
        assert!((results[0].total - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn leaderboard_ranks_by_primary_metric_descending() {
        let low = season(Uuid::new_v4(), 900.0, 2.0, 100);
        let high = season(Uuid::new_v4(), 900.0, 15.0, 100);
        let mid = season(Uuid::new_v4(), 900.0, 8.0, 100);

        let gateway = seed_gateway(&[low.clone(), high.clone(), mid.clone()]);
        let catalogue = catalogue();
        let config = EngineConfig::default();
        let executor = QueryExecutor::new(&catalogue, &gateway, &config);

        let query = StructuredQuery::leaderboard(
            CohortFilters::default(),
            MetricSet::Explicit(vec!["non_penalty_goals_per_90".to_string()]),
            10,
        );

        let executed = executor.execute(query).await.unwrap();
        let ResultPayload::Leaderboard(rows) = executed.payload else { panic!("expected leaderboard payload") };
        assert_eq!(rows[0].row.player_id, high.player_id);
        assert_eq!(rows.last().unwrap().row.player_id, low.player_id);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.rank, i + 1);
        }
    }

    #[tokio::test]
    async fn forbidden_metric_is_rejected_before_any_fetch() {
        let catalogue = catalogue();
        let config = EngineConfig::default();
        let gateway = InMemoryStoreGateway::new();
        let executor = QueryExecutor::new(&catalogue, &gateway, &config);

        let query = StructuredQuery::leaderboard(
            CohortFilters::default(),
            MetricSet::Explicit(vec!["clutch_factor".to_string()]),
            10,
        );

        let errors = executor.execute(query).await.unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, crate::error::CoreError::UnknownMetric(_))));
    }

    #[tokio::test]
    async fn insufficient_minutes_reports_flag_without_fabricating_a_number() {
        let short = season(Uuid::new_v4(), 200.0, 3.0, 100);
        let gateway = seed_gateway(&[short.clone()]);
        let catalogue = catalogue();
        let config = EngineConfig::default();
        let executor = QueryExecutor::new(&catalogue, &gateway, &config);

        let query = StructuredQuery::filter(
            CohortFilters::default(),
            MetricSet::Explicit(vec!["non_penalty_goals_per_90".to_string()]),
            10,
        );

        let executed = executor.execute(query).await.unwrap();
        assert!(executed.diagnostics.some_insufficient_minutes);
        let ResultPayload::Filter(rows) = executed.payload else { panic!("expected filter payload") };
        let value = rows[0].values.get("non_penalty_goals_per_90").unwrap();
        assert!(matches!(value, crate::metrics::MetricValue::Insufficient));
    }
}
