//! Metric Engine (spec §4.4): per-90 normalisation, cohort fetching,
//! percentile ranking, and standardised stats vectors, all driven by the
//! Catalogue's formulas rather than any hard-coded computation.

mod cohort;
mod engine;
mod fields;

pub use cohort::fetch_player_season;
pub use engine::{MetricEngine, MetricValue};
pub use fields::field_map;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalogue;
    use crate::config::EngineConfig;
    use crate::domain::{LeagueId, PlayerId, PlayerSeason, Position, TeamId};
    use uuid::Uuid;

    fn sample_season(player_id: Uuid, minutes: f64, goals: f64) -> PlayerSeason {
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
            positional: None,
        }
    }

    #[test]
    fn insufficient_minutes_yields_insufficient_value() {
        let catalogue = Catalogue::from_toml_str(crate::catalog::EMBEDDED_CATALOGUE_TOML).unwrap();
        let config = EngineConfig::default();
        let engine = MetricEngine::new(&catalogue, &config);
        let season = sample_season(Uuid::new_v4(), 200.0, 8.0);

        let values = engine.values(&season, &["non_penalty_goals_per_90".to_string()]).unwrap();
        assert_eq!(values["non_penalty_goals_per_90"], MetricValue::Insufficient);
    }

    #[test]
    fn sufficient_minutes_computes_per_90() {
        let catalogue = Catalogue::from_toml_str(crate::catalog::EMBEDDED_CATALOGUE_TOML).unwrap();
        let config = EngineConfig::default();
        let engine = MetricEngine::new(&catalogue, &config);
        let season = sample_season(Uuid::new_v4(), 900.0, 10.0);

        let values = engine.values(&season, &["non_penalty_goals_per_90".to_string()]).unwrap();
        match values["non_penalty_goals_per_90"] {
            MetricValue::Value(v) => assert!((v - 1.0).abs() < 1e-9),
            MetricValue::Insufficient => panic!("expected a value"),
        }
    }

    #[test]
    fn percentiles_are_bounded_and_use_average_rank_ties() {
        let catalogue = Catalogue::from_toml_str(crate::catalog::EMBEDDED_CATALOGUE_TOML).unwrap();
        let mut config = EngineConfig::default();
        config.min_cohort_size = 3;
        let engine = MetricEngine::new(&catalogue, &config);

        let cohort: Vec<PlayerSeason> = vec![
            sample_season(Uuid::new_v4(), 900.0, 5.0),
            sample_season(Uuid::new_v4(), 900.0, 5.0),
            sample_season(Uuid::new_v4(), 900.0, 10.0),
        ];

        let percentiles = engine.percentiles("non_penalty_goals_per_90", &cohort).unwrap();
        for p in percentiles.values() {
            assert!((0.0..=100.0).contains(p));
        }
    }
}
