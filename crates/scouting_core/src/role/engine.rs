use super::vector::RoleVector;
use crate::domain::PlayerSeason;

/// Diagnostics accompanying a RoleVector (spec §4.3 contract): the event
/// count that backed it, the pre-normalisation norm, and whether the
/// player cleared the minimum-events threshold.
#[derive(Debug, Clone, Copy)]
pub struct RoleDiagnostics {
    pub event_count: u32,
    pub raw_norm: f64,
    pub sufficient: bool,
}

/// Produces fixed-width, L2-normalised RoleVectors from PlayerSeason
/// positional data (spec §4.3). Stateless: the minimum-events threshold
/// is the only tunable, passed in per call rather than held internally,
/// since it can change between queries via configuration.
pub struct RoleEngine;

impl RoleEngine {
    pub fn role_vector(season: &PlayerSeason, min_events: u32) -> (RoleVector, RoleDiagnostics) {
        let event_count = season.positional.as_ref().map(|p| p.event_count).unwrap_or(0);
        if event_count < min_events {
            return (
                RoleVector::zero(),
                RoleDiagnostics { event_count, raw_norm: 0.0, sufficient: false },
            );
        }

        let mut raw = [0.0; 20];

        let (gk, df, mf, fw) = season.position.group_smoothing();
        raw[0] = gk;
        raw[1] = df;
        raw[2] = mf;
        raw[3] = fw;

        if let Some(pos) = &season.positional {
            raw[4] = pos.avg_longitudinal.clamp(0.0, 1.0);
            raw[5] = pos.avg_lateral.clamp(0.0, 1.0);
            raw[6] = pos.longitudinal_spread.clamp(0.0, 1.0);
            raw[7] = pos.lateral_spread.clamp(0.0, 1.0);

            raw[8] = pos.defensive_third;
            raw[9] = pos.middle_third;
            raw[10] = pos.attacking_third;
            raw[11] = pos.left_channel;
            raw[12] = pos.centre_channel;
            raw[13] = pos.right_channel;
            raw[14] = pos.own_box_share;
            raw[15] = pos.opposition_box_share;
        }

        let pass_total =
            season.passes_forward + season.passes_backward + season.passes_lateral + season.progressive_passes;
        if pass_total > f64::EPSILON {
            raw[16] = season.passes_forward / pass_total;
            raw[17] = season.passes_backward / pass_total;
            raw[18] = season.passes_lateral / pass_total;
            raw[19] = season.progressive_passes / pass_total;
        }

        let raw_vector = RoleVector(raw);
        let raw_norm = raw_vector.norm();
        let normalized = raw_vector.normalized();

        (normalized, RoleDiagnostics { event_count, raw_norm, sufficient: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LeagueId, PlayerId, PlayerSeason, Position, TeamId};
    use crate::domain::player_season::PositionalAggregates;
    use uuid::Uuid;

    fn season_with_events(events: u32) -> PlayerSeason {
        PlayerSeason {
            player_id: PlayerId(Uuid::new_v4()),
            team_id: TeamId(Uuid::new_v4()),
            league_id: LeagueId(Uuid::new_v4()),
            season: "2024-25".to_string(),
            position: Position::CM,
            age: 26,
            minutes: 2000.0,
            matches: 25,
            goals: 3.0,
            penalty_goals: 0.0,
            shots: 20.0,
            shots_on_target: 8.0,
            expected_goals: Some(2.5),
            passes_attempted: 1500.0,
            passes_completed: 1300.0,
            key_passes: 30.0,
            assists: 8.0,
            expected_assists: Some(6.0),
            progressive_passes: 120.0,
            passes_forward: 400.0,
            passes_backward: 500.0,
            passes_lateral: 400.0,
            tackles: 60.0,
            tackles_won: 40.0,
            interceptions: 30.0,
            clearances: 10.0,
            blocks: 5.0,
            aerial_duels_won: 20.0,
            aerial_duels_contested: 35.0,
            touches: 1800.0,
            dribbles_attempted: 40.0,
            dribbles_completed: 25.0,
            dispossessed: 20.0,
            carries_progressive: 90.0,
            saves: None,
            goals_conceded: None,
            post_shot_expected_goals: None,
            positional: Some(PositionalAggregates {
                event_count: events,
                avg_longitudinal: 0.55,
                avg_lateral: 0.5,
                longitudinal_spread: 0.2,
                lateral_spread: 0.3,
                defensive_third: 0.3,
                middle_third: 0.5,
                attacking_third: 0.2,
                left_channel: 0.3,
                centre_channel: 0.4,
                right_channel: 0.3,
                own_box_share: 0.05,
                opposition_box_share: 0.1,
            }),
        }
    }

    #[test]
    fn insufficient_events_yields_zero_vector() {
        let season = season_with_events(5);
        let (vector, diagnostics) = RoleEngine::role_vector(&season, 30);
        assert_eq!(vector, RoleVector::zero());
        assert!(!diagnostics.sufficient);
    }

    #[test]
    fn sufficient_events_yields_unit_norm_vector() {
        let season = season_with_events(500);
        let (vector, diagnostics) = RoleEngine::role_vector(&season, 30);
        assert!(diagnostics.sufficient);
        assert!((vector.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn role_vector_is_deterministic() {
        let season = season_with_events(500);
        let (a, _) = RoleEngine::role_vector(&season, 30);
        let (b, _) = RoleEngine::role_vector(&season, 30);
        assert_eq!(a, b);
    }
}
