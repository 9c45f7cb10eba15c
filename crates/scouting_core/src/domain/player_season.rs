use super::{LeagueId, PlayerId, Position, TeamId};
use serde::{Deserialize, Serialize};

/// One (player, team, league, season) tuple of measured counts and rates,
/// as fetched from `player_season_stats` by the Store Gateway.
///
/// Field names match the columns the Catalogue's formulas and the Role
/// Engine's zone/direction aggregates are defined against (spec §3, §6).
/// All counting stats are season totals; the Metric Engine derives
/// per-90 and percentile views on demand, never storing them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSeason {
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub league_id: LeagueId,
    pub season: String,
    pub position: Position,
    pub age: u32,

    pub minutes: f64,
    pub matches: u32,

    // Shooting
    pub goals: f64,
    pub penalty_goals: f64,
    pub shots: f64,
    pub shots_on_target: f64,
    pub expected_goals: Option<f64>,

    // Passing
    pub passes_attempted: f64,
    pub passes_completed: f64,
    pub key_passes: f64,
    pub assists: f64,
    pub expected_assists: Option<f64>,
    pub progressive_passes: f64,

    // Passes broken out by direction, for the Role Engine's
    // pass-direction-mix block (spec §4.3 dims 16-19). Counts, not
    // fractions; the Role Engine normalises them.
    pub passes_forward: f64,
    pub passes_backward: f64,
    pub passes_lateral: f64,

    // Defending
    pub tackles: f64,
    pub tackles_won: f64,
    pub interceptions: f64,
    pub clearances: f64,
    pub blocks: f64,
    pub aerial_duels_won: f64,
    pub aerial_duels_contested: f64,

    // Possession
    pub touches: f64,
    pub dribbles_attempted: f64,
    pub dribbles_completed: f64,
    pub dispossessed: f64,
    pub carries_progressive: f64,

    // Goalkeeper-only
    pub saves: Option<f64>,
    pub goals_conceded: Option<f64>,
    pub post_shot_expected_goals: Option<f64>,

    // Positional aggregates feeding the Role Engine's spread/zone blocks
    // (spec §4.3 dims 4-15). `None` when the season has fewer than
    // `role_min_events` tracked positional events.
    pub positional: Option<PositionalAggregates>,
}

/// Average/dispersion of action location plus zone occupancy fractions,
/// as tracked by the upstream event feed. Longitudinal axis runs from a
/// player's own goal line (0.0) to the opposition goal line (1.0);
/// lateral axis runs left touchline (0.0) to right touchline (1.0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionalAggregates {
    pub event_count: u32,

    pub avg_longitudinal: f64,
    pub avg_lateral: f64,
    pub longitudinal_spread: f64,
    pub lateral_spread: f64,

    // Vertical thirds, fractions summing to 1.0.
    pub defensive_third: f64,
    pub middle_third: f64,
    pub attacking_third: f64,

    // Lateral channels, fractions summing to 1.0.
    pub left_channel: f64,
    pub centre_channel: f64,
    pub right_channel: f64,

    // Combined box indicators, each independent of the partitions above.
    pub own_box_share: f64,
    pub opposition_box_share: f64,
}
