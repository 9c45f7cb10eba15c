use crate::domain::PlayerSeason;
use std::collections::HashMap;

/// Build the named-column field map a [`crate::catalog::Formula`]
/// evaluates against. Optional PlayerSeason columns that are `None`
/// (null in the store) are simply absent from the map, so a formula
/// referencing one naturally evaluates to `None` rather than a
/// fabricated zero.
pub fn field_map(ps: &PlayerSeason) -> HashMap<String, f64> {
    let mut m = HashMap::new();
    m.insert("minutes".to_string(), ps.minutes);
    m.insert("matches".to_string(), ps.matches as f64);
    m.insert("goals".to_string(), ps.goals);
    m.insert("penalty_goals".to_string(), ps.penalty_goals);
    m.insert("shots".to_string(), ps.shots);
    m.insert("shots_on_target".to_string(), ps.shots_on_target);
    insert_optional(&mut m, "expected_goals", ps.expected_goals);
    m.insert("passes_attempted".to_string(), ps.passes_attempted);
    m.insert("passes_completed".to_string(), ps.passes_completed);
    m.insert("key_passes".to_string(), ps.key_passes);
    m.insert("assists".to_string(), ps.assists);
    insert_optional(&mut m, "expected_assists", ps.expected_assists);
    m.insert("progressive_passes".to_string(), ps.progressive_passes);
    m.insert("passes_forward".to_string(), ps.passes_forward);
    m.insert("passes_backward".to_string(), ps.passes_backward);
    m.insert("passes_lateral".to_string(), ps.passes_lateral);
    m.insert("tackles".to_string(), ps.tackles);
    m.insert("tackles_won".to_string(), ps.tackles_won);
    m.insert("interceptions".to_string(), ps.interceptions);
    m.insert("clearances".to_string(), ps.clearances);
    m.insert("blocks".to_string(), ps.blocks);
    m.insert("aerial_duels_won".to_string(), ps.aerial_duels_won);
    m.insert("aerial_duels_contested".to_string(), ps.aerial_duels_contested);
    m.insert("touches".to_string(), ps.touches);
    m.insert("dribbles_attempted".to_string(), ps.dribbles_attempted);
    m.insert("dribbles_completed".to_string(), ps.dribbles_completed);
    m.insert("dispossessed".to_string(), ps.dispossessed);
    m.insert("carries_progressive".to_string(), ps.carries_progressive);
    insert_optional(&mut m, "saves", ps.saves);
    insert_optional(&mut m, "goals_conceded", ps.goals_conceded);
    insert_optional(&mut m, "post_shot_expected_goals", ps.post_shot_expected_goals);
    m
}

fn insert_optional(m: &mut HashMap<String, f64>, key: &str, value: Option<f64>) {
    if let Some(v) = value {
        m.insert(key.to_string(), v);
    }
}
