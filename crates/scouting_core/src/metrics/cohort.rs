use crate::domain::PlayerSeason;
use crate::error::CoreError;
use crate::query::CohortFilters;
use crate::store::{Param, Row, StoreGateway};
use serde_json::Map;

/// Apply league/season/position/age/minimum-minutes filters against the
/// Store and return the matching PlayerSeason rows (spec §4.4
/// `cohort(filters)`). Column names and comparison operators are fixed
/// literals in this function; only values travel as named parameters.
pub async fn fetch_cohort(
    gateway: &dyn StoreGateway,
    filters: &CohortFilters,
) -> Result<Vec<PlayerSeason>, CoreError> {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<(String, Param)> = Vec::new();

    if !filters.leagues.is_empty() {
        let names: Vec<String> = filters
            .leagues
            .iter()
            .enumerate()
            .map(|(i, league)| {
                let name = format!("league{i}");
                params.push((name.clone(), Param::Text(league.clone())));
                format!(":{name}")
            })
            .collect();
        clauses.push(format!("league_id IN ({})", names.join(", ")));
    }

    if let Some(season) = &filters.season {
        params.push(("season".to_string(), Param::Text(season.clone())));
        clauses.push("season = :season".to_string());
    }

    if !filters.positions.is_empty() {
        let names: Vec<String> = filters
            .positions
            .iter()
            .enumerate()
            .map(|(i, position)| {
                let name = format!("position{i}");
                let code = serde_json::to_value(position)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default();
                params.push((name.clone(), Param::Text(code)));
                format!(":{name}")
            })
            .collect();
        clauses.push(format!("position IN ({})", names.join(", ")));
    }

    if let Some(min_age) = filters.min_age {
        params.push(("min_age".to_string(), Param::Int(min_age as i64)));
        clauses.push("age >= :min_age".to_string());
    }
    if let Some(max_age) = filters.max_age {
        params.push(("max_age".to_string(), Param::Int(max_age as i64)));
        clauses.push("age <= :max_age".to_string());
    }
    if let Some(min_minutes) = filters.min_minutes {
        params.push(("min_minutes".to_string(), Param::Float(min_minutes)));
        clauses.push("minutes >= :min_minutes".to_string());
    }

    let where_clause = if clauses.is_empty() { String::new() } else { format!(" WHERE {}", clauses.join(" AND ")) };
    let query = format!("SELECT * FROM player_season_stats{where_clause}");

    let param_refs: Vec<(&str, Param)> =
        params.iter().map(|(name, p)| (name.as_str(), p.clone())).collect();
    let table = gateway.fetch(&query, &param_refs).await?;

    table.rows().map(row_to_player_season).collect()
}

fn row_to_player_season(row: &Row) -> Result<PlayerSeason, CoreError> {
    let map: Map<String, serde_json::Value> = row.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    serde_json::from_value(serde_json::Value::Object(map)).map_err(CoreError::from)
}

/// Fetch a single player's season row directly, for callers (comparison,
/// similarity reference resolution) that need one player's record even
/// when it falls outside the cohort filters otherwise in play.
pub async fn fetch_player_season(
    gateway: &dyn StoreGateway,
    player_id: crate::domain::PlayerId,
    season: Option<&str>,
) -> Result<PlayerSeason, CoreError> {
    let mut clauses = vec!["player_id = :player_id".to_string()];
    let mut params: Vec<(&str, Param)> = vec![("player_id", Param::Uuid(player_id.0))];
    if let Some(season) = season {
        clauses.push("season = :season".to_string());
        params.push(("season", Param::Text(season.to_string())));
    }
    let query = format!("SELECT * FROM player_season_stats WHERE {}", clauses.join(" AND "));
    let table = gateway.fetch(&query, &params).await?;
    table
        .rows()
        .next()
        .ok_or_else(|| CoreError::NoSeasonData {
            player_id: player_id.0.to_string(),
            season: season.unwrap_or("").to_string(),
        })
        .and_then(row_to_player_season)
}
