use crate::catalog::Catalogue;
use crate::domain::{PlayerId, Position};
use crate::error::CoreError;
use crate::query::{CohortFilters, MetricSet, QueryKind, StructuredQuery, Weights};
use crate::store::{Param, StoreGateway};

use super::schema_check::RawQuery;

/// Leagues the Store currently holds data for, used to bound what a
/// league name in a raw query is allowed to resolve to.
pub async fn known_leagues(gateway: &dyn StoreGateway) -> Result<Vec<String>, CoreError> {
    let table = gateway.fetch("SELECT name FROM leagues", &[]).await?;
    Ok(table
        .rows()
        .filter_map(|r| r.get("name").and_then(|v| v.as_str()).map(|s| s.to_string()))
        .collect())
}

/// Look up a player by exact display name. Never fuzzy-matched: a typo
/// or an unknown name resolves to `None`, not to the nearest name.
pub async fn resolve_player_by_name(gateway: &dyn StoreGateway, name: &str) -> Result<Option<PlayerId>, CoreError> {
    let table = gateway
        .fetch(
            "SELECT id FROM players WHERE display_name = :name",
            &[("name", Param::Text(name.to_string()))],
        )
        .await?;
    Ok(table
        .rows()
        .next()
        .and_then(|r| r.get("id"))
        .and_then(|v| v.as_str())
        .and_then(|s| uuid::Uuid::parse_str(s).ok())
        .map(PlayerId))
}

/// Layer 3 of the anti-hallucination defence (spec §4.6): every name in
/// a [`RawQuery`] is checked against the Catalogue (metrics, presets) or
/// the Store (leagues, players) before it becomes part of a
/// [`StructuredQuery`]. Anything that doesn't resolve is reported in
/// `unresolved`, never silently dropped or guessed at.
pub struct Resolved {
    pub query: StructuredQuery,
    pub unresolved: Vec<String>,
}

pub async fn resolve(raw: &RawQuery, catalogue: &Catalogue, gateway: &dyn StoreGateway) -> Result<Resolved, CoreError> {
    let mut unresolved = Vec::new();

    let kind = match raw.kind.as_str() {
        "similarity" => QueryKind::Similarity,
        "leaderboard" => QueryKind::Leaderboard,
        "comparison" => QueryKind::Comparison,
        "filter" => QueryKind::Filter,
        other => {
            unresolved.push(format!("unknown query kind: {other}"));
            QueryKind::Leaderboard
        }
    };

    let known = known_leagues(gateway).await?;
    let mut leagues = Vec::new();
    for league in &raw.leagues {
        if known.iter().any(|k| k.eq_ignore_ascii_case(league)) {
            leagues.push(league.clone());
        } else {
            unresolved.push(format!("unknown league: {league}"));
        }
    }

    let mut positions = Vec::new();
    for code in &raw.positions {
        match serde_json::from_value::<Position>(serde_json::Value::String(code.to_uppercase())) {
            Ok(p) => positions.push(p),
            Err(_) => unresolved.push(format!("unknown position: {code}")),
        }
    }

    let reference = match &raw.reference_player {
        Some(name) => match resolve_player_by_name(gateway, name).await? {
            Some(id) => Some(id),
            None => {
                unresolved.push(format!("unknown player: {name}"));
                None
            }
        },
        None => None,
    };

    let comparison_other = match &raw.comparison_other {
        Some(name) => match resolve_player_by_name(gateway, name).await? {
            Some(id) => Some(id),
            None => {
                unresolved.push(format!("unknown player: {name}"));
                None
            }
        },
        None => None,
    };

    if matches!(kind, QueryKind::Similarity | QueryKind::Comparison) && reference.is_none() {
        unresolved.push("reference player required but not resolved".to_string());
    }
    if matches!(kind, QueryKind::Comparison) && comparison_other.is_none() {
        unresolved.push("comparison_other player required but not resolved".to_string());
    }

    let metric_set = if let Some(preset_id) = &raw.preset {
        if catalogue.preset(preset_id).is_some() {
            MetricSet::Preset(preset_id.clone())
        } else {
            unresolved.push(format!("unknown preset: {preset_id}"));
            MetricSet::Explicit(Vec::new())
        }
    } else if !raw.metrics.is_empty() {
        let mut ids = Vec::new();
        for name in &raw.metrics {
            match catalogue.resolve(name) {
                Some(id) => ids.push(id.to_string()),
                None => unresolved.push(format!("unknown metric: {name}")),
            }
        }
        MetricSet::Explicit(ids)
    } else {
        unresolved.push("no metrics or preset named".to_string());
        MetricSet::Explicit(Vec::new())
    };

    let defaults = Weights::default();
    let weights = Weights {
        role: raw.role_weight.unwrap_or(defaults.role),
        stats: raw.stats_weight.unwrap_or(defaults.stats),
    };

    let cohort_filters = CohortFilters {
        leagues,
        season: raw.season.clone(),
        positions,
        min_age: raw.min_age,
        max_age: raw.max_age,
        min_minutes: raw.min_minutes,
    };

    let query = StructuredQuery {
        kind,
        reference,
        comparison_other,
        cohort_filters,
        metric_set,
        weights,
        limit: raw.limit.unwrap_or(0),
    };

    Ok(Resolved { query, unresolved })
}
