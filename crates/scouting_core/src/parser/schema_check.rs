use serde::Deserialize;

use crate::error::CoreError;

/// The raw shape the language model is constrained to emit (spec §4.6
/// layer 2). Every field is loosely typed on purpose: the model names
/// things by string (a display name, an alias, a position code) and
/// layer 3 is the only place those strings get resolved against the
/// Catalogue and the Store.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuery {
    pub kind: String,
    #[serde(default)]
    pub reference_player: Option<String>,
    #[serde(default)]
    pub comparison_other: Option<String>,
    #[serde(default)]
    pub leagues: Vec<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub positions: Vec<String>,
    #[serde(default)]
    pub min_age: Option<u32>,
    #[serde(default)]
    pub max_age: Option<u32>,
    #[serde(default)]
    pub min_minutes: Option<f64>,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub role_weight: Option<f64>,
    #[serde(default)]
    pub stats_weight: Option<f64>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Parse the model's completion text as a [`RawQuery`]. A completion that
/// isn't valid JSON, or that is valid JSON of the wrong shape, is
/// rejected here, before any term in it is ever checked against the
/// Catalogue — a malformed response never gets a chance to be
/// interpreted leniently.
pub fn parse_raw(text: &str) -> Result<RawQuery, CoreError> {
    serde_json::from_str(text).map_err(|e| CoreError::ParseError(vec![format!("malformed response: {e}")]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_shape() {
        let text = r#"{"kind": "leaderboard", "metrics": ["non_penalty_goals_per_90"]}"#;
        let raw = parse_raw(text).unwrap();
        assert_eq!(raw.kind, "leaderboard");
        assert_eq!(raw.metrics, vec!["non_penalty_goals_per_90".to_string()]);
        assert!(raw.reference_player.is_none());
    }

    #[test]
    fn rejects_non_json_text() {
        let result = parse_raw("the striker profile for players over 20 years old");
        assert!(matches!(result, Err(CoreError::ParseError(_))));
    }
}
