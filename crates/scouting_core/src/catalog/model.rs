use crate::domain::PositionGroup;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Shooting,
    Passing,
    Defending,
    Possession,
    Physical,
    Goalkeeper,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "count")]
    Count,
    #[serde(rename = "per90")]
    Per90,
    #[serde(rename = "percentage")]
    Percentage,
    #[serde(rename = "fraction")]
    Fraction,
}

/// One Catalogue entry (spec §4.2): a stable id, its formula over
/// PlayerSeason columns, and the metadata the Validator and Metric
/// Engine need to apply it correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDef {
    pub id: String,
    pub name: String,
    pub category: MetricCategory,
    pub formula: String,
    pub unit: Unit,
    pub direction: Direction,
    pub position_scopes: Vec<PositionGroup>,
    pub min_minutes: Option<f64>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetMetric {
    pub metric_id: String,
    pub weight: f64,
}

/// A named, weighted bundle of metric ids representing a positional
/// archetype (spec §4.2). Presets are data; none may be hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub position_scope: Option<PositionGroup>,
    pub metrics: Vec<PresetMetric>,
}

impl Preset {
    pub fn metric_ids(&self) -> Vec<&str> {
        self.metrics.iter().map(|m| m.metric_id.as_str()).collect()
    }
}
