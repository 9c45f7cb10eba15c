use super::cohort::fetch_cohort;
use super::fields::field_map;
use crate::catalog::{Catalogue, Unit};
use crate::config::EngineConfig;
use crate::domain::{PlayerId, PlayerSeason};
use crate::error::CoreError;
use crate::query::CohortFilters;
use crate::store::StoreGateway;
use serde::Serialize;
use std::collections::HashMap;

/// The value of one metric for one player-season: either a finite
/// number, or `Insufficient` when the formula's inputs were missing or
/// the player falls below the metric's minimum-minutes threshold
/// (spec §4.4 "Numeric policy": never NaN or infinity).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricValue {
    Value(f64),
    Insufficient,
}

impl MetricValue {
    pub fn as_option(&self) -> Option<f64> {
        match self {
            MetricValue::Value(v) => Some(*v),
            MetricValue::Insufficient => None,
        }
    }
}

/// Computes metric values and vectors for players (spec §4.4), backed
/// by the Catalogue for definitions and the Store Gateway for cohorts.
pub struct MetricEngine<'a> {
    catalogue: &'a Catalogue,
    config: &'a EngineConfig,
}

impl<'a> MetricEngine<'a> {
    pub fn new(catalogue: &'a Catalogue, config: &'a EngineConfig) -> Self {
        Self { catalogue, config }
    }

    /// Evaluate each metric's formula against one PlayerSeason row.
    pub fn values(
        &self,
        season: &PlayerSeason,
        metric_ids: &[String],
    ) -> Result<HashMap<String, MetricValue>, CoreError> {
        let fields = field_map(season);
        let mut out = HashMap::new();
        for id in metric_ids {
            let def = self.catalogue.metric(id).ok_or_else(|| CoreError::UnknownMetric(id.clone()))?;
            let formula = self
                .catalogue
                .formula(id)
                .expect("catalogue formula must exist for every metric id it reports");

            let raw = formula.eval(&fields);
            let value = match raw {
                None => MetricValue::Insufficient,
                Some(raw) => {
                    let threshold = def.min_minutes.unwrap_or(self.config.min_minutes_default);
                    if season.minutes < threshold {
                        MetricValue::Insufficient
                    } else if def.unit == Unit::Per90 {
                        if season.minutes <= 0.0 {
                            MetricValue::Insufficient
                        } else {
                            MetricValue::Value(raw / (season.minutes / 90.0))
                        }
                    } else {
                        MetricValue::Value(raw)
                    }
                }
            };
            out.insert(id.clone(), value);
        }
        Ok(out)
    }

    pub async fn cohort(
        &self,
        gateway: &dyn StoreGateway,
        filters: &CohortFilters,
    ) -> Result<Vec<PlayerSeason>, CoreError> {
        fetch_cohort(gateway, filters).await
    }

    /// Percentile of each cohort member for one metric, ties broken by
    /// averaging ranks (spec §9 open question a).
    pub fn percentiles(
        &self,
        metric_id: &str,
        cohort: &[PlayerSeason],
    ) -> Result<HashMap<PlayerId, f64>, CoreError> {
        if cohort.len() < self.config.min_cohort_size {
            return Err(CoreError::CohortTooSmall { size: cohort.len(), minimum: self.config.min_cohort_size });
        }

        let metric_ids = vec![metric_id.to_string()];
        let mut present: Vec<(PlayerId, f64)> = Vec::new();
        for ps in cohort {
            let values = self.values(ps, &metric_ids)?;
            if let Some(MetricValue::Value(v)) = values.get(metric_id) {
                present.push((ps.player_id, *v));
            }
        }

        present.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        let n = present.len();
        let mut out = HashMap::new();
        let mut i = 0;
        while i < n {
            let mut j = i;
            while j + 1 < n && (present[j + 1].1 - present[i].1).abs() < f64::EPSILON {
                j += 1;
            }
            let avg_rank = (i + j) as f64 / 2.0;
            let percentile = if n > 1 { avg_rank / (n - 1) as f64 * 100.0 } else { 50.0 };
            for (player_id, _) in &present[i..=j] {
                out.insert(*player_id, percentile);
            }
            i = j + 1;
        }
        Ok(out)
    }

    /// Standardise `metric_ids` to zero-mean, unit-variance within
    /// `cohort`, clip to `+/- clip`, and return the result ordered by
    /// `metric_ids` for `player_id`. Metrics reported `insufficient` for
    /// a given player fall back to the cohort mean (z = 0) for that
    /// dimension, rather than excluding the player from the vector
    /// entirely.
    pub fn stats_vector(
        &self,
        player_id: PlayerId,
        metric_ids: &[String],
        cohort: &[PlayerSeason],
        clip: f64,
    ) -> Result<Vec<f64>, CoreError> {
        if cohort.len() < self.config.min_cohort_size {
            return Err(CoreError::CohortTooSmall { size: cohort.len(), minimum: self.config.min_cohort_size });
        }

        let mut per_player_values: HashMap<PlayerId, Vec<Option<f64>>> = HashMap::new();
        for ps in cohort {
            let values = self.values(ps, metric_ids)?;
            let ordered: Vec<Option<f64>> =
                metric_ids.iter().map(|id| values.get(id).and_then(MetricValue::as_option)).collect();
            per_player_values.insert(ps.player_id, ordered);
        }

        let mut result = vec![0.0; metric_ids.len()];
        for (dim, _) in metric_ids.iter().enumerate() {
            let samples: Vec<f64> =
                per_player_values.values().filter_map(|v| v[dim]).collect();
            if samples.is_empty() {
                continue;
            }
            let mean = samples.iter().sum::<f64>() / samples.len() as f64;
            let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / samples.len() as f64;
            let std_dev = variance.sqrt();

            let raw = per_player_values.get(&player_id).and_then(|v| v[dim]);
            let z = match raw {
                Some(v) if std_dev > f64::EPSILON => (v - mean) / std_dev,
                _ => 0.0,
            };
            result[dim] = z.clamp(-clip, clip);
        }
        Ok(result)
    }
}
