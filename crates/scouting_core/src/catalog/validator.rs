//! Validator contract (spec §4.2): the Catalogue is the only place a
//! metric name is ever resolved or checked for validity.

use super::loader::Catalogue;
use crate::domain::PositionGroup;
use crate::error::CoreError;
use crate::query::{MetricSet, StructuredQuery};

impl Catalogue {
    pub fn is_known(&self, metric_id: &str) -> bool {
        self.metrics.contains_key(metric_id)
    }

    /// Case-insensitive alias/name resolution. Never falls back to fuzzy
    /// guessing: an unresolvable name is `None`, which callers must treat
    /// as an error, not as a cue to substitute something close.
    pub fn resolve(&self, alias_or_name: &str) -> Option<&str> {
        self.aliases.get(&alias_or_name.to_lowercase()).map(|s| s.as_str())
    }

    /// Resolve a [`MetricSet`] to a concrete, ordered list of metric ids,
    /// expanding a preset reference if that's what was given.
    pub fn resolve_metric_set(&self, set: &MetricSet) -> Result<Vec<String>, CoreError> {
        match set {
            MetricSet::Explicit(names) => names
                .iter()
                .map(|n| {
                    self.resolve(n)
                        .map(|id| id.to_string())
                        .ok_or_else(|| CoreError::UnknownMetric(n.clone()))
                })
                .collect(),
            MetricSet::Preset(preset_id) => {
                let preset = self
                    .preset(preset_id)
                    .ok_or_else(|| CoreError::UnknownMetric(preset_id.clone()))?;
                Ok(preset.metric_ids().into_iter().map(|s| s.to_string()).collect())
            }
        }
    }

    /// Full query validation, collecting every violation found rather
    /// than stopping at the first, and returning the resolved metric id
    /// list on success for the Executor to use without re-resolving.
    pub fn validate_query(&self, query: &StructuredQuery) -> Result<Vec<String>, Vec<CoreError>> {
        let mut errors = Vec::new();

        let metric_ids = match self.resolve_metric_set(&query.metric_set) {
            Ok(ids) => ids,
            Err(e) => {
                errors.push(e);
                Vec::new()
            }
        };

        let requested_groups: Vec<PositionGroup> =
            query.cohort_filters.positions.iter().map(|p| p.to_group()).collect();

        if !requested_groups.is_empty() {
            for id in &metric_ids {
                if let Some(def) = self.metric(id) {
                    let compatible = def.position_scopes.is_empty()
                        || def.position_scopes.iter().any(|s| requested_groups.contains(s));
                    if !compatible {
                        errors.push(CoreError::IncompatibleMetricForPosition {
                            metric: id.clone(),
                            position: format!("{requested_groups:?}"),
                        });
                    }
                }
            }
        }

        if !query.weights.role.is_finite() || query.weights.role < 0.0 {
            errors.push(CoreError::InvalidWeight(format!("role weight {} is invalid", query.weights.role)));
        }
        if !query.weights.stats.is_finite() || query.weights.stats < 0.0 {
            errors.push(CoreError::InvalidWeight(format!("stats weight {} is invalid", query.weights.stats)));
        }
        if query.weights.role + query.weights.stats <= 0.0 {
            errors.push(CoreError::InvalidWeight("role and stats weights must sum to a positive number".into()));
        }

        if query.limit == 0 || query.limit > 500 {
            errors.push(CoreError::InvalidLimit(query.limit));
        }

        if let Some(min_minutes) = query.cohort_filters.min_minutes {
            if min_minutes < 0.0 {
                errors.push(CoreError::InvalidWeight(format!("min_minutes {min_minutes} must be non-negative")));
            }
        }

        if errors.is_empty() {
            Ok(metric_ids)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{CohortFilters, Weights};

    fn test_catalogue() -> Catalogue {
        Catalogue::from_toml_str(super::super::loader::EMBEDDED_CATALOGUE_TOML).unwrap()
    }

    #[test]
    fn unknown_metric_is_rejected() {
        let catalogue = test_catalogue();
        let query = StructuredQuery::leaderboard(
            CohortFilters::default(),
            MetricSet::Explicit(vec!["clutch_factor".to_string()]),
            10,
        );
        let result = catalogue.validate_query(&query);
        assert!(matches!(result, Err(errs) if errs.iter().any(|e| matches!(e, CoreError::UnknownMetric(_)))));
    }

    #[test]
    fn invalid_limit_is_rejected() {
        let catalogue = test_catalogue();
        let preset_id = catalogue.presets.keys().next().cloned().unwrap_or_else(|| "striker_profile".into());
        let query = StructuredQuery::leaderboard(CohortFilters::default(), MetricSet::Preset(preset_id), 0);
        let result = catalogue.validate_query(&query);
        assert!(result.is_err());
    }

    #[test]
    fn negative_weight_is_rejected() {
        let catalogue = test_catalogue();
        let preset_id = catalogue.presets.keys().next().cloned().unwrap_or_else(|| "striker_profile".into());
        let mut query = StructuredQuery::leaderboard(CohortFilters::default(), MetricSet::Preset(preset_id), 10);
        query.weights = Weights { role: -0.1, stats: 0.4 };
        let result = catalogue.validate_query(&query);
        assert!(result.is_err());
    }
}
