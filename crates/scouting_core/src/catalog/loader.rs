//! Loading, parsing and startup self-check for the Catalogue file
//! (spec §4.2, §6). The file is the canonical source: nothing here may
//! hard-code a metric definition or a preset.

use super::formula::Formula;
use super::model::{MetricDef, Preset};
use crate::error::CoreError;
use crate::store::SchemaDescriptor;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::sync::OnceLock;

/// Embedded default catalogue, compiled into the binary so the core has
/// a valid, known-good fallback even with no deployment-specific file
/// present. `OF_SCOUT_CATALOGUE_PATH` overrides it with an external file.
pub const EMBEDDED_CATALOGUE_TOML: &str = include_str!("../../data/catalogue.toml");

#[derive(Debug, Deserialize)]
struct CatalogueFile {
    #[serde(default)]
    metrics: Vec<MetricDef>,
    #[serde(default)]
    presets: Vec<Preset>,
}

/// The loaded, immutable Catalogue: every metric the system is allowed
/// to name, plus the preset groupings built from them.
pub struct Catalogue {
    pub(crate) metrics: HashMap<String, MetricDef>,
    pub(crate) aliases: HashMap<String, String>,
    pub(crate) presets: HashMap<String, Preset>,
    pub(crate) formulas: HashMap<String, Formula>,
}

impl Catalogue {
    /// Parse and build a Catalogue from TOML text, collecting every
    /// structural problem rather than stopping at the first one, so a
    /// deployment sees the whole list of reasons at once.
    pub fn from_toml_str(text: &str) -> Result<Self, Vec<String>> {
        let file: CatalogueFile = toml::from_str(text).map_err(|e| vec![e.to_string()])?;
        let mut errors = Vec::new();

        let mut metrics = HashMap::new();
        let mut aliases = HashMap::new();
        let mut formulas = HashMap::new();

        for metric in file.metrics {
            match Formula::parse(&metric.formula) {
                Ok(formula) => {
                    formulas.insert(metric.id.clone(), formula);
                }
                Err(e) => errors.push(format!("metric `{}`: {e}", metric.id)),
            }
            for alias in metric.aliases.iter().chain(std::iter::once(&metric.id)) {
                let key = alias.to_lowercase();
                if let Some(existing) = aliases.insert(key.clone(), metric.id.clone()) {
                    if existing != metric.id {
                        errors.push(format!(
                            "alias `{alias}` claimed by both `{existing}` and `{}`",
                            metric.id
                        ));
                    }
                }
            }
            if metrics.insert(metric.id.clone(), metric.clone()).is_some() {
                errors.push(format!("duplicate metric id `{}`", metric.id));
            }
        }

        let mut presets = HashMap::new();
        for preset in file.presets {
            for pm in &preset.metrics {
                if !metrics.contains_key(&pm.metric_id) {
                    errors.push(format!(
                        "preset `{}` references unknown metric id `{}`",
                        preset.id, pm.metric_id
                    ));
                }
                if !pm.weight.is_finite() || pm.weight < 0.0 {
                    errors.push(format!(
                        "preset `{}` has invalid weight for metric `{}`",
                        preset.id, pm.metric_id
                    ));
                }
            }
            if presets.insert(preset.id.clone(), preset.clone()).is_some() {
                errors.push(format!("duplicate preset id `{}`", preset.id));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self { metrics, aliases, presets, formulas })
    }

    /// Validate every formula's referenced columns exist in the Store
    /// Gateway's reported schema, against the `player_season_stats`
    /// table. Called once at startup; failure is fatal to the process.
    pub fn validate_against_schema(&self, schema: &SchemaDescriptor) -> Result<(), CoreError> {
        let mut errors = Vec::new();
        for (id, formula) in &self.formulas {
            for column in formula.referenced_columns() {
                if !schema.has_column("player_season_stats", &column) {
                    errors.push(format!(
                        "metric `{id}` references unknown column `player_season_stats.{column}`"
                    ));
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::CatalogueInvalid(errors))
        }
    }

    pub fn metric(&self, id: &str) -> Option<&MetricDef> {
        self.metrics.get(id)
    }

    pub fn formula(&self, id: &str) -> Option<&Formula> {
        self.formulas.get(id)
    }

    pub fn preset(&self, id: &str) -> Option<&Preset> {
        self.presets.get(id)
    }

    pub fn metrics(&self) -> impl Iterator<Item = &MetricDef> {
        self.metrics.values()
    }
}

static CATALOGUE: OnceLock<Catalogue> = OnceLock::new();

/// Load from `OF_SCOUT_CATALOGUE_PATH` if set, falling back to the
/// embedded default. Returns the structural errors collected by
/// [`Catalogue::from_toml_str`] rather than panicking, since a bad
/// deployment-supplied file is a runtime condition, not a programmer
/// error in this crate.
pub fn load_from_env() -> Result<Catalogue, Vec<String>> {
    match env::var("OF_SCOUT_CATALOGUE_PATH") {
        Ok(path) => {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| vec![format!("failed to read catalogue file `{path}`: {e}")])?;
            Catalogue::from_toml_str(&text)
        }
        Err(_) => Catalogue::from_toml_str(EMBEDDED_CATALOGUE_TOML),
    }
}

/// Process-wide Catalogue, loaded once and shared without locking
/// (spec §5). Panics if the resolved catalogue (embedded or
/// environment-supplied) fails to parse or validate internally; deployments
/// that want to surface `CatalogueInvalid` instead should call
/// [`load_from_env`] directly during their own startup sequence.
pub fn catalogue() -> &'static Catalogue {
    CATALOGUE.get_or_init(|| {
        load_from_env().unwrap_or_else(|errors| {
            panic!("catalogue failed to load: {errors:?}")
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalogue_parses() {
        let catalogue = Catalogue::from_toml_str(EMBEDDED_CATALOGUE_TOML).unwrap();
        assert!(catalogue.metric("non_penalty_goals_per_90").is_some() || catalogue.metrics.len() > 0);
    }

    #[test]
    fn duplicate_metric_id_is_rejected() {
        let toml = r#"
            [[metrics]]
            id = "x"
            name = "X"
            category = "shooting"
            formula = "goals"
            unit = "count"
            direction = "higher_is_better"
            position_scopes = []

            [[metrics]]
            id = "x"
            name = "X again"
            category = "shooting"
            formula = "shots"
            unit = "count"
            direction = "higher_is_better"
            position_scopes = []
        "#;
        let result = Catalogue::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn preset_referencing_unknown_metric_is_rejected() {
        let toml = r#"
            [[presets]]
            id = "p"
            name = "P"
            metrics = [{ metric_id = "does_not_exist", weight = 1.0 }]
        "#;
        let result = Catalogue::from_toml_str(toml);
        assert!(result.is_err());
    }
}
