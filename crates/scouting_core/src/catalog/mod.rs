//! Metric Catalogue & Validator (spec §4.2): the single source of truth
//! for every metric name, formula, and preset in the system. Nothing
//! outside this module may name, compute, or return a metric it does
//! not declare.

mod formula;
mod loader;
mod model;
mod validator;

pub use formula::Formula;
pub use loader::{catalogue, load_from_env, Catalogue, EMBEDDED_CATALOGUE_TOML};
pub use model::{Direction, MetricCategory, MetricDef, Preset, PresetMetric, Unit};
