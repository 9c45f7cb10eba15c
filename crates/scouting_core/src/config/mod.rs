//! Centralized configuration for the analytics core.
//!
//! Every tunable named in the system design's configuration table lives
//! here as a typed field with a documented default, rather than as a
//! scattered magic number. `EngineConfig::default()` reproduces every
//! default value; `EngineConfig::from_env()` layers environment
//! variable overrides on top.

mod similarity_config;
mod store_config;

pub use similarity_config::SimilarityConfig;
pub use store_config::StoreConfig;

use serde::{Deserialize, Serialize};
use std::env;

/// All tunables for one running instance of the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Threshold below which per-90 metrics are reported `insufficient`.
    pub min_minutes_default: f64,
    /// Minimum cohort size for percentile/standardisation.
    pub min_cohort_size: usize,
    /// Minimum positional events to produce a non-zero role vector.
    pub role_min_events: u32,
    /// Default similarity weights and clamping behaviour.
    pub similarity: SimilarityConfig,
    /// Generation temperature for the natural-language parser.
    pub llm_temperature: f32,
    /// Store Gateway connection pool bounds and timeouts.
    pub store: StoreConfig,
    /// Overall per-request timeout.
    pub request_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_minutes_default: 450.0,
            min_cohort_size: 20,
            role_min_events: 30,
            similarity: SimilarityConfig::default(),
            llm_temperature: 0.1,
            store: StoreConfig::default(),
            request_timeout_ms: 10_000,
        }
    }
}

impl EngineConfig {
    /// Parse a config from a TOML document; callers pick where the bytes
    /// come from (file, embedded default, test fixture).
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Start from defaults, then apply whichever `OF_SCOUT_*` environment
    /// variables are present. Unset variables leave the default untouched;
    /// unparsable ones are ignored (the default wins) rather than panicking,
    /// since environment overrides are a convenience, not a contract.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(v) = env_f64("OF_SCOUT_MIN_MINUTES") {
            cfg.min_minutes_default = v;
        }
        if let Some(v) = env_usize("OF_SCOUT_MIN_COHORT_SIZE") {
            cfg.min_cohort_size = v;
        }
        if let Some(v) = env_u32("OF_SCOUT_ROLE_MIN_EVENTS") {
            cfg.role_min_events = v;
        }
        if let Some(v) = env_f32("OF_SCOUT_LLM_TEMPERATURE") {
            cfg.llm_temperature = v;
        }
        if let Some(v) = env_u64("OF_SCOUT_REQUEST_TIMEOUT_MS") {
            cfg.request_timeout_ms = v;
        }
        cfg.similarity.apply_env_overrides();
        cfg.store.apply_env_overrides();
        cfg
    }
}

fn env_f64(name: &str) -> Option<f64> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}
fn env_f32(name: &str) -> Option<f32> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}
fn env_usize(name: &str) -> Option<usize> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}
fn env_u32(name: &str) -> Option<u32> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}
fn env_u64(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.min_minutes_default, 450.0);
        assert_eq!(cfg.min_cohort_size, 20);
        assert_eq!(cfg.similarity.role_weight, 0.6);
        assert_eq!(cfg.similarity.stats_weight, 0.4);
        assert!(cfg.similarity.clamp_negative);
        assert_eq!(cfg.llm_temperature, 0.1);
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = EngineConfig::default();
        let s = toml::to_string(&cfg).unwrap();
        let back = EngineConfig::from_toml_str(&s).unwrap();
        assert_eq!(back.min_cohort_size, cfg.min_cohort_size);
    }
}
