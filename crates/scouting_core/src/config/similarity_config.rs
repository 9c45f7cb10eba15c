use serde::{Deserialize, Serialize};
use std::env;

/// Default similarity weights and clamping behaviour (spec §4.5, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityConfig {
    pub role_weight: f64,
    pub stats_weight: f64,
    /// Clamp negative cosine components to zero before combining.
    pub clamp_negative: bool,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self { role_weight: 0.6, stats_weight: 0.4, clamp_negative: true }
    }
}

impl SimilarityConfig {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("OF_SCOUT_ROLE_WEIGHT") {
            if let Ok(v) = v.parse() {
                self.role_weight = v;
            }
        }
        if let Ok(v) = env::var("OF_SCOUT_STATS_WEIGHT") {
            if let Ok(v) = v.parse() {
                self.stats_weight = v;
            }
        }
        if let Ok(v) = env::var("OF_SCOUT_SIMILARITY_CLAMP") {
            self.clamp_negative = matches!(v.as_str(), "1" | "true" | "on");
        }
    }

    /// Normalised (role, stats) weight pair summing to 1.0.
    ///
    /// # Panics
    /// Never; callers validating a `StructuredQuery` should reject a
    /// non-positive sum before constructing a `SimilarityConfig` from it
    /// (see `catalog::validator::validate_query`). A non-positive sum here
    /// falls back to the documented defaults rather than dividing by zero.
    pub fn normalized(&self) -> (f64, f64) {
        let sum = self.role_weight + self.stats_weight;
        if sum <= 0.0 {
            return (0.6, 0.4);
        }
        (self.role_weight / sum, self.stats_weight / sum)
    }
}
