use serde::{Deserialize, Serialize};
use std::env;

/// Store Gateway connection-pool bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub pool_size: u32,
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { pool_size: 10, timeout_ms: 5_000 }
    }
}

impl StoreConfig {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("OF_SCOUT_STORE_POOL_SIZE") {
            if let Ok(v) = v.parse() {
                self.pool_size = v;
            }
        }
        if let Ok(v) = env::var("OF_SCOUT_STORE_TIMEOUT_MS") {
            if let Ok(v) = v.parse() {
                self.timeout_ms = v;
            }
        }
    }
}
