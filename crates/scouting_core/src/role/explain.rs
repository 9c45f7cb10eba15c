use super::vector::{RoleVector, PASS_DIRECTION_RANGE, POSITION_RANGE, SPREAD_RANGE, ZONE_RANGE};
use serde::Serialize;
use std::fmt;

/// One named block's share of a RoleVector's squared magnitude,
/// expressed as a percentage of the vector's total squared norm. Used
/// both as a human-readable decomposition and as the Similarity
/// Engine's per-block attribution basis (spec §4.3, §4.5).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BlockShare {
    pub block: &'static str,
    pub percentage: f64,
}

impl fmt::Display for BlockShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.1}%", self.block, self.percentage)
    }
}

/// Render a full block decomposition as one line per block, for a scout
/// reading the output rather than a program parsing it.
pub fn to_lines(shares: &[BlockShare]) -> Vec<String> {
    shares.iter().map(|s| s.to_string()).collect()
}

/// Reverse a RoleVector's block layout into named percentages.
pub fn explain(vector: &RoleVector) -> Vec<BlockShare> {
    let total_sq: f64 = vector.0.iter().map(|v| v * v).sum();
    let blocks = [
        ("position", POSITION_RANGE),
        ("spread", SPREAD_RANGE),
        ("zone", ZONE_RANGE),
        ("pass_direction", PASS_DIRECTION_RANGE),
    ];

    blocks
        .into_iter()
        .map(|(name, range)| {
            let block_sq: f64 = vector.block(range).iter().map(|v| v * v).sum();
            let percentage = if total_sq > f64::EPSILON { block_sq / total_sq * 100.0 } else { 0.0 };
            BlockShare { block: name, percentage }
        })
        .collect()
}
