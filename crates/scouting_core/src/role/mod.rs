//! Role Engine (spec §4.3): a fixed-width, L2-normalised spatial and
//! behavioural fingerprint per player-season, independent of volume.

mod engine;
mod explain;
mod vector;

pub use engine::{RoleDiagnostics, RoleEngine};
pub use explain::{explain, to_lines, BlockShare};
pub use vector::{RoleVector, PASS_DIRECTION_RANGE, POSITION_RANGE, SPREAD_RANGE, ZONE_RANGE};
