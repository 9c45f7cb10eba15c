//! Read-only domain entities (spec §3). Concrete storage lives in the
//! external relational store; these are the typed shapes the rest of the
//! crate works with once a row has been fetched through the Store Gateway.

pub mod player_season;
mod position;

pub use player_season::{PlayerSeason, PositionalAggregates};
pub use position::{Position, PositionGroup};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, stable player identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeagueId(pub Uuid);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Season(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreferredFoot {
    Left,
    Right,
    Both,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub date_of_birth: chrono::NaiveDate,
    pub nationality: String,
    pub primary_position: Position,
    pub preferred_foot: PreferredFoot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
}
