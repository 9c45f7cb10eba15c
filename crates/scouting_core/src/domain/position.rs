use serde::{Deserialize, Serialize};

/// A player's declared position code.
///
/// Mirrors a standard 15-way notation plus the three generic group codes
/// (`DF`/`MF`/`FW`) that some feeds report instead of a specific slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    GK,
    LB,
    CB,
    RB,
    LWB,
    RWB,
    CDM,
    CM,
    CAM,
    LM,
    RM,
    LW,
    RW,
    CF,
    ST,
    DF,
    MF,
    FW,
}

/// The four coarse groups used by the Catalogue's position-scope checks
/// and by the Role Engine's position-encoding block (spec §4.3 dims 0-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionGroup {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl PositionGroup {
    pub fn code(&self) -> &'static str {
        match self {
            PositionGroup::Goalkeeper => "GK",
            PositionGroup::Defender => "DF",
            PositionGroup::Midfielder => "MF",
            PositionGroup::Forward => "FW",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "GK" => Some(PositionGroup::Goalkeeper),
            "DF" => Some(PositionGroup::Defender),
            "MF" => Some(PositionGroup::Midfielder),
            "FW" => Some(PositionGroup::Forward),
            _ => None,
        }
    }
}

impl Position {
    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Position::GK)
    }

    pub fn is_defender(&self) -> bool {
        matches!(
            self,
            Position::LB | Position::CB | Position::RB | Position::LWB | Position::RWB | Position::DF
        )
    }

    pub fn is_midfielder(&self) -> bool {
        matches!(
            self,
            Position::CDM | Position::CM | Position::CAM | Position::LM | Position::RM | Position::MF
        )
    }

    pub fn is_forward(&self) -> bool {
        matches!(self, Position::LW | Position::RW | Position::CF | Position::ST | Position::FW)
    }

    pub fn to_group(&self) -> PositionGroup {
        if self.is_goalkeeper() {
            PositionGroup::Goalkeeper
        } else if self.is_defender() {
            PositionGroup::Defender
        } else if self.is_midfielder() {
            PositionGroup::Midfielder
        } else {
            PositionGroup::Forward
        }
    }

    /// Smoothed group membership for the Role Engine's one-hot-like
    /// position-encoding block (spec §4.3 dims 0-3). Pure codes resolve to
    /// a single group with weight 1.0; the two wing-back/hybrid codes
    /// split their weight across the two groups they bridge, since a
    /// wing-back both defends and supports the midfield.
    ///
    /// Returns `(goalkeeper, defender, midfielder, forward)` fractions
    /// summing to 1.0.
    pub fn group_smoothing(&self) -> (f64, f64, f64, f64) {
        match self {
            Position::GK => (1.0, 0.0, 0.0, 0.0),
            Position::LWB | Position::RWB => (0.0, 0.65, 0.35, 0.0),
            Position::CDM => (0.0, 0.2, 0.8, 0.0),
            Position::CAM => (0.0, 0.0, 0.7, 0.3),
            Position::LB | Position::CB | Position::RB | Position::DF => (0.0, 1.0, 0.0, 0.0),
            Position::CM | Position::LM | Position::RM | Position::MF => (0.0, 0.0, 1.0, 0.0),
            Position::LW | Position::RW | Position::CF | Position::ST | Position::FW => {
                (0.0, 0.0, 0.0, 1.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_smoothing_sums_to_one() {
        for pos in [
            Position::GK,
            Position::LWB,
            Position::RWB,
            Position::CDM,
            Position::CAM,
            Position::CB,
            Position::CM,
            Position::ST,
        ] {
            let (gk, df, mf, fw) = pos.group_smoothing();
            assert!((gk + df + mf + fw - 1.0).abs() < 1e-9, "{pos:?}");
        }
    }

    #[test]
    fn pure_codes_are_single_group() {
        assert_eq!(Position::ST.to_group(), PositionGroup::Forward);
        assert_eq!(Position::CB.to_group(), PositionGroup::Defender);
        assert_eq!(Position::CM.to_group(), PositionGroup::Midfielder);
        assert_eq!(Position::GK.to_group(), PositionGroup::Goalkeeper);
    }
}
