use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::unit::{Position, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Weapon,
    Spell,
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefinitionKind::Weapon => f.write_str("weapon"),
            DefinitionKind::Spell => f.write_str("spell"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveRejection {
    #[error("out of bounds")]
    OutOfBounds,
    #[error("tile occupied")]
    Occupied,
    #[error("too far ({distance} > {allowance})")]
    TooFar { distance: i32, allowance: i32 },
    #[error("unit is dead")]
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetRejection {
    #[error("no such unit")]
    Unknown,
    #[error("target is dead")]
    Dead,
    #[error("target is on the wrong team")]
    WrongTeam,
    #[error("target out of range ({distance} > {range})")]
    OutOfRange { distance: i32, range: i32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleError {
    #[error("{kind} `{name}` is not defined")]
    DefinitionMissing { kind: DefinitionKind, name: String },

    #[error("invalid target {target:?}: {reason}")]
    InvalidTarget {
        target: UnitId,
        reason: TargetRejection,
    },

    #[error("move of {unit:?} to {destination} rejected: {reason}")]
    MoveRejected {
        unit: UnitId,
        destination: Position,
        reason: MoveRejection,
    },

    #[error("unit `{name}` cannot be placed at {position}")]
    InvalidPlacement { name: String, position: Position },

    #[error("roster storage for {requested} units could not be allocated")]
    AllocationFailure { requested: usize },
}

impl BattleError {
    pub fn invalid_target(target: UnitId, reason: TargetRejection) -> Self {
        BattleError::InvalidTarget { target, reason }
    }
}
