use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::BattleError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Melee,
    Ranged,
    SpellSuccess,
    SpellFailure,
}

/// One recap line. `wounds` counts ordinary wounds only; death wounds are in
/// `death_wounds`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub attacker: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell: Option<String>,
    pub kind: ActionKind,
    pub hits: u32,
    pub wounds: i32,
    #[serde(default)]
    pub death_wounds: i32,
    pub target_wounds: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_needed: Option<i32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionLog {
    records: Vec<ActionRecord>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ActionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<ActionRecord> {
        self.records
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Movement,
    Magic,
    Shooting,
}

/// An action the engine refused. The unit loses that phase; the turn goes on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub unit: String,
    pub phase: Phase,
    pub error: BattleError,
}

/// Everything gathered while one side acts and fights.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Journal {
    pub log: ActionLog,
    pub charges: Vec<String>,
    pub rejections: Vec<Rejection>,
}

impl Journal {
    pub fn reject(&mut self, unit: String, phase: Phase, error: BattleError) {
        info!(target: "skirmish_core.turn", unit = %unit, phase = ?phase, %error, "action rejected");
        self.rejections.push(Rejection { unit, phase, error });
    }
}
