//! Deterministic dice-driven squad skirmish engine.
//!
//! Two teams fight on a square grid. All randomness goes through a
//! [`DiceRoller`], so a seeded [`SimulationRng`] replays a battle exactly and a
//! [`ScriptedDice`] pins down individual rolls in tests.

pub mod ai;
pub mod catalog;
pub mod combat;
pub mod dice;
pub mod error;
pub mod grid;
pub mod log;
pub mod params;
pub mod render;
pub mod spell;
pub mod state;
pub mod turn;
pub mod unit;

pub use catalog::{Catalog, SpecialRule, Spell, SpellEffect, SpellId, SpellTarget, Weapon, WeaponId};
pub use combat::{resolve_combat_phase, resolve_shot, AttackKind, ExchangeOutcome, PairOutcome};
pub use dice::{DiceRoll, DiceRoller, ScriptedDice, SimulationRng};
pub use error::{BattleError, DefinitionKind, MoveRejection, TargetRejection};
pub use grid::BattleGrid;
pub use log::{ActionKind, ActionLog, ActionRecord, Phase, Rejection};
pub use params::{SimulationParams, DEFAULT_GRID_SIZE, DEFAULT_SEED};
pub use render::{BoardSnapshot, UnitSnapshot};
pub use spell::{cast_spell, AppliedEffect, Knockback, SpellOutcome};
pub use state::BattleState;
pub use turn::{Battle, Commander, HoldPosition, MoveOrder, SpellOrder, TurnReport};
pub use unit::{Position, Roster, Team, TurnFlags, Unit, UnitDefinition, UnitId};
