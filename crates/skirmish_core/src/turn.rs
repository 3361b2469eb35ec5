//! Round sequencing.
//!
//! The player side acts first, one unit at a time, consulting a [`Commander`]
//! for each decision; melee then resolves. If both sides still stand, the enemy
//! AI acts and melee resolves again. The battle can end after either combat pass.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai::run_ai_phase;
use crate::catalog::{Catalog, SpellId};
use crate::combat::{resolve_combat_phase, resolve_shot};
use crate::dice::{DiceRoller, SimulationRng};
use crate::error::{BattleError, MoveRejection};
use crate::grid::BattleGrid;
use crate::log::{ActionRecord, Journal, Phase, Rejection};
use crate::params::SimulationParams;
use crate::render::BoardSnapshot;
use crate::spell::cast_spell;
use crate::state::BattleState;
use crate::unit::{Position, Team, TurnFlags, UnitDefinition, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOrder {
    Stay,
    Advance(Position),
    /// Same reach as an advance, but the unit gives up magic and shooting.
    Run(Position),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellOrder {
    pub spell: SpellId,
    pub target: UnitId,
}

/// Decision source for the player side: a human at a prompt, a script, a test.
pub trait Commander {
    fn request_move(&mut self, state: &BattleState, unit: UnitId) -> MoveOrder;

    fn request_spell(&mut self, _state: &BattleState, _unit: UnitId) -> Option<SpellOrder> {
        None
    }

    fn request_shoot(&mut self, _state: &BattleState, _unit: UnitId) -> Option<UnitId> {
        None
    }
}

/// Commander that never does anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct HoldPosition;

impl Commander for HoldPosition {
    fn request_move(&mut self, _state: &BattleState, _unit: UnitId) -> MoveOrder {
        MoveOrder::Stay
    }
}

/// Where a unit is within its own activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Idle,
    Moved,
    MagicDone,
    ShootingDone,
    Complete,
}

impl Activation {
    pub fn next(self, flags: &TurnFlags) -> Self {
        match self {
            Activation::Idle => Activation::Moved,
            Activation::Moved if flags.has_run => Activation::Complete,
            Activation::Moved => Activation::MagicDone,
            Activation::MagicDone => Activation::ShootingDone,
            Activation::ShootingDone | Activation::Complete => Activation::Complete,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub round: u32,
    pub actions: Vec<ActionRecord>,
    pub charges: Vec<String>,
    pub rejections: Vec<Rejection>,
    pub game_over: bool,
    pub winner: Option<Team>,
}

pub struct Battle<D = SimulationRng> {
    state: BattleState,
    dice: D,
    rounds_completed: u32,
}

impl Battle<SimulationRng> {
    /// Standard setup: grid and seed from `params`, roster built from `definitions`.
    pub fn from_params(
        params: &SimulationParams,
        catalog: Catalog,
        definitions: &[UnitDefinition],
    ) -> Result<(Self, Vec<BattleError>), BattleError> {
        let (state, warnings) =
            BattleState::initialize(BattleGrid::new(params.grid_size), catalog, definitions)?;
        Ok((Self::new(state, params.rng()), warnings))
    }
}

impl<D: DiceRoller> Battle<D> {
    pub fn new(state: BattleState, dice: D) -> Self {
        Self {
            state,
            dice,
            rounds_completed: 0,
        }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn dice(&self) -> &D {
        &self.dice
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn winner(&self) -> Option<Team> {
        self.state.victor()
    }

    pub fn render_state(&self) -> BoardSnapshot {
        self.state.snapshot()
    }

    /// Plays one full round, or as much of it as the battle lasts.
    pub fn advance_turn(&mut self, commander: &mut impl Commander) -> TurnReport {
        let round = self.rounds_completed + 1;
        let mut journal = Journal::default();

        if !self.is_game_over() {
            info!(target: "skirmish_core.turn", round, "player phase");
            self.player_phase(commander, &mut journal);
            resolve_combat_phase(&mut self.state, &mut self.dice, &mut journal.log);

            if !self.is_game_over() {
                info!(target: "skirmish_core.turn", round, "enemy phase");
                run_ai_phase(&mut self.state, Team::Enemy, &mut self.dice, &mut journal);
                resolve_combat_phase(&mut self.state, &mut self.dice, &mut journal.log);
                self.rounds_completed = round;
            }
        }

        let game_over = self.is_game_over();
        let winner = self.winner();
        if game_over {
            info!(target: "skirmish_core.turn", round, winner = ?winner, "battle over");
        }
        TurnReport {
            round,
            actions: journal.log.into_records(),
            charges: journal.charges,
            rejections: journal.rejections,
            game_over,
            winner,
        }
    }

    fn player_phase(&mut self, commander: &mut impl Commander, journal: &mut Journal) {
        let ids: Vec<UnitId> = self.state.roster.ids().collect();
        for id in ids {
            let unit = &self.state.roster[id];
            if !unit.is_alive() || unit.team != Team::Player {
                continue;
            }
            self.state.roster[id].flags.reset();

            let mut step = Activation::Idle;
            while step != Activation::Complete {
                match step {
                    Activation::Idle => self.movement_phase(id, commander, journal),
                    Activation::Moved => self.magic_phase(id, commander, journal),
                    Activation::MagicDone => self.shooting_phase(id, commander, journal),
                    Activation::ShootingDone | Activation::Complete => {}
                }
                step = step.next(&self.state.roster[id].flags);
            }
        }
    }

    fn movement_phase(&mut self, id: UnitId, commander: &mut impl Commander, journal: &mut Journal) {
        let (destination, running) = match commander.request_move(&self.state, id) {
            MoveOrder::Stay => {
                self.state.roster[id].flags.has_moved = true;
                return;
            }
            MoveOrder::Advance(destination) => (destination, false),
            MoveOrder::Run(destination) => (destination, true),
        };

        let unit = &self.state.roster[id];
        let name = unit.name.clone();
        let distance = unit.position.manhattan_distance(destination);
        let reason = if !self.state.grid.contains(destination) {
            Some(MoveRejection::OutOfBounds)
        } else if distance > unit.movement {
            Some(MoveRejection::TooFar {
                distance,
                allowance: unit.movement,
            })
        } else {
            None
        };
        if let Some(reason) = reason {
            let error = BattleError::MoveRejected {
                unit: id,
                destination,
                reason,
            };
            journal.reject(name, Phase::Movement, error);
            return;
        }

        match self.state.relocate(id, destination) {
            Ok(charged) => {
                if running {
                    self.state.roster[id].flags.has_run = true;
                }
                if charged {
                    journal.charges.push(name);
                }
            }
            Err(error) => journal.reject(name, Phase::Movement, error),
        }
    }

    fn magic_phase(&mut self, id: UnitId, commander: &mut impl Commander, journal: &mut Journal) {
        if !self.state.roster[id].is_spellcaster {
            return;
        }
        let Some(order) = commander.request_spell(&self.state, id) else {
            return;
        };
        if let Err(error) = cast_spell(
            &mut self.state,
            id,
            order.spell,
            order.target,
            &mut self.dice,
            &mut journal.log,
        ) {
            let name = self.state.roster[id].name.clone();
            journal.reject(name, Phase::Magic, error);
        }
    }

    fn shooting_phase(&mut self, id: UnitId, commander: &mut impl Commander, journal: &mut Journal) {
        if !self.state.weapon_of(id).is_ranged() {
            return;
        }
        let Some(target) = commander.request_shoot(&self.state, id) else {
            return;
        };
        if let Err(error) = resolve_shot(&mut self.state, id, target, &mut self.dice, &mut journal.log) {
            let name = self.state.roster[id].name.clone();
            journal.reject(name, Phase::Shooting, error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SpecialRule;
    use crate::dice::ScriptedDice;
    use crate::log::ActionKind;
    use crate::state::fixtures::{state, unit, weapon};

    /// Replays canned orders, one per request.
    #[derive(Default)]
    struct Script {
        moves: Vec<MoveOrder>,
        spells: Vec<Option<SpellOrder>>,
        shots: Vec<Option<UnitId>>,
        asked_to_shoot: usize,
    }

    impl Commander for Script {
        fn request_move(&mut self, _state: &BattleState, _unit: UnitId) -> MoveOrder {
            if self.moves.is_empty() {
                MoveOrder::Stay
            } else {
                self.moves.remove(0)
            }
        }

        fn request_spell(&mut self, _state: &BattleState, _unit: UnitId) -> Option<SpellOrder> {
            if self.spells.is_empty() {
                None
            } else {
                self.spells.remove(0)
            }
        }

        fn request_shoot(&mut self, _state: &BattleState, _unit: UnitId) -> Option<UnitId> {
            self.asked_to_shoot += 1;
            if self.shots.is_empty() {
                None
            } else {
                self.shots.remove(0)
            }
        }
    }

    #[test]
    fn activation_skips_magic_and_shooting_after_a_run() {
        let ran = TurnFlags {
            has_moved: true,
            has_run: true,
            has_charged: false,
        };
        assert_eq!(Activation::Complete, Activation::Moved.next(&ran));
        let walked = TurnFlags::default();
        assert_eq!(Activation::MagicDone, Activation::Moved.next(&walked));
        assert_eq!(Activation::ShootingDone, Activation::MagicDone.next(&walked));
        assert_eq!(Activation::Complete, Activation::ShootingDone.next(&walked));
    }

    #[test]
    fn too_far_and_occupied_moves_are_rejected() {
        let state = state(
            vec![weapon("Club", 1, 1, SpecialRule::None)],
            vec![
                unit("Scout", Team::Player, 0, 0, 0),
                unit("Squire", Team::Player, 0, 0, 1),
                unit("Far", Team::Enemy, 0, 7, 7),
            ],
        );
        let mut battle = Battle::new(state, ScriptedDice::default());
        let mut script = Script {
            moves: vec![
                MoveOrder::Advance(Position::new(5, 0)),
                MoveOrder::Advance(Position::new(0, 0)),
            ],
            ..Default::default()
        };
        let report = battle.advance_turn(&mut script);
        let reasons: Vec<_> = report
            .rejections
            .iter()
            .map(|r| match r.error {
                BattleError::MoveRejected { reason, .. } => reason,
                _ => panic!("unexpected rejection {r:?}"),
            })
            .collect();
        assert_eq!(
            vec![
                MoveRejection::TooFar {
                    distance: 5,
                    allowance: 4
                },
                MoveRejection::Occupied
            ],
            reasons
        );
        assert_eq!(Position::new(0, 0), battle.state().roster[UnitId(0)].position);
        assert!(!battle.state().roster[UnitId(0)].flags.has_moved);
    }

    #[test]
    fn moving_into_contact_sets_charge_and_keeps_moved() {
        let state = state(
            vec![weapon("Club", 1, 1, SpecialRule::None)],
            vec![
                unit("Raider", Team::Player, 0, 0, 0),
                unit("Sentry", Team::Enemy, 0, 0, 4),
            ],
        );
        // Raider misses, Sentry misses; Raider gets shoved back to (0,2).
        // Sentry then charges back in during its own phase and both miss again.
        let mut battle = Battle::new(state, ScriptedDice::new([1, 1, 1, 1]));
        let mut script = Script {
            moves: vec![MoveOrder::Advance(Position::new(0, 3))],
            ..Default::default()
        };
        let report = battle.advance_turn(&mut script);
        assert_eq!(vec!["Raider".to_string(), "Sentry".to_string()], report.charges);
        let raider = &battle.state().roster[UnitId(0)];
        assert!(raider.flags.has_moved);
        assert!(raider.flags.has_charged);
        assert_eq!(4, report.actions.len());
        assert_eq!(1, battle.rounds_completed());
        assert!(!report.game_over);
    }

    #[test]
    fn running_forfeits_shooting() {
        let state = state(
            vec![weapon("Bow", 4, 1, SpecialRule::None)],
            vec![
                unit("Archer", Team::Player, 0, 0, 0),
                unit("Target", Team::Enemy, 0, 7, 7),
            ],
        );
        let mut battle = Battle::new(state, ScriptedDice::default());
        let mut script = Script {
            moves: vec![MoveOrder::Run(Position::new(2, 0))],
            shots: vec![Some(UnitId(1))],
            ..Default::default()
        };
        battle.advance_turn(&mut script);
        assert_eq!(0, script.asked_to_shoot);
        assert!(battle.state().roster[UnitId(0)].flags.has_run);
    }

    #[test]
    fn casters_cast_and_shooters_shoot() {
        let mut seer = unit("Seer", Team::Player, 1, 0, 0);
        seer.is_spellcaster = true;
        let state = state(
            vec![
                weapon("Club", 1, 1, SpecialRule::None),
                weapon("Bow", 4, 1, SpecialRule::None),
            ],
            vec![seer, unit("Target", Team::Enemy, 0, 0, 4)],
        );
        // Old Forest Roots on self (3+3 vs 4), then a shot: hit 5, wound 2 fails.
        // The enemy then closes to (0,1) and melee goes both ways: all misses.
        let dice = ScriptedDice::new([3, 3, 5, 2, 1, 1]);
        let mut battle = Battle::new(state, dice);
        let mut script = Script {
            spells: vec![Some(SpellOrder {
                spell: SpellId(0),
                target: UnitId(0),
            })],
            shots: vec![Some(UnitId(1))],
            ..Default::default()
        };
        let report = battle.advance_turn(&mut script);
        let kinds: Vec<_> = report.actions.iter().map(|a| a.kind).collect();
        assert_eq!(
            vec![
                ActionKind::SpellSuccess,
                ActionKind::Ranged,
                ActionKind::Melee,
                ActionKind::Melee
            ],
            kinds
        );
        assert_eq!(4, battle.state().roster[UnitId(0)].toughness);
        assert_eq!(0, battle.dice().remaining());
    }

    #[test]
    fn battle_can_end_mid_round() {
        let mut axe = weapon("Axe", 1, 1, SpecialRule::DeathWound);
        axe.bonus_damage = 5;
        let mut victim = unit("Victim", Team::Enemy, 0, 0, 2);
        victim.wounds = 1;
        let state = state(vec![axe], vec![unit("Reaper", Team::Player, 0, 0, 0), victim]);
        let mut battle = Battle::new(state, ScriptedDice::new([6]));
        let mut script = Script {
            moves: vec![MoveOrder::Advance(Position::new(0, 1))],
            ..Default::default()
        };
        let report = battle.advance_turn(&mut script);
        assert!(report.game_over);
        assert_eq!(Some(Team::Player), report.winner);
        assert_eq!(1, report.round);
        assert_eq!(0, battle.rounds_completed());

        let after = battle.advance_turn(&mut HoldPosition);
        assert!(after.game_over);
        assert!(after.actions.is_empty());
    }
}
