//! Attack exchanges and the melee combat phase.
//!
//! An exchange rolls one to-hit die per weapon attack. A hit moves on to one
//! to-wound die, or two on a `critical_hit` crit. A `death_wound` crit skips
//! wounding and takes `1 + bonus_damage` straight off the defender. A
//! `lifesteal` crit heals the attacker once per successful wound.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{SpecialRule, Weapon};
use crate::dice::{DiceRoller, DIE_SIDES};
use crate::error::{BattleError, TargetRejection};
use crate::log::{ActionKind, ActionLog, ActionRecord};
use crate::state::BattleState;
use crate::unit::{Position, Unit, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    Melee,
    Ranged,
}

impl From<AttackKind> for ActionKind {
    fn from(kind: AttackKind) -> Self {
        match kind {
            AttackKind::Melee => ActionKind::Melee,
            AttackKind::Ranged => ActionKind::Ranged,
        }
    }
}

/// Not clamped: above 6 never hits, below 1 always does.
pub fn to_hit_threshold(combat_value: i32) -> i32 {
    7 - combat_value
}

pub fn to_wound_threshold(strength: i32, toughness: i32) -> i32 {
    (4 - strength + toughness).clamp(2, 6)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WoundRoll {
    pub roll: u8,
    pub needed: i32,
    pub success: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackDie {
    pub roll: u8,
    pub needed: i32,
    pub critical: bool,
    pub hit: bool,
    pub death_wound: bool,
    pub wound_rolls: Vec<WoundRoll>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeOutcome {
    pub dice: Vec<AttackDie>,
    /// Successful wound rolls.
    pub hits: u32,
    /// Ordinary wounds, `(1 + bonus_damage) * hits`. Applied by the caller.
    pub wounds: i32,
    /// Already taken off the defender when the exchange is struck.
    pub death_wounds: i32,
    pub healed: i32,
}

/// Rolls a full exchange without touching either unit.
pub fn roll_exchange(
    attacker: &Unit,
    weapon: &Weapon,
    defender: &Unit,
    dice: &mut impl DiceRoller,
) -> ExchangeOutcome {
    let hit_needed = to_hit_threshold(attacker.combat_value);
    let wound_needed = to_wound_threshold(attacker.strength + weapon.bonus_strength, defender.toughness);
    let mut outcome = ExchangeOutcome::default();

    for _ in 0..weapon.attacks {
        let roll = dice.roll_d6();
        let critical = roll == DIE_SIDES;
        let hit = i32::from(roll) >= hit_needed;
        let mut die = AttackDie {
            roll,
            needed: hit_needed,
            critical,
            hit,
            death_wound: false,
            wound_rolls: Vec::new(),
        };

        if hit && critical && weapon.special_rule == SpecialRule::DeathWound {
            die.death_wound = true;
            outcome.death_wounds += weapon.damage_per_hit();
        } else if hit {
            let wound_dice = if critical && weapon.special_rule == SpecialRule::CriticalHit {
                2
            } else {
                1
            };
            for _ in 0..wound_dice {
                let roll = dice.roll_d6();
                let success = i32::from(roll) >= wound_needed;
                if success {
                    outcome.hits += 1;
                    if critical && weapon.special_rule == SpecialRule::Lifesteal {
                        outcome.healed += 1;
                    }
                }
                die.wound_rolls.push(WoundRoll {
                    roll,
                    needed: wound_needed,
                    success,
                });
            }
        }

        debug!(
            target: "skirmish_core.combat",
            attacker = %attacker.name,
            roll,
            needed = hit_needed,
            critical,
            hit,
            wound_rolls = ?die.wound_rolls.iter().map(|w| w.roll).collect::<Vec<_>>(),
            "attack die"
        );
        outcome.dice.push(die);
    }

    outcome.wounds = weapon.damage_per_hit() * outcome.hits as i32;
    outcome
}

/// Rolls an exchange and applies its immediate effects (death wounds, lifesteal).
/// Ordinary wounds are left for the caller so both sides of a melee land together.
pub fn strike(
    state: &mut BattleState,
    attacker: UnitId,
    defender: UnitId,
    kind: AttackKind,
    dice: &mut impl DiceRoller,
    log: &mut ActionLog,
) -> ExchangeOutcome {
    let outcome = roll_exchange(
        &state.roster[attacker],
        state.weapon_of(attacker),
        &state.roster[defender],
        dice,
    );
    state.roster[defender].wounds -= outcome.death_wounds;
    state.roster[attacker].wounds += outcome.healed;

    let (a, d) = (&state.roster[attacker], &state.roster[defender]);
    info!(
        target: "skirmish_core.combat",
        attacker = %a.name,
        defender = %d.name,
        kind = ?kind,
        hits = outcome.hits,
        wounds = outcome.wounds,
        death_wounds = outcome.death_wounds,
        healed = outcome.healed,
        "exchange resolved"
    );
    log.push(ActionRecord {
        attacker: a.name.clone(),
        target: d.name.clone(),
        spell: None,
        kind: kind.into(),
        hits: outcome.hits,
        wounds: outcome.wounds,
        death_wounds: outcome.death_wounds,
        target_wounds: d.wounds - outcome.wounds,
        roll: None,
        roll_needed: None,
    });
    outcome
}

/// A ranged attack: validates the target, strikes, and applies the wounds at once.
pub fn resolve_shot(
    state: &mut BattleState,
    shooter: UnitId,
    target: UnitId,
    dice: &mut impl DiceRoller,
    log: &mut ActionLog,
) -> Result<ExchangeOutcome, BattleError> {
    let reject = |reason| BattleError::invalid_target(target, reason);
    let Some(victim) = state.roster.get(target) else {
        return Err(reject(TargetRejection::Unknown));
    };
    let unit = &state.roster[shooter];
    if !victim.is_alive() {
        return Err(reject(TargetRejection::Dead));
    }
    if !victim.is_enemy_of(unit) {
        return Err(reject(TargetRejection::WrongTeam));
    }
    let distance = unit.position.manhattan_distance(victim.position);
    let range = state.weapon_of(shooter).range;
    if distance > range {
        return Err(reject(TargetRejection::OutOfRange { distance, range }));
    }

    let outcome = strike(state, shooter, target, AttackKind::Ranged, dice, log);
    state.roster[target].wounds -= outcome.wounds;
    Ok(outcome)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairOutcome {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub charge: bool,
    pub strike: ExchangeOutcome,
    pub retaliation: Option<ExchangeOutcome>,
    pub pushed_to: Option<Position>,
}

/// One melee engagement. The defender only swings back if it survived the
/// attacker's death wounds; a surviving defender shoves the attacker back a tile.
pub fn resolve_pair(
    state: &mut BattleState,
    attacker: UnitId,
    defender: UnitId,
    dice: &mut impl DiceRoller,
    log: &mut ActionLog,
) -> PairOutcome {
    let charge = state.roster[attacker].flags.has_charged;
    let first = strike(state, attacker, defender, AttackKind::Melee, dice, log);
    let retaliation = state
        .roster
        .is_alive(defender)
        .then(|| strike(state, defender, attacker, AttackKind::Melee, dice, log));

    state.roster[defender].wounds -= first.wounds;
    if let Some(back) = &retaliation {
        state.roster[attacker].wounds -= back.wounds;
    }

    let mut pushed_to = None;
    if state.roster.is_alive(defender) && state.roster.is_alive(attacker) {
        let from = state.roster[attacker].position;
        let away = state.roster[defender].position;
        let destination = from.offset((from.x - away.x).signum(), (from.y - away.y).signum());
        if state.grid.move_unit(&mut state.roster, attacker, destination).is_ok() {
            pushed_to = Some(destination);
        }
    }

    PairOutcome {
        attacker,
        defender,
        charge,
        strike: first,
        retaliation,
        pushed_to,
    }
}

/// Resolves every opposing pair in contact when the phase opens exactly once:
/// chargers lead, then the rest, each pass in roster order. Pushback never
/// cancels a pair that was engaged at the start; only a death does.
pub fn resolve_combat_phase(
    state: &mut BattleState,
    dice: &mut impl DiceRoller,
    log: &mut ActionLog,
) -> Vec<PairOutcome> {
    let mut outcomes = Vec::new();
    for (a, b) in engaged_pairs(state) {
        if !state.roster.is_alive(a) || !state.roster.is_alive(b) {
            continue;
        }
        outcomes.push(resolve_pair(state, a, b, dice, log));
    }

    debug!(target: "skirmish_core.combat", pairs = outcomes.len(), "combat phase resolved");
    outcomes
}

/// Adjacent opposing pairs in strike order, attacker first.
fn engaged_pairs(state: &BattleState) -> Vec<(UnitId, UnitId)> {
    let mut seen: HashSet<(UnitId, UnitId)> = HashSet::new();
    let mut pairs = Vec::new();
    for chargers in [true, false] {
        for (a, first) in state.roster.living() {
            if first.flags.has_charged != chargers {
                continue;
            }
            for (b, second) in state.roster.living() {
                if first.is_enemy_of(second)
                    && first.position.is_adjacent(second.position)
                    && seen.insert((a.min(b), a.max(b)))
                {
                    pairs.push((a, b));
                }
            }
        }
    }
    pairs
}
