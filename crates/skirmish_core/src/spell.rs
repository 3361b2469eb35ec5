use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{Spell, SpellEffect, SpellId, SpellTarget};
use crate::dice::{DiceRoll, DiceRoller};
use crate::error::{BattleError, DefinitionKind, TargetRejection};
use crate::log::{ActionKind, ActionLog, ActionRecord};
use crate::state::BattleState;
use crate::unit::{Position, UnitId};

pub const KNOCKBACK_DISTANCE: i32 = 3;
const CAST_DICE: usize = 2;

/// Where a blast throws its target. Back comes up on half the faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Knockback {
    Back,
    Left,
    Right,
    Forward,
}

impl Knockback {
    pub fn from_roll(roll: u8) -> Self {
        match roll {
            0..=3 => Knockback::Back,
            4 => Knockback::Left,
            5 => Knockback::Right,
            _ => Knockback::Forward,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Knockback::Back => (-KNOCKBACK_DISTANCE, 0),
            Knockback::Left => (0, -KNOCKBACK_DISTANCE),
            Knockback::Right => (0, KNOCKBACK_DISTANCE),
            Knockback::Forward => (KNOCKBACK_DISTANCE, 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedEffect {
    ToughnessRaised { toughness: i32 },
    AccuracyLowered { combat_value: i32, changed: bool },
    StrengthRaised { strength: i32 },
    Blasted {
        damage: i32,
        knockback: Knockback,
        moved_to: Option<Position>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellOutcome {
    pub spell: SpellId,
    pub roll: DiceRoll,
    pub needed: i32,
    pub effect: Option<AppliedEffect>,
}

impl SpellOutcome {
    pub fn succeeded(&self) -> bool {
        self.roll.total() >= self.needed
    }
}

pub fn validate_target(
    state: &BattleState,
    caster: UnitId,
    spell: &Spell,
    target: UnitId,
) -> Result<(), BattleError> {
    let Some(victim) = state.roster.get(target) else {
        return Err(BattleError::invalid_target(target, TargetRejection::Unknown));
    };
    if !victim.is_alive() {
        return Err(BattleError::invalid_target(target, TargetRejection::Dead));
    }
    let same_team = victim.team == state.roster[caster].team;
    let allowed = match spell.target {
        SpellTarget::Ally => same_team,
        SpellTarget::Enemy => !same_team,
    };
    if !allowed {
        return Err(BattleError::invalid_target(target, TargetRejection::WrongTeam));
    }
    Ok(())
}

/// Validates, rolls 2d6 against the cost and applies the effect on success.
/// Both outcomes are logged; a rejected target rolls nothing.
pub fn cast_spell(
    state: &mut BattleState,
    caster: UnitId,
    spell_id: SpellId,
    target: UnitId,
    dice: &mut impl DiceRoller,
    log: &mut ActionLog,
) -> Result<SpellOutcome, BattleError> {
    let spell = state
        .catalog
        .spell(spell_id)
        .cloned()
        .ok_or_else(|| BattleError::DefinitionMissing {
            kind: DefinitionKind::Spell,
            name: format!("#{}", spell_id.0),
        })?;
    validate_target(state, caster, &spell, target)?;

    let roll = dice.roll(CAST_DICE);
    let mut outcome = SpellOutcome {
        spell: spell_id,
        roll,
        needed: spell.cost,
        effect: None,
    };
    if outcome.succeeded() {
        outcome.effect = Some(apply_effect(state, spell.effect, target, dice));
    }

    let (by, on) = (&state.roster[caster], &state.roster[target]);
    info!(
        target: "skirmish_core.spell",
        caster = %by.name,
        target_unit = %on.name,
        spell = %spell.name,
        roll = outcome.roll.total(),
        needed = spell.cost,
        success = outcome.succeeded(),
        "spell cast"
    );
    let wounds = match outcome.effect {
        Some(AppliedEffect::Blasted { damage, .. }) => damage,
        _ => 0,
    };
    log.push(ActionRecord {
        attacker: by.name.clone(),
        target: on.name.clone(),
        spell: Some(spell.name.clone()),
        kind: if outcome.succeeded() {
            ActionKind::SpellSuccess
        } else {
            ActionKind::SpellFailure
        },
        hits: 0,
        wounds,
        death_wounds: 0,
        target_wounds: on.wounds,
        roll: Some(outcome.roll.total()),
        roll_needed: Some(spell.cost),
    });
    Ok(outcome)
}

fn apply_effect(
    state: &mut BattleState,
    effect: SpellEffect,
    target: UnitId,
    dice: &mut impl DiceRoller,
) -> AppliedEffect {
    let unit = &mut state.roster[target];
    match effect {
        SpellEffect::ToughnessBuff => {
            unit.toughness += 1;
            AppliedEffect::ToughnessRaised {
                toughness: unit.toughness,
            }
        }
        SpellEffect::AccuracyDebuff => {
            let changed = unit.combat_value > 1 && unit.combat_value < 6;
            if changed {
                unit.combat_value -= 1;
            }
            AppliedEffect::AccuracyLowered {
                combat_value: unit.combat_value,
                changed,
            }
        }
        SpellEffect::StrengthBuff => {
            unit.strength += 1;
            AppliedEffect::StrengthRaised {
                strength: unit.strength,
            }
        }
        SpellEffect::DamageAndKnockback => {
            let damage = i32::from(dice.roll_d6());
            unit.wounds -= damage;
            let knockback = Knockback::from_roll(dice.roll_d6());
            let (dx, dy) = knockback.delta();
            let destination = unit.position.offset(dx, dy);
            let moved_to = state
                .grid
                .move_unit(&mut state.roster, target, destination)
                .ok()
                .map(|()| destination);
            AppliedEffect::Blasted {
                damage,
                knockback,
                moved_to,
            }
        }
    }
}
