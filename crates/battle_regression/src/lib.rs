//! Helpers for deterministic regression tests.

use scenario_core::Autopilot;
use serde_json::json;
use skirmish_core::{
    Battle, BattleError, Catalog, DiceRoller, SimulationParams, SimulationRng, Team, TurnReport,
    UnitDefinition,
};

pub const DEFAULT_SEED: u64 = 42;

pub fn sample_rolls(seed: u64, count: usize) -> serde_json::Value {
    let mut rng = SimulationRng::new(seed);
    let roll = rng.roll(count);
    json!({ "faces": roll.faces, "total": roll.total(), "seed": seed })
}

/// A line soldier: movement 4, cv 4, strength 3, toughness 3, 4 wounds.
pub fn unit_definition(name: &str, team: Team, weapon: &str, x: i32, y: i32) -> UnitDefinition {
    UnitDefinition {
        name: name.to_string(),
        movement: 4,
        combat_value: 4,
        strength: 3,
        toughness: 3,
        wounds: 4,
        is_spellcaster: false,
        weapon: weapon.to_string(),
        team,
        x,
        y,
    }
}

/// Three against three across the standard board, one caster and one shooter a side.
pub fn standard_roster() -> Vec<UnitDefinition> {
    let mut roster = vec![
        unit_definition("Gorefang", Team::Player, "Bestial Blades", 0, 2),
        unit_definition("Mossmother", Team::Player, "Bestial Staff", 0, 4),
        unit_definition("Thornshot", Team::Player, "Bestial Bow", 1, 6),
        unit_definition("Gravewarden", Team::Enemy, "Spectral Axe", 7, 2),
        unit_definition("Boneseer", Team::Enemy, "Bestial Staff", 7, 4),
        unit_definition("Deadeye", Team::Enemy, "Crossbow of Death", 6, 6),
    ];
    roster[1].is_spellcaster = true;
    roster[4].is_spellcaster = true;
    roster
}

/// Autopilot against the AI for up to `max_rounds`, returning every round's report.
pub fn simulate_battle(seed: u64, max_rounds: u32) -> Result<Vec<TurnReport>, BattleError> {
    let params = SimulationParams::from_seed(seed);
    let (mut battle, _) = Battle::from_params(&params, Catalog::standard(), &standard_roster())?;
    let mut rounds = Vec::new();
    while !battle.is_game_over() && battle.rounds_completed() < max_rounds {
        rounds.push(battle.advance_turn(&mut Autopilot));
    }
    Ok(rounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolls_are_deterministic() {
        let a = sample_rolls(DEFAULT_SEED, 4);
        let b = sample_rolls(DEFAULT_SEED, 4);
        assert_eq!(a, b);
    }

    #[test]
    fn standard_roster_is_valid() {
        let params = SimulationParams::default();
        let (battle, warnings) =
            Battle::from_params(&params, Catalog::standard(), &standard_roster()).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(6, battle.state().roster.len());
    }
}
