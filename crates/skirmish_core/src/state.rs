use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{Catalog, Weapon};
use crate::error::BattleError;
use crate::grid::BattleGrid;
use crate::render::BoardSnapshot;
use crate::unit::{Position, Roster, RosterBuild, Team, UnitDefinition, UnitId};

/// Everything a battle mutates, minus the dice: roster, catalogs and grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleState {
    pub grid: BattleGrid,
    pub catalog: Catalog,
    pub roster: Roster,
}

impl BattleState {
    pub fn new(grid: BattleGrid, catalog: Catalog, roster: Roster) -> Self {
        Self {
            grid,
            catalog,
            roster,
        }
    }

    /// Builds the roster from host-supplied rows. Returns the recovered warnings too.
    pub fn initialize(
        grid: BattleGrid,
        catalog: Catalog,
        definitions: &[UnitDefinition],
    ) -> Result<(Self, Vec<BattleError>), BattleError> {
        let RosterBuild { roster, warnings } =
            Roster::from_definitions(definitions, &catalog, &grid)?;
        info!(
            target: "skirmish_core.roster",
            units = roster.len(),
            warnings = warnings.len(),
            grid = grid.size(),
            "roster initialized"
        );
        Ok((Self::new(grid, catalog, roster), warnings))
    }

    pub fn weapon_of(&self, id: UnitId) -> &Weapon {
        self.catalog.weapon(self.roster[id].weapon)
    }

    pub fn is_occupied(&self, position: Position, excluding: Option<UnitId>) -> bool {
        self.grid.is_occupied(&self.roster, position, excluding)
    }

    /// Closest living opponent by Manhattan distance. Ties go to roster order.
    pub fn nearest_enemy(&self, id: UnitId) -> Option<UnitId> {
        let unit = &self.roster[id];
        let mut best: Option<(UnitId, i32)> = None;
        for (other_id, other) in self.roster.living() {
            if !other.is_enemy_of(unit) {
                continue;
            }
            let distance = unit.position.manhattan_distance(other.position);
            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((other_id, distance));
            }
        }
        best.map(|(other_id, _)| other_id)
    }

    /// Moves a unit and applies the charge rule. Returns whether the move was a charge.
    pub fn relocate(&mut self, id: UnitId, destination: Position) -> Result<bool, BattleError> {
        let was_engaged = self.grid.touches_enemy(&self.roster, id);
        self.grid.move_unit(&mut self.roster, id, destination)?;
        let engaged = self.grid.touches_enemy(&self.roster, id);

        let unit = &mut self.roster[id];
        unit.flags.has_moved = true;
        let charged = !was_engaged && engaged;
        if charged {
            unit.flags.has_charged = true;
            info!(target: "skirmish_core.turn", unit = %unit.name, at = %destination, "charged into combat");
        }
        Ok(charged)
    }

    pub fn is_game_over(&self) -> bool {
        Team::ALL.iter().any(|team| !self.roster.has_living(*team))
    }

    /// The side left standing. When both are wiped out at once, summed wounds
    /// decide and the player takes ties.
    pub fn victor(&self) -> Option<Team> {
        let player = self.roster.has_living(Team::Player);
        let enemy = self.roster.has_living(Team::Enemy);
        match (player, enemy) {
            (true, true) => None,
            (true, false) => Some(Team::Player),
            (false, true) => Some(Team::Enemy),
            (false, false) => {
                if self.roster.total_wounds(Team::Player) >= self.roster.total_wounds(Team::Enemy) {
                    Some(Team::Player)
                } else {
                    Some(Team::Enemy)
                }
            }
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(self)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::catalog::{SpecialRule, WeaponId};
    use crate::unit::{TurnFlags, Unit};

    pub fn weapon(name: &str, range: i32, attacks: u32, special_rule: SpecialRule) -> Weapon {
        Weapon {
            name: name.to_string(),
            range,
            attacks,
            bonus_strength: 0,
            bonus_damage: 0,
            special_rule,
        }
    }

    pub fn unit(name: &str, team: Team, weapon: usize, x: i32, y: i32) -> Unit {
        Unit {
            name: name.to_string(),
            movement: 4,
            combat_value: 4,
            strength: 3,
            toughness: 3,
            wounds: 3,
            is_spellcaster: false,
            weapon: WeaponId(weapon),
            position: Position::new(x, y),
            team,
            flags: TurnFlags::default(),
        }
    }

    pub fn state(weapons: Vec<Weapon>, units: Vec<Unit>) -> BattleState {
        BattleState::new(
            BattleGrid::default(),
            Catalog::new(weapons, Catalog::standard().spells().map(|(_, s)| s.clone()).collect()),
            Roster::from_units(units),
        )
    }
}
