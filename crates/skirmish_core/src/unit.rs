//! Unit registry: the roster arena plus the per-unit state it tracks.
//!
//! Units are never removed. A unit whose wounds drop to zero or below is dead: it
//! keeps its [`UnitId`] so recaps and logs can still name it, but every gameplay
//! query filters it out.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{Catalog, WeaponId};
use crate::error::{BattleError, DefinitionKind};
use crate::grid::BattleGrid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Player,
    Enemy,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Player, Team::Enemy];

    pub fn opponent(self) -> Team {
        match self {
            Team::Player => Team::Enemy,
            Team::Enemy => Team::Player,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Team::Player => 0,
            Team::Enemy => 1,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Player => f.write_str("Player"),
            Team::Enemy => f.write_str("Enemy"),
        }
    }
}

/// Grid coordinate. `x` is the row, `y` the column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan_distance(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan_distance(other) == 1
    }
}

/// Board notation: column letter then 1-based row, e.g. `C4`.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match u8::try_from(self.y) {
            Ok(col) if col < 26 => write!(f, "{}{}", char::from(b'A' + col), self.x + 1),
            _ => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnFlags {
    pub has_moved: bool,
    pub has_run: bool,
    pub has_charged: bool,
}

impl TurnFlags {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub usize);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub movement: i32,
    pub combat_value: i32,
    pub strength: i32,
    pub toughness: i32,
    pub wounds: i32,
    pub is_spellcaster: bool,
    pub weapon: WeaponId,
    pub position: Position,
    pub team: Team,
    pub flags: TurnFlags,
}

impl Unit {
    pub fn is_alive(&self) -> bool {
        self.wounds > 0
    }

    pub fn is_enemy_of(&self, other: &Unit) -> bool {
        self.team != other.team
    }
}

/// One roster row as the host hands it over, before weapon lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub name: String,
    pub movement: i32,
    pub combat_value: i32,
    pub strength: i32,
    pub toughness: i32,
    pub wounds: i32,
    #[serde(default, alias = "is_magic")]
    pub is_spellcaster: bool,
    pub weapon: String,
    pub team: Team,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug)]
pub struct RosterBuild {
    pub roster: Roster,
    /// Recovered problems, e.g. weapons replaced by the catalog default.
    pub warnings: Vec<BattleError>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    units: Vec<Unit>,
}

impl Roster {
    pub fn from_definitions(
        definitions: &[UnitDefinition],
        catalog: &Catalog,
        grid: &BattleGrid,
    ) -> Result<RosterBuild, BattleError> {
        let mut units = Vec::new();
        units
            .try_reserve_exact(definitions.len())
            .map_err(|_| BattleError::AllocationFailure {
                requested: definitions.len(),
            })?;

        let mut warnings = Vec::new();
        for def in definitions {
            let weapon = match catalog.find_weapon(&def.weapon) {
                Some(id) => id,
                None => {
                    let missing = BattleError::DefinitionMissing {
                        kind: DefinitionKind::Weapon,
                        name: def.weapon.clone(),
                    };
                    let Some(fallback) = catalog.default_weapon() else {
                        return Err(missing);
                    };
                    warn!(
                        target: "skirmish_core.roster",
                        unit = %def.name,
                        weapon = %def.weapon,
                        fallback = %catalog.weapon(fallback).name,
                        "weapon not found, using default"
                    );
                    warnings.push(missing);
                    fallback
                }
            };

            let position = Position::new(def.x, def.y);
            let stacked = units
                .iter()
                .any(|other: &Unit| other.is_alive() && other.position == position);
            if !grid.contains(position) || (def.wounds > 0 && stacked) {
                return Err(BattleError::InvalidPlacement {
                    name: def.name.clone(),
                    position,
                });
            }

            units.push(Unit {
                name: def.name.clone(),
                movement: def.movement,
                combat_value: def.combat_value,
                strength: def.strength,
                toughness: def.toughness,
                wounds: def.wounds,
                is_spellcaster: def.is_spellcaster,
                weapon,
                position,
                team: def.team,
                flags: TurnFlags::default(),
            });
        }

        Ok(RosterBuild {
            roster: Roster { units },
            warnings,
        })
    }

    pub fn from_units(units: Vec<Unit>) -> Self {
        Self { units }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.0)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.0)
    }

    /// Every slot, dead or alive, in roster order.
    pub fn ids(&self) -> impl Iterator<Item = UnitId> {
        (0..self.units.len()).map(UnitId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.units
            .iter()
            .enumerate()
            .map(|(idx, unit)| (UnitId(idx), unit))
    }

    pub fn living(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.iter().filter(|(_, unit)| unit.is_alive())
    }

    pub fn living_on(&self, team: Team) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.living().filter(move |(_, unit)| unit.team == team)
    }

    pub fn is_alive(&self, id: UnitId) -> bool {
        self.get(id).is_some_and(Unit::is_alive)
    }

    pub fn has_living(&self, team: Team) -> bool {
        self.living_on(team).next().is_some()
    }

    /// Sum of wounds over every unit on the team, dead ones included.
    pub fn total_wounds(&self, team: Team) -> i32 {
        self.units
            .iter()
            .filter(|unit| unit.team == team)
            .map(|unit| unit.wounds)
            .sum()
    }

    pub fn unit_at(&self, position: Position) -> Option<UnitId> {
        self.living()
            .find(|(_, unit)| unit.position == position)
            .map(|(id, _)| id)
    }
}

impl Index<UnitId> for Roster {
    type Output = Unit;

    fn index(&self, id: UnitId) -> &Unit {
        &self.units[id.0]
    }
}

impl IndexMut<UnitId> for Roster {
    fn index_mut(&mut self, id: UnitId) -> &mut Unit {
        &mut self.units[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str, weapon: &str, team: Team, x: i32, y: i32) -> UnitDefinition {
        UnitDefinition {
            name: name.to_string(),
            movement: 4,
            combat_value: 4,
            strength: 3,
            toughness: 3,
            wounds: 3,
            is_spellcaster: false,
            weapon: weapon.to_string(),
            team,
            x,
            y,
        }
    }

    #[test]
    fn unknown_weapon_falls_back_with_warning() {
        let catalog = Catalog::standard();
        let build = Roster::from_definitions(
            &[
                def("Grak", "Bestial Blades", Team::Player, 0, 0),
                def("Vex", "Rusty Spoon", Team::Enemy, 7, 7),
            ],
            &catalog,
            &BattleGrid::default(),
        )
        .unwrap();
        let vex = &build.roster[UnitId(1)];
        assert_eq!("Bestial Staff", catalog.weapon(vex.weapon).name);
        assert_eq!(
            vec![BattleError::DefinitionMissing {
                kind: DefinitionKind::Weapon,
                name: "Rusty Spoon".into()
            }],
            build.warnings
        );
    }

    #[test]
    fn stacked_or_offboard_units_are_rejected() {
        let catalog = Catalog::standard();
        let grid = BattleGrid::default();
        let stacked = Roster::from_definitions(
            &[
                def("A", "Bestial Staff", Team::Player, 2, 2),
                def("B", "Bestial Staff", Team::Enemy, 2, 2),
            ],
            &catalog,
            &grid,
        );
        assert!(matches!(
            stacked,
            Err(BattleError::InvalidPlacement { ref name, .. }) if name == "B"
        ));

        let offboard =
            Roster::from_definitions(&[def("C", "Bestial Staff", Team::Player, 8, 0)], &catalog, &grid);
        assert!(matches!(offboard, Err(BattleError::InvalidPlacement { .. })));
    }

    #[test]
    fn dead_units_drop_out_of_queries() {
        let catalog = Catalog::standard();
        let mut roster = Roster::from_definitions(
            &[
                def("A", "Bestial Staff", Team::Player, 0, 0),
                def("B", "Bestial Staff", Team::Enemy, 0, 1),
            ],
            &catalog,
            &BattleGrid::default(),
        )
        .unwrap()
        .roster;
        roster[UnitId(1)].wounds = 0;
        assert!(!roster.is_alive(UnitId(1)));
        assert!(!roster.has_living(Team::Enemy));
        assert_eq!(None, roster.unit_at(Position::new(0, 1)));
        assert_eq!(2, roster.len());
        assert_eq!(0, roster.total_wounds(Team::Enemy));
    }

    #[test]
    fn positions_render_as_board_notation() {
        assert_eq!("C4", Position::new(3, 2).to_string());
        assert!(Position::new(1, 1).is_adjacent(Position::new(1, 2)));
        assert!(!Position::new(1, 1).is_adjacent(Position::new(2, 2)));
        assert!(!Position::new(1, 1).is_adjacent(Position::new(1, 1)));
    }
}
