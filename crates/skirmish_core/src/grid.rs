//! Square battle grid. Occupancy is always recomputed from the living roster.

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, MoveRejection};
use crate::params::DEFAULT_GRID_SIZE;
use crate::unit::{Position, Roster, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleGrid {
    size: i32,
}

impl BattleGrid {
    pub fn new(size: i32) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0 && position.y >= 0 && position.x < self.size && position.y < self.size
    }

    /// Out-of-bounds tiles count as occupied.
    pub fn is_occupied(&self, roster: &Roster, position: Position, excluding: Option<UnitId>) -> bool {
        if !self.contains(position) {
            return true;
        }
        roster
            .living()
            .any(|(id, unit)| Some(id) != excluding && unit.position == position)
    }

    pub fn manhattan_distance(&self, a: Position, b: Position) -> i32 {
        a.manhattan_distance(b)
    }

    pub fn is_adjacent(&self, a: Position, b: Position) -> bool {
        a.is_adjacent(b)
    }

    /// True when any living unit of the other team stands next to `id`.
    pub fn touches_enemy(&self, roster: &Roster, id: UnitId) -> bool {
        let unit = &roster[id];
        roster
            .living()
            .any(|(_, other)| other.is_enemy_of(unit) && unit.position.is_adjacent(other.position))
    }

    pub fn move_unit(
        &self,
        roster: &mut Roster,
        id: UnitId,
        destination: Position,
    ) -> Result<(), BattleError> {
        let reject = |reason| BattleError::MoveRejected {
            unit: id,
            destination,
            reason,
        };
        if !roster.is_alive(id) {
            return Err(reject(MoveRejection::Dead));
        }
        if !self.contains(destination) {
            return Err(reject(MoveRejection::OutOfBounds));
        }
        if self.is_occupied(roster, destination, Some(id)) {
            return Err(reject(MoveRejection::Occupied));
        }
        roster[id].position = destination;
        Ok(())
    }
}

impl Default for BattleGrid {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WeaponId;
    use crate::unit::{Team, TurnFlags, Unit};

    fn unit(team: Team, x: i32, y: i32, wounds: i32) -> Unit {
        Unit {
            name: format!("{team}-{x}-{y}"),
            movement: 3,
            combat_value: 4,
            strength: 3,
            toughness: 3,
            wounds,
            is_spellcaster: false,
            weapon: WeaponId(0),
            position: Position::new(x, y),
            team,
            flags: TurnFlags::default(),
        }
    }

    #[test]
    fn occupancy_ignores_dead_and_excluded_units() {
        let grid = BattleGrid::default();
        let roster = Roster::from_units(vec![
            unit(Team::Player, 1, 1, 2),
            unit(Team::Enemy, 2, 2, 0),
        ]);
        assert!(grid.is_occupied(&roster, Position::new(1, 1), None));
        assert!(!grid.is_occupied(&roster, Position::new(1, 1), Some(UnitId(0))));
        assert!(!grid.is_occupied(&roster, Position::new(2, 2), None));
        assert!(grid.is_occupied(&roster, Position::new(-1, 0), None));
        assert!(grid.is_occupied(&roster, Position::new(0, 8), None));
    }

    #[test]
    fn adjacency_is_symmetric_and_orthogonal() {
        let grid = BattleGrid::default();
        for (a, b) in [
            (Position::new(3, 3), Position::new(3, 4)),
            (Position::new(3, 3), Position::new(4, 4)),
            (Position::new(0, 0), Position::new(0, 2)),
        ] {
            assert_eq!(grid.is_adjacent(a, b), grid.is_adjacent(b, a));
            assert_eq!(grid.manhattan_distance(a, b) == 1, grid.is_adjacent(a, b));
        }
    }

    #[test]
    fn rejected_moves_leave_position_alone() {
        let grid = BattleGrid::default();
        let mut roster = Roster::from_units(vec![
            unit(Team::Player, 0, 0, 2),
            unit(Team::Enemy, 0, 1, 2),
        ]);
        let blocked = grid.move_unit(&mut roster, UnitId(0), Position::new(0, 1));
        assert!(matches!(
            blocked,
            Err(BattleError::MoveRejected {
                reason: MoveRejection::Occupied,
                ..
            })
        ));
        let offboard = grid.move_unit(&mut roster, UnitId(0), Position::new(-1, 0));
        assert!(matches!(
            offboard,
            Err(BattleError::MoveRejected {
                reason: MoveRejection::OutOfBounds,
                ..
            })
        ));
        assert_eq!(Position::new(0, 0), roster[UnitId(0)].position);

        grid.move_unit(&mut roster, UnitId(0), Position::new(1, 0)).unwrap();
        assert_eq!(Position::new(1, 0), roster[UnitId(0)].position);
        assert!(!grid.touches_enemy(&roster, UnitId(0)));
    }
}
