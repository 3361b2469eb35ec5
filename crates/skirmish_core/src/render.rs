//! Read-only board snapshots for hosts that want to draw the battle.

use serde::{Deserialize, Serialize};

use crate::state::BattleState;
use crate::unit::{Position, Team, UnitId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    pub position: Position,
    pub wounds: i32,
    pub weapon: String,
    pub alive: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: i32,
    pub units: Vec<UnitSnapshot>,
}

impl BoardSnapshot {
    pub fn capture(state: &BattleState) -> Self {
        let units = state
            .roster
            .iter()
            .map(|(id, unit)| UnitSnapshot {
                id,
                name: unit.name.clone(),
                team: unit.team,
                position: unit.position,
                wounds: unit.wounds,
                weapon: state.catalog.weapon(unit.weapon).name.clone(),
                alive: unit.is_alive(),
            })
            .collect();
        Self {
            size: state.grid.size(),
            units,
        }
    }

    pub fn living(&self) -> impl Iterator<Item = &UnitSnapshot> {
        self.units.iter().filter(|unit| unit.alive)
    }

    pub fn occupant(&self, position: Position) -> Option<&UnitSnapshot> {
        self.living().find(|unit| unit.position == position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SpecialRule;
    use crate::state::fixtures::{state, unit, weapon};

    #[test]
    fn snapshot_hides_the_dead_from_the_board() {
        let mut battle = state(
            vec![weapon("Club", 1, 1, SpecialRule::None)],
            vec![
                unit("Alive", Team::Player, 0, 1, 1),
                unit("Fallen", Team::Enemy, 0, 2, 2),
            ],
        );
        battle.roster[UnitId(1)].wounds = -1;
        let snapshot = battle.snapshot();
        assert_eq!(2, snapshot.units.len());
        assert_eq!(1, snapshot.living().count());
        assert_eq!(
            Some("Alive"),
            snapshot.occupant(Position::new(1, 1)).map(|u| u.name.as_str())
        );
        assert!(snapshot.occupant(Position::new(2, 2)).is_none());
        assert_eq!("Club", snapshot.units[1].weapon);
    }
}
