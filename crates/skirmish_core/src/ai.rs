//! Greedy enemy AI: close on the nearest opponent, then shoot if able.

use tracing::{debug, info};

use crate::combat::resolve_shot;
use crate::dice::DiceRoller;
use crate::log::{Journal, Phase};
use crate::state::BattleState;
use crate::unit::{Position, Team, UnitId};

/// Walks `id` toward `target` one tile at a time, up to its movement allowance.
/// The wider axis gap is closed first; a blocked step falls back to the other
/// axis, and the walk stops once neither is open.
pub fn plan_advance(state: &BattleState, id: UnitId, target: UnitId) -> Position {
    let unit = &state.roster[id];
    let goal = state.roster[target].position;
    let mut current = unit.position;
    let (mut dx, mut dy) = (goal.x - current.x, goal.y - current.y);
    let mut moves_left = unit.movement;

    while moves_left > 0 && (dx != 0 || dy != 0) {
        let primary = if dx.abs() > dy.abs() || dy == 0 {
            (dx.signum(), 0)
        } else {
            (0, dy.signum())
        };
        let fallback = if primary.0 != 0 {
            (0, dy.signum())
        } else {
            (dx.signum(), 0)
        };
        let step = [primary, fallback]
            .into_iter()
            .filter(|step| *step != (0, 0))
            .find(|(sx, sy)| !state.is_occupied(current.offset(*sx, *sy), Some(id)));
        let Some((sx, sy)) = step else {
            break;
        };
        current = current.offset(sx, sy);
        dx -= sx;
        dy -= sy;
        moves_left -= 1;
    }
    current
}

/// Runs every living unit of `team` through the AI in roster order.
pub fn run_ai_phase(
    state: &mut BattleState,
    team: Team,
    dice: &mut impl DiceRoller,
    journal: &mut Journal,
) {
    let ids: Vec<UnitId> = state.roster.living_on(team).map(|(id, _)| id).collect();
    for id in ids {
        if state.roster.is_alive(id) {
            activate(state, id, dice, journal);
        }
    }
}

fn activate(state: &mut BattleState, id: UnitId, dice: &mut impl DiceRoller, journal: &mut Journal) {
    state.roster[id].flags.reset();
    let Some(target) = state.nearest_enemy(id) else {
        return;
    };

    let destination = plan_advance(state, id, target);
    debug!(
        target: "skirmish_core.ai",
        unit = %state.roster[id].name,
        chasing = %state.roster[target].name,
        from = %state.roster[id].position,
        to = %destination,
        "advance planned"
    );
    match state.relocate(id, destination) {
        Ok(true) => journal.charges.push(state.roster[id].name.clone()),
        Ok(false) => {}
        Err(err) => {
            let name = state.roster[id].name.clone();
            journal.reject(name, Phase::Movement, err);
        }
    }

    let unit = &state.roster[id];
    let weapon = state.weapon_of(id);
    if !weapon.is_ranged() || unit.flags.has_run {
        return;
    }
    let Some(mark) = state.nearest_enemy(id) else {
        return;
    };
    let distance = unit.position.manhattan_distance(state.roster[mark].position);
    if distance > weapon.range {
        debug!(target: "skirmish_core.ai", unit = %unit.name, distance, range = weapon.range, "nothing in range");
        return;
    }
    if let Err(err) = resolve_shot(state, id, mark, dice, &mut journal.log) {
        let name = state.roster[id].name.clone();
        journal.reject(name, Phase::Shooting, err);
    } else {
        info!(target: "skirmish_core.ai", unit = %state.roster[id].name, mark = %state.roster[mark].name, "ai fired");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SpecialRule;
    use crate::dice::ScriptedDice;
    use crate::log::ActionKind;
    use crate::state::fixtures::{state, unit, weapon};

    #[test]
    fn closes_the_wider_gap_first() {
        let state = state(
            vec![weapon("Claw", 1, 1, SpecialRule::None)],
            vec![
                unit("Prey", Team::Player, 0, 1, 1),
                unit("Stalker", Team::Enemy, 0, 6, 3),
            ],
        );
        // dx = -5, dy = -2: three steps along x, then the tied gap goes to y
        assert_eq!(Position::new(3, 2), plan_advance(&state, UnitId(1), UnitId(0)));
    }

    #[test]
    fn steps_around_a_blocker_and_stops_next_to_target() {
        let state = state(
            vec![weapon("Claw", 1, 1, SpecialRule::None)],
            vec![
                unit("Prey", Team::Player, 0, 0, 4),
                unit("Wall", Team::Enemy, 0, 2, 3),
                unit("Stalker", Team::Enemy, 0, 3, 3),
            ],
        );
        // x is blocked by the wall, so the first step sidesteps along y; the
        // last step into the prey itself has nowhere to go.
        let end = plan_advance(&state, UnitId(2), UnitId(0));
        assert_eq!(Position::new(1, 4), end);
        assert!(end.is_adjacent(Position::new(0, 4)));
    }

    #[test]
    fn boxed_in_unit_stays_put() {
        let state = state(
            vec![weapon("Claw", 1, 1, SpecialRule::None)],
            vec![
                unit("Prey", Team::Player, 0, 0, 7),
                unit("Guard", Team::Enemy, 0, 7, 6),
                unit("Stuck", Team::Enemy, 0, 7, 7),
                unit("Gate", Team::Enemy, 0, 6, 7),
            ],
        );
        assert_eq!(Position::new(7, 7), plan_advance(&state, UnitId(2), UnitId(0)));
    }

    #[test]
    fn ai_charges_then_shoots_only_in_range() {
        let mut state = state(
            vec![
                weapon("Claw", 1, 1, SpecialRule::None),
                weapon("Sling", 3, 1, SpecialRule::None),
            ],
            vec![
                unit("Prey", Team::Player, 0, 0, 0),
                unit("Brute", Team::Enemy, 0, 0, 3),
                unit("Slinger", Team::Enemy, 1, 7, 7),
            ],
        );
        let mut dice = ScriptedDice::default();
        let mut journal = Journal::default();
        run_ai_phase(&mut state, Team::Enemy, &mut dice, &mut journal);

        assert_eq!(Position::new(0, 1), state.roster[UnitId(1)].position);
        assert!(state.roster[UnitId(1)].flags.has_charged);
        assert_eq!(vec!["Brute".to_string()], journal.charges);
        // Slinger moves four tiles but is still out of its range of 3
        assert!(state.roster[UnitId(2)].flags.has_moved);
        assert!(journal.log.is_empty());
    }

    #[test]
    fn ai_shoots_nearest_enemy_after_moving() {
        let mut state = state(
            vec![weapon("Sling", 3, 1, SpecialRule::None)],
            vec![
                unit("Prey", Team::Player, 0, 0, 0),
                unit("Slinger", Team::Enemy, 0, 0, 6),
            ],
        );
        let mut dice = ScriptedDice::new([5, 5]);
        let mut journal = Journal::default();
        run_ai_phase(&mut state, Team::Enemy, &mut dice, &mut journal);
        assert_eq!(Position::new(0, 2), state.roster[UnitId(1)].position);
        assert!(!state.roster[UnitId(1)].flags.has_charged);
        assert_eq!(1, journal.log.len());
        assert_eq!(ActionKind::Ranged, journal.log.records()[0].kind);
        assert_eq!(2, state.roster[UnitId(0)].wounds);
    }
}
