//! Plain-text board and recap formatting.

use skirmish_core::{ActionKind, ActionRecord, BoardSnapshot, Position, TurnReport};

/// Lettered columns, numbered rows, one initial per living unit.
pub fn board(snapshot: &BoardSnapshot) -> String {
    let size = snapshot.size.max(0);
    let width = size.to_string().len();
    let mut out = String::new();

    let header: Vec<String> = (0..size)
        .map(|col| column_letter(col).to_string())
        .collect();
    out.push_str(&" ".repeat(width + 1));
    out.push_str(&header.join(" "));
    out.push('\n');

    for row in 0..size {
        let cells: Vec<String> = (0..size)
            .map(|col| {
                snapshot
                    .occupant(Position::new(row, col))
                    .and_then(|unit| unit.name.chars().next())
                    .unwrap_or('.')
                    .to_string()
            })
            .collect();
        out.push_str(&format!("{:>width$} {}\n", row + 1, cells.join(" ")));
    }
    out
}

fn column_letter(col: i32) -> char {
    u8::try_from(col)
        .ok()
        .filter(|c| *c < 26)
        .map_or('?', |c| char::from(b'A' + c))
}

pub fn action_line(record: &ActionRecord) -> String {
    let roll = record.roll.unwrap_or_default();
    let needed = record.roll_needed.unwrap_or_default();
    let spell = record.spell.as_deref().unwrap_or("a spell");
    match record.kind {
        ActionKind::Melee | ActionKind::Ranged => {
            let verb = if record.kind == ActionKind::Melee {
                "attacked"
            } else {
                "shot"
            };
            let death = if record.death_wounds > 0 {
                format!(", {} death wounds", record.death_wounds)
            } else {
                String::new()
            };
            format!(
                "{} {verb} {}, {} hits, {} wounds{death}, {} has {} wounds remaining.",
                record.attacker, record.target, record.hits, record.wounds, record.target, record.target_wounds
            )
        }
        ActionKind::SpellSuccess => format!(
            "{} successfully ({roll} / {needed}) casted {spell} on {}.",
            record.attacker, record.target
        ),
        ActionKind::SpellFailure => format!(
            "{} unsuccessfully ({roll} / {needed}) casted {spell} on {}.",
            record.attacker, record.target
        ),
    }
}

/// The end-of-round summary, charges and refused orders included.
pub fn recap(report: &TurnReport) -> String {
    let mut lines = vec![format!("Turn {} Recap:", report.round)];
    for name in &report.charges {
        lines.push(format!("{name} has charged into combat!"));
    }
    for rejection in &report.rejections {
        lines.push(format!(
            "{} ({:?} phase): {}",
            rejection.unit, rejection.phase, rejection.error
        ));
    }
    if report.actions.is_empty() {
        lines.push("No actions occurred this turn.".to_string());
    }
    lines.extend(report.actions.iter().map(action_line));
    if let Some(winner) = report.winner {
        lines.push(format!("Game Over! {winner} wins!"));
    }
    lines.join("\n")
}

/// `C4` style coordinates. Anything past the letter is a 1-based row.
pub fn parse_position(input: &str) -> Option<Position> {
    let input = input.trim();
    let mut chars = input.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if !letter.is_ascii_uppercase() {
        return None;
    }
    let row: i32 = chars.as_str().parse().ok()?;
    Some(Position::new(row - 1, i32::from(letter as u8 - b'A')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{Team, UnitId, UnitSnapshot};

    fn snapshot_unit(id: usize, name: &str, x: i32, y: i32, alive: bool) -> UnitSnapshot {
        UnitSnapshot {
            id: UnitId(id),
            name: name.to_string(),
            team: Team::Player,
            position: Position::new(x, y),
            wounds: if alive { 2 } else { 0 },
            weapon: "Bestial Staff".to_string(),
            alive,
        }
    }

    #[test]
    fn board_shows_living_initials() {
        let snapshot = BoardSnapshot {
            size: 3,
            units: vec![
                snapshot_unit(0, "Gorefang", 0, 1, true),
                snapshot_unit(1, "Wraith", 2, 2, true),
                snapshot_unit(2, "Corpse", 1, 0, false),
            ],
        };
        assert_eq!("  A B C\n1 . G .\n2 . . .\n3 . . W\n", board(&snapshot));
    }

    #[test]
    fn wide_boards_pad_row_numbers() {
        let snapshot = BoardSnapshot {
            size: 10,
            units: Vec::new(),
        };
        let text = board(&snapshot);
        assert!(text.starts_with("   A B C D E F G H I J\n"));
        assert!(text.contains("\n 9 . "));
        assert!(text.contains("\n10 . "));
    }

    #[test]
    fn attack_and_spell_lines() {
        let mut record = ActionRecord {
            attacker: "Gorefang".into(),
            target: "Wraith".into(),
            spell: None,
            kind: ActionKind::Melee,
            hits: 2,
            wounds: 2,
            death_wounds: 0,
            target_wounds: 1,
            roll: None,
            roll_needed: None,
        };
        assert_eq!(
            "Gorefang attacked Wraith, 2 hits, 2 wounds, Wraith has 1 wounds remaining.",
            action_line(&record)
        );

        record.kind = ActionKind::Ranged;
        record.death_wounds = 3;
        assert_eq!(
            "Gorefang shot Wraith, 2 hits, 2 wounds, 3 death wounds, Wraith has 1 wounds remaining.",
            action_line(&record)
        );

        record.kind = ActionKind::SpellFailure;
        record.spell = Some("Gore Blades".into());
        record.roll = Some(5);
        record.roll_needed = Some(7);
        assert_eq!(
            "Gorefang unsuccessfully (5 / 7) casted Gore Blades on Wraith.",
            action_line(&record)
        );
    }

    #[test]
    fn quiet_round_recap() {
        let report = TurnReport {
            round: 3,
            actions: Vec::new(),
            charges: Vec::new(),
            rejections: Vec::new(),
            game_over: false,
            winner: None,
        };
        assert_eq!("Turn 3 Recap:\nNo actions occurred this turn.", recap(&report));
    }

    #[test]
    fn positions_parse_column_then_row() {
        assert_eq!(Some(Position::new(3, 2)), parse_position("C4"));
        assert_eq!(Some(Position::new(0, 0)), parse_position(" a1 "));
        assert_eq!(Some(Position::new(11, 7)), parse_position("h12"));
        assert_eq!(None, parse_position("4C"));
        assert_eq!(None, parse_position("C"));
        assert_eq!(None, parse_position(""));
    }
}
