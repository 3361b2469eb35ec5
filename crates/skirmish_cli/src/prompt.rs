//! Interactive commander that reads player orders from a line-based reader.

use std::io::BufRead;

use skirmish_core::{BattleState, Commander, MoveOrder, SpellId, SpellOrder, Team, UnitId};

use crate::render;

pub struct PromptCommander<R> {
    input: R,
}

impl<R: BufRead> PromptCommander<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// `None` once the input is exhausted.
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn read_index(&mut self) -> Option<usize> {
        self.read_line()?.parse().ok()
    }

    fn pick_unit(&mut self, state: &BattleState, eligible: impl Fn(Team) -> bool) -> Option<UnitId> {
        println!("Select target:");
        let mut listed = 0;
        for (id, unit) in state.roster.living() {
            if eligible(unit.team) {
                println!("{}: {} (Team: {})", id.0, unit.name, unit.team);
                listed += 1;
            }
        }
        if listed == 0 {
            println!("No valid targets!");
            return None;
        }
        self.read_index().map(UnitId)
    }
}

/// `S` stays, `C4` advances, `R C4` runs.
pub fn parse_move(input: &str) -> Option<MoveOrder> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("s") {
        return Some(MoveOrder::Stay);
    }
    match input.split_once(char::is_whitespace) {
        Some((flag, rest)) if flag.eq_ignore_ascii_case("r") => {
            render::parse_position(rest).map(MoveOrder::Run)
        }
        Some(_) => None,
        None => render::parse_position(input).map(MoveOrder::Advance),
    }
}

impl<R: BufRead> Commander for PromptCommander<R> {
    fn request_move(&mut self, state: &BattleState, unit: UnitId) -> MoveOrder {
        let current = &state.roster[unit];
        print!("{}", render::board(&state.snapshot()));
        println!(
            "Movement phase for {} (W: {}, Movement: {}) at {}",
            current.name, current.wounds, current.movement, current.position
        );
        loop {
            println!("Enter target position (e.g., A1), 'R A1' to run, or 'S' to stay:");
            let Some(line) = self.read_line() else {
                return MoveOrder::Stay;
            };
            match parse_move(&line) {
                Some(order) => return order,
                None => println!("Invalid position!"),
            }
        }
    }

    fn request_spell(&mut self, state: &BattleState, unit: UnitId) -> Option<SpellOrder> {
        println!("Magic phase for {}", state.roster[unit].name);
        let spells: Vec<_> = state.catalog.spells().collect();
        for (id, spell) in &spells {
            println!(
                "{}: {} (Cost: {}, Target: {:?})",
                id.0 + 1,
                spell.name,
                spell.cost,
                spell.target
            );
        }
        println!("0: Skip");
        let choice = self.read_index()?;
        if choice == 0 || choice > spells.len() {
            return None;
        }
        let target = self.pick_unit(state, |_| true)?;
        Some(SpellOrder {
            spell: SpellId(choice - 1),
            target,
        })
    }

    fn request_shoot(&mut self, state: &BattleState, unit: UnitId) -> Option<UnitId> {
        let shooter = &state.roster[unit];
        println!("Shooting phase for {}", shooter.name);
        let team = shooter.team;
        self.pick_unit(state, |other| other != team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::Position;

    #[test]
    fn move_orders() {
        assert_eq!(Some(MoveOrder::Stay), parse_move("s"));
        assert_eq!(
            Some(MoveOrder::Advance(Position::new(0, 1))),
            parse_move("B1")
        );
        assert_eq!(
            Some(MoveOrder::Run(Position::new(4, 3))),
            parse_move("r D5")
        );
        assert_eq!(None, parse_move("x D5"));
        assert_eq!(None, parse_move("go"));
    }
}
