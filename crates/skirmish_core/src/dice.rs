//! Six-sided dice, drawn from either a seeded generator or a fixed script.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DIE_SIDES: u8 = 6;

/// Faces of a multi-die check, in the order they were rolled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub faces: Vec<u8>,
}

impl DiceRoll {
    pub fn total(&self) -> i32 {
        self.faces.iter().map(|face| i32::from(*face)).sum()
    }
}

/// Source of uniform d6 outcomes. Everything random in a battle goes through here.
pub trait DiceRoller {
    fn roll_d6(&mut self) -> u8;

    fn roll(&mut self, count: usize) -> DiceRoll {
        DiceRoll {
            faces: (0..count).map(|_| self.roll_d6()).collect(),
        }
    }
}

impl<D: DiceRoller + ?Sized> DiceRoller for &mut D {
    fn roll_d6(&mut self) -> u8 {
        (**self).roll_d6()
    }
}

#[derive(Debug, Clone)]
pub struct SimulationRng {
    seed: u64,
    rng: StdRng,
}

impl SimulationRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl DiceRoller for SimulationRng {
    fn roll_d6(&mut self) -> u8 {
        self.rng.gen_range(1..=DIE_SIDES)
    }
}

/// Replays a fixed list of faces. Used to pin down exact roll sequences.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u8>,
}

impl ScriptedDice {
    /// Faces outside 1..=6 are clamped onto the die.
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces
                .into_iter()
                .map(|face| face.clamp(1, DIE_SIDES))
                .collect(),
        }
    }

    pub fn push(&mut self, face: u8) {
        self.faces.push_back(face.clamp(1, DIE_SIDES));
    }

    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DiceRoller for ScriptedDice {
    fn roll_d6(&mut self) -> u8 {
        match self.faces.pop_front() {
            Some(face) => face,
            None => {
                warn!(target: "skirmish_core.dice", "dice script exhausted, rolling 1");
                1
            }
        }
    }
}
