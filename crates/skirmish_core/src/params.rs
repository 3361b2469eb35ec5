use crate::dice::SimulationRng;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_GRID_SIZE: i32 = 8;
const MIN_GRID_SIZE: i32 = 2;
const MAX_GRID_SIZE: i32 = 26;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationParams {
    pub seed: u64,
    pub grid_size: i32,
}

impl SimulationParams {
    pub fn from_env() -> Self {
        let seed = std::env::var("SIMULATION_SEED")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(DEFAULT_SEED);
        let grid_size = std::env::var("BATTLE_GRID_SIZE")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(DEFAULT_GRID_SIZE)
            .clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
        Self { seed, grid_size }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn rng(&self) -> SimulationRng {
        SimulationRng::new(self.seed)
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}
