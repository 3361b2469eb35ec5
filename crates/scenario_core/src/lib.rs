pub mod config;
pub mod error;
pub mod report;
pub mod runner;

pub use config::{ScenarioConfig, SimulationSection, DEFAULT_MAX_ROUNDS};
pub use error::ScenarioError;
pub use report::{BattleReport, BattleStatus, BattleSummary};
pub use runner::{discover_scenarios, prepare_battle, run_scenario, Autopilot, RunOptions};
