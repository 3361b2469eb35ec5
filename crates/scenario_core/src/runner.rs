use std::path::{Path, PathBuf};

use anyhow::Result;
use skirmish_core::ai::plan_advance;
use skirmish_core::{
    Battle, BattleError, BattleState, Commander, MoveOrder, SimulationRng, SpellOrder, SpellTarget,
    UnitId,
};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::ScenarioConfig;
use crate::report::BattleReport;

pub struct RunOptions {
    pub run_id: String,
    pub seed: Option<u64>,
    pub max_rounds: Option<u32>,
}

impl RunOptions {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            seed: None,
            max_rounds: None,
        }
    }
}

/// Plays the player side with the same greedy logic the enemy uses, plus
/// offensive spells and shots at whatever is closest.
#[derive(Clone, Copy, Debug, Default)]
pub struct Autopilot;

impl Commander for Autopilot {
    fn request_move(&mut self, state: &BattleState, unit: UnitId) -> MoveOrder {
        let Some(target) = state.nearest_enemy(unit) else {
            return MoveOrder::Stay;
        };
        let destination = plan_advance(state, unit, target);
        if destination == state.roster[unit].position {
            MoveOrder::Stay
        } else {
            MoveOrder::Advance(destination)
        }
    }

    fn request_spell(&mut self, state: &BattleState, unit: UnitId) -> Option<SpellOrder> {
        let (spell, _) = state
            .catalog
            .spells()
            .find(|(_, spell)| spell.target == SpellTarget::Enemy)?;
        let target = state.nearest_enemy(unit)?;
        Some(SpellOrder { spell, target })
    }

    fn request_shoot(&mut self, state: &BattleState, unit: UnitId) -> Option<UnitId> {
        let target = state.nearest_enemy(unit)?;
        let distance = state.roster[unit]
            .position
            .manhattan_distance(state.roster[target].position);
        (distance <= state.weapon_of(unit).range).then_some(target)
    }
}

/// Builds the battle a scenario describes. Recovered roster problems come back
/// alongside it.
pub fn prepare_battle(
    config: &ScenarioConfig,
    seed: Option<u64>,
) -> Result<(Battle<SimulationRng>, Vec<BattleError>), BattleError> {
    let params = config.params(seed);
    let (battle, warnings) = Battle::from_params(&params, config.catalog(), &config.units)?;
    for warning in &warnings {
        warn!(target: "scenario_core.runner", scenario = config.name(), %warning, "roster warning");
    }
    Ok((battle, warnings))
}

/// Runs a scenario to the end, or to the round cap, and reports on it.
pub fn run_scenario(
    config: &ScenarioConfig,
    options: &RunOptions,
    commander: &mut impl Commander,
) -> Result<BattleReport> {
    let (mut battle, warnings) = prepare_battle(config, options.seed)?;
    let seed = battle.dice().seed();
    let max_rounds = options.max_rounds.unwrap_or_else(|| config.max_rounds());
    info!(target: "scenario_core.runner", scenario = config.name(), seed, max_rounds, "battle started");

    let mut rounds = Vec::new();
    while !battle.is_game_over() && battle.rounds_completed() < max_rounds {
        rounds.push(battle.advance_turn(commander));
    }
    if !battle.is_game_over() {
        info!(target: "scenario_core.runner", scenario = config.name(), max_rounds, "round cap reached");
    }

    let report = BattleReport::new(
        options.run_id.clone(),
        config.name(),
        seed,
        warnings,
        rounds,
        battle.render_state(),
    );
    info!(
        target: "scenario_core.runner",
        scenario = config.name(),
        status = ?report.summary.status,
        winner = ?report.summary.winner,
        rounds = report.summary.rounds_played,
        "battle finished"
    );
    Ok(report)
}

/// Every `*.toml` under `root`, sorted, skipping build and VCS directories.
pub fn discover_scenarios(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| filter_entry(e.path()))
    {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            found.push(path.to_path_buf());
        }
    }
    found.sort();
    Ok(found)
}

fn filter_entry(path: &Path) -> bool {
    let ignored = ["target", ".git", "reports"];
    for part in path.components() {
        if let std::path::Component::Normal(os_str) = part {
            if let Some(part_str) = os_str.to_str() {
                if ignored.contains(&part_str) {
                    return false;
                }
            }
        }
    }
    true
}
