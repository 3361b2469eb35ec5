mod prompt;
mod render;

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use scenario_core::{
    discover_scenarios, prepare_battle, run_scenario, Autopilot, BattleReport, BattleStatus,
    RunOptions, ScenarioConfig,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::prompt::PromptCommander;

#[derive(Parser)]
#[command(version, about = "Dice-driven squad skirmishes on a square grid")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scenario to the end with the autopilot commanding the player side.
    Simulate(SimulateArgs),
    /// Command the player side yourself from the terminal.
    Play(PlayArgs),
    /// Find scenario files under a directory.
    List(ListArgs),
    /// Pretty-print a saved battle report.
    Report(ReportArgs),
}

#[derive(Args)]
struct SimulateArgs {
    #[arg(long, default_value = "scenarios/skirmish.toml")]
    scenario: PathBuf,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    max_rounds: Option<u32>,
    #[arg(long)]
    id: Option<String>,
    /// Where to write the JSON report.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct PlayArgs {
    #[arg(long, default_value = "scenarios/skirmish.toml")]
    scenario: PathBuf,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long, default_value = "scenarios")]
    dir: PathBuf,
}

#[derive(Args)]
struct ReportArgs {
    #[arg(long)]
    input: PathBuf,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
    let cli = Cli::parse();
    match cli.command {
        Commands::Simulate(args) => handle_simulate(args),
        Commands::Play(args) => handle_play(args),
        Commands::List(args) => handle_list(args),
        Commands::Report(args) => handle_report(args),
    }
}

fn handle_simulate(args: SimulateArgs) -> Result<()> {
    let config = ScenarioConfig::from_path(&args.scenario)?;
    let run_id = args
        .id
        .unwrap_or_else(|| format!("battle-{}", Utc::now().format("%Y%m%dT%H%M%S")));
    let options = RunOptions {
        seed: args.seed,
        max_rounds: args.max_rounds,
        ..RunOptions::new(run_id)
    };

    let report = run_scenario(&config, &options, &mut Autopilot)?;
    print_report(&report);

    if let Some(path) = args.out {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn handle_play(args: PlayArgs) -> Result<()> {
    let config = ScenarioConfig::from_path(&args.scenario)?;
    let (mut battle, _) = prepare_battle(&config, args.seed)?;
    let mut commander = PromptCommander::new(io::stdin().lock());
    let max_rounds = config.max_rounds();

    println!("{} (seed {})", config.name(), battle.dice().seed());
    while !battle.is_game_over() && battle.rounds_completed() < max_rounds {
        let report = battle.advance_turn(&mut commander);
        println!("\n{}\n", render::recap(&report));
    }
    print!("{}", render::board(&battle.render_state()));
    if battle.winner().is_none() {
        println!("No winner after {max_rounds} rounds.");
    }
    Ok(())
}

fn handle_list(args: ListArgs) -> Result<()> {
    let found = discover_scenarios(&args.dir)
        .with_context(|| format!("failed to scan {}", args.dir.display()))?;
    if found.is_empty() {
        println!("No scenarios under {}", args.dir.display());
    }
    for path in found {
        match ScenarioConfig::from_path(&path) {
            Ok(config) => println!(
                "{}: {} ({} units, grid {})",
                path.display(),
                config.name(),
                config.units.len(),
                config.params(None).grid_size
            ),
            Err(err) => warn!(path = %path.display(), error = %format!("{err:#}"), "skipping scenario"),
        }
    }
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<()> {
    let data = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let report: BattleReport = serde_json::from_str(&data)?;
    println!(
        "Report {} [{}] seed {} at {}",
        report.id, report.scenario, report.seed, report.timestamp
    );
    print_report(&report);
    Ok(())
}

fn print_report(report: &BattleReport) {
    for warning in &report.warnings {
        println!("Warning: {warning}");
    }
    for round in &report.rounds {
        println!("\n{}", render::recap(round));
    }
    println!();
    print!("{}", render::board(&report.final_board));
    let summary = &report.summary;
    match (summary.status, summary.winner) {
        (BattleStatus::Victory, Some(winner)) => println!(
            "{winner} won in {} rounds ({} player / {} enemy units standing, {} actions).",
            summary.rounds_played, summary.player_survivors, summary.enemy_survivors, summary.actions
        ),
        _ => println!(
            "Stalemate after {} rounds ({} player / {} enemy units standing).",
            summary.rounds_played, summary.player_survivors, summary.enemy_survivors
        ),
    }
}
