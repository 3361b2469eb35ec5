use chrono::Utc;
use serde::{Deserialize, Serialize};
use skirmish_core::{BattleError, BoardSnapshot, Team, TurnReport};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleReport {
    pub id: String,
    pub timestamp: String,
    pub scenario: String,
    pub seed: u64,
    pub summary: BattleSummary,
    /// Roster problems recovered at setup, e.g. unknown weapons.
    #[serde(default)]
    pub warnings: Vec<BattleError>,
    pub rounds: Vec<TurnReport>,
    pub final_board: BoardSnapshot,
}

impl BattleReport {
    pub fn new(
        id: impl Into<String>,
        scenario: impl Into<String>,
        seed: u64,
        warnings: Vec<BattleError>,
        rounds: Vec<TurnReport>,
        final_board: BoardSnapshot,
    ) -> Self {
        let summary = summarize(&rounds, &final_board);
        Self {
            id: id.into(),
            timestamp: Utc::now().to_rfc3339(),
            scenario: scenario.into(),
            seed,
            summary,
            warnings,
            rounds,
            final_board,
        }
    }
}

fn summarize(rounds: &[TurnReport], board: &BoardSnapshot) -> BattleSummary {
    let last = rounds.last();
    let winner = last.and_then(|report| report.winner);
    let status = match winner {
        Some(_) => BattleStatus::Victory,
        None => BattleStatus::Stalemate,
    };
    let survivors = |team: Team| board.living().filter(|unit| unit.team == team).count();
    BattleSummary {
        status,
        winner,
        rounds_played: last.map_or(0, |report| report.round),
        actions: rounds.iter().map(|report| report.actions.len()).sum(),
        player_survivors: survivors(Team::Player),
        enemy_survivors: survivors(Team::Enemy),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleSummary {
    pub status: BattleStatus,
    pub winner: Option<Team>,
    pub rounds_played: u32,
    pub actions: usize,
    pub player_survivors: usize,
    pub enemy_survivors: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BattleStatus {
    Victory,
    Stalemate,
}
