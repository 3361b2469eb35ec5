use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skirmish_core::{Catalog, SimulationParams, Spell, Team, UnitDefinition, Weapon};

use crate::error::ScenarioError;

pub const DEFAULT_MAX_ROUNDS: u32 = 50;
/// Upper bound on any numeric weapon stat a scenario may set.
pub const MAX_WEAPON_STAT: i32 = 100;

/// A battle described in TOML: optional simulation knobs, optional catalog
/// overrides and the roster rows.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub simulation: SimulationSection,
    #[serde(default)]
    pub weapons: Option<Vec<Weapon>>,
    #[serde(default)]
    pub spells: Option<Vec<Spell>>,
    #[serde(default)]
    pub units: Vec<UnitDefinition>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SimulationSection {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub grid_size: Option<i32>,
    #[serde(default)]
    pub max_rounds: Option<u32>,
}

impl ScenarioConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        let mut cfg = Self::parse(&data)
            .with_context(|| format!("failed to parse scenario {}", path.display()))?;
        if cfg.name.is_none() {
            cfg.name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_owned);
        }
        Ok(cfg)
    }

    pub fn parse(data: &str) -> Result<Self, ScenarioError> {
        let cfg: ScenarioConfig = toml::from_str(data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.units.is_empty() {
            return Err(ScenarioError::EmptyRoster);
        }
        for team in Team::ALL {
            if !self.units.iter().any(|def| def.team == team && def.wounds > 0) {
                return Err(ScenarioError::MissingTeam(team));
            }
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.units.iter().find(|def| !seen.insert(def.name.as_str())) {
            return Err(ScenarioError::DuplicateUnit(dup.name.clone()));
        }
        if matches!(&self.weapons, Some(weapons) if weapons.is_empty()) {
            return Err(ScenarioError::EmptyArmoury);
        }
        for weapon in self.weapons.iter().flatten() {
            let stats = [
                ("range", weapon.range),
                ("attacks", i32::try_from(weapon.attacks).unwrap_or(i32::MAX)),
                ("bonus_strength", weapon.bonus_strength),
                ("bonus_damage", weapon.bonus_damage),
            ];
            if let Some((stat, value)) = stats
                .into_iter()
                .find(|(_, value)| !(-MAX_WEAPON_STAT..=MAX_WEAPON_STAT).contains(value))
            {
                return Err(ScenarioError::WeaponStat {
                    weapon: weapon.name.clone(),
                    stat,
                    value: i64::from(value),
                });
            }
        }
        if let Some(size) = self.simulation.grid_size {
            if !(2..=26).contains(&size) {
                return Err(ScenarioError::GridSize(size));
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    /// Scenario catalog; missing tables fall back to the standard ones.
    pub fn catalog(&self) -> Catalog {
        let standard = Catalog::standard();
        let weapons = match &self.weapons {
            Some(weapons) => weapons.clone(),
            None => standard.weapons().map(|(_, w)| w.clone()).collect(),
        };
        let spells = match &self.spells {
            Some(spells) => spells.clone(),
            None => standard.spells().map(|(_, s)| s.clone()).collect(),
        };
        Catalog::new(weapons, spells)
    }

    /// The seed override wins over the file, which wins over `SIMULATION_SEED`
    /// and `BATTLE_GRID_SIZE`, which win over the defaults.
    pub fn params(&self, seed_override: Option<u64>) -> SimulationParams {
        self.params_over(seed_override, SimulationParams::from_env())
    }

    fn params_over(&self, seed_override: Option<u64>, fallback: SimulationParams) -> SimulationParams {
        SimulationParams {
            seed: seed_override
                .or(self.simulation.seed)
                .unwrap_or(fallback.seed),
            grid_size: self.simulation.grid_size.unwrap_or(fallback.grid_size),
        }
    }

    pub fn max_rounds(&self) -> u32 {
        self.simulation.max_rounds.unwrap_or(DEFAULT_MAX_ROUNDS)
    }
}
