use skirmish_core::Team;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("scenario has no units")]
    EmptyRoster,
    #[error("scenario has no living {0} units")]
    MissingTeam(Team),
    #[error("unit name `{0}` is used more than once")]
    DuplicateUnit(String),
    #[error("scenario overrides the weapon table with an empty list")]
    EmptyArmoury,
    #[error("weapon `{weapon}` sets {stat} to {value}, beyond the limit of {}", crate::config::MAX_WEAPON_STAT)]
    WeaponStat {
        weapon: String,
        stat: &'static str,
        value: i64,
    },
    #[error("grid size {0} is outside 2..=26")]
    GridSize(i32),
}
