//! Tunable game rules and progress-store selection, loadable from TOML.
//!
//! Every field has a default matching the shipped game, so a rules file only
//! needs to name the values it overrides.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::Pos;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub player_start: Pos,
    pub goal: Pos,
    pub houses: Vec<Pos>,
    pub house_stay_secs: u32,
    pub house_cooldown_secs: u32,
    pub monster_step_ms: u64,
    pub countdown_tick_ms: u64,
    pub level_advance_delay_ms: u64,
    pub coins_per_level: u64,
    pub wanderers_per_level: usize,
    pub progress_store: ProgressStoreConfig,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            player_start: Pos::new(1, 1),
            goal: Pos::new(28, 28),
            houses: vec![Pos::new(9, 2), Pos::new(9, 22)],
            house_stay_secs: 30,
            house_cooldown_secs: 40,
            monster_step_ms: 1_000,
            countdown_tick_ms: 1_000,
            level_advance_delay_ms: 2_000,
            coins_per_level: 10,
            wanderers_per_level: 2,
            progress_store: ProgressStoreConfig::Memory,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum ProgressStoreConfig {
    Memory,
    File { path: PathBuf },
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(String),
    OutOfGrid { field: &'static str, pos: Pos },
    Zero { field: &'static str },
    HouseOverlap { pos: Pos },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "rules file I/O error: {e}"),
            Self::Parse(message) => write!(f, "invalid rules file: {message}"),
            Self::OutOfGrid { field, pos } => write!(f, "{field} {pos} lies outside the grid"),
            Self::Zero { field } => write!(f, "{field} must be greater than zero"),
            Self::HouseOverlap { pos } => {
                write!(f, "house at {pos} overlaps the player start, the goal or another house")
            }
        }
    }
}

impl Error for ConfigError {}

impl Rules {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let rules: Rules = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.player_start.in_grid() {
            return Err(ConfigError::OutOfGrid { field: "player_start", pos: self.player_start });
        }
        if !self.goal.in_grid() {
            return Err(ConfigError::OutOfGrid { field: "goal", pos: self.goal });
        }
        for (index, house) in self.houses.iter().enumerate() {
            if !house.in_grid() {
                return Err(ConfigError::OutOfGrid { field: "houses", pos: *house });
            }
            if *house == self.player_start
                || *house == self.goal
                || self.houses[..index].contains(house)
            {
                return Err(ConfigError::HouseOverlap { pos: *house });
            }
        }

        let budgets = [
            ("house_stay_secs", u64::from(self.house_stay_secs)),
            ("house_cooldown_secs", u64::from(self.house_cooldown_secs)),
            ("monster_step_ms", self.monster_step_ms),
            ("countdown_tick_ms", self.countdown_tick_ms),
            ("level_advance_delay_ms", self.level_advance_delay_ms),
        ];
        if let Some((field, _)) = budgets.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Zero { field });
        }
        Ok(())
    }

    pub fn wanderers_for_level(&self, level: u32) -> usize {
        self.wanderers_per_level.saturating_mul(level as usize)
    }

    pub fn coins_for_level(&self, level: u32) -> u64 {
        self.coins_per_level.saturating_mul(u64::from(level))
    }
}
