//! Board Configuration
//!
//! Everything needed to build an identical board twice: size, rank ladder,
//! RNG seed and how many tiles a new game starts with.

use serde::{Serialize, Deserialize};

use crate::error::BoardError;
use crate::game::rank::RankTable;
use crate::{DEFAULT_HEIGHT, DEFAULT_WIDTH, INITIAL_TILES};

/// Configuration for a board instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// Rank ladder (copied into each board)
    pub rank_table: RankTable,
    /// RNG seed
    pub rng_seed: u64,
    /// Tiles spawned by `Board::new_game`
    pub initial_tiles: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            rank_table: RankTable::standard(),
            rng_seed: 0,
            initial_tiles: INITIAL_TILES,
        }
    }
}

impl BoardConfig {
    /// Default config with a specific seed.
    pub fn with_seed(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, BoardError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, BoardError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the config describes a playable board.
    pub fn validate(&self) -> Result<(), BoardError> {
        if self.width == 0 || self.height == 0 {
            return Err(BoardError::InvalidConfig(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }

        if self.initial_tiles > self.width * self.height {
            return Err(BoardError::InvalidConfig(format!(
                "{} initial tiles do not fit a {}x{} grid",
                self.initial_tiles, self.width, self.height
            )));
        }

        if let Some((i, rank)) = self
            .rank_table
            .ranks()
            .iter()
            .enumerate()
            .find(|(_, r)| r.percent_appear > 100)
        {
            return Err(BoardError::InvalidConfig(format!(
                "rank {} percent_appear {} exceeds 100",
                i, rank.percent_appear
            )));
        }

        Ok(())
    }
}
