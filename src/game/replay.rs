//! Replay
//!
//! A replay log is the board config plus every direction the host
//! submitted. Re-running the log against a fresh board reproduces the game
//! exactly, because every random draw comes from the seeded RNG.

use serde::{Serialize, Deserialize};

use crate::config::BoardConfig;
use crate::core::hash::{StateHash, StateHasher};
use crate::error::BoardError;
use crate::game::board::Board;
use crate::game::grid::Direction;

/// Recorded game: starting config and move sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayLog {
    /// Config the game was started with
    pub config: BoardConfig,
    /// Directions in submission order
    pub moves: Vec<Direction>,
}

impl ReplayLog {
    /// Start an empty log.
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            moves: Vec::new(),
        }
    }

    /// Append a submitted direction.
    pub fn record(&mut self, direction: Direction) {
        self.moves.push(direction);
    }

    /// Number of recorded moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// No moves recorded?
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BoardError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from [`ReplayLog::to_bytes`] output.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BoardError> {
        let log: Self = bincode::deserialize(bytes)?;
        log.config.validate()?;
        Ok(log)
    }

    /// Fingerprint of the seed and move sequence.
    pub fn digest(&self) -> StateHash {
        let mut hasher = StateHasher::for_replay_log();
        hasher.update_u64(self.config.rng_seed);
        hasher.update_u32(self.config.width as u32);
        hasher.update_u32(self.config.height as u32);
        hasher.update_u32(self.moves.len() as u32);
        for dir in &self.moves {
            hasher.update_u8(*dir as u8);
        }
        hasher.finalize()
    }
}

/// Outcome of re-running a log.
#[derive(Debug)]
pub struct ReplayResult {
    /// Board after the last move settled
    pub board: Board,
    /// Moves that changed nothing
    pub unchanged_moves: usize,
    /// Final state hash
    pub hash: StateHash,
}

/// Re-run a log: new game, then move + settle per entry.
pub fn replay(log: &ReplayLog) -> Result<ReplayResult, BoardError> {
    let mut board = Board::from_config(&log.config)?;
    board.new_game()?;

    let mut unchanged_moves = 0;
    for &direction in &log.moves {
        let outcome = board.make_move(direction)?;
        if outcome.changed {
            board.settle();
        } else {
            unchanged_moves += 1;
        }
    }

    let hash = board.compute_hash();
    Ok(ReplayResult {
        board,
        unchanged_moves,
        hash,
    })
}
