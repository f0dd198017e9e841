//! Board Events
//!
//! Outcomes and events produced by moves and settles, consumed by the host
//! to drive animation and score display.

use serde::{Serialize, Deserialize};

use crate::game::grid::{CellPos, Direction};
use crate::game::rank::MergeResolution;
use crate::game::tile::TileId;

/// Board event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardEventData {
    /// Tile slid to an empty cell
    TileMoved {
        tile_id: TileId,
        from: CellPos,
        to: CellPos,
    },

    /// Source tile merged into target; source is gone
    TilesMerged {
        source_id: TileId,
        target_id: TileId,
        from: CellPos,
        cell: CellPos,
        old_rank: usize,
        resolution: MergeResolution,
        score: u32,
    },

    /// New tile placed during settle
    TileSpawned {
        tile_id: TileId,
        cell: CellPos,
        rank: usize,
    },

    /// No further move is possible
    GameOver {
        final_score: u64,
    },
}

/// A board event tagged with the turn that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardEvent {
    /// Turn (accepted move count) when the event occurred
    pub turn: u32,

    /// Tile the event is about, if any
    pub tile_id: Option<TileId>,

    /// Event data
    pub data: BoardEventData,
}

impl BoardEvent {
    /// Create a new event.
    pub fn new(turn: u32, data: BoardEventData) -> Self {
        let tile_id = match &data {
            BoardEventData::TileMoved { tile_id, .. } => Some(*tile_id),
            BoardEventData::TilesMerged { target_id, .. } => Some(*target_id),
            BoardEventData::TileSpawned { tile_id, .. } => Some(*tile_id),
            BoardEventData::GameOver { .. } => None,
        };

        Self { turn, tile_id, data }
    }

    /// Create tile moved event.
    pub fn tile_moved(turn: u32, tile_id: TileId, from: CellPos, to: CellPos) -> Self {
        Self::new(turn, BoardEventData::TileMoved { tile_id, from, to })
    }

    /// Create tiles merged event.
    #[allow(clippy::too_many_arguments)]
    pub fn tiles_merged(
        turn: u32,
        source_id: TileId,
        target_id: TileId,
        from: CellPos,
        cell: CellPos,
        old_rank: usize,
        resolution: MergeResolution,
        score: u32,
    ) -> Self {
        Self::new(
            turn,
            BoardEventData::TilesMerged {
                source_id,
                target_id,
                from,
                cell,
                old_rank,
                resolution,
                score,
            },
        )
    }

    /// Create tile spawned event.
    pub fn tile_spawned(turn: u32, tile_id: TileId, cell: CellPos, rank: usize) -> Self {
        Self::new(turn, BoardEventData::TileSpawned { tile_id, cell, rank })
    }

    /// Create game over event.
    pub fn game_over(turn: u32, final_score: u64) -> Self {
        Self::new(turn, BoardEventData::GameOver { final_score })
    }
}

/// Result of a move request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Direction that was requested
    pub direction: Option<Direction>,
    /// At least one tile moved or merged; the board is now settling
    pub changed: bool,
    /// Score earned by merges in this move
    pub score_delta: u64,
    /// Number of merges performed
    pub merges: u32,
    /// Board is in a terminal state
    pub game_over: bool,
    /// Slides and merges, in processing order
    pub events: Vec<BoardEvent>,
}

impl MoveOutcome {
    /// Outcome of a move that changed nothing.
    pub fn unchanged(direction: Direction, game_over: bool) -> Self {
        Self {
            direction: Some(direction),
            game_over,
            ..Self::default()
        }
    }
}

/// Result of completing a settle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleOutcome {
    /// A tile was spawned
    pub spawned: bool,
    /// Board is in a terminal state
    pub game_over: bool,
    /// Spawn and game-over events
    pub events: Vec<BoardEvent>,
}
