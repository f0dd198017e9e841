//! Tiles
//!
//! A tile is a position plus a rank. The board owns every tile; cells refer
//! to tiles by [`TileId`].

use serde::{Serialize, Deserialize};

use crate::game::grid::CellPos;

/// Stable tile identifier, unique within a board for its lifetime.
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// A live tile on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Identifier
    pub id: TileId,
    /// Cell currently holding this tile
    pub cell: CellPos,
    /// Index into the rank table
    pub rank: usize,
    /// Already merged into this turn; cannot be a merge target again
    pub locked: bool,
}

impl Tile {
    /// Create an unlocked tile.
    pub fn new(id: TileId, cell: CellPos, rank: usize) -> Self {
        Self {
            id,
            cell,
            rank,
            locked: false,
        }
    }

    /// Can `self` merge into `target`?
    ///
    /// Same rank, and the target has not already absorbed a tile this turn.
    #[inline]
    pub fn can_merge_into(&self, target: &Tile) -> bool {
        self.rank == target.rank && !target.locked
    }
}
