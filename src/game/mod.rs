//! Board Logic Module
//!
//! All board simulation code. 100% deterministic given the RNG seed.
//!
//! ## Module Structure
//!
//! - `grid`: Cells, directions, traversal order
//! - `tile`: Tile identity and merge legality
//! - `rank`: Rank ladder and merge outcome selection
//! - `board`: Move, settle and game-over engine
//! - `events`: Move/settle outcomes for the host
//! - `replay`: Recorded move sequences and re-simulation

pub mod grid;
pub mod tile;
pub mod rank;
pub mod board;
pub mod events;
pub mod replay;

// Re-export key types
pub use grid::{CellPos, Direction, Grid, Traversal};
pub use tile::{Tile, TileId};
pub use rank::{MergeResolution, RankDef, RankTable};
pub use board::{Board, BoardPhase, BoardSnapshot};
pub use events::{BoardEvent, BoardEventData, MoveOutcome, SettleOutcome};
pub use replay::{replay, ReplayLog, ReplayResult};
