//! # Merge Board
//!
//! Deterministic sliding-tile merge board (2048-style) with adaptive rank
//! promotion, built to be driven by an external host that owns input,
//! rendering and timing.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        MERGE BOARD                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Xorshift128+ PRNG, RandomSource seam      │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Board logic (deterministic)               │
//! │  ├── grid.rs     - Cells, directions, traversal order        │
//! │  ├── tile.rs     - Tiles and merge legality                  │
//! │  ├── rank.rs     - Rank ladder, merge outcome selection      │
//! │  ├── board.rs    - Move / settle / game-over engine          │
//! │  ├── events.rs   - Outcomes and events for the host          │
//! │  └── replay.rs   - Move logs and re-simulation               │
//! │                                                              │
//! │  config.rs       - Board configuration                       │
//! │  error.rs        - Error kinds                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Turn Model
//!
//! A turn has two phases. [`Board::make_move`] slides and merges and, if
//! anything changed, puts the board into a settling state that rejects
//! further moves. The host animates, then calls [`Board::settle`], which
//! unlocks merged tiles, spawns a rank-0 tile and checks for game over.
//!
//! ```
//! use merge_board::{Board, BoardConfig, Direction};
//!
//! let mut board = Board::from_config(&BoardConfig::with_seed(7)).unwrap();
//! board.new_game().unwrap();
//!
//! for dir in Direction::ALL {
//!     if board.make_move(dir).unwrap().changed {
//!         let settled = board.settle();
//!         assert!(settled.spawned);
//!         break;
//!     }
//! }
//! assert!(board.is_consistent());
//! ```
//!
//! ## Determinism Guarantee
//!
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time dependencies
//! - All randomness from seeded Xorshift128+
//!
//! Given identical config and moves, two boards produce identical ranks,
//! scores and state hashes.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod error;
pub mod game;

// Re-export commonly used types
pub use config::BoardConfig;
pub use core::rng::{DeterministicRng, RandomSource};
pub use error::BoardError;
pub use game::board::{Board, BoardPhase, BoardSnapshot};
pub use game::events::{MoveOutcome, SettleOutcome};
pub use game::grid::{CellPos, Direction};
pub use game::rank::{RankDef, RankTable};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default grid width
pub const DEFAULT_WIDTH: usize = 4;

/// Default grid height
pub const DEFAULT_HEIGHT: usize = 4;

/// Tiles placed when a new game starts
pub const INITIAL_TILES: usize = 2;
