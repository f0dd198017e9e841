//! Board Engine
//!
//! Owns the grid, the live tiles and the rank table, and runs the two-phase
//! turn: [`Board::make_move`] slides and merges, then [`Board::settle`]
//! (called by the host once its animations finish) unlocks, spawns and
//! checks for game over.
//!
//! Tiles live in a BTreeMap so every scan visits them in the same order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Deserialize};
use tracing::{debug, warn};
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::config::BoardConfig;
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::{DeterministicRng, RandomSource};
use crate::error::BoardError;
use crate::game::events::{BoardEvent, MoveOutcome, SettleOutcome};
use crate::game::grid::{CellPos, Direction, Grid};
use crate::game::rank::{MergeResolution, RankTable};
use crate::game::tile::{Tile, TileId};
use crate::INITIAL_TILES;

/// Turn phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardPhase {
    /// Accepting moves
    Ready,
    /// A move changed the board; waiting for the host to call `settle`
    Settling,
}

/// Sliding-tile merge board.
///
/// Generic over the random source so tests can script draws; hosts normally
/// use the seeded [`DeterministicRng`].
#[derive(Clone, Debug)]
pub struct Board<R: RandomSource = DeterministicRng> {
    grid: Grid,
    tiles: BTreeMap<TileId, Tile>,
    /// Live rank table, bookkeeping mutates as merges resolve
    ranks: RankTable,
    /// Pristine copy restored by `new_game`
    initial_ranks: RankTable,
    rng: R,
    rng_seed: u64,
    phase: BoardPhase,
    next_tile_id: u32,
    score: u64,
    turn: u32,
    initial_tiles: usize,
}

impl Board<DeterministicRng> {
    /// Create an empty board with a seeded RNG.
    pub fn new(
        width: usize,
        height: usize,
        rank_table: RankTable,
        rng_seed: u64,
    ) -> Result<Self, BoardError> {
        let mut board = Self::with_rng(width, height, rank_table, DeterministicRng::new(rng_seed))?;
        board.rng_seed = rng_seed;
        Ok(board)
    }

    /// Create an empty board from a validated config.
    pub fn from_config(config: &BoardConfig) -> Result<Self, BoardError> {
        config.validate()?;
        let mut board = Self::new(
            config.width,
            config.height,
            config.rank_table.clone(),
            config.rng_seed,
        )?;
        board.initial_tiles = config.initial_tiles;
        Ok(board)
    }
}

impl<R: RandomSource> Board<R> {
    /// Create an empty board drawing from `rng`.
    pub fn with_rng(
        width: usize,
        height: usize,
        rank_table: RankTable,
        rng: R,
    ) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::InvalidConfig(format!(
                "grid must be at least 1x1, got {}x{}",
                width, height
            )));
        }

        Ok(Self {
            grid: Grid::new(width, height),
            tiles: BTreeMap::new(),
            initial_ranks: rank_table.clone(),
            ranks: rank_table,
            rng,
            rng_seed: 0,
            phase: BoardPhase::Ready,
            next_tile_id: 0,
            score: 0,
            turn: 0,
            initial_tiles: INITIAL_TILES,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Maximum number of tiles.
    pub fn capacity(&self) -> usize {
        self.grid.size()
    }

    /// The cell grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Live tiles in id order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Number of live tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Get a tile by id.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Tile held by a cell.
    pub fn tile_at(&self, pos: CellPos) -> Option<&Tile> {
        self.grid.tile_at(pos).and_then(|id| self.tiles.get(&id))
    }

    /// Live rank table.
    pub fn rank_table(&self) -> &RankTable {
        &self.ranks
    }

    /// Accumulated score.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Number of moves that changed the board.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Seed the board's RNG was created from (0 for injected sources).
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Current phase.
    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    /// Is a settle pending?
    pub fn is_settling(&self) -> bool {
        self.phase == BoardPhase::Settling
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Remove every tile. Score, turn and rank bookkeeping are kept.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.tiles.clear();
        self.phase = BoardPhase::Ready;
    }

    /// Start over: clear tiles, restore the rank table, zero the score and
    /// spawn the initial tiles.
    pub fn new_game(&mut self) -> Result<Vec<BoardEvent>, BoardError> {
        if self.initial_tiles > self.capacity() {
            return Err(BoardError::BoardFull);
        }

        self.reset();
        self.ranks = self.initial_ranks.clone();
        self.score = 0;
        self.turn = 0;

        let mut events = Vec::with_capacity(self.initial_tiles);
        for _ in 0..self.initial_tiles {
            events.push(self.spawn_tile()?);
        }

        debug!("New game: {} tiles on {}x{}", self.tiles.len(), self.width(), self.height());
        Ok(events)
    }

    /// Place one rank-0 tile on a random empty cell.
    pub fn spawn_initial_tile(&mut self) -> Result<TileId, BoardError> {
        let event = self.spawn_tile()?;
        event.tile_id.ok_or(BoardError::BoardFull)
    }

    /// Place a tile of `rank` on a specific empty cell.
    pub fn place_tile(&mut self, pos: CellPos, rank: usize) -> Result<TileId, BoardError> {
        let pos = self.grid.get_cell(pos.x as i32, pos.y as i32)?;
        if self.grid.is_occupied(pos) {
            return Err(BoardError::CellOccupied { x: pos.x, y: pos.y });
        }
        self.ranks.get(rank)?;

        Ok(self.insert_tile(pos, rank))
    }

    /// Place a rank-0 tile on a random empty cell and describe it.
    fn spawn_tile(&mut self) -> Result<BoardEvent, BoardError> {
        if self.tiles.len() >= self.capacity() {
            return Err(BoardError::BoardFull);
        }
        let cell = self.grid.random_empty_cell(&mut self.rng)?;
        let id = self.insert_tile(cell, 0);
        Ok(BoardEvent::tile_spawned(self.turn, id, cell, 0))
    }

    fn insert_tile(&mut self, cell: CellPos, rank: usize) -> TileId {
        let id = TileId(self.next_tile_id);
        self.next_tile_id += 1;
        self.tiles.insert(id, Tile::new(id, cell, rank));
        self.grid.set_tile(cell, Some(id));
        id
    }

    // =========================================================================
    // Move
    // =========================================================================

    /// Can tile `a` merge into tile `b`?
    pub fn can_merge(&self, a: TileId, b: TileId) -> bool {
        match (self.tiles.get(&a), self.tiles.get(&b)) {
            (Some(a), Some(b)) => a.can_merge_into(b),
            _ => false,
        }
    }

    /// Slide every tile toward `direction`, merging where legal.
    ///
    /// Rejected with [`BoardError::Settling`] until the previous changed
    /// move has been settled. A move that changes nothing leaves the board
    /// untouched and does not require a settle.
    pub fn make_move(&mut self, direction: Direction) -> Result<MoveOutcome, BoardError> {
        if self.phase == BoardPhase::Settling {
            debug!("Move {:?} rejected: board is settling", direction);
            return Err(BoardError::Settling);
        }

        // Merge resolution indexes the rank table; refuse before mutating
        if let Some(tile) = self.tiles.values().find(|t| t.rank >= self.ranks.len()) {
            return Err(BoardError::InvalidRank {
                index: tile.rank,
                len: self.ranks.len(),
            });
        }

        let turn = self.turn + 1;
        let mut outcome = MoveOutcome::unchanged(direction, false);

        let order = direction
            .traversal(self.width(), self.height())
            .cells(self.width(), self.height());

        for pos in order {
            if let Some(id) = self.grid.tile_at(pos) {
                self.move_tile(id, direction, turn, &mut outcome)?;
            }
        }

        if outcome.changed {
            self.turn = turn;
            self.score += outcome.score_delta;
            self.phase = BoardPhase::Settling;
        }
        outcome.game_over = self.is_game_over();

        debug_assert!(self.is_consistent());
        Ok(outcome)
    }

    /// Advance one tile as far as it can go. Returns true if it moved or merged.
    fn move_tile(
        &mut self,
        id: TileId,
        direction: Direction,
        turn: u32,
        outcome: &mut MoveOutcome,
    ) -> Result<bool, BoardError> {
        let start = match self.tiles.get(&id) {
            Some(tile) => tile.cell,
            None => return Ok(false),
        };

        let mut landing = None;
        let mut next = self.grid.adjacent(start, direction);

        while let Some(cell) = next {
            if let Some(other) = self.grid.tile_at(cell) {
                if self.can_merge(id, other) {
                    self.merge_tiles(id, other, turn, outcome)?;
                    return Ok(true);
                }
                break;
            }

            landing = Some(cell);
            next = self.grid.adjacent(cell, direction);
        }

        let Some(to) = landing else {
            return Ok(false);
        };

        self.grid.set_tile(start, None);
        self.grid.set_tile(to, Some(id));
        if let Some(tile) = self.tiles.get_mut(&id) {
            tile.cell = to;
        }

        #[cfg(feature = "debug-tracing")]
        trace!("Tile {:?} slid {:?} -> {:?}", id, start, to);

        outcome.changed = true;
        outcome.events.push(BoardEvent::tile_moved(turn, id, start, to));
        Ok(true)
    }

    /// Merge `source` into `target`. The target survives, locked, with the
    /// rank picked by the rank table.
    fn merge_tiles(
        &mut self,
        source: TileId,
        target: TileId,
        turn: u32,
        outcome: &mut MoveOutcome,
    ) -> Result<(), BoardError> {
        let (cell, old_rank) = match self.tiles.get(&target) {
            Some(t) => (t.cell, t.rank),
            None => return Ok(()),
        };

        let resolution = self.ranks.resolve_merge(old_rank, &mut self.rng)?;
        let score = self.ranks.value(resolution.rank())?;

        let from = match self.tiles.remove(&source) {
            Some(src) => src.cell,
            None => return Ok(()),
        };
        self.grid.set_tile(from, None);

        if let Some(t) = self.tiles.get_mut(&target) {
            t.rank = resolution.rank();
            t.locked = true;
        }

        if matches!(resolution, MergeResolution::Capped { .. }) {
            debug!("Merge at top rank {} in {:?}, rank kept", old_rank, cell);
        }

        #[cfg(feature = "debug-tracing")]
        trace!("Tile {:?} merged into {:?} at {:?}: {:?}", source, target, cell, resolution);

        outcome.changed = true;
        outcome.merges += 1;
        outcome.score_delta += score as u64;
        outcome.events.push(BoardEvent::tiles_merged(
            turn, source, target, from, cell, old_rank, resolution, score,
        ));
        Ok(())
    }

    // =========================================================================
    // Settle
    // =========================================================================

    /// Finish a changed move: unlock merged tiles, spawn a rank-0 tile if
    /// there is room, then check for game over.
    ///
    /// Does nothing (beyond reporting game over) if no settle is pending.
    pub fn settle(&mut self) -> SettleOutcome {
        let mut outcome = SettleOutcome::default();

        if self.phase != BoardPhase::Settling {
            debug!("Settle requested with no pending move");
            outcome.game_over = self.is_game_over();
            return outcome;
        }

        self.phase = BoardPhase::Ready;
        for tile in self.tiles.values_mut() {
            tile.locked = false;
        }

        if self.tiles.len() < self.capacity() {
            match self.spawn_tile() {
                Ok(event) => {
                    outcome.spawned = true;
                    outcome.events.push(event);
                }
                Err(e) => warn!("Spawn after settle failed: {}", e),
            }
        }

        if self.is_game_over() {
            debug!("Game over at turn {} with score {}", self.turn, self.score);
            outcome.game_over = true;
            outcome.events.push(BoardEvent::game_over(self.turn, self.score));
        }

        debug_assert!(self.is_consistent());
        outcome
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// True iff the board is full and no tile has a merge-eligible neighbor.
    pub fn is_game_over(&self) -> bool {
        if self.tiles.len() != self.capacity() {
            return false;
        }

        !self.tiles.values().any(|tile| {
            Direction::ALL.iter().any(|&dir| {
                self.grid
                    .adjacent(tile.cell, dir)
                    .and_then(|cell| self.tile_at(cell))
                    .is_some_and(|neighbor| tile.can_merge_into(neighbor))
            })
        })
    }

    /// Check grid occupancy and tile positions agree.
    pub fn is_consistent(&self) -> bool {
        if self.grid.occupied_count() != self.tiles.len() {
            return false;
        }

        let tiles_placed = self.tiles.values().all(|tile| {
            self.grid.tile_at(tile.cell) == Some(tile.id) && tile.rank < self.ranks.len()
        });

        let cells_known = self
            .grid
            .cells()
            .filter_map(|(pos, id)| id.map(|id| (pos, id)))
            .all(|(pos, id)| self.tiles.get(&id).is_some_and(|t| t.cell == pos));

        tiles_placed && cells_known
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.turn, self.rng_seed, |hasher| {
            hasher.update_u32(self.width() as u32);
            hasher.update_u32(self.height() as u32);
            hasher.update_u64(self.score);
            hasher.update_bool(self.is_settling());

            // Row-major cell contents
            for (_, id) in self.grid.cells() {
                match id.and_then(|id| self.tiles.get(&id)) {
                    Some(tile) => {
                        hasher.update_bool(true);
                        hasher.update_u32(tile.rank as u32);
                        hasher.update_bool(tile.locked);
                    }
                    None => hasher.update_bool(false),
                }
            }

            // Promotion bookkeeping
            for rank in self.ranks.ranks() {
                hasher.update_u32(rank.value);
                hasher.update_u32(rank.percent_appear);
                hasher.update_u32(rank.percent_miss_count);
            }
        })
    }

    /// Render-ready view of the board.
    pub fn snapshot(&self) -> BoardSnapshot {
        let cells = self
            .grid
            .cells()
            .map(|(pos, _)| self.tile_at(pos).and_then(|t| self.ranks.value(t.rank).ok()))
            .collect();

        BoardSnapshot {
            width: self.width(),
            height: self.height(),
            cells,
            score: self.score,
            turn: self.turn,
            settling: self.is_settling(),
            game_over: self.is_game_over(),
        }
    }
}

impl<R: RandomSource> fmt::Display for Board<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            for x in 0..self.width() {
                match self.tile_at(CellPos::new(x, y)) {
                    Some(tile) => {
                        let value = self.ranks.value(tile.rank).unwrap_or(0);
                        write!(f, "{:>6}", value)?;
                    }
                    None => write!(f, "{:>6}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Serializable board view for a host renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    /// Display value per cell, row-major
    pub cells: Vec<Option<u32>>,
    /// Accumulated score
    pub score: u64,
    /// Accepted move count
    pub turn: u32,
    /// Settle pending
    pub settling: bool,
    /// Terminal state
    pub game_over: bool,
}

// =============================================================================
// TESTS
// =============================================================================
