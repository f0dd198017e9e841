//! Grid Geometry
//!
//! Fixed-size cell array, directions and the direction-dependent traversal
//! order. `y = 0` is the top row, so `Up` moves toward smaller `y`.

use serde::{Serialize, Deserialize};

use crate::core::rng::RandomSource;
use crate::error::BoardError;
use crate::game::tile::TileId;

// =============================================================================
// CELL POSITION
// =============================================================================

/// Coordinates of a cell inside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellPos {
    /// Column, 0 = leftmost.
    pub x: usize,
    /// Row, 0 = top.
    pub y: usize,
}

impl CellPos {
    /// Create a position. Not bounds-checked; use [`Grid::get_cell`] for that.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

// =============================================================================
// DIRECTION
// =============================================================================

/// One of the four move directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// Toward row 0.
    Up = 0,
    /// Toward the last row.
    Down = 1,
    /// Toward column 0.
    Left = 2,
    /// Toward the last column.
    Right = 3,
}

impl Direction {
    /// All directions, in the order the game-over scan checks them.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in grid coordinates as `(dx, dy)`.
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Traversal order for a move in this direction.
    ///
    /// Tiles nearest the destination edge are visited first. The edge row
    /// (or column) itself is skipped since nothing there can advance.
    pub fn traversal(self, width: usize, height: usize) -> Traversal {
        let w = width as i32;
        let h = height as i32;
        match self {
            Direction::Up => Traversal { start_x: 0, step_x: 1, start_y: 1, step_y: 1 },
            Direction::Down => Traversal { start_x: 0, step_x: 1, start_y: h - 2, step_y: -1 },
            Direction::Left => Traversal { start_x: 1, step_x: 1, start_y: 0, step_y: 1 },
            Direction::Right => Traversal { start_x: w - 2, step_x: -1, start_y: 0, step_y: 1 },
        }
    }

    /// Get direction from index (0-3).
    pub fn from_index(index: u8) -> Option<Direction> {
        match index {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Start index and increment along each axis for one move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Traversal {
    /// First column visited.
    pub start_x: i32,
    /// Column increment (+1 or -1).
    pub step_x: i32,
    /// First row visited.
    pub start_y: i32,
    /// Row increment (+1 or -1).
    pub step_y: i32,
}

impl Traversal {
    /// Cells in visiting order: columns outer, rows inner.
    pub fn cells(&self, width: usize, height: usize) -> Vec<CellPos> {
        let w = width as i32;
        let h = height as i32;
        let mut out = Vec::with_capacity(width * height);

        let mut x = self.start_x;
        while x >= 0 && x < w {
            let mut y = self.start_y;
            while y >= 0 && y < h {
                out.push(CellPos::new(x as usize, y as usize));
                y += self.step_y;
            }
            x += self.step_x;
        }

        out
    }
}

// =============================================================================
// GRID
// =============================================================================

/// Fixed-size 2D array of cells, each holding at most one tile.
///
/// Occupancy is derived: a cell is occupied iff it holds a tile id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major cell storage.
    cells: Vec<Option<TileId>>,
}

impl Grid {
    /// Create an empty grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total cell count (tile capacity).
    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Check whether signed coordinates fall inside the grid.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Resolve coordinates to a cell.
    pub fn get_cell(&self, x: i32, y: i32) -> Result<CellPos, BoardError> {
        if !self.contains(x, y) {
            return Err(BoardError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(CellPos::new(x as usize, y as usize))
    }

    /// Neighbor of `pos` in `direction`, or `None` past the edge.
    pub fn adjacent(&self, pos: CellPos, direction: Direction) -> Option<CellPos> {
        let (dx, dy) = direction.offset();
        let x = pos.x as i32 + dx;
        let y = pos.y as i32 + dy;
        self.get_cell(x, y).ok()
    }

    #[inline]
    fn index(&self, pos: CellPos) -> Option<usize> {
        if pos.x < self.width && pos.y < self.height {
            Some(pos.y * self.width + pos.x)
        } else {
            None
        }
    }

    /// Tile held by a cell.
    #[inline]
    pub fn tile_at(&self, pos: CellPos) -> Option<TileId> {
        self.index(pos).and_then(|i| self.cells[i])
    }

    /// Is the cell occupied?
    #[inline]
    pub fn is_occupied(&self, pos: CellPos) -> bool {
        self.tile_at(pos).is_some()
    }

    /// Set or clear the tile held by a cell. Out-of-range positions are ignored.
    pub(crate) fn set_tile(&mut self, pos: CellPos, tile: Option<TileId>) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = tile;
        }
    }

    /// Clear every cell.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// All cells with their contents, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (CellPos, Option<TileId>)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (CellPos::new(i % width, i / width), *c))
    }

    /// Unoccupied cells in row-major scan order.
    pub fn empty_cells(&self) -> Vec<CellPos> {
        self.cells()
            .filter(|(_, tile)| tile.is_none())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// First unoccupied cell in row-major scan order.
    pub fn first_empty_cell(&self) -> Option<CellPos> {
        self.cells().find(|(_, tile)| tile.is_none()).map(|(pos, _)| pos)
    }

    /// Uniformly sample an unoccupied cell.
    pub fn random_empty_cell<R: RandomSource>(&self, rng: &mut R) -> Result<CellPos, BoardError> {
        let empty = self.empty_cells();
        rng.choose(&empty).copied().ok_or(BoardError::BoardFull)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::DeterministicRng;

    #[test]
    fn test_get_cell_bounds() {
        let grid = Grid::new(4, 3);

        assert_eq!(grid.get_cell(0, 0), Ok(CellPos::new(0, 0)));
        assert_eq!(grid.get_cell(3, 2), Ok(CellPos::new(3, 2)));
        assert!(matches!(grid.get_cell(4, 0), Err(BoardError::OutOfRange { x: 4, .. })));
        assert!(matches!(grid.get_cell(0, 3), Err(BoardError::OutOfRange { y: 3, .. })));
        assert!(matches!(grid.get_cell(-1, 0), Err(BoardError::OutOfRange { .. })));
    }

    #[test]
    fn test_adjacent_cells() {
        let grid = Grid::new(4, 4);
        let corner = CellPos::new(0, 0);

        assert_eq!(grid.adjacent(corner, Direction::Up), None);
        assert_eq!(grid.adjacent(corner, Direction::Left), None);
        assert_eq!(grid.adjacent(corner, Direction::Down), Some(CellPos::new(0, 1)));
        assert_eq!(grid.adjacent(corner, Direction::Right), Some(CellPos::new(1, 0)));

        let far = CellPos::new(3, 3);
        assert_eq!(grid.adjacent(far, Direction::Down), None);
        assert_eq!(grid.adjacent(far, Direction::Right), None);
    }

    #[test]
    fn test_traversal_starts_at_destination_edge() {
        let up = Direction::Up.traversal(4, 4).cells(4, 4);
        assert_eq!(up.first(), Some(&CellPos::new(0, 1)));
        assert_eq!(up.len(), 12);
        assert!(up.iter().all(|c| c.y != 0));

        let down = Direction::Down.traversal(4, 4).cells(4, 4);
        assert_eq!(&down[..3], &[CellPos::new(0, 2), CellPos::new(0, 1), CellPos::new(0, 0)]);

        let left = Direction::Left.traversal(4, 4).cells(4, 4);
        assert_eq!(left.first(), Some(&CellPos::new(1, 0)));
        assert!(left.iter().all(|c| c.x != 0));

        let right = Direction::Right.traversal(4, 4).cells(4, 4);
        assert_eq!(right.first(), Some(&CellPos::new(2, 0)));
        assert_eq!(right.last(), Some(&CellPos::new(0, 3)));
    }

    #[test]
    fn test_traversal_single_column() {
        // Nothing can move horizontally on a 1-wide grid
        assert!(Direction::Right.traversal(1, 3).cells(1, 3).is_empty());
        assert!(Direction::Left.traversal(1, 3).cells(1, 3).is_empty());
        assert_eq!(Direction::Up.traversal(1, 3).cells(1, 3).len(), 2);
    }

    #[test]
    fn test_occupancy_and_scan_order() {
        let mut grid = Grid::new(2, 2);
        assert_eq!(grid.first_empty_cell(), Some(CellPos::new(0, 0)));

        grid.set_tile(CellPos::new(0, 0), Some(TileId(7)));
        assert!(grid.is_occupied(CellPos::new(0, 0)));
        assert_eq!(grid.tile_at(CellPos::new(0, 0)), Some(TileId(7)));
        assert_eq!(grid.first_empty_cell(), Some(CellPos::new(1, 0)));
        assert_eq!(grid.occupied_count(), 1);
        assert_eq!(grid.empty_cells().len(), 3);

        grid.clear();
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_random_empty_cell() {
        let mut grid = Grid::new(2, 2);
        let mut rng = DeterministicRng::new(99);

        grid.set_tile(CellPos::new(0, 0), Some(TileId(0)));
        grid.set_tile(CellPos::new(1, 0), Some(TileId(1)));
        grid.set_tile(CellPos::new(0, 1), Some(TileId(2)));

        // Only one empty cell left
        for _ in 0..20 {
            assert_eq!(grid.random_empty_cell(&mut rng), Ok(CellPos::new(1, 1)));
        }

        grid.set_tile(CellPos::new(1, 1), Some(TileId(3)));
        assert_eq!(grid.random_empty_cell(&mut rng), Err(BoardError::BoardFull));
    }

    #[test]
    fn test_direction_helpers() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_index(dir as u8), Some(dir));
            let (dx, dy) = dir.offset();
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
        assert_eq!(Direction::from_index(4), None);
    }
}
