//! Board Errors
//!
//! Every variant describes a caller-detectable precondition. The engine
//! checks preconditions before mutating, so an `Err` always means the board
//! is exactly as it was before the call.

/// Errors returned by the board engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Coordinates outside the grid.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRange {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// A random empty cell was requested but every cell is occupied.
    #[error("board is full")]
    BoardFull,

    /// Rank index outside the rank table.
    #[error("rank index {index} is outside the rank table (len {len})")]
    InvalidRank {
        /// Offending rank index.
        index: usize,
        /// Number of ranks in the table.
        len: usize,
    },

    /// Tried to place a tile on an occupied cell.
    #[error("cell ({x}, {y}) is already occupied")]
    CellOccupied {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },

    /// A move was requested while the previous move is still settling.
    #[error("board is settling, move rejected")]
    Settling,

    /// Configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for BoardError {
    fn from(e: serde_json::Error) -> Self {
        BoardError::Serialization(e.to_string())
    }
}

impl From<bincode::Error> for BoardError {
    fn from(e: bincode::Error) -> Self {
        BoardError::Serialization(e.to_string())
    }
}
