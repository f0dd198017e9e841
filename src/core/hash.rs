//! State Hashing for Verification
//!
//! Provides deterministic hashing of board state for:
//! - Replay validation
//! - Host/engine integrity checks

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for board state.
///
/// Wraps SHA-256 with helpers for the primitive types the board uses.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for board state.
    pub fn for_board_state() -> Self {
        Self::new(b"MERGE_BOARD_STATE_V1")
    }

    /// Create hasher for a replay log.
    pub fn for_replay_log() -> Self {
        Self::new(b"MERGE_BOARD_REPLAY_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute state hash for board verification.
///
/// This function is called by `Board::compute_hash()`.
/// The closure adds board-specific data after the header.
pub fn compute_state_hash<F>(turn: u32, rng_seed: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_board_state();

    // Always hash turn and seed first
    hasher.update_u32(turn);
    hasher.update_u64(rng_seed);

    add_state(&mut hasher);

    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================
