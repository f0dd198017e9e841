//! Core deterministic primitives.
//!
//! Everything the board engine needs to be reproducible from a seed:
//! the random source and the state fingerprint.

pub mod rng;
pub mod hash;

// Re-export core types
pub use rng::{DeterministicRng, RandomSource};
pub use hash::{compute_state_hash, StateHash, StateHasher};
