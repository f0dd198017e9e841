//! Rank Ladder and Merge Outcome Selection
//!
//! Ranks form an ordered ladder. Index 0 is the spawn rank, the last index is
//! terminal. Each rank carries the bookkeeping that biases promotion toward
//! it: an appearance weight and a miss counter.
//!
//! ## Merge outcome
//!
//! Merging into a tile of rank `r` (below the top) draws `d` in [1, 100]:
//! - `d <= appear[r+1] + miss[r+1]`: promote to `r+1`, set `appear[r+1] = 100`
//! - otherwise: `miss[r+1] += 1`, the tile becomes a uniform rank in [0, r)
//!
//! Rank 0 has no lower ranks, so a failed draw there leaves the tile at 0.
//! Merging at the top rank makes no draw and keeps the rank.

use serde::{Serialize, Deserialize};

use crate::core::rng::RandomSource;
use crate::error::BoardError;

/// Weight a rank is reset to after a successful promotion into it.
pub const PROMOTION_RESET_PERCENT: u32 = 100;

/// Lowest value of the promotion draw.
pub const DRAW_MIN: i32 = 1;

/// Highest value of the promotion draw (inclusive).
pub const DRAW_MAX: i32 = 100;

/// One step of the rank ladder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankDef {
    /// Display value (and score awarded when a merge lands on this rank)
    pub value: u32,
    /// Base appearance weight, in percent
    pub percent_appear: u32,
    /// Failed promotion attempts into this rank
    #[serde(default)]
    pub percent_miss_count: u32,
}

impl RankDef {
    /// Create a rank with a zero miss counter.
    pub const fn new(value: u32, percent_appear: u32) -> Self {
        Self {
            value,
            percent_appear,
            percent_miss_count: 0,
        }
    }

    /// Current promotion threshold.
    #[inline]
    pub fn threshold(&self) -> u32 {
        self.percent_appear.saturating_add(self.percent_miss_count)
    }
}

/// How a merge resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeResolution {
    /// Draw succeeded, tile moved up one rank.
    Promoted {
        /// New rank index
        rank: usize,
    },
    /// Draw failed, tile took a rank below its pre-merge rank (or 0).
    Demoted {
        /// New rank index
        rank: usize,
    },
    /// Merged at the top rank, rank unchanged.
    Capped {
        /// The top rank index
        rank: usize,
    },
}

impl MergeResolution {
    /// Resulting rank index.
    #[inline]
    pub fn rank(self) -> usize {
        match self {
            MergeResolution::Promoted { rank }
            | MergeResolution::Demoted { rank }
            | MergeResolution::Capped { rank } => rank,
        }
    }

    /// Did the merge move the tile up?
    #[inline]
    pub fn is_promotion(self) -> bool {
        matches!(self, MergeResolution::Promoted { .. })
    }
}

/// Ordered rank ladder with per-rank promotion bookkeeping.
///
/// Always holds at least one rank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RankDef>", into = "Vec<RankDef>")]
pub struct RankTable {
    ranks: Vec<RankDef>,
}

impl RankTable {
    /// Build a table from ordered rank definitions.
    pub fn new(ranks: Vec<RankDef>) -> Result<Self, BoardError> {
        if ranks.is_empty() {
            return Err(BoardError::InvalidConfig("rank table is empty".into()));
        }
        Ok(Self { ranks })
    }

    /// The classic 2, 4, 8 … 2048 ladder with descending appearance weights.
    pub fn standard() -> Self {
        const LADDER: [(u32, u32); 11] = [
            (2, 100),
            (4, 90),
            (8, 80),
            (16, 70),
            (32, 60),
            (64, 50),
            (128, 40),
            (256, 30),
            (512, 20),
            (1024, 15),
            (2048, 10),
        ];

        Self {
            ranks: LADDER.iter().map(|&(v, p)| RankDef::new(v, p)).collect(),
        }
    }

    /// Number of ranks.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Always false; a table holds at least one rank.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Index of the terminal rank.
    #[inline]
    pub fn max_rank(&self) -> usize {
        self.ranks.len() - 1
    }

    /// All ranks in order.
    pub fn ranks(&self) -> &[RankDef] {
        &self.ranks
    }

    /// Look up a rank.
    pub fn get(&self, index: usize) -> Result<&RankDef, BoardError> {
        self.ranks.get(index).ok_or(BoardError::InvalidRank {
            index,
            len: self.ranks.len(),
        })
    }

    /// Display value of a rank.
    pub fn value(&self, index: usize) -> Result<u32, BoardError> {
        self.get(index).map(|r| r.value)
    }

    /// Index of the first rank showing `value`.
    pub fn index_of(&self, value: u32) -> Option<usize> {
        self.ranks.iter().position(|r| r.value == value)
    }

    /// Pick the rank a merge into a tile of `rank` produces.
    ///
    /// Mutates the bookkeeping of `rank + 1`. Fails without drawing or
    /// mutating if `rank` is outside the table.
    pub fn resolve_merge<R: RandomSource>(
        &mut self,
        rank: usize,
        rng: &mut R,
    ) -> Result<MergeResolution, BoardError> {
        self.get(rank)?;

        if rank >= self.max_rank() {
            return Ok(MergeResolution::Capped { rank });
        }

        let next_rank = rank + 1;
        let draw = rng.next_int_range(DRAW_MIN, DRAW_MAX) as u32;
        let next = &mut self.ranks[next_rank];

        if draw <= next.threshold() {
            next.percent_appear = PROMOTION_RESET_PERCENT;
            return Ok(MergeResolution::Promoted { rank: next_rank });
        }

        next.percent_miss_count = next.percent_miss_count.saturating_add(1);

        // [0, 0) is empty: rank 0 stays at 0 without a draw
        let demoted = if rank == 0 {
            0
        } else {
            rng.next_int(rank as u32) as usize
        };

        Ok(MergeResolution::Demoted { rank: demoted })
    }
}

impl Default for RankTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<RankDef>> for RankTable {
    type Error = BoardError;

    fn try_from(ranks: Vec<RankDef>) -> Result<Self, Self::Error> {
        Self::new(ranks)
    }
}

impl From<RankTable> for Vec<RankDef> {
    fn from(table: RankTable) -> Self {
        table.ranks
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Random source that replays queued values (reduced modulo `max`).
    pub(crate) struct ScriptedRng {
        values: VecDeque<u32>,
    }

    impl ScriptedRng {
        pub(crate) fn new(values: &[u32]) -> Self {
            Self { values: values.iter().copied().collect() }
        }

        pub(crate) fn remaining(&self) -> usize {
            self.values.len()
        }
    }

    impl RandomSource for ScriptedRng {
        fn next_int(&mut self, max: u32) -> u32 {
            if max == 0 {
                return 0;
            }
            let value = self.values.pop_front().expect("scripted draws exhausted");
            value % max
        }
    }

    /// A draw of `d` in [1, 100] comes from queued value `d - 1`.
    pub(crate) fn draw(d: u32) -> u32 {
        d - 1
    }

    fn table(appear: &[u32]) -> RankTable {
        let ranks = appear
            .iter()
            .enumerate()
            .map(|(i, &p)| RankDef::new(2 << i, p))
            .collect();
        RankTable::new(ranks).unwrap()
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(RankTable::new(vec![]), Err(BoardError::InvalidConfig(_))));
    }

    #[test]
    fn test_standard_table() {
        let t = RankTable::standard();
        assert_eq!(t.len(), 11);
        assert_eq!(t.max_rank(), 10);
        assert_eq!(t.value(0), Ok(2));
        assert_eq!(t.value(10), Ok(2048));
        assert_eq!(t.index_of(256), Some(7));
        assert_eq!(t.index_of(3), None);
        assert!(t.ranks().iter().all(|r| r.percent_miss_count == 0));
    }

    #[test]
    fn test_promotion_resets_weight() {
        let mut t = table(&[100, 40, 30]);
        let mut rng = ScriptedRng::new(&[draw(40)]);

        let res = t.resolve_merge(0, &mut rng).unwrap();
        assert_eq!(res, MergeResolution::Promoted { rank: 1 });
        assert_eq!(t.ranks()[1].percent_appear, PROMOTION_RESET_PERCENT);
        assert_eq!(t.ranks()[1].percent_miss_count, 0);
    }

    #[test]
    fn test_miss_increments_counter_and_demotes() {
        let mut t = table(&[100, 40, 30, 20]);
        // Draw 50 misses rank 3 (threshold 20), then pick index 1 of [0, 2)
        let mut rng = ScriptedRng::new(&[draw(50), 1]);

        let res = t.resolve_merge(2, &mut rng).unwrap();
        assert_eq!(res, MergeResolution::Demoted { rank: 1 });
        assert_eq!(t.ranks()[3].percent_miss_count, 1);
        assert_eq!(t.ranks()[3].percent_appear, 20);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_miss_counter_raises_odds() {
        let mut t = table(&[100, 10]);

        // Draw 12 misses threshold 10, then 11 ...
        let mut rng = ScriptedRng::new(&[draw(12)]);
        assert!(!t.resolve_merge(0, &mut rng).unwrap().is_promotion());
        assert_eq!(t.ranks()[1].threshold(), 11);

        let mut rng = ScriptedRng::new(&[draw(12)]);
        assert!(!t.resolve_merge(0, &mut rng).unwrap().is_promotion());
        assert_eq!(t.ranks()[1].threshold(), 12);

        // ... and now the same draw promotes
        let mut rng = ScriptedRng::new(&[draw(12)]);
        assert!(t.resolve_merge(0, &mut rng).unwrap().is_promotion());
        assert_eq!(t.ranks()[1].threshold(), 100 + 2);
    }

    #[test]
    fn test_rank_zero_miss_stays_zero() {
        let mut t = table(&[100, 0]);
        let mut rng = ScriptedRng::new(&[draw(1), 99]);

        let res = t.resolve_merge(0, &mut rng).unwrap();
        assert_eq!(res, MergeResolution::Demoted { rank: 0 });
        // Empty fallback range must not consume a draw
        assert_eq!(rng.remaining(), 1);
    }

    #[test]
    fn test_top_rank_is_capped() {
        let mut t = table(&[100, 50, 25]);
        let before = t.clone();
        let mut rng = ScriptedRng::new(&[draw(1)]);

        let res = t.resolve_merge(2, &mut rng).unwrap();
        assert_eq!(res, MergeResolution::Capped { rank: 2 });
        assert_eq!(t, before);
        assert_eq!(rng.remaining(), 1);
    }

    #[test]
    fn test_out_of_table_rank_rejected() {
        let mut t = table(&[100, 50]);
        let before = t.clone();
        let mut rng = ScriptedRng::new(&[draw(1)]);

        assert_eq!(
            t.resolve_merge(5, &mut rng),
            Err(BoardError::InvalidRank { index: 5, len: 2 })
        );
        assert_eq!(t, before);
    }

    #[test]
    fn test_draw_bounds() {
        // Threshold 100 always promotes, even on the highest draw
        let mut t = table(&[100, 100]);
        let mut rng = ScriptedRng::new(&[draw(100)]);
        assert!(t.resolve_merge(0, &mut rng).unwrap().is_promotion());

        // Threshold 0 never promotes, even on the lowest draw
        let mut t = table(&[100, 0]);
        let mut rng = ScriptedRng::new(&[draw(1)]);
        assert!(!t.resolve_merge(0, &mut rng).unwrap().is_promotion());
    }

    #[test]
    #[should_panic(expected = "scripted draws exhausted")]
    fn test_demotion_consumes_second_draw() {
        // A miss above rank 0 rolls again for the fallback rank
        let mut t = table(&[100, 100, 100, 0]);
        let mut rng = ScriptedRng::new(&[draw(50)]);
        let _ = t.resolve_merge(2, &mut rng);
    }

    #[test]
    fn test_rank_table_json() {
        let t = RankTable::standard();
        let json = serde_json::to_string(&t).unwrap();
        let back: RankTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);

        assert!(serde_json::from_str::<RankTable>("[]").is_err());

        let parsed: RankTable =
            serde_json::from_str(r#"[{"value": 3, "percent_appear": 100}]"#).unwrap();
        assert_eq!(parsed.ranks()[0].percent_miss_count, 0);
    }
}
