//! Scoring - per-tile points and star rating

use std::collections::HashMap;

use crate::types::{BlockKind, BlockerKind, BoosterKind, TileKind, DEFAULT_TILE_SCORE};

/// Points per destroyed tile, with per-kind overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreTable {
    pub default_score: u32,
    pub blocks: HashMap<BlockKind, u32>,
    pub boosters: HashMap<BoosterKind, u32>,
    pub blockers: HashMap<BlockerKind, u32>,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            default_score: DEFAULT_TILE_SCORE,
            blocks: HashMap::new(),
            boosters: HashMap::new(),
            blockers: HashMap::new(),
        }
    }
}

impl ScoreTable {
    pub fn tile(&self, tile: TileKind) -> u32 {
        let score = match (tile.block_kind(), tile.booster()) {
            (Some(block), _) => self.blocks.get(&block),
            (None, Some(booster)) => self.boosters.get(&booster),
            (None, None) => None,
        };
        score.copied().unwrap_or(self.default_score)
    }

    pub fn blocker(&self, blocker: BlockerKind) -> u32 {
        self.blockers
            .get(&blocker)
            .copied()
            .unwrap_or(self.default_score)
    }
}

/// Star rating (0-3) for a final score against ascending thresholds
///
/// # Examples
///
/// ```
/// use tile_blast_core::scoring::stars;
///
/// let thresholds = [100, 200, 300];
/// assert_eq!(stars(99, thresholds), 0);
/// assert_eq!(stars(100, thresholds), 1);
/// assert_eq!(stars(299, thresholds), 2);
/// assert_eq!(stars(5000, thresholds), 3);
/// ```
pub fn stars(score: u32, thresholds: [u32; 3]) -> u8 {
    if score >= thresholds[2] {
        3
    } else if score >= thresholds[1] {
        2
    } else if score >= thresholds[0] {
        1
    } else {
        0
    }
}
