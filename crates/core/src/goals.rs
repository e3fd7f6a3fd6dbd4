//! Goals - cumulative counters of a level attempt and the predicates over them

use std::collections::HashMap;

use crate::types::{BlockKind, BlockerKind};

/// Counters accumulated over one level attempt
///
/// Reset when the level (re)starts. Goals only ever read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    pub score: u32,
    pub collected_blocks: HashMap<BlockKind, u32>,
    pub collected_blockers: HashMap<BlockerKind, u32>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.collected_blocks.clear();
        self.collected_blockers.clear();
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn collect_block(&mut self, kind: BlockKind) {
        *self.collected_blocks.entry(kind).or_insert(0) += 1;
    }

    pub fn collect_blocker(&mut self, kind: BlockerKind) {
        *self.collected_blockers.entry(kind).or_insert(0) += 1;
    }

    pub fn blocks(&self, kind: BlockKind) -> u32 {
        self.collected_blocks.get(&kind).copied().unwrap_or(0)
    }

    pub fn blockers(&self, kind: BlockerKind) -> u32 {
        self.collected_blockers.get(&kind).copied().unwrap_or(0)
    }
}

/// A level objective
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    CollectBlock { kind: BlockKind, amount: u32 },
    CollectBlocker { kind: BlockerKind, amount: u32 },
    ReachScore { score: u32 },
}

impl Goal {
    /// Whether the goal is met by `state`
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_blast_core::{GameState, Goal};
    /// use tile_blast_core::types::{BlockKind, ColorId};
    ///
    /// let mut state = GameState::new();
    /// let goal = Goal::CollectBlock { kind: BlockKind::Color(ColorId::Color1), amount: 2 };
    /// state.collect_block(BlockKind::Color(ColorId::Color1));
    /// assert!(!goal.is_complete(&state));
    /// state.collect_block(BlockKind::Color(ColorId::Color1));
    /// assert!(goal.is_complete(&state));
    /// ```
    pub fn is_complete(&self, state: &GameState) -> bool {
        let (current, target) = self.progress(state);
        current >= target
    }

    /// Current and target values
    pub fn progress(&self, state: &GameState) -> (u32, u32) {
        match *self {
            Goal::CollectBlock { kind, amount } => (state.blocks(kind), amount),
            Goal::CollectBlocker { kind, amount } => (state.blockers(kind), amount),
            Goal::ReachScore { score } => (state.score, score),
        }
    }

    /// Collectables this goal requires to be spawned
    pub fn collectables_needed(&self) -> u32 {
        match *self {
            Goal::CollectBlock {
                kind: BlockKind::Collectable,
                amount,
            } => amount,
            _ => 0,
        }
    }
}

/// Whether every goal is complete (vacuously true for no goals)
pub fn all_complete(goals: &[Goal], state: &GameState) -> bool {
    goals.iter().all(|g| g.is_complete(state))
}
