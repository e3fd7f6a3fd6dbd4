//! Level model - the immutable description of a level and game-wide rules
//!
//! A [`Level`] is produced by a loader (see the data crate) or built in code
//! with [`Level::from_rows`] and the `with_*` builders. It is never mutated
//! once a session starts.

use tracing::warn;

use crate::board::Board;
use crate::booster::BoosterThresholds;
use crate::goals::Goal;
use crate::rng::SimpleRng;
use crate::scoring::ScoreTable;
use crate::types::{
    BlockKind, BlockerKind, BoosterKind, ColorId, LimitType, TileKind, DEFAULT_EXTRA_MOVES,
    DEFAULT_EXTRA_TIME,
};

/// Initial content of a level cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTile {
    Block(BlockKind),
    /// A color drawn from the level's palette when the board is built
    RandomColor,
    Booster(BoosterKind),
}

impl LevelTile {
    /// Parse a layout character; `?` is a random color, `.` a vacancy
    pub fn from_char(c: char) -> Option<Option<Self>> {
        match c {
            '.' => Some(None),
            '?' => Some(Some(LevelTile::RandomColor)),
            _ => {
                let tile = TileKind::from_char(c)?;
                let level_tile = match (tile.block_kind(), tile.booster()) {
                    (Some(block), _) => LevelTile::Block(block),
                    (None, Some(booster)) => LevelTile::Booster(booster),
                    (None, None) => return None,
                };
                Some(Some(level_tile))
            }
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            LevelTile::RandomColor => '?',
            LevelTile::Block(BlockKind::Color(c)) => TileKind::Color(*c).as_char(),
            LevelTile::Block(BlockKind::Stone) => TileKind::Stone.as_char(),
            LevelTile::Block(BlockKind::Ball) => TileKind::Ball.as_char(),
            LevelTile::Block(BlockKind::Empty) => TileKind::Empty.as_char(),
            LevelTile::Block(BlockKind::Collectable) => TileKind::Collectable.as_char(),
            LevelTile::Booster(b) => TileKind::Booster(*b).as_char(),
        }
    }
}

/// Immutable level description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub id: u32,
    pub width: usize,
    pub height: usize,
    /// Row-major initial layout
    pub tiles: Vec<Option<LevelTile>>,
    pub blockers: Vec<Option<BlockerKind>>,
    pub colors: Vec<ColorId>,
    pub limit_type: LimitType,
    pub limit: u32,
    /// Limit units lost when a tap finds no match
    pub penalty: u32,
    pub goals: Vec<Goal>,
    /// Scores for one, two and three stars
    pub star_scores: [u32; 3],
    /// Percent chance that a refill spawns a collectable
    pub collectable_chance: u32,
    /// Turn remaining moves into boosters once the goals are met
    pub award_boosters: bool,
    pub awarded_booster: BoosterKind,
}

impl Level {
    /// Build a level from layout rows with default settings
    ///
    /// Defaults: id 1, colors 1-3, 20 moves, no penalty, no goals, no
    /// blockers. Returns `None` for ragged rows or unknown characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_blast_core::Level;
    /// use tile_blast_core::types::LimitType;
    ///
    /// let level = Level::from_rows(&["1?2", "SSS"]).unwrap().with_limit(LimitType::Time, 60);
    /// assert_eq!(level.width, 3);
    /// assert_eq!(level.limit, 60);
    /// assert!(Level::from_rows(&["12", "1"]).is_none());
    /// ```
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.as_ref().chars().count();
        if width == 0 {
            return None;
        }

        let mut tiles = Vec::with_capacity(width * height);
        for row in rows {
            let row = row.as_ref();
            if row.chars().count() != width {
                return None;
            }
            for c in row.chars() {
                tiles.push(LevelTile::from_char(c)?);
            }
        }

        Some(Self {
            id: 1,
            width,
            height,
            tiles,
            blockers: vec![None; width * height],
            colors: ColorId::ALL[..3].to_vec(),
            limit_type: LimitType::Moves,
            limit: 20,
            penalty: 0,
            goals: Vec::new(),
            star_scores: [0, 0, 0],
            collectable_chance: 0,
            award_boosters: false,
            awarded_booster: BoosterKind::Dynamite,
        })
    }

    /// Replace the blocker layer; `None` if the rows do not fit the layout
    pub fn with_blocker_rows<S: AsRef<str>>(mut self, rows: &[S]) -> Option<Self> {
        if rows.len() != self.height {
            return None;
        }
        let mut blockers = Vec::with_capacity(self.width * self.height);
        for row in rows {
            let row = row.as_ref();
            if row.chars().count() != self.width {
                return None;
            }
            for c in row.chars() {
                blockers.push(BlockerKind::from_char(c)?);
            }
        }
        self.blockers = blockers;
        Some(self)
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    pub fn with_colors(mut self, colors: &[ColorId]) -> Self {
        self.colors = colors.to_vec();
        self
    }

    pub fn with_limit(mut self, limit_type: LimitType, limit: u32) -> Self {
        self.limit_type = limit_type;
        self.limit = limit;
        self
    }

    pub fn with_penalty(mut self, penalty: u32) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn with_goals(mut self, goals: Vec<Goal>) -> Self {
        self.goals = goals;
        self
    }

    pub fn with_star_scores(mut self, star_scores: [u32; 3]) -> Self {
        self.star_scores = star_scores;
        self
    }

    pub fn with_collectable_chance(mut self, percent: u32) -> Self {
        self.collectable_chance = percent;
        self
    }

    pub fn with_award(mut self, booster: BoosterKind) -> Self {
        self.award_boosters = true;
        self.awarded_booster = booster;
        self
    }

    /// Collectables the goals require over the whole level
    pub fn collectables_needed(&self) -> u32 {
        self.goals.iter().map(Goal::collectables_needed).sum()
    }

    fn count_tiles(&self, kind: BlockKind) -> u32 {
        self.tiles
            .iter()
            .filter(|t| **t == Some(LevelTile::Block(kind)))
            .count() as u32
    }

    /// Indices of goals that can never complete on this level
    ///
    /// Each one is logged; such goals stay incomplete for the whole attempt.
    pub fn unreachable_goals(&self) -> Vec<usize> {
        let has_random = self.tiles.contains(&Some(LevelTile::RandomColor));
        let mut unreachable = Vec::new();

        for (i, goal) in self.goals.iter().enumerate() {
            let reachable = match *goal {
                Goal::CollectBlock { amount: 0, .. } | Goal::CollectBlocker { amount: 0, .. } => {
                    true
                }
                Goal::CollectBlock {
                    kind: BlockKind::Color(c),
                    ..
                } => {
                    self.colors.contains(&c)
                        || (self.count_tiles(BlockKind::Color(c)) > 0 && !has_random)
                }
                Goal::CollectBlock {
                    kind: BlockKind::Empty,
                    ..
                } => false,
                Goal::CollectBlock {
                    kind: BlockKind::Collectable,
                    amount,
                } => {
                    self.collectable_chance > 0
                        || self.count_tiles(BlockKind::Collectable) >= amount
                }
                Goal::CollectBlock { kind, amount } => self.count_tiles(kind) >= amount,
                Goal::CollectBlocker { kind, amount } => {
                    self.blockers.iter().filter(|b| **b == Some(kind)).count() as u32 >= amount
                }
                Goal::ReachScore { .. } => true,
            };

            if !reachable {
                warn!(level = self.id, goal = ?goal, "goal can never be completed on this level");
                unreachable.push(i);
            }
        }
        unreachable
    }

    /// Build the initial board, drawing random colors from `rng`
    pub fn build_board(&self, rng: &mut SimpleRng) -> Board {
        let mut board = Board::new(self.width, self.height);
        for (idx, tile) in self.tiles.iter().enumerate() {
            let cell = match tile {
                None => None,
                Some(LevelTile::RandomColor) => rng.pick_color(&self.colors).map(TileKind::Color),
                Some(LevelTile::Block(kind)) => Some(tile_for_block(*kind)),
                Some(LevelTile::Booster(b)) => Some(TileKind::Booster(*b)),
            };
            board.set_cell(idx, cell);
            board.set_blocker(idx, self.blockers.get(idx).copied().flatten());
        }
        board
    }
}

fn tile_for_block(kind: BlockKind) -> TileKind {
    match kind {
        BlockKind::Color(c) => TileKind::Color(c),
        BlockKind::Stone => TileKind::Stone,
        BlockKind::Ball => TileKind::Ball,
        BlockKind::Empty => TileKind::Empty,
        BlockKind::Collectable => TileKind::Collectable,
    }
}

/// Game-wide rules shared by every level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub booster_thresholds: BoosterThresholds,
    pub scores: ScoreTable,
    /// Moves granted by continuing a lost moves-limited level
    pub extra_moves: u32,
    /// Seconds granted by continuing a lost time-limited level
    pub extra_time: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            booster_thresholds: BoosterThresholds::default(),
            scores: ScoreTable::default(),
            extra_moves: DEFAULT_EXTRA_MOVES,
            extra_time: DEFAULT_EXTRA_TIME,
        }
    }
}
