//! Gravity - column compaction and refill after tiles are removed
//!
//! Each column settles independently:
//!
//! 1. Scanning bottom-up, every tile that can fall (not Empty, not Stone)
//!    drops to the lowest vacancy below it. A Stone is a floor: the search
//!    stops at the first Stone. Empty cells are holes in the layout; they
//!    never move and falling tiles pass through them.
//! 2. Vacancies above the first Stone (counted from the top) are refilled
//!    top-down from the spawn source. Vacancies below a Stone stay vacant.
//!
//! The report lists every move and spawn so a presentation layer can animate
//! the settle without diffing boards.

use tracing::debug;

use crate::board::Board;
use crate::rng::SimpleRng;
use crate::types::{ColorId, TileKind};

/// A tile moving down within its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

/// A tile entering the board from above
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub index: usize,
    pub tile: TileKind,
    /// Row the tile enters from; negative, above the board
    pub from_row: i32,
}

/// Moves and spawns of one column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSettle {
    pub x: usize,
    pub moves: Vec<Move>,
    pub spawned: Vec<Spawn>,
}

/// Result of a settle pass, one entry per column that changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettleReport {
    pub columns: Vec<ColumnSettle>,
}

impl SettleReport {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn moves(&self) -> impl Iterator<Item = &Move> {
        self.columns.iter().flat_map(|c| c.moves.iter())
    }

    pub fn spawned(&self) -> impl Iterator<Item = &Spawn> {
        self.columns.iter().flat_map(|c| c.spawned.iter())
    }

    /// Append another pass (e.g. after collectables were removed)
    pub fn merge(&mut self, other: SettleReport) {
        self.columns.extend(other.columns);
    }
}

/// Settle every column, pulling new tiles from `spawn`
///
/// A vacancy is left unfilled when `spawn` returns `None`.
pub fn settle<F>(board: &mut Board, mut spawn: F) -> SettleReport
where
    F: FnMut() -> Option<TileKind>,
{
    let mut report = SettleReport::default();
    for x in 0..board.width() {
        let mut column = ColumnSettle {
            x,
            ..ColumnSettle::default()
        };
        compact_column(board, x, &mut column.moves);
        refill_column(board, x, &mut spawn, &mut column.spawned);
        if !column.moves.is_empty() || !column.spawned.is_empty() {
            report.columns.push(column);
        }
    }

    debug!(
        moves = report.moves().count(),
        spawned = report.spawned().count(),
        "board settled"
    );
    report
}

fn compact_column(board: &mut Board, x: usize, moves: &mut Vec<Move>) {
    let height = board.height() as i32;
    let x = x as i32;

    for y in (0..height).rev() {
        let Some(from) = board.index(x, y) else {
            continue;
        };
        if !board.tile(from).is_some_and(|t| t.can_fall()) {
            continue;
        }

        // Lowest vacancy below, stopping at the first Stone.
        let mut bottom = None;
        for k in y + 1..height {
            let Some(idx) = board.index(x, k) else {
                break;
            };
            match board.tile(idx) {
                None => bottom = Some(idx),
                Some(TileKind::Stone) => break,
                Some(_) => {}
            }
        }

        if let Some(to) = bottom {
            let tile = board.take(from);
            board.set_cell(to, tile);
            moves.push(Move { from, to });
        }
    }
}

fn refill_column<F>(board: &mut Board, x: usize, spawn: &mut F, spawned: &mut Vec<Spawn>)
where
    F: FnMut() -> Option<TileKind>,
{
    let height = board.height() as i32;
    let x = x as i32;

    let mut pending = 0;
    for y in 0..height {
        match board.get(x, y) {
            Some(None) => pending += 1,
            Some(Some(TileKind::Stone)) => break,
            _ => {}
        }
    }

    for y in 0..height {
        if pending == 0 {
            break;
        }
        let Some(idx) = board.index(x, y) else {
            break;
        };
        match board.tile(idx) {
            Some(TileKind::Stone) => break,
            Some(_) => continue,
            None => {}
        }
        let from_row = -pending;
        pending -= 1;
        if let Some(tile) = spawn() {
            board.set_cell(idx, Some(tile));
            spawned.push(Spawn {
                index: idx,
                tile,
                from_row,
            });
        }
    }
}

/// Source of refill tiles for a level
///
/// Spawns a Collectable with `collectable_chance`% probability while fewer
/// collectables exist than the level's goals require, otherwise a random
/// available color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSpawner {
    colors: Vec<ColorId>,
    collectable_chance: u32,
    collectables_needed: u32,
    collectables_generated: u32,
}

impl TileSpawner {
    pub fn new(colors: Vec<ColorId>, collectable_chance: u32, collectables_needed: u32) -> Self {
        Self {
            colors,
            collectable_chance,
            collectables_needed,
            collectables_generated: 0,
        }
    }

    /// Count collectables that are already on the board at level start
    pub fn with_generated(mut self, generated: u32) -> Self {
        self.collectables_generated = generated;
        self
    }

    pub fn colors(&self) -> &[ColorId] {
        &self.colors
    }

    pub fn collectables_generated(&self) -> u32 {
        self.collectables_generated
    }

    /// Draw the next refill tile; `None` if the level has no colors
    pub fn spawn(&mut self, rng: &mut SimpleRng) -> Option<TileKind> {
        if self.collectables_generated < self.collectables_needed
            && rng.chance(self.collectable_chance)
        {
            self.collectables_generated += 1;
            return Some(TileKind::Collectable);
        }
        rng.pick_color(&self.colors).map(TileKind::Color)
    }
}

/// A collectable removed from the bottom of its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collected {
    pub index: usize,
}

/// Remove collectables that reached the bottom of their column
///
/// The bottom of a column is its lowest occupied cell that is not Empty. The
/// caller settles again afterwards; collectables above may now be grounded.
pub fn collect_grounded(board: &mut Board) -> Vec<Collected> {
    let mut collected = Vec::new();
    let height = board.height() as i32;

    for x in 0..board.width() as i32 {
        let bottom = (0..height)
            .rev()
            .filter_map(|y| board.index(x, y))
            .find(|&idx| board.tile(idx).is_some_and(|t| !t.is_empty()));

        if let Some(idx) = bottom {
            if board.tile(idx) == Some(TileKind::Collectable) {
                board.take(idx);
                collected.push(Collected { index: idx });
            }
        }
    }

    if !collected.is_empty() {
        debug!(count = collected.len(), "collectables grounded");
    }
    collected
}
