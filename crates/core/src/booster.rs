//! Booster resolution - computes the tiles a triggered booster destroys
//!
//! Resolution is a pure query over the board: nothing is removed here. The
//! caller receives the destroyed set plus one [`BoosterEffect`] cue per
//! booster that fired, and applies the removal itself.
//!
//! # Effects
//!
//! - **Bomb**: its full row (horizontal) or column (vertical). A bomb
//!   4-neighbor with the same orientation widens the clear to the adjacent
//!   lines on both sides ("matching combo"); one with the other orientation
//!   adds the perpendicular line instead ("non-matching combo"). Neighbors are
//!   counted, and any non-matching neighbor wins over matching ones.
//! - **Dynamite**: the 3x3 area around it, or the fixed 5x5 area when any
//!   4-neighbor is also a dynamite.
//! - **Color bomb**: every block of one random available color plus itself.
//!   Next to another color bomb it clears every color block on the board, plus
//!   itself and each adjacent color bomb.
//!
//! Empty cells, collectables and vacancies are never selected.
//!
//! # Chains
//!
//! Boosters caught in a destroyed area fire too ([`ChainMode::Full`]). The
//! resolver keeps an explicit worklist and a used-set, so each booster fires
//! at most once and the final set never lists an index twice.

use std::collections::VecDeque;

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use crate::board::Board;
use crate::rng::SimpleRng;
use crate::types::{
    BoosterKind, ChainMode, ColorId, Orientation, TileKind, DEFAULT_BOOSTER_MATCHES,
};

/// Combo detected around a bomb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BombCombo {
    None,
    /// Adjacent bomb with the same orientation: three lines are cleared
    Matching,
    /// Adjacent bomb with the other orientation: a cross is cleared
    NonMatching,
}

/// What a color bomb targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Color(ColorId),
    AllColors,
    /// The level has no available colors; only the bomb itself is cleared
    Nothing,
}

/// Booster-specific detail for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectDetail {
    Bomb {
        orientation: Orientation,
        combo: BombCombo,
    },
    Dynamite {
        widened: bool,
    },
    ColorBomb {
        target: ColorTarget,
    },
}

/// One booster that fired during a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoosterEffect {
    pub index: usize,
    pub kind: BoosterKind,
    pub detail: EffectDetail,
}

/// Result of resolving a booster and its chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Destroyed indices, each listed once
    pub destroyed: Vec<usize>,
    /// Boosters that fired, in firing order (the triggered booster first)
    pub effects: Vec<BoosterEffect>,
}

impl Resolution {
    pub fn contains(&self, index: usize) -> bool {
        self.destroyed.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.destroyed.is_empty()
    }
}

/// Tiles selected by a single booster, deduplicated in insertion order
struct Area<'a> {
    board: &'a Board,
    picked: Vec<usize>,
    mask: Vec<bool>,
}

impl<'a> Area<'a> {
    fn new(board: &'a Board) -> Self {
        Self {
            board,
            picked: Vec::new(),
            mask: vec![false; board.len()],
        }
    }

    /// Select (x, y) if in bounds, occupied, destroyable and not yet picked
    fn add(&mut self, x: i32, y: i32) {
        let Some(idx) = self.board.index(x, y) else {
            return;
        };
        let Some(tile) = self.board.tile(idx) else {
            return;
        };
        if !tile.is_booster_destroyable() || self.mask[idx] {
            return;
        }
        self.mask[idx] = true;
        self.picked.push(idx);
    }

    fn add_row(&mut self, y: i32) {
        for x in 0..self.board.width() as i32 {
            self.add(x, y);
        }
    }

    fn add_column(&mut self, x: i32) {
        for y in 0..self.board.height() as i32 {
            self.add(x, y);
        }
    }

    fn add_square(&mut self, cx: i32, cy: i32, radius: i32) {
        for y in cy - radius..=cy + radius {
            for x in cx - radius..=cx + radius {
                self.add(x, y);
            }
        }
    }
}

/// Classify the bomb combo at `index` by counting adjacent bombs
pub fn bomb_combo(board: &Board, index: usize, orientation: Orientation) -> BombCombo {
    let mut matching = 0;
    let mut non_matching = 0;
    for n in board.neighbors(index) {
        if let Some(BoosterKind::Bomb(other)) = board.tile(n).and_then(|t| t.booster()) {
            if other == orientation {
                matching += 1;
            } else {
                non_matching += 1;
            }
        }
    }

    if non_matching > 0 {
        BombCombo::NonMatching
    } else if matching > 0 {
        BombCombo::Matching
    } else {
        BombCombo::None
    }
}

fn resolve_bomb(
    area: &mut Area<'_>,
    board: &Board,
    index: usize,
    orientation: Orientation,
) -> EffectDetail {
    let Some((x, y)) = board.coords(index) else {
        return EffectDetail::Bomb {
            orientation,
            combo: BombCombo::None,
        };
    };
    let combo = bomb_combo(board, index, orientation);

    match orientation {
        Orientation::Horizontal => {
            area.add_row(y);
            match combo {
                BombCombo::Matching => {
                    area.add_row(y - 1);
                    area.add_row(y + 1);
                }
                BombCombo::NonMatching => area.add_column(x),
                BombCombo::None => {}
            }
        }
        Orientation::Vertical => {
            area.add_column(x);
            match combo {
                BombCombo::Matching => {
                    area.add_column(x - 1);
                    area.add_column(x + 1);
                }
                BombCombo::NonMatching => area.add_row(y),
                BombCombo::None => {}
            }
        }
    }

    EffectDetail::Bomb { orientation, combo }
}

fn resolve_dynamite(area: &mut Area<'_>, board: &Board, index: usize) -> EffectDetail {
    let Some((x, y)) = board.coords(index) else {
        return EffectDetail::Dynamite { widened: false };
    };
    area.add_square(x, y, 1);

    let widened = board.any_neighbor(index, |t| t == TileKind::Booster(BoosterKind::Dynamite));
    if widened {
        area.add_square(x, y, 2);
    }

    EffectDetail::Dynamite { widened }
}

fn resolve_color_bomb(
    area: &mut Area<'_>,
    board: &Board,
    index: usize,
    colors: &[ColorId],
    rng: &mut SimpleRng,
) -> EffectDetail {
    let Some((x, y)) = board.coords(index) else {
        return EffectDetail::ColorBomb {
            target: ColorTarget::Nothing,
        };
    };
    let is_color_bomb = |t: TileKind| t == TileKind::Booster(BoosterKind::ColorBomb);

    let target = if board.any_neighbor(index, is_color_bomb) {
        ColorTarget::AllColors
    } else {
        match rng.pick_color(colors) {
            Some(color) => ColorTarget::Color(color),
            None => {
                warn!(index, "color bomb fired on a level without available colors");
                ColorTarget::Nothing
            }
        }
    };

    let width = board.width() as i32;
    for idx in 0..board.len() {
        let hit = match (target, board.tile(idx)) {
            (ColorTarget::AllColors, Some(t)) => t.is_color_block(),
            (ColorTarget::Color(c), Some(t)) => t.color() == Some(c),
            _ => false,
        };
        if hit {
            area.add(idx as i32 % width, idx as i32 / width);
        }
    }
    area.add(x, y);

    if target == ColorTarget::AllColors {
        for n in board.neighbors(index) {
            if board.tile(n).is_some_and(is_color_bomb) {
                if let Some((nx, ny)) = board.coords(n) {
                    area.add(nx, ny);
                }
            }
        }
    }

    EffectDetail::ColorBomb { target }
}

/// Resolve only the booster at `index`, without following chains
///
/// Returns `None` if `index` does not hold a booster.
pub fn resolve_single(
    board: &Board,
    index: usize,
    colors: &[ColorId],
    rng: &mut SimpleRng,
) -> Option<(Vec<usize>, BoosterEffect)> {
    let kind = board.tile(index)?.booster()?;
    let mut area = Area::new(board);

    let detail = match kind {
        BoosterKind::Bomb(orientation) => resolve_bomb(&mut area, board, index, orientation),
        BoosterKind::Dynamite => resolve_dynamite(&mut area, board, index),
        BoosterKind::ColorBomb => resolve_color_bomb(&mut area, board, index, colors, rng),
    };

    Some((
        area.picked,
        BoosterEffect {
            index,
            kind,
            detail,
        },
    ))
}

/// Resolve the booster at `index` and, in [`ChainMode::Full`], every booster
/// caught in the destroyed area
///
/// All boosters read the same (unmodified) board. Returns an empty
/// resolution if `index` does not hold a booster.
pub fn resolve(
    board: &Board,
    index: usize,
    mode: ChainMode,
    colors: &[ColorId],
    rng: &mut SimpleRng,
) -> Resolution {
    let mut resolution = Resolution::default();
    if board.tile(index).and_then(|t| t.booster()).is_none() {
        return resolution;
    }

    let mut selected = vec![false; board.len()];
    let mut used = vec![false; board.len()];
    let mut queue = VecDeque::new();
    used[index] = true;
    queue.push_back(index);

    while let Some(current) = queue.pop_front() {
        let Some((area, effect)) = resolve_single(board, current, colors, rng) else {
            continue;
        };
        resolution.effects.push(effect);

        for idx in area {
            if mode == ChainMode::Full
                && !used[idx]
                && board.tile(idx).is_some_and(|t| t.is_booster())
            {
                used[idx] = true;
                queue.push_back(idx);
            }
            if !selected[idx] {
                selected[idx] = true;
                resolution.destroyed.push(idx);
            }
        }
    }

    debug!(
        index,
        ?mode,
        fired = resolution.effects.len(),
        destroyed = resolution.destroyed.len(),
        "booster resolved"
    );
    resolution
}

/// Minimum match sizes that spawn each booster kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoosterThresholds {
    needed: [u32; 4],
}

impl BoosterThresholds {
    pub fn new(needed: [u32; 4]) -> Self {
        Self { needed }
    }

    pub fn needed(&self, kind: BoosterKind) -> u32 {
        self.needed[kind.index()]
    }

    pub fn set(&mut self, kind: BoosterKind, needed: u32) {
        self.needed[kind.index()] = needed;
    }
}

impl Default for BoosterThresholds {
    fn default() -> Self {
        Self::new(DEFAULT_BOOSTER_MATCHES)
    }
}

/// Pick the booster earned by a match of `matched` tiles
///
/// Among the kinds whose threshold is met, only those with the highest
/// threshold remain; ties are broken uniformly at random.
pub fn booster_for_match(
    matched: usize,
    thresholds: &BoosterThresholds,
    rng: &mut SimpleRng,
) -> Option<BoosterKind> {
    let eligible: ArrayVec<BoosterKind, 4> = BoosterKind::ALL
        .into_iter()
        .filter(|k| thresholds.needed(*k) as usize <= matched)
        .collect();
    let best = eligible.iter().map(|k| thresholds.needed(*k)).max()?;
    let top: ArrayVec<BoosterKind, 4> = eligible
        .into_iter()
        .filter(|k| thresholds.needed(*k) == best)
        .collect();
    rng.pick(&top)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PALETTE: [ColorId; 3] = [ColorId::Color1, ColorId::Color2, ColorId::Color3];

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    fn resolve_full(board: &Board, index: usize) -> Resolution {
        resolve(board, index, ChainMode::Full, &PALETTE, &mut SimpleRng::new(1))
    }

    #[test]
    fn test_horizontal_bomb_clears_row() {
        let board = Board::from_rows(&["111", "1H1", "111"]).unwrap();
        let res = resolve_full(&board, 4);
        assert_eq!(sorted(res.destroyed), vec![3, 4, 5]);
        assert_eq!(
            res.effects[0].detail,
            EffectDetail::Bomb {
                orientation: Orientation::Horizontal,
                combo: BombCombo::None
            }
        );
    }

    #[test]
    fn test_vertical_bomb_skips_empty_and_collectable() {
        let board = Board::from_rows(&["1E1", "1V1", "1C1", "1S1"]).unwrap();
        let res = resolve_full(&board, 4);
        assert_eq!(sorted(res.destroyed), vec![4, 10]);
    }

    #[test]
    fn test_matching_combo_widens() {
        // Two horizontal bombs side by side: rows 1, 2 and 3 are cleared.
        let board = Board::from_rows(&["1111", "2222", "3HH3", "1111", "2222"]).unwrap();
        let (area, effect) = resolve_single(&board, 9, &PALETTE, &mut SimpleRng::new(1)).unwrap();
        assert_eq!(sorted(area), (4..16).collect::<Vec<_>>());
        assert_eq!(
            effect.detail,
            EffectDetail::Bomb {
                orientation: Orientation::Horizontal,
                combo: BombCombo::Matching
            }
        );
    }

    #[test]
    fn test_non_matching_wins_over_matching() {
        // Left neighbor matches, down neighbor does not.
        let board = Board::from_rows(&["111", "HH1", "1V1"]).unwrap();
        assert_eq!(bomb_combo(&board, 4, Orientation::Horizontal), BombCombo::NonMatching);
        let (area, _) = resolve_single(&board, 4, &PALETTE, &mut SimpleRng::new(1)).unwrap();
        // Row 1 plus column 1.
        assert_eq!(sorted(area), vec![1, 3, 4, 5, 7]);
    }

    #[test]
    fn test_dynamite_area_and_combo() {
        let rows = ["11111", "11111", "11D11", "11111", "11111"];
        let board = Board::from_rows(&rows).unwrap();
        let (area, effect) = resolve_single(&board, 12, &PALETTE, &mut SimpleRng::new(1)).unwrap();
        assert_eq!(sorted(area), vec![6, 7, 8, 11, 12, 13, 16, 17, 18]);
        assert_eq!(effect.detail, EffectDetail::Dynamite { widened: false });

        let rows = ["11111", "11111", "11DD1", "11111", "11111"];
        let board = Board::from_rows(&rows).unwrap();
        let (area, effect) = resolve_single(&board, 12, &PALETTE, &mut SimpleRng::new(1)).unwrap();
        assert_eq!(sorted(area), (0..25).collect::<Vec<_>>());
        assert_eq!(effect.detail, EffectDetail::Dynamite { widened: true });
    }

    #[test]
    fn test_dynamite_at_corner_clips() {
        let board = Board::from_rows(&["D1", "11"]).unwrap();
        let (area, _) = resolve_single(&board, 0, &PALETTE, &mut SimpleRng::new(1)).unwrap();
        assert_eq!(sorted(area), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_color_bomb_single_color() {
        let board = Board::from_rows(&["123", "2X1", "312"]).unwrap();
        let res = resolve_full(&board, 4);
        let EffectDetail::ColorBomb {
            target: ColorTarget::Color(color),
        } = res.effects[0].detail
        else {
            panic!("expected a single color target");
        };
        for &idx in &res.destroyed {
            if idx != 4 {
                assert_eq!(board.tile(idx).unwrap().color(), Some(color));
            }
        }
        assert!(res.contains(4));
        let expected = board.count(|t| t.color() == Some(color)) + 1;
        assert_eq!(res.destroyed.len(), expected);
    }

    #[test]
    fn test_color_bomb_combo_clears_all_colors() {
        let board = Board::from_rows(&["12S", "XX3", "4C5"]).unwrap();
        let (area, effect) = resolve_single(&board, 3, &PALETTE, &mut SimpleRng::new(1)).unwrap();
        assert_eq!(
            effect.detail,
            EffectDetail::ColorBomb {
                target: ColorTarget::AllColors
            }
        );
        // Every color block, the bomb and its color bomb neighbor; no stone,
        // no collectable.
        assert_eq!(sorted(area), vec![0, 1, 3, 4, 5, 6, 8]);
    }

    #[test]
    fn test_color_bomb_without_palette() {
        let board = Board::from_rows(&["1X1"]).unwrap();
        let res = resolve(&board, 1, ChainMode::Full, &[], &mut SimpleRng::new(1));
        assert_eq!(res.destroyed, vec![1]);
    }

    #[test]
    fn test_chain_reaction_and_no_double_count() {
        // The horizontal bomb catches a dynamite, whose area overlaps the row.
        let rows = ["11111", "11111", "H1D11", "11111", "11111"];
        let board = Board::from_rows(&rows).unwrap();
        let res = resolve_full(&board, 10);
        assert_eq!(res.effects.len(), 2);
        assert_eq!(res.effects[1].index, 12);
        let mut unique = res.destroyed.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), res.destroyed.len());
        assert_eq!(sorted(res.destroyed), vec![6, 7, 8, 10, 11, 12, 13, 14, 16, 17, 18]);
    }

    #[test]
    fn test_single_step_does_not_chain() {
        let rows = ["11111", "11111", "H1D11", "11111", "11111"];
        let board = Board::from_rows(&rows).unwrap();
        let res = resolve(&board, 10, ChainMode::SingleStep, &PALETTE, &mut SimpleRng::new(1));
        assert_eq!(res.effects.len(), 1);
        assert_eq!(sorted(res.destroyed), vec![10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_mutual_chain_terminates() {
        // Two bombs in each other's lines fire once each.
        let board = Board::from_rows(&["V1", "11", "H1"]).unwrap();
        let res = resolve_full(&board, 0);
        assert_eq!(res.effects.len(), 2);
        assert_eq!(sorted(res.destroyed), vec![0, 2, 4, 5]);
    }

    #[test]
    fn test_resolve_non_booster_is_empty() {
        let board = Board::from_rows(&["11"]).unwrap();
        assert!(resolve_full(&board, 0).is_empty());
        assert!(resolve_full(&board, 9).is_empty());
    }

    #[test]
    fn test_booster_for_match_thresholds() {
        let thresholds = BoosterThresholds::default();
        let mut rng = SimpleRng::new(5);

        assert_eq!(booster_for_match(4, &thresholds, &mut rng), None);
        for _ in 0..20 {
            let kind = booster_for_match(5, &thresholds, &mut rng).unwrap();
            assert!(matches!(kind, BoosterKind::Bomb(_)));
        }
        assert_eq!(booster_for_match(6, &thresholds, &mut rng), Some(BoosterKind::Dynamite));
        assert_eq!(booster_for_match(7, &thresholds, &mut rng), Some(BoosterKind::ColorBomb));
        assert_eq!(booster_for_match(30, &thresholds, &mut rng), Some(BoosterKind::ColorBomb));
    }
}
