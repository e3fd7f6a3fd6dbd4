//! Match finding - flood fill of same-colored neighbors
//!
//! Only color blocks take part in matching. Stones, balls, empties,
//! collectables and boosters never match, even with their own kind.

use crate::board::Board;

/// Find the connected group of same-colored blocks containing `seed`
///
/// Returns the group (seed first, then in breadth-first discovery order).
/// Returns an empty vector when `seed` is invalid, is not a color block, or
/// has no same-colored 4-neighbor: a lone block is "no match", never a
/// one-tile match.
pub fn find_match(board: &Board, seed: usize) -> Vec<usize> {
    let Some(color) = board.tile(seed).and_then(|t| t.color()) else {
        return Vec::new();
    };
    let same_color = |idx: usize| board.tile(idx).and_then(|t| t.color()) == Some(color);

    if !board.neighbors(seed).iter().any(|&n| same_color(n)) {
        return Vec::new();
    }

    let mut visited = vec![false; board.len()];
    let mut group = vec![seed];
    visited[seed] = true;

    // The group vector doubles as the BFS queue.
    let mut head = 0;
    while head < group.len() {
        let current = group[head];
        head += 1;
        for n in board.neighbors(current) {
            if !visited[n] && same_color(n) {
                visited[n] = true;
                group.push(n);
            }
        }
    }

    group
}

/// Find any playable match on the board, scanning seeds in index order
///
/// A match only counts if at least one of its tiles is not covered by a
/// blocker (a fully iced group cannot be tapped). Returns `None` when the
/// board is unresolvable.
pub fn find_any_match(board: &Board) -> Option<Vec<usize>> {
    let mut seen = vec![false; board.len()];
    for seed in 0..board.len() {
        if seen[seed] {
            continue;
        }
        let group = find_match(board, seed);
        if group.is_empty() {
            continue;
        }
        for &idx in &group {
            seen[idx] = true;
        }
        if group.iter().any(|&idx| board.blocker(idx).is_none()) {
            return Some(group);
        }
    }
    None
}

/// Whether the board has at least one playable match
pub fn has_any_match(board: &Board) -> bool {
    find_any_match(board).is_some()
}
