//! Board module - manages the tile grid and its blocker overlay
//!
//! The board is a `width x height` grid stored as a flat row-major vector
//! (`index = x + y * width`). A parallel vector holds the blocker overlay.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom,
//! so "falling" means increasing y.
//!
//! Every query accepts out-of-range coordinates and answers "not valid"
//! instead of panicking; neighbor scans probe past the edges routinely.

use std::fmt;

use arrayvec::ArrayVec;

use crate::types::{cell_from_char, cell_to_char, BlockerKind, BoosterKind, Cell, TileKind};

/// 4-neighborhood offsets in scan order: up, down, left, right
pub const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// The game board - flat storage of tiles plus the blocker layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
    blockers: Vec<Option<BlockerKind>>,
}

impl Board {
    /// Create a new board with every cell vacant
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
            blockers: vec![None; width * height],
        }
    }

    /// Build a board from layout rows, one character per cell
    ///
    /// Returns `None` for ragged rows, an empty layout, or unknown characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_blast_core::Board;
    ///
    /// let board = Board::from_rows(&["11S", "2.3"]).unwrap();
    /// assert_eq!(board.width(), 3);
    /// assert_eq!(board.height(), 2);
    /// assert!(board.tile(4).is_none());
    /// assert!(Board::from_rows(&["11", "2"]).is_none());
    /// ```
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.as_ref().chars().count();
        if width == 0 {
            return None;
        }

        let mut board = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return None;
            }
            for (x, c) in row.chars().enumerate() {
                board.cells[y * width + x] = cell_from_char(c)?;
            }
        }
        Some(board)
    }

    /// Apply a blocker layer given as rows (`I` for ice, `.` for none)
    ///
    /// Returns false (leaving the board untouched) if the rows do not match
    /// the board dimensions or contain unknown characters.
    pub fn apply_blocker_rows<S: AsRef<str>>(&mut self, rows: &[S]) -> bool {
        if rows.len() != self.height {
            return false;
        }
        let mut layer = vec![None; self.len()];
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != self.width {
                return false;
            }
            for (x, c) in row.chars().enumerate() {
                match BlockerKind::from_char(c) {
                    Some(b) => layer[y * self.width + x] = b,
                    None => return false,
                }
            }
        }
        self.blockers = layer;
        true
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Coordinates of a flat index
    #[inline]
    pub fn coords(&self, index: usize) -> Option<(i32, i32)> {
        if index >= self.len() {
            return None;
        }
        Some(((index % self.width) as i32, (index / self.width) as i32))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Cell at a flat index, None if out of bounds
    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Tile at a flat index; None if out of bounds or vacant
    pub fn tile(&self, index: usize) -> Option<TileKind> {
        self.cells.get(index).copied().flatten()
    }

    /// Tile at (x, y); None if out of bounds or vacant
    pub fn tile_at(&self, x: i32, y: i32) -> Option<TileKind> {
        self.get(x, y).flatten()
    }

    pub fn set_cell(&mut self, index: usize, cell: Cell) -> bool {
        match self.cells.get_mut(index) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Remove and return the tile at `index`, leaving the cell vacant
    pub fn take(&mut self, index: usize) -> Option<TileKind> {
        self.cells.get_mut(index).and_then(Option::take)
    }

    pub fn blocker(&self, index: usize) -> Option<BlockerKind> {
        self.blockers.get(index).copied().flatten()
    }

    pub fn set_blocker(&mut self, index: usize, blocker: Option<BlockerKind>) -> bool {
        match self.blockers.get_mut(index) {
            Some(slot) => {
                *slot = blocker;
                true
            }
            None => false,
        }
    }

    /// Remove and return the blocker at `index`
    pub fn take_blocker(&mut self, index: usize) -> Option<BlockerKind> {
        self.blockers.get_mut(index).and_then(Option::take)
    }

    /// In-bounds 4-neighbors of `index`, in up/down/left/right order
    pub fn neighbors(&self, index: usize) -> ArrayVec<usize, 4> {
        let mut out = ArrayVec::new();
        let Some((x, y)) = self.coords(index) else {
            return out;
        };
        for (dx, dy) in NEIGHBOR_OFFSETS {
            if let Some(n) = self.index(x + dx, y + dy) {
                out.push(n);
            }
        }
        out
    }

    /// Whether any 4-neighbor of `index` holds a tile satisfying `pred`
    pub fn any_neighbor(&self, index: usize, pred: impl Fn(TileKind) -> bool) -> bool {
        self.neighbors(index)
            .iter()
            .any(|&n| self.tile(n).is_some_and(&pred))
    }

    /// Boosters on the board in index order
    pub fn boosters(&self) -> impl Iterator<Item = (usize, BoosterKind)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.and_then(|t| t.booster()).map(|b| (idx, b)))
    }

    /// First booster in index order
    pub fn first_booster(&self) -> Option<usize> {
        self.boosters().next().map(|(idx, _)| idx)
    }

    /// Count tiles satisfying `pred`
    pub fn count(&self, pred: impl Fn(TileKind) -> bool) -> usize {
        self.cells.iter().filter(|c| c.is_some_and(&pred)).count()
    }

    /// Number of vacant cells
    pub fn vacancies(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Get a reference to the internal cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn blockers(&self) -> &[Option<BlockerKind>] {
        &self.blockers
    }

    /// Tile layout as rows of layout characters
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|c| cell_to_char(*c)).collect())
            .collect()
    }

    /// Blocker layer as rows (`I` / `.`)
    pub fn blocker_rows(&self) -> Vec<String> {
        self.blockers
            .chunks(self.width.max(1))
            .map(|row| {
                row.iter()
                    .map(|b| b.map(|b| b.as_char()).unwrap_or('.'))
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for (x, cell) in row.iter().enumerate() {
                let idx = y * self.width + x;
                if self.blockers[idx].is_some() {
                    write!(f, "[{}]", cell_to_char(*cell))?;
                } else {
                    write!(f, " {} ", cell_to_char(*cell))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorId;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(5, 4);
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(4, 0), Some(4));
        assert_eq!(board.index(0, 1), Some(5));
        assert_eq!(board.index(4, 3), Some(19));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(5, 0), None);
        assert_eq!(board.index(0, 4), None);
        assert_eq!(board.coords(7), Some((2, 1)));
        assert_eq!(board.coords(20), None);
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::new(4, 4);
        let red = TileKind::Color(ColorId::Color1);

        assert!(board.set(2, 3, Some(red)));
        assert_eq!(board.get(2, 3), Some(Some(red)));
        assert_eq!(board.cells[3 * 4 + 2], Some(red));
        assert!(!board.set(4, 0, Some(red)));
    }

    #[test]
    fn test_neighbors_scan_order_and_edges() {
        let board = Board::new(3, 3);
        // Center: up, down, left, right
        assert_eq!(board.neighbors(4).as_slice(), &[1, 7, 3, 5]);
        // Corner (0,0): down and right only
        assert_eq!(board.neighbors(0).as_slice(), &[3, 1]);
        assert!(board.neighbors(9).is_empty());
    }

    #[test]
    fn test_rows_roundtrip() {
        let rows = ["12S", "E.C", "HVX"];
        let board = Board::from_rows(&rows).unwrap();
        assert_eq!(board.to_rows(), rows);
        assert_eq!(board.vacancies(), 1);
        assert_eq!(board.first_booster(), Some(6));
    }

    #[test]
    fn test_blocker_rows() {
        let mut board = Board::from_rows(&["11", "11"]).unwrap();
        assert!(board.apply_blocker_rows(&["I.", ".I"]));
        assert_eq!(board.blocker(0), Some(BlockerKind::Ice));
        assert_eq!(board.blocker(1), None);
        assert!(!board.apply_blocker_rows(&["I."]));
        assert!(!board.apply_blocker_rows(&["Z.", ".."]));
        assert_eq!(board.take_blocker(3), Some(BlockerKind::Ice));
        assert_eq!(board.blocker_rows(), vec!["I.".to_string(), "..".to_string()]);
    }

    #[test]
    fn test_take_leaves_vacancy() {
        let mut board = Board::from_rows(&["1"]).unwrap();
        assert_eq!(board.take(0), Some(TileKind::Color(ColorId::Color1)));
        assert_eq!(board.cell(0), Some(None));
        assert_eq!(board.take(0), None);
        assert_eq!(board.take(5), None);
    }
}
