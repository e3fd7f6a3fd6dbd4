//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the board core.
//! All types are pure data with no external dependencies, so they can be used
//! by the simulation, a level loader, or any presentation layer.
//!
//! # Tiles
//!
//! Every cell on the board holds a [`Cell`], which is `Option<TileKind>`:
//!
//! | Variant | Code | Matches by color | Destroyed by boosters | Falls |
//! |---------|------|------------------|-----------------------|-------|
//! | `Color(c)` | `1`-`6` | yes | yes | yes |
//! | `Stone` | `S` | no | yes | no (acts as a floor) |
//! | `Ball` | `B` | no | yes | yes |
//! | `Empty` | `E` | no | no | no (a hole in the layout) |
//! | `Collectable` | `C` | no | no | yes |
//! | `Booster(k)` | `H` `V` `D` `X` | no | yes (and chains) | yes |
//! | vacant (`None`) | `.` | - | - | - |
//!
//! # Timing Constants
//!
//! Timed phases advance through `Session::tick` in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Suggested fixed timestep (~60 FPS) |
//! | `COUNTDOWN_STEP_MS` | 1000 | One unit of a time limit |
//! | `PENALTY_STEP_MS` | 100 | One unit of an animated penalty |
//! | `AWARD_INTRO_MS` | 2500 | Delay before remaining moves become boosters |
//! | `AWARD_PLACE_STEP_MS` | 250 | Interval between awarded booster placements |
//! | `AWARD_DETONATE_STEP_MS` | 500 | Interval between awarded booster detonations |
//!
//! # Examples
//!
//! ```
//! use tile_blast_types::{BoosterKind, ColorId, Orientation, TileKind};
//!
//! let red = TileKind::Color(ColorId::Color1);
//! assert!(red.is_color_block());
//! assert_eq!(red.as_char(), '1');
//!
//! let bomb = TileKind::from_char('H').unwrap();
//! assert_eq!(bomb, TileKind::Booster(BoosterKind::Bomb(Orientation::Horizontal)));
//! assert!(bomb.is_booster());
//! assert!(!bomb.is_color_block());
//! ```

/// Suggested fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Duration of one unit of a time limit (1 second)
pub const COUNTDOWN_STEP_MS: u32 = 1000;

/// Duration of one unit of an animated penalty decrement
pub const PENALTY_STEP_MS: u32 = 100;

/// Delay between reaching the goals and placing the first awarded booster
pub const AWARD_INTRO_MS: u32 = 2500;

/// Interval between two awarded booster placements
pub const AWARD_PLACE_STEP_MS: u32 = 250;

/// Interval between two awarded booster detonations
pub const AWARD_DETONATE_STEP_MS: u32 = 500;

/// Points for a destroyed tile or blocker without a score override
pub const DEFAULT_TILE_SCORE: u32 = 10;

/// Minimum match sizes that spawn each booster kind, in [`BoosterKind::ALL`] order
pub const DEFAULT_BOOSTER_MATCHES: [u32; 4] = [5, 5, 6, 7];

/// Moves granted when continuing a lost moves-limited level
pub const DEFAULT_EXTRA_MOVES: u32 = 5;

/// Seconds granted when continuing a lost time-limited level
pub const DEFAULT_EXTRA_TIME: u32 = 15;

/// Attempts at recoloring an unresolvable board before giving up
pub const REGENERATE_MAX_ATTEMPTS: u32 = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_defaults() {
        assert_eq!(DEFAULT_BOOSTER_MATCHES, [5, 5, 6, 7]);
        assert_eq!(COUNTDOWN_STEP_MS, 1000);
        assert_eq!(PENALTY_STEP_MS, 100);
        assert_eq!(AWARD_PLACE_STEP_MS, 250);
        assert_eq!(AWARD_DETONATE_STEP_MS, 500);
    }

    #[test]
    fn tile_char_codes_roundtrip() {
        for c in ['1', '2', '3', '4', '5', '6', 'S', 'B', 'E', 'C', 'H', 'V', 'D', 'X'] {
            let tile = TileKind::from_char(c).unwrap();
            assert_eq!(tile.as_char(), c);
        }
        assert_eq!(cell_from_char('.'), Some(None));
        assert_eq!(cell_from_char('?'), None);
        assert_eq!(cell_to_char(None), '.');
    }

    #[test]
    fn categories_are_exclusive() {
        let tiles = [
            TileKind::Color(ColorId::Color3),
            TileKind::Stone,
            TileKind::Ball,
            TileKind::Empty,
            TileKind::Collectable,
            TileKind::Booster(BoosterKind::Dynamite),
        ];
        for tile in tiles {
            let flags = [
                tile.is_color_block(),
                tile.is_stone(),
                tile.is_ball(),
                tile.is_empty(),
                tile.is_collectable(),
                tile.is_booster(),
            ];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "{:?}", tile);
        }
    }

    #[test]
    fn booster_destroyable_excludes_empty_and_collectable() {
        assert!(!TileKind::Empty.is_booster_destroyable());
        assert!(!TileKind::Collectable.is_booster_destroyable());
        assert!(TileKind::Stone.is_booster_destroyable());
        assert!(TileKind::Booster(BoosterKind::ColorBomb).is_booster_destroyable());
    }
}

/// The six block colors a level can draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorId {
    Color1,
    Color2,
    Color3,
    Color4,
    Color5,
    Color6,
}

impl ColorId {
    /// All colors in declaration order
    pub const ALL: [ColorId; 6] = [
        ColorId::Color1,
        ColorId::Color2,
        ColorId::Color3,
        ColorId::Color4,
        ColorId::Color5,
        ColorId::Color6,
    ];

    /// Zero-based index of the color
    pub fn index(&self) -> usize {
        match self {
            ColorId::Color1 => 0,
            ColorId::Color2 => 1,
            ColorId::Color3 => 2,
            ColorId::Color4 => 3,
            ColorId::Color5 => 4,
            ColorId::Color6 => 5,
        }
    }

    /// Color from its one-based number as used in level files
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_blast_types::ColorId;
    ///
    /// assert_eq!(ColorId::from_number(1), Some(ColorId::Color1));
    /// assert_eq!(ColorId::from_number(6), Some(ColorId::Color6));
    /// assert_eq!(ColorId::from_number(0), None);
    /// assert_eq!(ColorId::from_number(7), None);
    /// ```
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1..=6 => Some(Self::ALL[(n - 1) as usize]),
            _ => None,
        }
    }

    /// One-based number of the color
    pub fn number(&self) -> u8 {
        self.index() as u8 + 1
    }

    /// Parse from string (case-insensitive), e.g. "color3"
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        let digits = lower.strip_prefix("color")?;
        digits.parse::<u8>().ok().and_then(Self::from_number)
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorId::Color1 => "color1",
            ColorId::Color2 => "color2",
            ColorId::Color3 => "color3",
            ColorId::Color4 => "color4",
            ColorId::Color5 => "color5",
            ColorId::Color6 => "color6",
        }
    }
}

/// Direction a bomb clears in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The other orientation
    pub fn perpendicular(&self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Special tiles that destroy a computed region when triggered
///
/// - **Bomb**: clears its row (horizontal) or column (vertical)
/// - **Dynamite**: clears the 3x3 area around it
/// - **ColorBomb**: clears every block of one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoosterKind {
    Bomb(Orientation),
    Dynamite,
    ColorBomb,
}

impl BoosterKind {
    pub const HORIZONTAL_BOMB: BoosterKind = BoosterKind::Bomb(Orientation::Horizontal);
    pub const VERTICAL_BOMB: BoosterKind = BoosterKind::Bomb(Orientation::Vertical);

    /// Every booster kind, in threshold table order
    pub const ALL: [BoosterKind; 4] = [
        BoosterKind::HORIZONTAL_BOMB,
        BoosterKind::VERTICAL_BOMB,
        BoosterKind::Dynamite,
        BoosterKind::ColorBomb,
    ];

    /// Position in [`BoosterKind::ALL`]
    pub fn index(&self) -> usize {
        match self {
            BoosterKind::Bomb(Orientation::Horizontal) => 0,
            BoosterKind::Bomb(Orientation::Vertical) => 1,
            BoosterKind::Dynamite => 2,
            BoosterKind::ColorBomb => 3,
        }
    }

    /// Parse booster kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_blast_types::BoosterKind;
    ///
    /// assert_eq!(BoosterKind::from_str("dynamite"), Some(BoosterKind::Dynamite));
    /// assert_eq!(BoosterKind::from_str("Horizontal_Bomb"), Some(BoosterKind::HORIZONTAL_BOMB));
    /// assert_eq!(BoosterKind::from_str("rocket"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "horizontal_bomb" => Some(BoosterKind::HORIZONTAL_BOMB),
            "vertical_bomb" => Some(BoosterKind::VERTICAL_BOMB),
            "dynamite" => Some(BoosterKind::Dynamite),
            "color_bomb" => Some(BoosterKind::ColorBomb),
            _ => None,
        }
    }

    /// Convert to snake_case string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BoosterKind::Bomb(Orientation::Horizontal) => "horizontal_bomb",
            BoosterKind::Bomb(Orientation::Vertical) => "vertical_bomb",
            BoosterKind::Dynamite => "dynamite",
            BoosterKind::ColorBomb => "color_bomb",
        }
    }
}

/// Non-booster tile kinds, used as keys of the collection counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    Color(ColorId),
    Stone,
    Ball,
    Empty,
    Collectable,
}

impl BlockKind {
    /// Parse block kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_blast_types::{BlockKind, ColorId};
    ///
    /// assert_eq!(BlockKind::from_str("color2"), Some(BlockKind::Color(ColorId::Color2)));
    /// assert_eq!(BlockKind::from_str("Collectable"), Some(BlockKind::Collectable));
    /// assert_eq!(BlockKind::from_str("lava"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stone" => Some(BlockKind::Stone),
            "ball" => Some(BlockKind::Ball),
            "empty" => Some(BlockKind::Empty),
            "collectable" => Some(BlockKind::Collectable),
            other => ColorId::from_str(other).map(BlockKind::Color),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Color(c) => c.as_str(),
            BlockKind::Stone => "stone",
            BlockKind::Ball => "ball",
            BlockKind::Empty => "empty",
            BlockKind::Collectable => "collectable",
        }
    }
}

/// Overlays covering a cell independently of its tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockerKind {
    Ice,
}

impl BlockerKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ice" => Some(BlockerKind::Ice),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockerKind::Ice => "ice",
        }
    }

    /// Parse a blocker layer character; `.` means no blocker
    pub fn from_char(c: char) -> Option<Option<Self>> {
        match c {
            '.' => Some(None),
            'I' | 'i' => Some(Some(BlockerKind::Ice)),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            BlockerKind::Ice => 'I',
        }
    }
}

/// The occupant of a board cell
///
/// Category membership is a pure function of the variant; there is no
/// separate type hierarchy for blocks and boosters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Color(ColorId),
    Stone,
    Ball,
    Empty,
    Collectable,
    Booster(BoosterKind),
}

impl TileKind {
    pub fn is_color_block(&self) -> bool {
        matches!(self, TileKind::Color(_))
    }

    pub fn is_booster(&self) -> bool {
        matches!(self, TileKind::Booster(_))
    }

    pub fn is_stone(&self) -> bool {
        matches!(self, TileKind::Stone)
    }

    pub fn is_ball(&self) -> bool {
        matches!(self, TileKind::Ball)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TileKind::Empty)
    }

    pub fn is_collectable(&self) -> bool {
        matches!(self, TileKind::Collectable)
    }

    /// Color of a color block
    pub fn color(&self) -> Option<ColorId> {
        match self {
            TileKind::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Kind of a booster tile
    pub fn booster(&self) -> Option<BoosterKind> {
        match self {
            TileKind::Booster(b) => Some(*b),
            _ => None,
        }
    }

    /// Counter key for this tile; boosters are not counted as blocks
    pub fn block_kind(&self) -> Option<BlockKind> {
        match self {
            TileKind::Color(c) => Some(BlockKind::Color(*c)),
            TileKind::Stone => Some(BlockKind::Stone),
            TileKind::Ball => Some(BlockKind::Ball),
            TileKind::Empty => Some(BlockKind::Empty),
            TileKind::Collectable => Some(BlockKind::Collectable),
            TileKind::Booster(_) => None,
        }
    }

    /// Whether booster effects may select this tile
    pub fn is_booster_destroyable(&self) -> bool {
        !matches!(self, TileKind::Empty | TileKind::Collectable)
    }

    /// Whether gravity may move this tile
    pub fn can_fall(&self) -> bool {
        !matches!(self, TileKind::Empty | TileKind::Stone)
    }

    /// Parse a single layout character (see the crate docs for the table)
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='6' => ColorId::from_number(c as u8 - b'0').map(TileKind::Color),
            'S' => Some(TileKind::Stone),
            'B' => Some(TileKind::Ball),
            'E' => Some(TileKind::Empty),
            'C' => Some(TileKind::Collectable),
            'H' => Some(TileKind::Booster(BoosterKind::HORIZONTAL_BOMB)),
            'V' => Some(TileKind::Booster(BoosterKind::VERTICAL_BOMB)),
            'D' => Some(TileKind::Booster(BoosterKind::Dynamite)),
            'X' => Some(TileKind::Booster(BoosterKind::ColorBomb)),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            TileKind::Color(c) => (b'0' + c.number()) as char,
            TileKind::Stone => 'S',
            TileKind::Ball => 'B',
            TileKind::Empty => 'E',
            TileKind::Collectable => 'C',
            TileKind::Booster(BoosterKind::Bomb(Orientation::Horizontal)) => 'H',
            TileKind::Booster(BoosterKind::Bomb(Orientation::Vertical)) => 'V',
            TileKind::Booster(BoosterKind::Dynamite) => 'D',
            TileKind::Booster(BoosterKind::ColorBomb) => 'X',
        }
    }
}

/// A cell on the game board
///
/// - `None`: vacant, only between a removal and the next settle
/// - `Some(TileKind)`: occupied
pub type Cell = Option<TileKind>;

/// Parse a layout character into a cell; `.` is a vacancy
pub fn cell_from_char(c: char) -> Option<Cell> {
    if c == '.' {
        return Some(None);
    }
    TileKind::from_char(c).map(Some)
}

pub fn cell_to_char(cell: Cell) -> char {
    cell.map(|t| t.as_char()).unwrap_or('.')
}

/// How the remaining allowance of a level is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitType {
    Moves,
    Time,
}

impl LimitType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moves" => Some(LimitType::Moves),
            "time" => Some(LimitType::Time),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LimitType::Moves => "moves",
            LimitType::Time => "time",
        }
    }
}

/// Whether a booster resolution follows chain reactions
///
/// - **Full**: boosters caught in the destroyed area are resolved too
/// - **SingleStep**: only the triggered booster is resolved; others caught in
///   its area are destroyed without firing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainMode {
    #[default]
    Full,
    SingleStep,
}
