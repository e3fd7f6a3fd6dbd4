//! Core board logic - pure, deterministic, and testable
//!
//! This crate contains the rules of a tap-to-blast match-3 level: matching,
//! boosters, gravity, goals and the session state machine. It has **no
//! dependencies** on rendering, input devices or persistence, so it is:
//!
//! - **Deterministic**: the same level, seed and inputs replay the same session
//! - **Testable**: every rule is a plain function or method over owned data
//! - **Portable**: any presentation layer can drive it and animate its events
//!
//! # Module Structure
//!
//! - [`board`]: width x height tile grid with a blocker overlay
//! - [`matcher`]: flood fill of same-colored neighbors
//! - [`booster`]: bomb, dynamite and color bomb areas, with chain reactions
//! - [`gravity`]: per-column compaction with Stone floors, then refill
//! - [`goals`]: cumulative counters and goal predicates
//! - [`scoring`]: per-tile score table and star rating
//! - [`level`]: immutable level description and game-wide rules
//! - [`session`]: one level attempt, from start to win or loss
//! - [`rng`]: seeded LCG used for every random decision
//!
//! # Example
//!
//! ```
//! use tile_blast_core::{GameConfig, Level, Session, TapOutcome};
//!
//! let level = Level::from_rows(&["1122", "3312"]).unwrap();
//! let mut session = Session::new(level, GameConfig::default(), 12345);
//! session.start();
//!
//! assert_eq!(session.tap(0), TapOutcome::Matched { destroyed: 2 });
//! let event = session.take_last_event().unwrap();
//! assert_eq!(event.destroyed.len(), 2);
//! assert_eq!(session.limit(), 19);
//! ```
//!
//! # Timing
//!
//! Call [`Session::tick`](session::Session::tick) with elapsed milliseconds
//! (e.g. every [`TICK_MS`](types::TICK_MS)) to advance countdowns, penalties
//! and the end-of-level booster award.

pub mod board;
pub mod booster;
pub mod goals;
pub mod gravity;
pub mod level;
pub mod matcher;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use tile_blast_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use booster::{booster_for_match, resolve, BoosterEffect, BoosterThresholds, Resolution};
pub use goals::{GameState, Goal};
pub use gravity::{collect_grounded, settle, SettleReport, TileSpawner};
pub use level::{GameConfig, Level, LevelTile};
pub use matcher::{find_any_match, find_match, has_any_match};
pub use rng::SimpleRng;
pub use scoring::{stars, ScoreTable};
pub use session::{LevelOutcome, Phase, Session, TapOutcome, TurnEvent, TurnKind};
pub use snapshot::{GoalProgress, SessionSnapshot};
