//! Tile Blast (workspace facade crate).
//!
//! Re-exports the board rules, the data layer and the shared types under one
//! `tile_blast::{core,data,types}` path. The implementation lives in the
//! dedicated crates under `crates/`.

pub use tile_blast_core as core;
pub use tile_blast_data as data;
pub use tile_blast_types as types;
