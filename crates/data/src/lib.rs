//! Data layer - level files, rule files and serializable records
//!
//! Everything here converts between JSON and the core model. The core crate
//! never touches the filesystem; loaders live here and report failures with
//! [`anyhow`] context naming the file and the offending entry.

pub mod config;
pub mod level;
pub mod record;
pub mod run;

pub use tile_blast_core as core;
pub use tile_blast_types as types;

pub use config::{load_config, parse_config, ConfigFile};
pub use level::{load_level, parse_level, LevelFile};
pub use record::{EventRecord, OutcomeRecord, SnapshotRecord};
pub use run::RunConfig;
