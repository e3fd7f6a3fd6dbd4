use std::path::PathBuf;

use crate::types::TICK_MS;

/// Run settings for the command-line driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Level file; the built-in demo level when unset
    pub level_path: Option<PathBuf>,
    /// Game rules file; built-in defaults when unset
    pub config_path: Option<PathBuf>,
    /// Fixed RNG seed; derived from the clock when unset
    pub seed: Option<u32>,
    /// Step used when the driver advances time on its own
    pub tick_ms: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            level_path: None,
            config_path: None,
            seed: None,
            tick_ms: TICK_MS,
        }
    }
}

impl RunConfig {
    /// Create from environment variables
    ///
    /// `TILE_BLAST_LEVEL`, `TILE_BLAST_CONFIG`, `TILE_BLAST_SEED`,
    /// `TILE_BLAST_TICK_MS`. Blank or unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };

        let level_path = non_empty("TILE_BLAST_LEVEL").map(PathBuf::from);
        let config_path = non_empty("TILE_BLAST_CONFIG").map(PathBuf::from);
        let seed = non_empty("TILE_BLAST_SEED").and_then(|s| s.parse().ok());
        let tick_ms = non_empty("TILE_BLAST_TICK_MS")
            .and_then(|s| s.parse().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(TICK_MS);

        Self {
            level_path,
            config_path,
            seed,
            tick_ms,
        }
    }
}
