//! Game-wide rules file
//!
//! Every field is optional; missing values keep the built-in defaults.
//!
//! ```json
//! {
//!   "booster_matches": { "horizontal_bomb": 5, "dynamite": 6 },
//!   "scores": {
//!     "default": 10,
//!     "blocks": { "stone": 50 },
//!     "boosters": { "color_bomb": 40 },
//!     "blockers": { "ice": 20 }
//!   },
//!   "extra_moves": 5,
//!   "extra_time": 15
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::GameConfig;
use crate::types::{BlockKind, BlockerKind, BoosterKind};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoresFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<u32>,
    pub blocks: BTreeMap<String, u32>,
    pub boosters: BTreeMap<String, u32>,
    pub blockers: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Matched tiles needed per booster kind
    pub booster_matches: BTreeMap<String, u32>,
    pub scores: ScoresFile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_moves: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_time: Option<u32>,
}

impl ConfigFile {
    /// Apply the file on top of the default rules
    pub fn to_config(&self) -> Result<GameConfig> {
        let mut config = GameConfig::default();

        for (name, needed) in &self.booster_matches {
            let kind = BoosterKind::from_str(name)
                .ok_or_else(|| anyhow!("unknown booster {:?} in booster_matches", name))?;
            config.booster_thresholds.set(kind, *needed);
        }

        if let Some(default) = self.scores.default {
            config.scores.default_score = default;
        }
        for (name, score) in &self.scores.blocks {
            let kind = BlockKind::from_str(name)
                .ok_or_else(|| anyhow!("unknown block kind {:?} in scores", name))?;
            config.scores.blocks.insert(kind, *score);
        }
        for (name, score) in &self.scores.boosters {
            let kind = BoosterKind::from_str(name)
                .ok_or_else(|| anyhow!("unknown booster {:?} in scores", name))?;
            config.scores.boosters.insert(kind, *score);
        }
        for (name, score) in &self.scores.blockers {
            let kind = BlockerKind::from_str(name)
                .ok_or_else(|| anyhow!("unknown blocker kind {:?} in scores", name))?;
            config.scores.blockers.insert(kind, *score);
        }

        if let Some(moves) = self.extra_moves {
            config.extra_moves = moves;
        }
        if let Some(time) = self.extra_time {
            config.extra_time = time;
        }
        Ok(config)
    }
}

pub fn parse_config(json: &str) -> Result<GameConfig> {
    let file: ConfigFile = serde_json::from_str(json).context("malformed config JSON")?;
    file.to_config()
}

pub fn load_config(path: impl AsRef<Path>) -> Result<GameConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config =
        parse_config(&text).with_context(|| format!("invalid config file {}", path.display()))?;
    debug!(path = %path.display(), "game config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TileKind, DEFAULT_EXTRA_TIME, DEFAULT_TILE_SCORE};

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("{}").unwrap(), GameConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = parse_config(
            r#"{
                "booster_matches": { "dynamite": 8, "vertical_bomb": 4 },
                "scores": { "blocks": { "stone": 50 }, "blockers": { "ice": 20 } },
                "extra_moves": 3
            }"#,
        )
        .unwrap();

        assert_eq!(config.booster_thresholds.needed(BoosterKind::Dynamite), 8);
        assert_eq!(config.booster_thresholds.needed(BoosterKind::VERTICAL_BOMB), 4);
        assert_eq!(config.booster_thresholds.needed(BoosterKind::ColorBomb), 7);
        assert_eq!(config.scores.tile(TileKind::Stone), 50);
        assert_eq!(config.scores.tile(TileKind::Ball), DEFAULT_TILE_SCORE);
        assert_eq!(config.scores.blocker(BlockerKind::Ice), 20);
        assert_eq!(config.extra_moves, 3);
        assert_eq!(config.extra_time, DEFAULT_EXTRA_TIME);
    }

    #[test]
    fn test_unknown_names_rejected() {
        assert!(parse_config(r#"{ "booster_matches": { "nuke": 3 } }"#).is_err());
        assert!(parse_config(r#"{ "scores": { "blocks": { "lava": 3 } } }"#).is_err());
    }
}
