//! Level files - JSON level descriptions
//!
//! ```json
//! {
//!   "id": 1, "width": 3, "height": 2,
//!   "tiles": ["1?2", "S.D"],
//!   "blockers": ["I..", "..."],
//!   "colors": [1, 2, 3],
//!   "limit": { "type": "moves", "amount": 20 },
//!   "penalty": 1,
//!   "goals": [
//!     { "type": "collect_block", "block": "color1", "amount": 10 },
//!     { "type": "collect_blocker", "blocker": "ice", "amount": 1 },
//!     { "type": "reach_score", "score": 1000 }
//!   ],
//!   "stars": [500, 1000, 1500],
//!   "collectable_chance": 10,
//!   "award_boosters": true,
//!   "awarded_booster": "dynamite"
//! }
//! ```
//!
//! `blockers` may be omitted (no blockers). `penalty`, `collectable_chance`,
//! `award_boosters` and `awarded_booster` have defaults.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Goal, Level};
use crate::types::{BlockKind, BlockerKind, BoosterKind, ColorId, LimitType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitFile {
    #[serde(rename = "type")]
    pub limit_type: String,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GoalFile {
    CollectBlock { block: String, amount: u32 },
    CollectBlocker { blocker: String, amount: u32 },
    ReachScore { score: u32 },
}

fn default_awarded_booster() -> String {
    BoosterKind::Dynamite.as_str().to_string()
}

/// On-disk shape of a level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelFile {
    pub id: u32,
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blockers: Vec<String>,
    pub colors: Vec<u8>,
    pub limit: LimitFile,
    #[serde(default)]
    pub penalty: u32,
    #[serde(default)]
    pub goals: Vec<GoalFile>,
    pub stars: [u32; 3],
    #[serde(default)]
    pub collectable_chance: u32,
    #[serde(default)]
    pub award_boosters: bool,
    #[serde(default = "default_awarded_booster")]
    pub awarded_booster: String,
}

impl GoalFile {
    fn to_goal(&self) -> Result<Goal> {
        Ok(match self {
            GoalFile::CollectBlock { block, amount } => Goal::CollectBlock {
                kind: BlockKind::from_str(block)
                    .ok_or_else(|| anyhow!("unknown block kind {:?}", block))?,
                amount: *amount,
            },
            GoalFile::CollectBlocker { blocker, amount } => Goal::CollectBlocker {
                kind: BlockerKind::from_str(blocker)
                    .ok_or_else(|| anyhow!("unknown blocker kind {:?}", blocker))?,
                amount: *amount,
            },
            GoalFile::ReachScore { score } => Goal::ReachScore { score: *score },
        })
    }

    fn from_goal(goal: &Goal) -> Self {
        match *goal {
            Goal::CollectBlock { kind, amount } => GoalFile::CollectBlock {
                block: kind.as_str().to_string(),
                amount,
            },
            Goal::CollectBlocker { kind, amount } => GoalFile::CollectBlocker {
                blocker: kind.as_str().to_string(),
                amount,
            },
            Goal::ReachScore { score } => GoalFile::ReachScore { score },
        }
    }
}

impl LevelFile {
    /// Validate and convert into a core [`Level`]
    pub fn to_level(&self) -> Result<Level> {
        ensure!(
            self.width > 0 && self.height > 0,
            "level {} has an empty board ({}x{})",
            self.id,
            self.width,
            self.height
        );
        ensure!(
            self.tiles.len() == self.height,
            "level {} declares {} rows but has {} tile rows",
            self.id,
            self.height,
            self.tiles.len()
        );
        for (y, row) in self.tiles.iter().enumerate() {
            ensure!(
                row.chars().count() == self.width,
                "level {} tile row {} has {} cells, expected {}",
                self.id,
                y,
                row.chars().count(),
                self.width
            );
        }

        let mut level = Level::from_rows(&self.tiles)
            .ok_or_else(|| anyhow!("level {} has an unknown tile code", self.id))?;
        if !self.blockers.is_empty() {
            level = level
                .with_blocker_rows(&self.blockers)
                .ok_or_else(|| anyhow!("level {} has an invalid blocker layer", self.id))?;
        }

        let colors = self
            .colors
            .iter()
            .map(|n| ColorId::from_number(*n).ok_or_else(|| anyhow!("invalid color {}", n)))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("level {} colors", self.id))?;
        if colors.is_empty() {
            bail!("level {} has no available colors", self.id);
        }

        let limit_type = LimitType::from_str(&self.limit.limit_type)
            .ok_or_else(|| anyhow!("unknown limit type {:?}", self.limit.limit_type))?;
        let goals = self
            .goals
            .iter()
            .map(GoalFile::to_goal)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("level {} goals", self.id))?;
        ensure!(
            self.collectable_chance <= 100,
            "level {} collectable chance {} is above 100",
            self.id,
            self.collectable_chance
        );
        let awarded = BoosterKind::from_str(&self.awarded_booster)
            .ok_or_else(|| anyhow!("unknown booster {:?}", self.awarded_booster))?;

        let mut level = level
            .with_id(self.id)
            .with_colors(&colors)
            .with_limit(limit_type, self.limit.amount)
            .with_penalty(self.penalty)
            .with_goals(goals)
            .with_star_scores(self.stars)
            .with_collectable_chance(self.collectable_chance);
        level.award_boosters = self.award_boosters;
        level.awarded_booster = awarded;
        Ok(level)
    }

    /// Describe a core [`Level`] in file form
    pub fn from_level(level: &Level) -> Self {
        let rows = |cells: Vec<char>| -> Vec<String> {
            cells
                .chunks(level.width.max(1))
                .map(|row| row.iter().collect())
                .collect()
        };
        let tiles = rows(
            level
                .tiles
                .iter()
                .map(|t| t.map(|t| t.as_char()).unwrap_or('.'))
                .collect(),
        );
        let blockers = if level.blockers.iter().any(Option::is_some) {
            rows(
                level
                    .blockers
                    .iter()
                    .map(|b| b.map(|b| b.as_char()).unwrap_or('.'))
                    .collect(),
            )
        } else {
            Vec::new()
        };

        Self {
            id: level.id,
            width: level.width,
            height: level.height,
            tiles,
            blockers,
            colors: level.colors.iter().map(ColorId::number).collect(),
            limit: LimitFile {
                limit_type: level.limit_type.as_str().to_string(),
                amount: level.limit,
            },
            penalty: level.penalty,
            goals: level.goals.iter().map(GoalFile::from_goal).collect(),
            stars: level.star_scores,
            collectable_chance: level.collectable_chance,
            award_boosters: level.award_boosters,
            awarded_booster: level.awarded_booster.as_str().to_string(),
        }
    }
}

/// Parse a level from JSON text
pub fn parse_level(json: &str) -> Result<Level> {
    let file: LevelFile = serde_json::from_str(json).context("malformed level JSON")?;
    file.to_level()
}

/// Load a level from a JSON file
pub fn load_level(path: impl AsRef<Path>) -> Result<Level> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file {}", path.display()))?;
    let level = parse_level(&text).with_context(|| format!("invalid level file {}", path.display()))?;
    debug!(path = %path.display(), id = level.id, "level loaded");
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": 7, "width": 3, "height": 2,
        "tiles": ["1?2", "S.D"],
        "blockers": ["I..", "..."],
        "colors": [1, 2, 3],
        "limit": { "type": "moves", "amount": 15 },
        "penalty": 2,
        "goals": [
            { "type": "collect_block", "block": "stone", "amount": 1 },
            { "type": "collect_blocker", "blocker": "ice", "amount": 1 },
            { "type": "reach_score", "score": 300 }
        ],
        "stars": [100, 200, 300],
        "award_boosters": true,
        "awarded_booster": "color_bomb"
    }"#;

    #[test]
    fn test_parse_full_level() {
        let level = parse_level(SAMPLE).unwrap();
        assert_eq!(level.id, 7);
        assert_eq!((level.width, level.height), (3, 2));
        assert_eq!(level.limit_type, LimitType::Moves);
        assert_eq!(level.limit, 15);
        assert_eq!(level.penalty, 2);
        assert_eq!(level.goals.len(), 3);
        assert_eq!(level.blockers[0], Some(BlockerKind::Ice));
        assert!(level.award_boosters);
        assert_eq!(level.awarded_booster, BoosterKind::ColorBomb);
        assert_eq!(level.collectable_chance, 0);
    }

    #[test]
    fn test_level_file_roundtrip() {
        let level = parse_level(SAMPLE).unwrap();
        let file = LevelFile::from_level(&level);
        assert_eq!(file.tiles, vec!["1?2", "S.D"]);
        assert_eq!(file.to_level().unwrap(), level);
    }

    #[test]
    fn test_rejects_bad_levels() {
        let bad_tile = SAMPLE.replace("1?2", "1Z2");
        assert!(parse_level(&bad_tile).is_err());

        let ragged = SAMPLE.replace("\"1?2\"", "\"1?\"");
        let err = parse_level(&ragged).unwrap_err();
        assert!(format!("{:#}", err).contains("tile row 0"));

        let bad_goal = SAMPLE.replace("\"stone\"", "\"lava\"");
        assert!(parse_level(&bad_goal).is_err());

        let bad_limit = SAMPLE.replace("\"moves\"", "\"lives\"");
        assert!(parse_level(&bad_limit).is_err());

        assert!(parse_level("{ not json").is_err());
    }

    #[test]
    fn test_load_level_reports_path() {
        let dir = std::env::temp_dir().join(format!("tile-blast-level-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("level.json");
        fs::write(&path, SAMPLE).unwrap();
        assert_eq!(load_level(&path).unwrap().id, 7);

        let missing = dir.join("missing.json");
        let err = load_level(&missing).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
