//! Data tests - bundled level files and end-to-end play

use std::path::PathBuf;

use tile_blast::core::{Level, Phase, Session};
use tile_blast::data::{
    load_config, load_level, parse_level, EventRecord, LevelFile, OutcomeRecord, SnapshotRecord,
};
use tile_blast::types::{BoosterKind, LimitType, TileKind};

fn levels_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("levels")
}

fn demo() -> (Level, tile_blast::core::GameConfig) {
    let level = load_level(levels_dir().join("level1.json")).unwrap();
    let config = load_config(levels_dir().join("config.json")).unwrap();
    (level, config)
}

#[test]
fn test_bundled_files_load() {
    let (level, config) = demo();
    assert_eq!((level.width, level.height), (6, 7));
    assert_eq!(level.limit_type, LimitType::Moves);
    assert_eq!(level.goals.len(), 3);
    assert!(level.unreachable_goals().is_empty());
    assert_eq!(config.scores.tile(TileKind::Stone), 50);
    assert_eq!(config.booster_thresholds.needed(BoosterKind::ColorBomb), 7);
}

#[test]
fn test_level_file_survives_json() {
    let (level, _) = demo();
    let json = serde_json::to_string_pretty(&LevelFile::from_level(&level)).unwrap();
    assert_eq!(parse_level(&json).unwrap(), level);
}

#[test]
fn test_demo_level_plays_to_the_end() {
    let (level, config) = demo();
    let mut session = Session::new(level, config, 2024);
    session.start();

    let mut records = Vec::new();
    for _ in 0..10_000 {
        if session.phase().is_finished() {
            break;
        }
        if session.phase() == Phase::Playing && !session.penalty_active() {
            let board = session.board();
            let target = session
                .suggest_match()
                .map(|group| group[0])
                .or_else(|| board.boosters().map(|(idx, _)| idx).find(|idx| board.blocker(*idx).is_none()));
            if let Some(idx) = target {
                session.tap(idx);
            }
        }
        session.tick(100);
        records.extend(session.take_events().iter().map(EventRecord::from));
    }

    assert!(session.phase().is_finished());
    assert!(!records.is_empty());
    assert!(records
        .iter()
        .filter(|r| r.kind == "match")
        .all(|r| r.destroyed.len() >= 2));

    let outcome = session.outcome().unwrap();
    let record = OutcomeRecord::from(&outcome);
    assert_eq!(record.level, 1);
    assert_eq!(record.goals.len(), 3);
    assert_eq!(record.won, record.goals.iter().all(|g| *g));
    if !record.won {
        assert_eq!(record.stars, 0);
    }

    let snapshot = SnapshotRecord::from(&session.snapshot());
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["tiles"].as_array().map(|rows| rows.len()), Some(7));
    assert!(json["phase"] == "won" || json["phase"] == "lost");
}
