//! Serializable records of session state for observers and save data

use serde::{Deserialize, Serialize};

use crate::core::booster::{BombCombo, ColorTarget, EffectDetail};
use crate::core::goals::Goal;
use crate::core::{LevelOutcome, SessionSnapshot, TurnEvent, TurnKind};

/// Final result of a level attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub level: u32,
    pub won: bool,
    pub score: u32,
    pub stars: u8,
    pub goals: Vec<bool>,
}

impl From<&LevelOutcome> for OutcomeRecord {
    fn from(outcome: &LevelOutcome) -> Self {
        Self {
            level: outcome.level_id,
            won: outcome.won,
            score: outcome.score,
            stars: outcome.stars,
            goals: outcome.goals.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRecord {
    #[serde(rename = "type")]
    pub goal_type: String,
    /// Block or blocker kind; absent for score goals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub current: u32,
    pub required: u32,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub level: u32,
    pub seed: u32,
    pub phase: String,
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<String>,
    pub blockers: Vec<String>,
    pub limit_type: String,
    pub limit: u32,
    pub moves_made: u32,
    pub score: u32,
    pub stars: u8,
    pub goals: Vec<GoalRecord>,
    pub penalty_running: bool,
}

impl From<&SessionSnapshot> for SnapshotRecord {
    fn from(snap: &SessionSnapshot) -> Self {
        let goals = snap
            .goals
            .iter()
            .map(|g| {
                let (goal_type, target) = match g.goal {
                    Goal::CollectBlock { kind, .. } => ("collect_block", Some(kind.as_str())),
                    Goal::CollectBlocker { kind, .. } => ("collect_blocker", Some(kind.as_str())),
                    Goal::ReachScore { .. } => ("reach_score", None),
                };
                GoalRecord {
                    goal_type: goal_type.to_string(),
                    target: target.map(str::to_string),
                    current: g.current,
                    required: g.target,
                    complete: g.complete,
                }
            })
            .collect();

        Self {
            level: snap.level_id,
            seed: snap.seed,
            phase: snap.phase.as_str().to_string(),
            width: snap.width,
            height: snap.height,
            tiles: snap.tiles.clone(),
            blockers: snap.blockers.clone(),
            limit_type: snap.limit_type.as_str().to_string(),
            limit: snap.limit,
            moves_made: snap.moves_made,
            score: snap.score,
            stars: snap.stars,
            goals,
            penalty_running: snap.timers.penalty_ms.is_some(),
        }
    }
}

/// One fired booster, flattened for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectRecord {
    pub index: usize,
    pub booster: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Summary of one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub kind: String,
    pub origin: usize,
    pub destroyed: Vec<usize>,
    pub broken_blockers: Vec<usize>,
    pub effects: Vec<EffectRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawned_booster: Option<String>,
    pub score_gained: u32,
    pub fallen: usize,
    pub spawned: usize,
    pub collected: Vec<usize>,
    pub regenerated: bool,
}

fn turn_kind_str(kind: TurnKind) -> &'static str {
    match kind {
        TurnKind::Match => "match",
        TurnKind::Booster => "booster",
        TurnKind::AwardPlacement => "award_placement",
        TurnKind::AwardDetonation => "award_detonation",
    }
}

impl From<&TurnEvent> for EventRecord {
    fn from(event: &TurnEvent) -> Self {
        let effects = event
            .effects
            .iter()
            .map(|e| {
                let (combo, color) = match e.detail {
                    EffectDetail::Bomb { combo, .. } => (
                        match combo {
                            BombCombo::None => None,
                            BombCombo::Matching => Some("matching"),
                            BombCombo::NonMatching => Some("non_matching"),
                        },
                        None,
                    ),
                    EffectDetail::Dynamite { widened } => (widened.then_some("widened"), None),
                    EffectDetail::ColorBomb { target } => (
                        None,
                        match target {
                            ColorTarget::Color(c) => Some(c.as_str()),
                            ColorTarget::AllColors => Some("all"),
                            ColorTarget::Nothing => None,
                        },
                    ),
                };
                EffectRecord {
                    index: e.index,
                    booster: e.kind.as_str().to_string(),
                    combo: combo.map(str::to_string),
                    color: color.map(str::to_string),
                }
            })
            .collect();

        Self {
            kind: turn_kind_str(event.kind).to_string(),
            origin: event.origin,
            destroyed: event.destroyed.iter().map(|d| d.index).collect(),
            broken_blockers: event.broken_blockers.clone(),
            effects,
            spawned_booster: event.spawned_booster.map(|b| b.as_str().to_string()),
            score_gained: event.score_gained,
            fallen: event.settle.moves().count(),
            spawned: event.settle.spawned().count(),
            collected: event.collected.iter().map(|c| c.index).collect(),
            regenerated: event.regenerated,
        }
    }
}
