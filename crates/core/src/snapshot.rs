use crate::goals::Goal;
use crate::session::Phase;
use crate::types::LimitType;

/// Progress of one goal at snapshot time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalProgress {
    pub goal: Goal,
    pub current: u32,
    pub target: u32,
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimersSnapshot {
    /// Time accumulated toward the next countdown step, if counting down
    pub countdown_ms: Option<u32>,
    /// Time accumulated toward the next penalty step, if a penalty is running
    pub penalty_ms: Option<u32>,
    /// Time accumulated in the current award stage
    pub award_ms: u32,
}

/// Read-only view of a session for presentation and observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub level_id: u32,
    pub seed: u32,
    pub width: usize,
    pub height: usize,
    /// Tile layout rows, one layout character per cell
    pub tiles: Vec<String>,
    /// Blocker rows (`I` / `.`)
    pub blockers: Vec<String>,
    pub phase: Phase,
    pub limit_type: LimitType,
    pub limit: u32,
    pub moves_made: u32,
    pub score: u32,
    pub stars: u8,
    pub goals: Vec<GoalProgress>,
    pub timers: TimersSnapshot,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            level_id: 0,
            seed: 0,
            width: 0,
            height: 0,
            tiles: Vec::new(),
            blockers: Vec::new(),
            phase: Phase::NotStarted,
            limit_type: LimitType::Moves,
            limit: 0,
            moves_made: 0,
            score: 0,
            stars: 0,
            goals: Vec::new(),
            timers: TimersSnapshot::default(),
        }
    }
}

impl SessionSnapshot {
    pub fn clear(&mut self) {
        self.level_id = 0;
        self.seed = 0;
        self.width = 0;
        self.height = 0;
        self.tiles.clear();
        self.blockers.clear();
        self.phase = Phase::NotStarted;
        self.limit_type = LimitType::Moves;
        self.limit = 0;
        self.moves_made = 0;
        self.score = 0;
        self.stars = 0;
        self.goals.clear();
        self.timers = TimersSnapshot::default();
    }

    /// Whether a tap could currently be accepted
    pub fn playable(&self) -> bool {
        self.phase == Phase::Playing
    }
}
