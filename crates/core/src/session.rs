//! Session - one attempt at a level, from start to a win or a loss
//!
//! The session owns the board, the counters and the seeded RNG, and drives
//! every other module:
//!
//! ```text
//! tap -> match or booster -> removal + scoring -> settle -> end-state check
//! ```
//!
//! Time-based phases (the countdown of time-limited levels, the animated
//! penalty, the end-of-level booster award) advance only through
//! [`Session::tick`], a cooperative step function driven by the caller with
//! elapsed milliseconds.

use std::mem;

use tracing::{debug, info, warn};

use crate::board::Board;
use crate::booster::{self, booster_for_match, BoosterEffect};
use crate::goals::{all_complete, GameState};
use crate::gravity::{self, Collected, SettleReport, TileSpawner};
use crate::level::{GameConfig, Level};
use crate::matcher::{find_any_match, find_match, has_any_match};
use crate::rng::SimpleRng;
use crate::scoring::stars;
use crate::snapshot::{GoalProgress, SessionSnapshot, TimersSnapshot};
use crate::types::{
    BlockKind, BoosterKind, ChainMode, LimitType, TileKind, AWARD_DETONATE_STEP_MS,
    AWARD_INTRO_MS, AWARD_PLACE_STEP_MS, COUNTDOWN_STEP_MS, PENALTY_STEP_MS,
    REGENERATE_MAX_ATTEMPTS,
};

/// Lifecycle of a level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    NotStarted,
    Playing,
    /// Goals met; remaining moves are being turned into boosters
    AwardingBoosters,
    Won,
    Lost,
}

impl Phase {
    pub fn is_finished(&self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::NotStarted => "not_started",
            Phase::Playing => "playing",
            Phase::AwardingBoosters => "awarding_boosters",
            Phase::Won => "won",
            Phase::Lost => "lost",
        }
    }
}

/// Result of a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Not accepted: not playing, no moves left, invalid index, vacant or
    /// Empty cell, or a cell covered by a blocker
    Ignored,
    /// The tapped tile has no same-colored neighbor; the penalty applies
    NoMatch,
    Matched { destroyed: usize },
    Boosted { destroyed: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    Match,
    Booster,
    AwardPlacement,
    AwardDetonation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyedTile {
    pub index: usize,
    pub tile: TileKind,
}

/// Everything a presentation layer needs to animate one resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnEvent {
    pub kind: TurnKind,
    /// Tapped, detonated or awarded cell
    pub origin: usize,
    /// Removed tiles, in removal order
    pub destroyed: Vec<DestroyedTile>,
    pub broken_blockers: Vec<usize>,
    pub effects: Vec<BoosterEffect>,
    /// Booster created at `origin` (match reward or award placement)
    pub spawned_booster: Option<BoosterKind>,
    pub score_gained: u32,
    /// Goal state after scoring, before gravity
    pub goals_complete: bool,
    pub settle: SettleReport,
    pub collected: Vec<Collected>,
    /// The board had no playable match and its colors were redrawn
    pub regenerated: bool,
}

impl TurnEvent {
    fn new(kind: TurnKind, origin: usize) -> Self {
        Self {
            kind,
            origin,
            destroyed: Vec::new(),
            broken_blockers: Vec::new(),
            effects: Vec::new(),
            spawned_booster: None,
            score_gained: 0,
            goals_complete: false,
            settle: SettleReport::default(),
            collected: Vec::new(),
            regenerated: false,
        }
    }
}

/// Final result handed to a persistence layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelOutcome {
    pub level_id: u32,
    pub won: bool,
    pub score: u32,
    /// Star rating; always 0 for a loss
    pub stars: u8,
    /// Completion of each goal, in level order
    pub goals: Vec<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AwardStage {
    Intro,
    Placing,
    Detonating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PenaltyRun {
    /// Limit units still owed
    remaining: u32,
    timer_ms: u32,
}

/// One attempt at a level
#[derive(Debug, Clone)]
pub struct Session {
    level: Level,
    config: GameConfig,
    board: Board,
    state: GameState,
    rng: SimpleRng,
    spawner: TileSpawner,
    seed: u32,
    phase: Phase,
    /// Remaining moves or seconds
    limit: u32,
    moves_made: u32,
    /// Running countdown of a time-limited level
    countdown_timer_ms: Option<u32>,
    penalty: Option<PenaltyRun>,
    award: Option<AwardStage>,
    award_timer_ms: u32,
    /// Events not yet consumed by observers
    events: Vec<TurnEvent>,
}

impl Session {
    /// Create a session for `level`; the board is built from `seed`
    pub fn new(level: Level, config: GameConfig, seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let board = level.build_board(&mut rng);
        let spawner = Self::spawner_for(&level, &board);
        level.unreachable_goals();

        Self {
            limit: level.limit,
            level,
            config,
            board,
            state: GameState::new(),
            rng,
            spawner,
            seed,
            phase: Phase::NotStarted,
            moves_made: 0,
            countdown_timer_ms: None,
            penalty: None,
            award: None,
            award_timer_ms: 0,
            events: Vec::new(),
        }
    }

    fn spawner_for(level: &Level, board: &Board) -> TileSpawner {
        let on_board = board.count(|t| t.is_collectable()) as u32;
        TileSpawner::new(
            level.colors.clone(),
            level.collectable_chance,
            level.collectables_needed(),
        )
        .with_generated(on_board)
    }

    /// Start play; returns false if already started
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::NotStarted {
            return false;
        }
        self.phase = Phase::Playing;
        if self.level.limit_type == LimitType::Time {
            self.countdown_timer_ms = Some(0);
        }
        self.ensure_resolvable();
        info!(
            level = self.level.id,
            seed = self.seed,
            limit = self.limit,
            limit_type = self.level.limit_type.as_str(),
            "level started"
        );
        true
    }

    /// Rebuild the level from the original seed, back to `NotStarted`
    pub fn restart(&mut self) {
        self.rng = SimpleRng::new(self.seed);
        self.board = self.level.build_board(&mut self.rng);
        self.spawner = Self::spawner_for(&self.level, &self.board);
        self.state.reset();
        self.phase = Phase::NotStarted;
        self.limit = self.level.limit;
        self.moves_made = 0;
        self.countdown_timer_ms = None;
        self.penalty = None;
        self.award = None;
        self.award_timer_ms = 0;
        self.events.clear();
        debug!(level = self.level.id, "level restarted");
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Remaining moves or seconds
    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn penalty_active(&self) -> bool {
        self.penalty.is_some()
    }

    pub fn countdown_active(&self) -> bool {
        self.countdown_timer_ms.is_some()
    }

    pub fn goals_complete(&self) -> bool {
        all_complete(&self.level.goals, &self.state)
    }

    /// Tap the cell at `index`
    pub fn tap(&mut self, index: usize) -> TapOutcome {
        if self.phase != Phase::Playing {
            return TapOutcome::Ignored;
        }
        if self.level.limit_type == LimitType::Moves && self.limit == 0 {
            return TapOutcome::Ignored;
        }
        let Some(tile) = self.board.tile(index) else {
            return TapOutcome::Ignored;
        };
        if tile.is_empty() || self.board.blocker(index).is_some() {
            return TapOutcome::Ignored;
        }

        if tile.is_booster() {
            return self.trigger_booster(index);
        }

        let group = find_match(&self.board, index);
        if group.is_empty() {
            debug!(index, "tap without match");
            self.apply_penalty();
            return TapOutcome::NoMatch;
        }

        let mut turn = TurnEvent::new(TurnKind::Match, index);
        for &idx in &group {
            self.break_blocker(idx, &mut turn);
            for n in self.board.neighbors(idx) {
                if self
                    .board
                    .tile(n)
                    .is_some_and(|t| t.is_stone() || t.is_ball())
                {
                    self.destroy_tile(n, &mut turn);
                }
            }
            self.destroy_tile(idx, &mut turn);
        }

        if let Some(kind) =
            booster_for_match(group.len(), &self.config.booster_thresholds, &mut self.rng)
        {
            self.board.set_cell(index, Some(TileKind::Booster(kind)));
            turn.spawned_booster = Some(kind);
        }

        let destroyed = turn.destroyed.len();
        debug!(index, matched = group.len(), destroyed, "match resolved");
        self.consume_move();
        self.finish_turn(turn);
        TapOutcome::Matched { destroyed }
    }

    fn trigger_booster(&mut self, index: usize) -> TapOutcome {
        let resolution = booster::resolve(
            &self.board,
            index,
            ChainMode::Full,
            &self.level.colors,
            &mut self.rng,
        );

        let mut turn = TurnEvent::new(TurnKind::Booster, index);
        for &idx in &resolution.destroyed {
            self.break_blocker(idx, &mut turn);
            self.destroy_tile(idx, &mut turn);
        }
        turn.effects = resolution.effects;

        let destroyed = turn.destroyed.len();
        self.consume_move();
        self.finish_turn(turn);
        TapOutcome::Boosted { destroyed }
    }

    fn break_blocker(&mut self, idx: usize, turn: &mut TurnEvent) {
        if let Some(blocker) = self.board.take_blocker(idx) {
            let points = self.config.scores.blocker(blocker);
            self.state.collect_blocker(blocker);
            self.state.add_score(points);
            turn.score_gained += points;
            turn.broken_blockers.push(idx);
        }
    }

    fn destroy_tile(&mut self, idx: usize, turn: &mut TurnEvent) {
        if let Some(tile) = self.board.take(idx) {
            if let Some(kind) = tile.block_kind() {
                self.state.collect_block(kind);
            }
            let points = self.config.scores.tile(tile);
            self.state.add_score(points);
            turn.score_gained += points;
            turn.destroyed.push(DestroyedTile { index: idx, tile });
        }
    }

    fn consume_move(&mut self) {
        self.moves_made += 1;
        if self.level.limit_type == LimitType::Moves && self.phase == Phase::Playing {
            self.limit = self.limit.saturating_sub(1);
        }
    }

    /// Snapshot goals, settle, check the end state, then publish the event
    fn finish_turn(&mut self, mut turn: TurnEvent) {
        turn.goals_complete = self.goals_complete();
        let (settle, collected) = self.settle_board();
        turn.settle = settle;
        turn.collected = collected;

        self.check_end_game();
        if self.phase == Phase::Playing {
            turn.regenerated = self.ensure_resolvable();
        }
        self.events.push(turn);
    }

    /// Settle the board, then collect grounded collectables until none remain
    fn settle_board(&mut self) -> (SettleReport, Vec<Collected>) {
        let Self {
            board,
            spawner,
            rng,
            state,
            ..
        } = self;

        let mut report = gravity::settle(board, || spawner.spawn(rng));
        let mut collected = Vec::new();
        loop {
            let grounded = gravity::collect_grounded(board);
            if grounded.is_empty() {
                break;
            }
            for _ in &grounded {
                state.collect_block(BlockKind::Collectable);
            }
            collected.extend(grounded);
            report.merge(gravity::settle(board, || spawner.spawn(rng)));
        }
        (report, collected)
    }

    fn is_resolvable(&self) -> bool {
        has_any_match(&self.board)
            || self
                .board
                .boosters()
                .any(|(idx, _)| self.board.blocker(idx).is_none())
    }

    /// Redraw every color block while no move is possible
    ///
    /// Returns true if the board was regenerated.
    fn ensure_resolvable(&mut self) -> bool {
        if self.is_resolvable() {
            return false;
        }

        for attempt in 1..=REGENERATE_MAX_ATTEMPTS {
            for idx in 0..self.board.len() {
                if !self.board.tile(idx).is_some_and(|t| t.is_color_block()) {
                    continue;
                }
                if let Some(color) = self.rng.pick_color(&self.level.colors) {
                    self.board.set_cell(idx, Some(TileKind::Color(color)));
                }
            }
            if self.is_resolvable() {
                info!(attempt, "board regenerated");
                return true;
            }
        }

        warn!(
            attempts = REGENERATE_MAX_ATTEMPTS,
            "board still has no playable match after regeneration"
        );
        true
    }

    /// Start the animated penalty; ignored while one is already running
    fn apply_penalty(&mut self) {
        if self.penalty.is_some() || self.level.penalty == 0 {
            return;
        }
        if self.level.limit_type == LimitType::Time {
            self.countdown_timer_ms = None;
        }
        self.penalty = Some(PenaltyRun {
            remaining: self.level.penalty,
            timer_ms: 0,
        });
        debug!(penalty = self.level.penalty, limit = self.limit, "penalty started");
        self.step_penalty();
    }

    /// Take one unit off the limit; returns false once the run has ended
    fn step_penalty(&mut self) -> bool {
        let Some(run) = self.penalty.as_mut() else {
            return false;
        };
        if run.remaining > 0 && self.limit > 0 {
            run.remaining -= 1;
            self.limit -= 1;
            return true;
        }

        self.penalty = None;
        if self.level.limit_type == LimitType::Time && self.phase == Phase::Playing {
            self.countdown_timer_ms = Some(0);
        }
        debug!(limit = self.limit, "penalty finished");
        self.check_end_game();
        false
    }

    /// Advance timed phases by `elapsed_ms`; returns true if anything changed
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        match self.phase {
            Phase::Playing => {
                let penalty = self.tick_penalty(elapsed_ms);
                let countdown = self.phase == Phase::Playing && self.tick_countdown(elapsed_ms);
                penalty || countdown
            }
            Phase::AwardingBoosters => self.tick_award(elapsed_ms),
            _ => false,
        }
    }

    fn tick_penalty(&mut self, elapsed_ms: u32) -> bool {
        let Some(run) = self.penalty.as_mut() else {
            return false;
        };
        run.timer_ms += elapsed_ms;

        let mut changed = false;
        while let Some(run) = self.penalty.as_mut() {
            if run.timer_ms < PENALTY_STEP_MS {
                break;
            }
            run.timer_ms -= PENALTY_STEP_MS;
            changed = true;
            if !self.step_penalty() {
                break;
            }
        }
        changed
    }

    fn tick_countdown(&mut self, elapsed_ms: u32) -> bool {
        let Some(mut timer) = self.countdown_timer_ms else {
            return false;
        };
        timer += elapsed_ms;

        let mut changed = false;
        while timer >= COUNTDOWN_STEP_MS && self.limit > 0 {
            timer -= COUNTDOWN_STEP_MS;
            self.limit -= 1;
            changed = true;
        }
        self.countdown_timer_ms = Some(timer);

        if self.limit == 0 {
            self.countdown_timer_ms = None;
            self.check_end_game();
            changed = true;
        }
        changed
    }

    /// Decide Won / Lost / award phase from the goals and the limit
    fn check_end_game(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        let complete = self.goals_complete();
        if !complete && self.limit > 0 {
            return;
        }

        self.countdown_timer_ms = None;
        self.penalty = None;

        if !complete {
            self.finish(Phase::Lost);
        } else if self.level.limit_type == LimitType::Moves
            && self.level.award_boosters
            && self.limit > 0
        {
            info!(moves = self.limit, "goals complete, awarding remaining moves");
            self.phase = Phase::AwardingBoosters;
            self.award = Some(AwardStage::Intro);
            self.award_timer_ms = 0;
        } else {
            self.finish(Phase::Won);
        }
    }

    fn finish(&mut self, phase: Phase) {
        self.phase = phase;
        self.award = None;
        info!(
            level = self.level.id,
            outcome = phase.as_str(),
            score = self.state.score,
            moves = self.moves_made,
            "level finished"
        );
    }

    fn tick_award(&mut self, elapsed_ms: u32) -> bool {
        self.award_timer_ms += elapsed_ms;

        let mut changed = false;
        while let Some(stage) = self.award {
            let step = match stage {
                AwardStage::Intro => AWARD_INTRO_MS,
                AwardStage::Placing => AWARD_PLACE_STEP_MS,
                AwardStage::Detonating => AWARD_DETONATE_STEP_MS,
            };
            if self.award_timer_ms < step {
                break;
            }
            self.award_timer_ms -= step;
            changed = true;

            match stage {
                AwardStage::Intro => {
                    self.award = Some(AwardStage::Placing);
                    self.award_place();
                }
                AwardStage::Placing => self.award_place(),
                AwardStage::Detonating => self.award_detonate(),
            }
        }
        changed
    }

    /// Turn one remaining move into a booster, or start detonating
    fn award_place(&mut self) {
        if self.limit == 0 {
            self.award = Some(AwardStage::Detonating);
            self.award_detonate();
            return;
        }
        self.limit -= 1;

        let candidates: Vec<usize> = (0..self.board.len())
            .filter(|&idx| match self.board.cell(idx) {
                Some(None) => true,
                Some(Some(tile)) => tile.is_color_block(),
                None => false,
            })
            .collect();
        let Some(idx) = self.rng.pick(&candidates) else {
            debug!("no cell left for an awarded booster");
            return;
        };

        let kind = self.level.awarded_booster;
        self.board.set_cell(idx, Some(TileKind::Booster(kind)));
        let mut turn = TurnEvent::new(TurnKind::AwardPlacement, idx);
        turn.spawned_booster = Some(kind);
        turn.goals_complete = true;
        self.events.push(turn);
    }

    /// Detonate the first booster in board order, or finish the level
    fn award_detonate(&mut self) {
        let Some(idx) = self.board.first_booster() else {
            self.finish(Phase::Won);
            return;
        };

        let resolution = booster::resolve(
            &self.board,
            idx,
            ChainMode::SingleStep,
            &self.level.colors,
            &mut self.rng,
        );
        let mut turn = TurnEvent::new(TurnKind::AwardDetonation, idx);
        for &d in &resolution.destroyed {
            self.break_blocker(d, &mut turn);
            self.destroy_tile(d, &mut turn);
        }
        turn.effects = resolution.effects;
        turn.goals_complete = self.goals_complete();

        let (settle, collected) = self.settle_board();
        turn.settle = settle;
        turn.collected = collected;
        self.events.push(turn);
    }

    /// Continue a lost level with the configured extra moves or seconds
    pub fn continue_with_extra(&mut self) -> bool {
        if self.phase != Phase::Lost {
            return false;
        }
        self.phase = Phase::Playing;
        match self.level.limit_type {
            LimitType::Moves => self.limit = self.config.extra_moves,
            LimitType::Time => {
                self.limit = self.config.extra_time;
                self.countdown_timer_ms = Some(0);
            }
        }
        info!(limit = self.limit, "level continued");
        true
    }

    /// Place a booster from the player's inventory on an uncovered tile
    ///
    /// The tile must be occupied, not Empty, not a booster and not covered by
    /// a blocker. No move is consumed.
    pub fn place_booster(&mut self, index: usize, kind: BoosterKind) -> bool {
        if self.phase != Phase::Playing || self.board.blocker(index).is_some() {
            return false;
        }
        match self.board.tile(index) {
            Some(tile) if !tile.is_booster() && !tile.is_empty() => {
                self.board.set_cell(index, Some(TileKind::Booster(kind)));
                debug!(index, booster = kind.as_str(), "booster placed");
                true
            }
            _ => false,
        }
    }

    /// A playable match to highlight as a hint
    pub fn suggest_match(&self) -> Option<Vec<usize>> {
        find_any_match(&self.board)
    }

    /// Take and clear the most recent turn event (older ones are dropped)
    pub fn take_last_event(&mut self) -> Option<TurnEvent> {
        let last = self.events.pop();
        self.events.clear();
        last
    }

    /// Take every turn event since the last call, oldest first
    pub fn take_events(&mut self) -> Vec<TurnEvent> {
        mem::take(&mut self.events)
    }

    /// Final outcome once the level is won or lost
    pub fn outcome(&self) -> Option<LevelOutcome> {
        if !self.phase.is_finished() {
            return None;
        }
        let won = self.phase == Phase::Won;
        Some(LevelOutcome {
            level_id: self.level.id,
            won,
            score: self.state.score,
            stars: if won {
                stars(self.state.score, self.level.star_scores)
            } else {
                0
            },
            goals: self
                .level
                .goals
                .iter()
                .map(|g| g.is_complete(&self.state))
                .collect(),
        })
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.clear();
        out.level_id = self.level.id;
        out.seed = self.seed;
        out.width = self.board.width();
        out.height = self.board.height();
        out.tiles = self.board.to_rows();
        out.blockers = self.board.blocker_rows();
        out.phase = self.phase;
        out.limit_type = self.level.limit_type;
        out.limit = self.limit;
        out.moves_made = self.moves_made;
        out.score = self.state.score;
        out.stars = stars(self.state.score, self.level.star_scores);
        out.goals.extend(self.level.goals.iter().map(|goal| {
            let (current, target) = goal.progress(&self.state);
            GoalProgress {
                goal: *goal,
                current,
                target,
                complete: current >= target,
            }
        }));
        out.timers = TimersSnapshot {
            countdown_ms: self.countdown_timer_ms,
            penalty_ms: self.penalty.map(|p| p.timer_ms),
            award_ms: self.award_timer_ms,
        };
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut snap = SessionSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }
}
