//! Session tests - taps, penalties, goals and level end

use tile_blast::core::goals::{all_complete, Goal};
use tile_blast::core::{GameConfig, GameState, Level, Phase, Session, TapOutcome, TurnKind};
use tile_blast::types::{
    BlockKind, BlockerKind, ColorId, LimitType, COUNTDOWN_STEP_MS, PENALTY_STEP_MS,
};

fn started(level: Level, seed: u32) -> Session {
    let mut session = Session::new(level, GameConfig::default(), seed);
    assert!(session.start());
    session
}

#[test]
fn test_lone_tile_tap_is_a_penalized_miss() {
    let level = Level::from_rows(&["111", "121", "111"])
        .unwrap()
        .with_colors(&[ColorId::Color1, ColorId::Color2])
        .with_penalty(1)
        .with_goals(vec![Goal::ReachScore { score: 500 }]);
    let mut session = started(level, 1);
    let before = session.board().clone();

    assert_eq!(session.tap(4), TapOutcome::NoMatch);
    assert_eq!(session.board(), &before);
    assert!(session.penalty_active());
    assert_eq!(session.limit(), 19);
    assert_eq!(session.score(), 0);
    assert!(session.take_last_event().is_none());

    session.tick(PENALTY_STEP_MS);
    assert!(!session.penalty_active());
    assert_eq!(session.limit(), 19);
}

#[test]
fn test_goal_predicates() {
    let mut state = GameState::new();
    let score = Goal::ReachScore { score: 100 };
    let red = Goal::CollectBlock {
        kind: BlockKind::Color(ColorId::Color1),
        amount: 3,
    };
    let ice = Goal::CollectBlocker {
        kind: BlockerKind::Ice,
        amount: 1,
    };

    assert!(!score.is_complete(&state));
    state.add_score(99);
    assert!(!score.is_complete(&state));
    state.add_score(1);
    assert!(score.is_complete(&state));

    for expected in [false, false, true] {
        state.collect_block(BlockKind::Color(ColorId::Color1));
        assert_eq!(red.is_complete(&state), expected);
    }
    state.collect_block(BlockKind::Color(ColorId::Color2));
    assert_eq!(red.progress(&state), (4, 3));

    assert!(!all_complete(&[score, red, ice], &state));
    state.collect_blocker(BlockerKind::Ice);
    assert!(all_complete(&[score, red, ice], &state));
    assert!(all_complete(&[], &state));
}

#[test]
fn test_collectable_reaching_bottom_is_collected() {
    let level = Level::from_rows(&["C3", "11"])
        .unwrap()
        .with_goals(vec![Goal::CollectBlock {
            kind: BlockKind::Collectable,
            amount: 1,
        }]);
    let mut session = started(level, 4);

    assert_eq!(session.tap(2), TapOutcome::Matched { destroyed: 2 });
    let event = session.take_last_event().unwrap();
    assert_eq!(event.collected.len(), 1);
    assert_eq!(event.collected[0].index, 2);
    assert_eq!(session.state().blocks(BlockKind::Collectable), 1);
    // Only the two matched tiles score; the pickup itself is worth nothing.
    assert_eq!(session.score(), 20);
    assert_eq!(session.outcome().unwrap().score, 20);
    assert_eq!(session.phase(), Phase::Won);
}

#[test]
fn test_ice_goal_completes_level() {
    let level = Level::from_rows(&["112", "233"])
        .unwrap()
        .with_blocker_rows(&[".I.", "..."])
        .unwrap()
        .with_goals(vec![Goal::CollectBlocker {
            kind: BlockerKind::Ice,
            amount: 1,
        }])
        .with_star_scores([10, 30, 100]);
    let mut session = started(level, 2);

    assert_eq!(session.tap(1), TapOutcome::Ignored);
    assert_eq!(session.tap(0), TapOutcome::Matched { destroyed: 2 });
    let event = session.take_last_event().unwrap();
    assert_eq!(event.broken_blockers, vec![1]);
    assert!(event.goals_complete);
    assert_eq!(session.phase(), Phase::Won);

    let outcome = session.outcome().unwrap();
    assert!(outcome.won);
    // Two tiles and one ice at 10 points each.
    assert_eq!(outcome.score, 30);
    assert_eq!(outcome.stars, 2);
}

#[test]
fn test_time_level_runs_out() {
    let level = Level::from_rows(&["112", "233"])
        .unwrap()
        .with_limit(LimitType::Time, 3)
        .with_goals(vec![Goal::ReachScore { score: 1000 }]);
    let mut session = started(level, 6);

    session.tap(0);
    // Taps do not spend time.
    assert_eq!(session.limit(), 3);
    assert_eq!(session.moves_made(), 1);

    session.tick(2 * COUNTDOWN_STEP_MS);
    assert_eq!(session.limit(), 1);
    assert_eq!(session.phase(), Phase::Playing);
    session.tick(COUNTDOWN_STEP_MS);
    assert_eq!(session.phase(), Phase::Lost);

    assert!(session.continue_with_extra());
    assert_eq!(session.limit(), session.config().extra_time);
    assert!(session.countdown_active());
}

#[test]
fn test_same_seed_replays_identically() {
    let level = Level::from_rows(&["?????", "?????", "?????", "?????", "?????"])
        .unwrap()
        .with_colors(&[ColorId::Color1, ColorId::Color2, ColorId::Color3, ColorId::Color4])
        .with_goals(vec![Goal::ReachScore { score: 100_000 }]);

    let play = |seed: u32| {
        let mut session = started(level.clone(), seed);
        let mut kinds = Vec::new();
        for _ in 0..10 {
            let Some(group) = session.suggest_match() else {
                break;
            };
            session.tap(group[0]);
            for event in session.take_events() {
                kinds.push((event.kind, event.destroyed.len(), event.score_gained));
            }
        }
        (session.snapshot(), kinds)
    };

    let (first, first_events) = play(31337);
    let (second, second_events) = play(31337);
    assert_eq!(first, second);
    assert_eq!(first_events, second_events);
    assert!(first_events.iter().all(|(k, _, _)| *k == TurnKind::Match || *k == TurnKind::Booster));
}

#[test]
fn test_unreachable_goal_never_completes() {
    let level = Level::from_rows(&["112", "233"])
        .unwrap()
        .with_limit(LimitType::Moves, 1)
        .with_goals(vec![Goal::CollectBlock {
            kind: BlockKind::Color(ColorId::Color6),
            amount: 1,
        }]);
    assert_eq!(level.unreachable_goals(), vec![0]);

    let mut session = started(level, 9);
    session.tap(0);
    assert_eq!(session.phase(), Phase::Lost);
    assert_eq!(session.outcome().unwrap().goals, vec![false]);
}
