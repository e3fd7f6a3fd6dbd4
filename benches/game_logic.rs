use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tile_blast::core::goals::Goal;
use tile_blast::core::{find_any_match, find_match, resolve, settle, GameConfig, Level, Session, SimpleRng};
use tile_blast::types::{BoosterKind, ChainMode, ColorId, TileKind};

const PALETTE: [ColorId; 4] = [ColorId::Color1, ColorId::Color2, ColorId::Color3, ColorId::Color4];

fn random_board(seed: u32) -> tile_blast::core::Board {
    let mut rng = SimpleRng::new(seed);
    let mut board = tile_blast::core::Board::new(9, 9);
    for idx in 0..board.len() {
        board.set_cell(idx, rng.pick_color(&PALETTE).map(TileKind::Color));
    }
    board
}

fn bench_find_match(c: &mut Criterion) {
    let mut board = random_board(1);
    for idx in 0..board.len() {
        board.set_cell(idx, Some(TileKind::Color(ColorId::Color2)));
    }

    c.bench_function("find_match_full_board", |b| {
        b.iter(|| find_match(black_box(&board), black_box(40)))
    });

    let mixed = random_board(7);
    c.bench_function("find_any_match", |b| {
        b.iter(|| find_any_match(black_box(&mixed)))
    });
}

fn bench_resolve_chain(c: &mut Criterion) {
    let mut board = random_board(3);
    for y in 0..9 {
        let kind = if y % 2 == 0 {
            BoosterKind::HORIZONTAL_BOMB
        } else {
            BoosterKind::Dynamite
        };
        board.set(y, y, Some(TileKind::Booster(kind)));
    }
    let start = board.index(0, 0).unwrap_or(0);
    let mut rng = SimpleRng::new(5);

    c.bench_function("resolve_booster_chain", |b| {
        b.iter(|| resolve(black_box(&board), start, ChainMode::Full, &PALETTE, &mut rng))
    });
}

fn bench_settle(c: &mut Criterion) {
    let template = random_board(9);
    let mut rng = SimpleRng::new(11);

    c.bench_function("settle_half_empty", |b| {
        b.iter(|| {
            let mut board = template.clone();
            for idx in (0..board.len()).step_by(2) {
                board.set_cell(idx, None);
            }
            settle(&mut board, || rng.pick_color(&PALETTE).map(TileKind::Color))
        })
    });
}

fn bench_session_turn(c: &mut Criterion) {
    let rows = vec!["?????????"; 9];
    let level = match Level::from_rows(&rows) {
        Some(level) => level
            .with_colors(&PALETTE)
            .with_limit(tile_blast::types::LimitType::Moves, u32::MAX)
            .with_goals(vec![Goal::ReachScore { score: u32::MAX }]),
        None => return,
    };
    let mut session = Session::new(level, GameConfig::default(), 12345);
    session.start();

    c.bench_function("session_tap_and_settle", |b| {
        b.iter(|| {
            if let Some(group) = session.suggest_match() {
                session.tap(group[0]);
            }
            session.take_events()
        })
    });
}

criterion_group!(
    benches,
    bench_find_match,
    bench_resolve_chain,
    bench_settle,
    bench_session_turn
);
criterion_main!(benches);
