//! Tile Blast command-line driver (default binary).
//!
//! Loads a level, then either reads commands from stdin or plays suggested
//! matches on its own. Turn events and the final outcome are printed as JSON.
//! Set `RUST_LOG=debug` to trace resolutions.

mod cli;

use std::io::{self, BufRead, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tile_blast::core::{GameConfig, Level, Phase, Session, TapOutcome};
use tile_blast::data::{
    load_config, load_level, parse_level, EventRecord, OutcomeRecord, RunConfig, SnapshotRecord,
};

use cli::{parse_args, parse_command, Command, HELP};

const DEMO_LEVEL: &str = include_str!("../levels/level1.json");

/// Upper bound on autoplay steps; a time-limited level always ends well before
const AUTOPLAY_MAX_STEPS: u32 = 1_000_000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;
    let env = RunConfig::from_env();

    let level = match cli.level.as_ref().or(env.level_path.as_ref()) {
        Some(path) => load_level(path)?,
        None => parse_level(DEMO_LEVEL).context("built-in demo level")?,
    };
    let config = match cli.config.as_ref().or(env.config_path.as_ref()) {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };
    let seed = cli.seed.or(env.seed).unwrap_or_else(clock_seed);

    let mut session = Session::new(level, config, seed);
    session.start();

    let mut out = io::stdout().lock();
    if cli.autoplay {
        autoplay(&mut session, env.tick_ms, cli.json, &mut out)?;
    } else {
        show(&session, &mut out)?;
        interactive(&mut session, cli.json, &mut out)?;
    }

    if let Some(outcome) = session.outcome() {
        info!(won = outcome.won, score = outcome.score, "level finished");
        writeln!(out, "{}", serde_json::to_string(&OutcomeRecord::from(&outcome))?)?;
    }
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(1)
}

fn print_events(session: &mut Session, json: bool, out: &mut impl Write) -> Result<()> {
    for event in session.take_events() {
        let record = EventRecord::from(&event);
        if json {
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
        } else {
            writeln!(
                out,
                "{}: {} destroyed, +{} points{}",
                record.kind,
                record.destroyed.len(),
                record.score_gained,
                match &record.spawned_booster {
                    Some(b) => format!(", created {}", b),
                    None => String::new(),
                }
            )?;
        }
    }
    Ok(())
}

fn show(session: &Session, out: &mut impl Write) -> Result<()> {
    let snap = SnapshotRecord::from(&session.snapshot());
    let header: String = (0..snap.width).map(|x| char::from(b'0' + (x % 10) as u8)).collect();
    writeln!(out, "   {}   {}", header, header)?;
    for (y, (tiles, blockers)) in snap.tiles.iter().zip(&snap.blockers).enumerate() {
        writeln!(out, "{:>2} {}   {}", y, tiles, blockers)?;
    }
    writeln!(
        out,
        "{} | {} {} left | score {} | stars {}",
        snap.phase, snap.limit, snap.limit_type, snap.score, snap.stars
    )?;
    for goal in &snap.goals {
        writeln!(
            out,
            "  {} {} {}/{}{}",
            goal.goal_type,
            goal.target.as_deref().unwrap_or(""),
            goal.current,
            goal.required,
            if goal.complete { " done" } else { "" }
        )?;
    }
    Ok(())
}

fn interactive(session: &mut Session, json: bool, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", HELP)?;
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                continue;
            }
        };

        match command {
            Command::Tap { x, y } => {
                let outcome = match session.board().index(x, y) {
                    Some(index) => session.tap(index),
                    None => TapOutcome::Ignored,
                };
                writeln!(out, "{:?}", outcome)?;
            }
            Command::Tick(ms) => {
                session.tick(ms);
            }
            Command::Place { x, y, kind } => {
                let placed = session
                    .board()
                    .index(x, y)
                    .map(|index| session.place_booster(index, kind))
                    .unwrap_or(false);
                writeln!(out, "{}", if placed { "placed" } else { "not placed" })?;
            }
            Command::Continue => {
                if !session.continue_with_extra() {
                    writeln!(out, "nothing to continue")?;
                }
            }
            Command::Hint => match session.suggest_match() {
                Some(cells) => {
                    let coords: Vec<String> = cells
                        .iter()
                        .filter_map(|i| session.board().coords(*i))
                        .map(|(x, y)| format!("({},{})", x, y))
                        .collect();
                    writeln!(out, "hint: {}", coords.join(" "))?;
                }
                None => writeln!(out, "no match available")?,
            },
            Command::Show => {}
            Command::Restart => {
                session.restart();
                session.start();
            }
            Command::Quit => break,
        }

        print_events(session, json, out)?;
        show(session, out)?;
        if session.phase() == Phase::Won {
            break;
        }
    }
    Ok(())
}

/// Tap a booster if one is free, else the first suggested match
fn autoplay_tap(session: &Session) -> Option<usize> {
    let board = session.board();
    board
        .boosters()
        .map(|(index, _)| index)
        .find(|index| board.blocker(*index).is_none())
        .or_else(|| session.suggest_match().and_then(|m| m.first().copied()))
}

fn autoplay(session: &mut Session, tick_ms: u32, json: bool, out: &mut impl Write) -> Result<()> {
    for _ in 0..AUTOPLAY_MAX_STEPS {
        match session.phase() {
            Phase::Won | Phase::Lost | Phase::NotStarted => break,
            Phase::Playing if !session.penalty_active() => {
                if let Some(index) = autoplay_tap(session) {
                    session.tap(index);
                }
            }
            _ => {}
        }
        session.tick(tick_ms);
        print_events(session, json, out)?;
    }

    if !session.phase().is_finished() {
        warn!(phase = session.phase().as_str(), "autoplay stopped before the level ended");
    }
    show(session, out)
}
