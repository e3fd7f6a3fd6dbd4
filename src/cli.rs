use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

use tile_blast::types::BoosterKind;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub level: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub seed: Option<u32>,
    /// Play suggested matches until the level ends
    pub autoplay: bool,
    /// Print turn events as JSON lines
    pub json: bool,
}

pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--level" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| anyhow!("missing value for --level"))?;
                out.level = Some(PathBuf::from(v));
            }
            "--config" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| anyhow!("missing value for --config"))?;
                out.config = Some(PathBuf::from(v));
            }
            "--seed" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| anyhow!("missing value for --seed"))?;
                out.seed = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                );
            }
            "--autoplay" => out.autoplay = true,
            "--json" => out.json = true,
            other => bail!("unknown argument: {}", other),
        }
        i += 1;
    }
    Ok(out)
}

/// One line of interactive input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Tap { x: i32, y: i32 },
    Tick(u32),
    Place { x: i32, y: i32, kind: BoosterKind },
    Continue,
    Hint,
    Show,
    Restart,
    Quit,
}

pub const HELP: &str = "commands: tap X Y | tick MS | place X Y BOOSTER | continue | hint | show | restart | quit";

fn parse_num<T: std::str::FromStr>(word: Option<&str>, what: &str) -> Result<T> {
    let word = word.ok_or_else(|| anyhow!("missing {}", what))?;
    word.parse::<T>()
        .map_err(|_| anyhow!("invalid {}: {}", what, word))
}

/// Parse a command line; `None` for a blank line
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let command = match head.to_lowercase().as_str() {
        "tap" | "t" => Command::Tap {
            x: parse_num(words.next(), "x")?,
            y: parse_num(words.next(), "y")?,
        },
        "tick" => Command::Tick(parse_num(words.next(), "milliseconds")?),
        "place" | "p" => {
            let x = parse_num(words.next(), "x")?;
            let y = parse_num(words.next(), "y")?;
            let name = words.next().ok_or_else(|| anyhow!("missing booster"))?;
            let kind =
                BoosterKind::from_str(name).ok_or_else(|| anyhow!("unknown booster: {}", name))?;
            Command::Place { x, y, kind }
        }
        "continue" | "c" => Command::Continue,
        "hint" | "h" => Command::Hint,
        "show" | "s" => Command::Show,
        "restart" => Command::Restart,
        "quit" | "q" | "exit" => Command::Quit,
        other => bail!("unknown command: {} ({})", other, HELP),
    };

    if let Some(extra) = words.next() {
        bail!("unexpected argument: {}", extra);
    }
    Ok(Some(command))
}
