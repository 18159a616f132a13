use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chess_search::{
    ClockState, Color, Engine, EngineConfig, Position, SearchResult, TimeManager, play_move,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Path to an optional TOML file with engine settings.
const CONFIG_ENV: &str = "CHESS_SEARCH_CONFIG";

fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = load_config()?;
    let mut uci = Uci::new(Engine::new(config));

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read from stdin")?;
        if !uci.handle(&line)? {
            break;
        }
    }
    uci.finish_search();
    Ok(())
}

fn load_config() -> Result<EngineConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let config = EngineConfig::load(&path)
                .with_context(|| format!("loading engine config from {CONFIG_ENV}"))?;
            info!(path = ?path, "loaded engine config");
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn send(line: &str) {
    let mut out = io::stdout().lock();
    if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
        warn!(error = %e, "failed to write to stdout");
    }
}

struct RunningSearch {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

struct Uci {
    engine: Engine,
    position: Position,
    search: Option<RunningSearch>,
}

impl Uci {
    fn new(engine: Engine) -> Self {
        Self {
            engine,
            position: Position::startpos(),
            search: None,
        }
    }

    /// Handle one input line. Returns false on `quit`.
    fn handle(&mut self, line: &str) -> Result<bool> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = parts.split_first() else {
            return Ok(true);
        };

        match command {
            "uci" => {
                send(concat!("id name chess_search ", env!("CARGO_PKG_VERSION")));
                send("id author ML-chess");
                send("uciok");
            }
            "isready" => send("readyok"),
            "ucinewgame" => {
                self.finish_search();
                self.position = Position::startpos();
            }
            "position" => {
                self.finish_search();
                match parse_position(args) {
                    Ok(pos) => self.position = pos,
                    Err(e) => warn!(error = %format!("{e:#}"), line, "ignoring bad position command"),
                }
            }
            "go" => {
                self.finish_search();
                self.start_search(&parse_go(args))?;
            }
            "stop" => self.finish_search(),
            "quit" => return Ok(false),
            _ => debug!(line, "ignoring unknown command"),
        }
        Ok(true)
    }

    fn start_search(&mut self, params: &GoParams) -> Result<()> {
        let engine = match params.depth {
            Some(depth) => Engine::new(self.engine.config().clone().with_max_depth(depth)),
            None => self.engine.clone(),
        };
        let seconds = params.seconds(
            self.position.side_to_move(),
            engine.config().time.max_seconds,
        );
        debug!(seconds, depth = ?params.depth, "starting search");

        let stop = Arc::new(AtomicBool::new(false));
        let tm = TimeManager::with_stop_flag(
            seconds,
            &engine.config().time,
            engine.config().search.check_interval,
            Arc::clone(&stop),
        );
        let pos = self.position.clone();

        let handle = thread::Builder::new()
            .name("search".into())
            .spawn(move || match engine.analyse_with(&pos, &tm) {
                Ok(result) => {
                    send(&info_line(&result));
                    send(&format!("bestmove {}", result.best_move));
                }
                Err(e) => {
                    warn!(error = %e, "search refused");
                    send("bestmove 0000");
                }
            })
            .context("failed to spawn search thread")?;

        self.search = Some(RunningSearch { stop, handle });
        Ok(())
    }

    /// Stop a running search and wait for its `bestmove`.
    fn finish_search(&mut self) {
        if let Some(search) = self.search.take() {
            search.stop.store(true, Ordering::SeqCst);
            if search.handle.join().is_err() {
                warn!("search thread panicked");
            }
        }
    }
}

/// `position startpos|fen <fields> [moves <m1> <m2> ...]`
fn parse_position(args: &[&str]) -> Result<Position> {
    let (setup, moves) = match args.iter().position(|&a| a == "moves") {
        Some(i) => (&args[..i], &args[i + 1..]),
        None => (args, &[][..]),
    };

    let mut pos = match setup.split_first() {
        Some((&"startpos", _)) => Position::startpos(),
        Some((&"fen", fields)) => {
            let fen = fields.join(" ");
            Position::from_fen(&fen).with_context(|| format!("bad fen `{fen}`"))?
        }
        _ => bail!("expected `startpos` or `fen`"),
    };
    for mv in moves {
        pos = play_move(&pos, mv).with_context(|| format!("cannot play `{mv}`"))?;
    }
    Ok(pos)
}

#[derive(Debug, Default, PartialEq)]
struct GoParams {
    movetime: Option<Duration>,
    wtime: Option<Duration>,
    btime: Option<Duration>,
    winc: Option<Duration>,
    binc: Option<Duration>,
    movestogo: Option<u32>,
    depth: Option<u8>,
    infinite: bool,
}

impl GoParams {
    /// Seconds to search. Without any clock information the search runs
    /// until `stop` or the depth cap.
    fn seconds(&self, side: Color, max_seconds: f64) -> f64 {
        if self.infinite {
            return max_seconds;
        }
        if let Some(movetime) = self.movetime {
            return movetime.as_secs_f64();
        }
        let (remaining, increment) = match side {
            Color::White => (self.wtime, self.winc),
            Color::Black => (self.btime, self.binc),
        };
        match remaining {
            Some(remaining) => ClockState {
                remaining,
                increment: increment.unwrap_or_default(),
                moves_to_go: self.movestogo,
            }
            .allocate()
            .as_secs_f64(),
            None => max_seconds,
        }
    }
}

fn parse_go(args: &[&str]) -> GoParams {
    // Some GUIs send negative clock values when flagging.
    fn millis(value: Option<&&str>) -> Option<Duration> {
        let ms: i64 = value?.parse().ok()?;
        Some(Duration::from_millis(ms.max(0) as u64))
    }

    let mut params = GoParams::default();
    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1);
        let consumed = match args[i] {
            "movetime" => {
                params.movetime = millis(value);
                2
            }
            "wtime" => {
                params.wtime = millis(value);
                2
            }
            "btime" => {
                params.btime = millis(value);
                2
            }
            "winc" => {
                params.winc = millis(value);
                2
            }
            "binc" => {
                params.binc = millis(value);
                2
            }
            "movestogo" => {
                params.movestogo = value.and_then(|v| v.parse().ok());
                2
            }
            "depth" => {
                params.depth = value.and_then(|v| v.parse().ok());
                2
            }
            "infinite" => {
                params.infinite = true;
                1
            }
            other => {
                debug!(token = other, "ignoring go parameter");
                1
            }
        };
        i += consumed;
    }
    params
}

fn info_line(result: &SearchResult) -> String {
    let score = match result.mate_in() {
        Some(moves) => format!("mate {moves}"),
        None => format!("cp {}", result.score),
    };
    let millis = result.elapsed.as_millis();
    let nps = if result.elapsed.is_zero() {
        0
    } else {
        (result.nodes as f64 / result.elapsed.as_secs_f64()) as u64
    };
    let pv: Vec<String> = result.pv.iter().map(ToString::to_string).collect();
    format!(
        "info depth {} score {score} nodes {} time {millis} nps {nps} pv {}",
        result.depth,
        result.nodes,
        pv.join(" ")
    )
}
