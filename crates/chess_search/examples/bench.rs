//! Fixed workloads for profiling.
//!
//! Usage:
//!   cargo run --release --example bench -p chess_search -- perft [depth] [fen]
//!   cargo run --release --example bench -p chess_search -- search [seconds]

use std::env;
use std::time::{Duration, Instant};

use chess_search::{Engine, Position, perft};

const SUITE: &[(&str, &str)] = &[
    ("start", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
    (
        "kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    ("rook endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
    (
        "promotions",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    ),
    (
        "middlegame",
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    ),
];

fn per_second(count: u64, elapsed: Duration) -> f64 {
    if elapsed.is_zero() {
        0.0
    } else {
        count as f64 / elapsed.as_secs_f64()
    }
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let mode = args.first().map(String::as_str).unwrap_or("perft");

    match mode {
        "perft" => {
            let depth: u8 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(5);
            match args.get(2) {
                Some(fen) => run_perft(&[("custom", fen.as_str())], depth),
                None => run_perft(SUITE, depth),
            }
        }
        "search" => {
            let seconds: f64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(1.0);
            run_search(seconds);
        }
        other => eprintln!("unknown mode `{other}`, expected `perft` or `search`"),
    }
}

fn run_perft(positions: &[(&str, &str)], depth: u8) {
    println!("=== perft, depth {depth} ===");
    let mut total_nodes = 0u64;
    let mut total_time = Duration::ZERO;

    for (name, fen) in positions {
        let pos = match Position::from_fen(fen) {
            Ok(pos) => pos,
            Err(e) => {
                eprintln!("{name}: {e}");
                continue;
            }
        };
        let start = Instant::now();
        let nodes = perft(&pos, depth);
        let elapsed = start.elapsed();
        total_nodes += nodes;
        total_time += elapsed;
        println!(
            "{name:.<20} {nodes:>12} nodes in {elapsed:>8.3?} ({:>10.0} nps)",
            per_second(nodes, elapsed)
        );
    }

    println!("{:=<70}", "");
    println!(
        "TOTAL: {total_nodes} nodes in {total_time:.3?} ({:.0} nps)",
        per_second(total_nodes, total_time)
    );
}

fn run_search(seconds: f64) {
    println!("=== search, {seconds}s per position ===");
    let engine = Engine::default();
    let mut total_nodes = 0u64;
    let mut total_time = Duration::ZERO;

    for (name, fen) in SUITE {
        let Ok(pos) = Position::from_fen(fen) else {
            continue;
        };
        match engine.analyse(&pos, seconds) {
            Ok(result) => {
                total_nodes += result.nodes;
                total_time += result.elapsed;
                println!(
                    "{name:.<20} {} depth {:>2} score {:>6} {:>10} nodes ({:>10.0} nps)",
                    result.best_move,
                    result.depth,
                    result.score,
                    result.nodes,
                    per_second(result.nodes, result.elapsed)
                );
            }
            Err(e) => println!("{name:.<20} {e}"),
        }
    }

    println!("{:=<70}", "");
    println!(
        "TOTAL: {total_nodes} nodes in {total_time:.3?} ({:.0} nps)",
        per_second(total_nodes, total_time)
    );
}
