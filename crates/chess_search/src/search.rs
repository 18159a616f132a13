//! Negamax search with alpha-beta pruning, driven by iterative deepening.
//!
//! All per-request state (transposition table, killers, node counter) lives
//! in a `Searcher` that is built for one call and dropped afterwards.

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::board::Position;
use crate::config::{EngineConfig, MAX_PLY};
use crate::error::EngineError;
use crate::eval::evaluate;
use crate::movegen::{legal_moves, legal_moves_into, legal_tactical_into};
use crate::moves::Move;
use crate::ordering::{Killers, order_captures, order_moves};
use crate::time_control::TimeManager;
use crate::tt::{Bound, TranspositionTable, score_from_tt};

/// Score of being checkmated at the root. A mate `n` plies away scores
/// `MATE_VALUE - n` for the winner.
pub const MATE_VALUE: i32 = 100_000;

/// Any score at least this large in magnitude is a mate score.
pub const MATE_BOUND: i32 = MATE_VALUE - MAX_PLY as i32 - 1;

const INFINITY: i32 = MATE_VALUE + 1;

/// Why iterative deepening stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Time ran out (or the stop flag was raised) before `max_depth`.
    Interrupted,
    /// `max_depth` completed or a forced mate was proven.
    Exhausted,
}

/// Result of a search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub best_move: Move,
    /// Centipawns from the side to move's point of view, or a mate score.
    pub score: i32,
    /// Deepest completed iteration; 0 means the 1-ply static fallback.
    pub depth: u8,
    pub nodes: u64,
    pub termination: Termination,
    pub elapsed: Duration,
    /// Principal variation starting with `best_move`.
    pub pv: Vec<Move>,
}

impl SearchResult {
    /// Full moves until mate: positive if the side to move mates, negative if it is mated.
    pub fn mate_in(&self) -> Option<i32> {
        if self.score >= MATE_BOUND {
            Some((MATE_VALUE - self.score + 1) / 2)
        } else if self.score <= -MATE_BOUND {
            Some(-(MATE_VALUE + self.score) / 2)
        } else {
            None
        }
    }
}

/// Search `pos` until the time manager says stop or the depth cap is reached.
///
/// Fails with `NoLegalMove` when the game is already over, and with
/// `InvalidPosition` when the position breaks a board invariant.
pub fn search_position(
    pos: &Position,
    config: &EngineConfig,
    tm: &TimeManager,
) -> Result<SearchResult, EngineError> {
    pos.validate()?;
    let status = pos.status();
    if status.is_over() {
        return Err(EngineError::NoLegalMove(status));
    }
    // Configs built field by field skip the clamping done on load.
    let mut config = config.clone();
    config.clamp();
    Ok(Searcher::new(&config, tm).run(pos))
}

struct Searcher<'a> {
    config: &'a EngineConfig,
    tm: &'a TimeManager,
    tt: TranspositionTable,
    killers: Killers,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    fn new(config: &'a EngineConfig, tm: &'a TimeManager) -> Self {
        Self {
            config,
            tm,
            tt: TranspositionTable::new(config.search.tt_entries),
            killers: Killers::new(),
            nodes: 0,
        }
    }

    /// Iterative deepening. Callers guarantee at least one legal move.
    fn run(&mut self, pos: &Position) -> SearchResult {
        let mut root = pos.clone();
        let mut root_moves = legal_moves(pos);

        let (fallback_move, fallback_score) = self.static_choice(&mut root, &root_moves);
        let mut best = SearchResult {
            best_move: fallback_move,
            score: fallback_score,
            depth: 0,
            nodes: self.nodes,
            termination: Termination::Interrupted,
            elapsed: self.tm.elapsed(),
            pv: vec![fallback_move],
        };

        let mut termination = Termination::Exhausted;
        let mut last_depth_time = Duration::ZERO;

        for depth in 1..=self.config.search.max_depth {
            if depth > 1 && !self.tm.should_start_next_depth(last_depth_time) {
                termination = Termination::Interrupted;
                break;
            }

            let depth_start = self.tm.elapsed();
            let previous = best.best_move;
            let Some((mv, score)) = self.search_root(&mut root, &mut root_moves, depth, previous)
            else {
                trace!(depth, nodes = self.nodes, "depth aborted, keeping previous result");
                termination = Termination::Interrupted;
                break;
            };
            last_depth_time = self.tm.elapsed().saturating_sub(depth_start);

            best.best_move = mv;
            best.score = score;
            best.depth = depth;
            best.pv = self.principal_variation(&root, mv, depth);
            debug!(
                depth,
                score,
                nodes = self.nodes,
                best_move = %mv,
                elapsed_ms = self.tm.elapsed().as_millis() as u64,
                "depth complete"
            );

            if score.abs() >= MATE_BOUND {
                break;
            }
        }

        if best.depth == 0 {
            warn!(
                best_move = %best.best_move,
                "no depth completed in time, answering with the 1-ply static choice"
            );
        }

        best.nodes = self.nodes;
        best.termination = termination;
        best.elapsed = self.tm.elapsed();
        info!(
            depth = best.depth,
            score = best.score,
            nodes = best.nodes,
            best_move = %best.best_move,
            termination = ?best.termination,
            elapsed_ms = best.elapsed.as_millis() as u64,
            "search finished"
        );
        best
    }

    /// Best root move by negated static evaluation of each child; first move on ties.
    fn static_choice(&mut self, pos: &mut Position, moves: &[Move]) -> (Move, i32) {
        let mut best = (moves[0], -INFINITY);
        let mut replies = Vec::with_capacity(64);
        for &mv in moves {
            let undo = pos.make_move(mv);
            self.nodes += 1;
            legal_moves_into(pos, &mut replies);
            let score = if replies.is_empty() {
                if pos.in_check(pos.side_to_move()) {
                    MATE_VALUE - 1
                } else {
                    0
                }
            } else {
                -evaluate(pos, &self.config.eval)
            };
            pos.unmake_move(mv, undo);
            if score > best.1 {
                best = (mv, score);
            }
        }
        best
    }

    /// One iteration at the root. `None` when time ran out mid-iteration.
    fn search_root(
        &mut self,
        pos: &mut Position,
        moves: &mut Vec<Move>,
        depth: u8,
        previous_best: Move,
    ) -> Option<(Move, i32)> {
        order_moves(pos, moves, Some(previous_best), self.killers.get(0));

        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best = (moves[0], -INFINITY);

        for &mv in moves.iter() {
            let undo = pos.make_move(mv);
            self.nodes += 1;
            let (score, stopped) = self.negamax(pos, depth - 1, -beta, -alpha, 1);
            pos.unmake_move(mv, undo);

            if stopped {
                return None;
            }
            let score = -score;
            if score > best.1 {
                best = (mv, score);
                alpha = alpha.max(score);
            }
        }

        self.tt.store(pos.hash(), depth, best.1, Bound::Exact, Some(best.0), 0);
        Some(best)
    }

    /// Recursive negamax search with alpha-beta pruning.
    ///
    /// Returns (score, stopped) where stopped indicates the search was aborted
    /// and the score must be discarded.
    fn negamax(
        &mut self,
        pos: &mut Position,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        ply: usize,
    ) -> (i32, bool) {
        if self.tm.should_check(self.nodes) && self.tm.expired() {
            return (0, true);
        }

        // Repetition inside the tree or against game history counts as a draw
        // on its first recurrence.
        if pos.repetition_count() >= 1 || pos.is_insufficient_material() {
            return (0, false);
        }
        // A mate delivered on the hundredth halfmove still wins.
        if pos.is_fifty_move_draw() {
            let mut replies = Vec::new();
            let mated = pos.in_check(pos.side_to_move()) && {
                legal_moves_into(pos, &mut replies);
                replies.is_empty()
            };
            let score = if mated { -(MATE_VALUE - ply as i32) } else { 0 };
            return (score, false);
        }

        if depth == 0 {
            return self.quiescence(pos, alpha, beta, ply, 0);
        }

        let key = pos.hash();
        let mut hash_move = None;
        if let Some(entry) = self.tt.probe(key) {
            hash_move = entry.best_move;
            if entry.depth >= depth {
                let score = score_from_tt(entry.score, ply);
                match entry.bound {
                    Bound::Exact => return (score, false),
                    Bound::Lower if score >= beta => return (score, false),
                    Bound::Upper if score <= alpha => return (score, false),
                    _ => {}
                }
            }
        }

        let mut moves = Vec::with_capacity(64);
        legal_moves_into(pos, &mut moves);
        if moves.is_empty() {
            let score = if pos.in_check(pos.side_to_move()) {
                -(MATE_VALUE - ply as i32)
            } else {
                0
            };
            return (score, false);
        }
        order_moves(pos, &mut moves, hash_move, self.killers.get(ply));

        let alpha_orig = alpha;
        let mut best = -INFINITY;
        let mut best_move = None;

        for mv in moves {
            let undo = pos.make_move(mv);
            self.nodes += 1;
            let (score, stopped) = self.negamax(pos, depth - 1, -beta, -alpha, ply + 1);
            pos.unmake_move(mv, undo);

            if stopped {
                return (0, true);
            }
            let score = -score;

            if score > best {
                best = score;
                best_move = Some(mv);
            }
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                if mv.is_quiet() {
                    self.killers.record(ply, mv);
                }
                break; // Beta cutoff
            }
        }

        let bound = if best <= alpha_orig {
            Bound::Upper
        } else if best >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.store(key, depth, best, bound, best_move, ply);
        (best, false)
    }

    /// Captures-only search below the horizon, with stand-pat.
    ///
    /// When in check every legal move is searched instead, so mates at the
    /// horizon are still seen.
    fn quiescence(
        &mut self,
        pos: &mut Position,
        mut alpha: i32,
        beta: i32,
        ply: usize,
        qdepth: u8,
    ) -> (i32, bool) {
        if self.tm.should_check(self.nodes) && self.tm.expired() {
            return (0, true);
        }

        let in_check = pos.in_check(pos.side_to_move());
        let stand_pat = evaluate(pos, &self.config.eval);
        let exhausted = qdepth >= self.config.search.quiescence_depth;

        let mut moves = Vec::with_capacity(32);
        if in_check {
            legal_moves_into(pos, &mut moves);
            if moves.is_empty() {
                return (-(MATE_VALUE - ply as i32), false);
            }
            if exhausted {
                return (stand_pat, false);
            }
        } else {
            if stand_pat >= beta || exhausted {
                return (stand_pat, false);
            }
            alpha = alpha.max(stand_pat);
            legal_tactical_into(pos, &mut moves);
        }
        order_captures(pos, &mut moves);

        let mut best = if in_check { -INFINITY } else { stand_pat };
        for mv in moves {
            let undo = pos.make_move(mv);
            self.nodes += 1;
            let (score, stopped) = self.quiescence(pos, -beta, -alpha, ply + 1, qdepth + 1);
            pos.unmake_move(mv, undo);

            if stopped {
                return (0, true);
            }
            let score = -score;

            if score > best {
                best = score;
            }
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                break;
            }
        }
        (best, false)
    }

    /// Follow hash moves from the root, stopping at the first missing,
    /// illegal or repeating link.
    fn principal_variation(&self, root: &Position, first: Move, depth: u8) -> Vec<Move> {
        let mut pv = vec![first];
        let mut pos = root.apply(first);
        let mut seen = vec![root.hash(), pos.hash()];

        while pv.len() < depth as usize {
            let Some(mv) = self.tt.probe(pos.hash()).and_then(|e| e.best_move) else {
                break;
            };
            if !legal_moves(&pos).contains(&mv) {
                break;
            }
            pos = pos.apply(mv);
            if seen.contains(&pos.hash()) {
                break;
            }
            seen.push(pos.hash());
            pv.push(mv);
        }
        pv
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
