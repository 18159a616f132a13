//! Move ordering for the search.
//!
//! Hash move first, then promotions and captures by MVV-LVA, then checks,
//! then the two killers of the ply, then quiet moves that advance toward the
//! enemy, then everything else. The sort is stable, so equal scores keep
//! generator order.

use std::cmp::Reverse;

use crate::board::Position;
use crate::config::MAX_PLY;
use crate::eval::piece_value;
use crate::moves::{Move, MoveKind};
use crate::types::{Color, PieceKind, rank_of};

const HASH_MOVE: i32 = 1_000_000;
const TACTICAL_BASE: i32 = 100_000;
const CHECK: i32 = 50_000;
const KILLER_FIRST: i32 = 40_000;
const KILLER_SECOND: i32 = 39_000;
const ADVANCE: i32 = 1;

/// Two quiet moves per ply that recently caused a beta cutoff.
pub(crate) struct Killers {
    slots: Vec<[Option<Move>; 2]>,
}

impl Killers {
    pub(crate) fn new() -> Self {
        Self {
            slots: vec![[None; 2]; MAX_PLY + 1],
        }
    }

    pub(crate) fn get(&self, ply: usize) -> [Option<Move>; 2] {
        self.slots.get(ply).copied().unwrap_or([None; 2])
    }

    pub(crate) fn record(&mut self, ply: usize, mv: Move) {
        if let Some(slot) = self.slots.get_mut(ply)
            && slot[0] != Some(mv)
        {
            slot[1] = slot[0];
            slot[0] = Some(mv);
        }
    }
}

/// Most valuable victim first; among equal victims, least valuable attacker first.
pub(crate) fn mvv_lva(pos: &Position, mv: Move) -> i32 {
    let victim = match mv.kind() {
        MoveKind::EnPassant => Some(PieceKind::Pawn),
        _ if mv.is_capture() => pos.piece_at(mv.to()).map(|p| p.kind),
        _ => None,
    };
    let attacker = pos.piece_at(mv.from()).map_or(0, |p| p.kind.idx() as i32);
    let mut score = victim.map_or(0, |v| piece_value(v) * 10) - attacker;
    if let Some(promo) = mv.promotion_piece() {
        score += piece_value(promo) * 10;
    }
    score
}

fn gives_check(pos: &mut Position, mv: Move) -> bool {
    let undo = pos.make_move(mv);
    let check = pos.in_check(pos.side_to_move());
    pos.unmake_move(mv, undo);
    check
}

/// True when the move ends on a rank closer to the opponent's side.
fn is_advance(side: Color, mv: Move) -> bool {
    let (from, to) = (rank_of(mv.from()), rank_of(mv.to()));
    match side {
        Color::White => to > from,
        Color::Black => to < from,
    }
}

fn score_move(
    pos: &mut Position,
    mv: Move,
    hash_move: Option<Move>,
    killers: [Option<Move>; 2],
) -> i32 {
    if Some(mv) == hash_move {
        HASH_MOVE
    } else if !mv.is_quiet() {
        TACTICAL_BASE + mvv_lva(pos, mv)
    } else if gives_check(pos, mv) {
        CHECK
    } else if Some(mv) == killers[0] {
        KILLER_FIRST
    } else if Some(mv) == killers[1] {
        KILLER_SECOND
    } else if is_advance(pos.side_to_move(), mv) {
        ADVANCE
    } else {
        0
    }
}

/// Reorder `moves` in place for the main search.
pub(crate) fn order_moves(
    pos: &mut Position,
    moves: &mut Vec<Move>,
    hash_move: Option<Move>,
    killers: [Option<Move>; 2],
) {
    let mut scored: Vec<(i32, Move)> = moves
        .iter()
        .map(|&mv| (score_move(pos, mv, hash_move, killers), mv))
        .collect();
    scored.sort_by_key(|&(s, _)| Reverse(s));
    moves.clear();
    moves.extend(scored.into_iter().map(|(_, mv)| mv));
}

/// Reorder captures for quiescence: MVV-LVA only.
pub(crate) fn order_captures(pos: &Position, moves: &mut [Move]) {
    moves.sort_by_cached_key(|&mv| Reverse(mvv_lva(pos, mv)));
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod ordering_tests;
