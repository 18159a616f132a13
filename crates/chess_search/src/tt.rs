//! Transposition table.
//!
//! One table lives for one search request and is handed down the search
//! explicitly. Entries are indexed by the low bits of the zobrist hash and
//! keep the full hash to reject collisions.

use crate::moves::Move;
use crate::search::MATE_BOUND;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Score is exact (PV node).
    Exact,
    /// Score is at least this much (fail-high, cut node).
    Lower,
    /// Score is at most this much (fail-low, all node).
    Upper,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    pub key: u64,
    pub depth: u8,
    /// Mate scores are stored relative to the node, not the root.
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

pub struct TranspositionTable {
    entries: Vec<Option<TtEntry>>,
    mask: usize,
}

impl TranspositionTable {
    /// Capacity is `entries` rounded down to a power of two (at least one).
    pub fn new(entries: usize) -> Self {
        let size = match entries {
            0 | 1 => 1,
            n if n.is_power_of_two() => n,
            n => n.next_power_of_two() >> 1,
        };
        Self {
            entries: vec![None; size],
            mask: size - 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    pub fn probe(&self, key: u64) -> Option<&TtEntry> {
        self.entries[self.index(key)]
            .as_ref()
            .filter(|e| e.key == key)
    }

    /// Store a result searched `ply` plies from the root.
    ///
    /// A slot holding the same position searched deeper is kept.
    pub fn store(
        &mut self,
        key: u64,
        depth: u8,
        score: i32,
        bound: Bound,
        best_move: Option<Move>,
        ply: usize,
    ) {
        let idx = self.index(key);
        if let Some(existing) = &self.entries[idx]
            && existing.key == key
            && existing.depth > depth
        {
            return;
        }
        self.entries[idx] = Some(TtEntry {
            key,
            depth,
            score: score_to_tt(score, ply),
            bound,
            best_move,
        });
    }
}

/// Convert a root-relative mate score to a node-relative one.
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score + ply as i32
    } else if score <= -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

/// Convert a stored node-relative mate score back to root-relative at `ply`.
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score - ply as i32
    } else if score <= -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}

#[cfg(test)]
#[path = "tt_tests.rs"]
mod tt_tests;
