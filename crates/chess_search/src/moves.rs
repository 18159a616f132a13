//! Moves and coordinate notation.
//!
//! A `Move` can only be built inside the crate: the move generator creates
//! them, and text is turned into a `Move` by matching it against the legal
//! set of a position, so a `Move` always carries the right kind tag.

use std::fmt;

use crate::board::Position;
use crate::error::EngineError;
use crate::movegen::legal_moves;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    Capture,
    CastleKingside,
    CastleQueenside,
    EnPassant,
    Promotion { capture: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    from: u8,
    to: u8,
    promo: Option<PieceKind>,
    kind: MoveKind,
}

impl Move {
    pub(crate) fn normal(from: u8, to: u8) -> Self {
        Self {
            from,
            to,
            promo: None,
            kind: MoveKind::Normal,
        }
    }

    pub(crate) fn capture(from: u8, to: u8) -> Self {
        Self {
            from,
            to,
            promo: None,
            kind: MoveKind::Capture,
        }
    }

    pub(crate) fn en_passant(from: u8, to: u8) -> Self {
        Self {
            from,
            to,
            promo: None,
            kind: MoveKind::EnPassant,
        }
    }

    pub(crate) fn castle(from: u8, to: u8) -> Self {
        let kind = if to > from {
            MoveKind::CastleKingside
        } else {
            MoveKind::CastleQueenside
        };
        Self {
            from,
            to,
            promo: None,
            kind,
        }
    }

    pub(crate) fn promotion(from: u8, to: u8, piece: PieceKind, capture: bool) -> Self {
        Self {
            from,
            to,
            promo: Some(piece),
            kind: MoveKind::Promotion { capture },
        }
    }

    pub fn from(self) -> u8 {
        self.from
    }

    pub fn to(self) -> u8 {
        self.to
    }

    pub fn promotion_piece(self) -> Option<PieceKind> {
        self.promo
    }

    pub fn kind(self) -> MoveKind {
        self.kind
    }

    pub fn is_capture(self) -> bool {
        matches!(
            self.kind,
            MoveKind::Capture | MoveKind::EnPassant | MoveKind::Promotion { capture: true }
        )
    }

    pub fn is_castle(self) -> bool {
        matches!(
            self.kind,
            MoveKind::CastleKingside | MoveKind::CastleQueenside
        )
    }

    pub fn is_promotion(self) -> bool {
        self.promo.is_some()
    }

    /// Neither a capture nor a promotion.
    pub fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    /// Coordinate notation: origin, destination, optional promotion letter (`e7e8q`).
    pub fn to_notation(self) -> String {
        let mut s = String::with_capacity(5);
        s.push_str(&sq_to_coord(self.from));
        s.push_str(&sq_to_coord(self.to));
        if let Some(p) = self.promo {
            s.push(p.letter());
        }
        s
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_notation())
    }
}

/// Split coordinate notation into (from, to, promotion) without consulting a position.
fn split_notation(text: &str) -> Result<(u8, u8, Option<PieceKind>), EngineError> {
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(EngineError::illegal(
            text,
            "expected four or five characters of coordinate notation",
        ));
    }
    let from = coord_to_sq(&text[0..2])
        .ok_or_else(|| EngineError::illegal(text, "bad origin square"))?;
    let to = coord_to_sq(&text[2..4])
        .ok_or_else(|| EngineError::illegal(text, "bad destination square"))?;
    let promo = match text[4..].chars().next() {
        None => None,
        Some(c) => match PieceKind::from_letter(c) {
            Some(k @ (PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight)) => {
                Some(k)
            }
            _ => return Err(EngineError::illegal(text, "bad promotion letter")),
        },
    };
    Ok((from, to, promo))
}

/// Resolve coordinate notation against the legal moves of `pos`.
///
/// A promotion must name its piece, and a non-promotion must not; nothing is
/// guessed on the caller's behalf.
pub fn parse_move(pos: &Position, text: &str) -> Result<Move, EngineError> {
    let text = text.trim();
    let (from, to, promo) = split_notation(text)?;

    let mut candidates = legal_moves(pos)
        .into_iter()
        .filter(|m| m.from == from && m.to == to)
        .peekable();

    if candidates.peek().is_none() {
        return Err(EngineError::illegal(text, "not a legal move in this position"));
    }
    candidates
        .find(|m| m.promo == promo)
        .ok_or_else(|| match promo {
            None => EngineError::illegal(text, "promotion piece required"),
            Some(_) => EngineError::illegal(text, "move is not a promotion"),
        })
}

#[cfg(test)]
#[path = "moves_tests.rs"]
mod moves_tests;
