//! Error types surfaced by the engine.
//!
//! Every failure is a deterministic function of the input; nothing here is
//! transient or worth retrying.

use std::path::PathBuf;

use thiserror::Error;

use crate::board::GameStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Malformed coordinate notation, or a move outside the legal set.
    #[error("illegal move `{notation}`: {reason}")]
    IllegalMove { notation: String, reason: String },

    /// `search` was asked to move in a position where the game is over.
    #[error("no legal move to search: game is over by {0}")]
    NoLegalMove(GameStatus),

    /// A board invariant does not hold. Indicates a bug in whoever built the position.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("invalid FEN `{fen}`: {reason}")]
    InvalidFen { fen: String, reason: String },
}

impl EngineError {
    pub(crate) fn illegal(notation: &str, reason: impl Into<String>) -> Self {
        EngineError::IllegalMove {
            notation: notation.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn fen(fen: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidFen {
            fen: fen.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
