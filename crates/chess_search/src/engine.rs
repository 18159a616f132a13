//! Value-producing entry points.
//!
//! Positions go in and new positions come out; nothing the caller holds is
//! mutated.

use crate::board::Position;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::moves::parse_move;
use crate::search::{SearchResult, search_position};
use crate::time_control::TimeManager;

/// The standard initial position.
pub fn start_state() -> Position {
    Position::startpos()
}

/// Apply a move given in coordinate notation (`e2e4`, `e7e8q`).
pub fn play_move(pos: &Position, text: &str) -> Result<Position, EngineError> {
    let mv = parse_move(pos, text)?;
    Ok(pos.apply(mv))
}

/// Search for about `seconds` with the default configuration and play the answer.
pub fn search(pos: &Position, seconds: f64) -> Result<(String, Position), EngineError> {
    Engine::default().search(pos, seconds)
}

/// A configured engine. Holds no state between searches.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Time manager for a budget of `seconds`, using this engine's settings.
    pub fn time_manager(&self, seconds: f64) -> TimeManager {
        TimeManager::new(seconds, &self.config.time, self.config.search.check_interval)
    }

    /// Full search report for `pos` within `seconds`.
    pub fn analyse(&self, pos: &Position, seconds: f64) -> Result<SearchResult, EngineError> {
        self.analyse_with(pos, &self.time_manager(seconds))
    }

    /// Like `analyse`, under a caller-built time manager (for example one
    /// sharing a stop flag with another thread).
    pub fn analyse_with(
        &self,
        pos: &Position,
        tm: &TimeManager,
    ) -> Result<SearchResult, EngineError> {
        search_position(pos, &self.config, tm)
    }

    /// Best move in coordinate notation together with the position it leads to.
    pub fn search(
        &self,
        pos: &Position,
        seconds: f64,
    ) -> Result<(String, Position), EngineError> {
        let result = self.analyse(pos, seconds)?;
        Ok((result.best_move.to_notation(), pos.apply(result.best_move)))
    }
}
