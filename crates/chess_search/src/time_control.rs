//! Time management for a single search request.
//!
//! The deadline is fixed when the manager is created. The stop flag is an
//! `Arc<AtomicBool>`, so another thread holding a clone of the flag can cut
//! a search short at its next node check.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::config::TimeConfig;

/// Moves assumed left in the game when the clock does not say.
pub const DEFAULT_MOVES_TO_GO: u32 = 40;

/// Turn a caller-supplied number of seconds into a usable budget.
///
/// Negative and NaN mean "no time"; anything above `max_seconds` (including
/// infinity) is clamped to it.
pub fn sanitize_seconds(seconds: f64, max_seconds: f64) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds.min(max_seconds)).unwrap_or(Duration::MAX)
}

/// What a chess clock reports for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    pub remaining: Duration,
    pub increment: Duration,
    pub moves_to_go: Option<u32>,
}

impl ClockState {
    /// Time to spend on the next move: an even share of the remaining time
    /// plus the increment, but never more than half of what is left.
    pub fn allocate(&self) -> Duration {
        let moves = self.moves_to_go.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);
        let share = self.remaining / moves + self.increment;
        share.min(self.remaining / 2)
    }
}

/// Deadline and stop flag for one search.
///
/// The `expired()` check is a clock read plus an atomic store, so the search
/// only calls it every `check_interval` nodes.
#[derive(Debug, Clone)]
pub struct TimeManager {
    stopped: Arc<AtomicBool>,
    start: Instant,
    budget: Duration,
    check_interval: u64,
    next_depth_factor: f64,
}

impl TimeManager {
    pub fn new(seconds: f64, config: &TimeConfig, check_interval: u64) -> Self {
        Self::with_stop_flag(
            seconds,
            config,
            check_interval,
            Arc::new(AtomicBool::new(false)),
        )
    }

    /// Like `new`, but sharing a stop flag the caller can raise from elsewhere.
    pub fn with_stop_flag(
        seconds: f64,
        config: &TimeConfig,
        check_interval: u64,
        stopped: Arc<AtomicBool>,
    ) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            budget: sanitize_seconds(seconds, config.max_seconds),
            check_interval: check_interval.max(1),
            next_depth_factor: config.next_depth_factor,
        }
    }

    /// Force stop the search.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Compare the clock with the deadline, latching the stop flag once it passes.
    pub fn expired(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        if self.start.elapsed() >= self.budget {
            self.stop();
            return true;
        }
        false
    }

    /// True every `check_interval` nodes.
    #[inline]
    pub fn should_check(&self, nodes: u64) -> bool {
        nodes.is_multiple_of(self.check_interval)
    }

    /// Whether another iteration is likely to finish, given how long the last one took.
    pub fn should_start_next_depth(&self, last_depth_time: Duration) -> bool {
        if self.expired() {
            return false;
        }
        self.remaining() > last_depth_time.mul_f64(self.next_depth_factor)
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed())
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
