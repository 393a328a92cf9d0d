use std::time::{Duration, Instant};

use super::{ComputationHandler, FactorizationError, FactorizationHandler};
use crate::formulas::Formula;

/// When a [`TimeoutHandler`] expires.
#[derive(Debug, Clone, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub enum Timer {
    /// Expires the given duration after the handler was created.
    SingleTimeout(Duration),
    /// Expires the given duration after the last call to `started`.
    RestartingTimeout(Duration),
    /// Expires at a fixed point in time.
    FixedEnd(Instant),
}

/// A handler aborting a computation once its [`Timer`] expired.
///
/// It bounds a SAT call of a [`SatSolver`](crate::solver::SatSolver) as well
/// as a CNF/DNF conversion.
#[derive(Debug, Clone, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct TimeoutHandler {
    timer: Timer,
    checkpoint: Instant,
    aborted: bool,
}

impl TimeoutHandler {
    /// Creates a new handler for `timer`.
    pub fn new(timer: Timer) -> Self {
        Self { timer, checkpoint: Instant::now(), aborted: false }
    }

    /// Checks the timer. Returns `true` and marks the handler as aborted if it
    /// expired.
    pub fn timed_out(&mut self) -> bool {
        let expired = match self.timer {
            Timer::SingleTimeout(timeout) | Timer::RestartingTimeout(timeout) => self.checkpoint.elapsed() >= timeout,
            Timer::FixedEnd(end) => Instant::now() >= end,
        };
        self.aborted |= expired;
        self.aborted
    }
}

impl ComputationHandler for TimeoutHandler {
    fn started(&mut self) {
        if matches!(self.timer, Timer::RestartingTimeout(_)) {
            self.checkpoint = Instant::now();
        }
        self.aborted = false;
    }

    fn aborted(&self) -> bool {
        self.aborted
    }
}

impl FactorizationHandler for TimeoutHandler {
    fn performed_distribution(&mut self) -> Result<(), FactorizationError> {
        if self.timed_out() { Err(FactorizationError::TimeoutReached) } else { Ok(()) }
    }

    fn created_clause(&mut self, _clause: &Formula) -> Result<(), FactorizationError> {
        if self.timed_out() { Err(FactorizationError::TimeoutReached) } else { Ok(()) }
    }
}
