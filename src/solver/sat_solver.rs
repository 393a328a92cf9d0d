use std::time::Duration;

use crate::datastructures::ClauseList;

/// Answer of a SAT call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SatResult {
    /// A satisfying assignment exists.
    Satisfiable,
    /// No satisfying assignment exists.
    Unsatisfiable,
    /// The solver gave up before it found an answer.
    Timeout,
}

/// A SAT backend consuming signed-integer clauses.
///
/// Implementations decide satisfiability of a [`ClauseList`]. A `timeout` of
/// `None` means the solver may run as long as it needs. Bindings to native
/// solvers live outside of this crate and only have to implement this trait.
pub trait SatSolver {
    /// Decides satisfiability of `clauses`.
    fn solve(&mut self, clauses: &ClauseList, timeout: Option<Duration>) -> SatResult;

    /// The satisfying assignment of the last call that returned
    /// [`SatResult::Satisfiable`], as one signed literal per variable.
    fn model(&self) -> Option<&[i32]> {
        None
    }
}
