use std::time::Duration;

use log::debug;

use crate::datastructures::ClauseList;
use crate::handlers::{ComputationHandler, TimeoutHandler, Timer};

use super::{SatResult, SatSolver};

const TIMEOUT_CHECK_INTERVAL: u64 = 1024;

/// Exhaustive reference solver.
///
/// It enumerates all assignments of the variables `1..=variable_count` in
/// binary counting order and is therefore only usable for small problems. It
/// serves as a test oracle and as the default backend of
/// [`is_sat`](crate::operations::predicates::is_sat).
#[derive(Debug, Default)]
pub struct BruteForceSolver {
    model: Option<Vec<i32>>,
}

impl BruteForceSolver {
    /// Creates a new solver.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SatSolver for BruteForceSolver {
    fn solve(&mut self, clauses: &ClauseList, timeout: Option<Duration>) -> SatResult {
        self.model = None;
        let mut handler = timeout.map(|timeout| TimeoutHandler::new(Timer::SingleTimeout(timeout)));
        if let Some(handler) = handler.as_mut() {
            handler.started();
        }
        if clauses.clauses().iter().any(Vec::is_empty) {
            return SatResult::Unsatisfiable;
        }
        let mut values = vec![false; clauses.variable_count() as usize + 1];
        let mut checked = 0_u64;
        loop {
            if clauses.clauses().iter().all(|clause| clause.iter().any(|&lit| holds(&values, lit))) {
                self.model = Some(
                    (1..values.len())
                        .map(|index| {
                            let index = i32::try_from(index).unwrap_or(i32::MAX);
                            if values[index as usize] { index } else { -index }
                        })
                        .collect(),
                );
                debug!("satisfiable after {} candidate assignments", checked + 1);
                return SatResult::Satisfiable;
            }
            if !increment(&mut values) {
                debug!("unsatisfiable after {} candidate assignments", checked + 1);
                return SatResult::Unsatisfiable;
            }
            checked += 1;
            if checked % TIMEOUT_CHECK_INTERVAL == 0 && handler.as_mut().is_some_and(TimeoutHandler::timed_out) {
                debug!("timeout after {checked} candidate assignments");
                return SatResult::Timeout;
            }
        }
    }

    fn model(&self) -> Option<&[i32]> {
        self.model.as_deref()
    }
}

fn holds(values: &[bool], lit: i32) -> bool {
    values[lit.unsigned_abs() as usize] == (lit > 0)
}

/// Advances to the next assignment; `false` after the last one. Slot 0 is
/// unused.
fn increment(values: &mut [bool]) -> bool {
    for value in values.iter_mut().skip(1) {
        if *value {
            *value = false;
        } else {
            *value = true;
            return true;
        }
    }
    false
}
