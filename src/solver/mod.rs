mod brute_force_solver;
mod sat_solver;

pub use brute_force_solver::*;
pub use sat_solver::*;
