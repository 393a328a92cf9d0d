mod cnf;
mod distributive_law;
mod dnf;
mod flatten;
mod nnf;
mod substitution;
mod subsumption;

pub use cnf::*;
pub use dnf::*;
pub use flatten::*;
pub use nnf::*;
pub use substitution::*;
pub use subsumption::*;
