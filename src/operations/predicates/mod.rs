mod cnf;
mod dnf;
mod nnf;
mod sat;

pub use cnf::*;
pub use dnf::*;
pub use nnf::*;
pub use sat::*;
