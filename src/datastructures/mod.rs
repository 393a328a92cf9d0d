mod assignment;
mod clause_list;

pub use assignment::*;
pub use clause_list::*;
