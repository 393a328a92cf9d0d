mod cache_config;
mod formula;
mod formula_context;
mod formula_context_config;
mod literal;
pub(crate) mod operation_cache;
mod term;
pub mod traversal;
mod variable_map;

/// We deviate from the convention of putting unit tests in the source file in this case,
/// s.t. the files don't become too large
#[cfg(test)]
mod tests;

pub use cache_config::*;
pub use formula::*;
pub use formula_context::*;
pub use formula_context_config::*;
pub use literal::*;
pub use term::*;
pub use variable_map::*;
