mod evaluation;
mod formula_depth_function;
mod literals;

pub use evaluation::*;
pub use formula_depth_function::*;
pub use literals::*;
