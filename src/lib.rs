#![doc = include_str!("../README.md")]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, missing_docs)]
#![allow(
    clippy::similar_names,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

extern crate pest;
#[macro_use]
extern crate pest_derive;

/// Various datastructures: assignments and clause lists.
pub mod datastructures;
/// The error type of this crate.
pub mod errors;
/// Types and datastructures to represent and manage formulas.
pub mod formulas;
/// Handlers for more control during some calculations.
pub mod handlers;
/// Functions, Predicates, and Transformations for formulas.
pub mod operations;
pub mod parser;
/// Interface to SAT backends and a small reference solver.
pub mod solver;
/// Additional utility.
pub mod util;
