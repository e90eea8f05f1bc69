//! Solution representation and the problem contract.
//!
//! # Key Types
//!
//! - [`Solution`]: Fixed-shape container of variables, objectives, constraints
//! - [`Attributes`]: Closed record of algorithm metrics keyed by [`Attribute`]
//! - [`Problem`]: Factory and evaluator implemented by every problem formulation

mod problem;
mod solution;

pub use problem::{ObjectiveDirection, Problem};
pub use solution::{Attribute, Attributes, Solution};
