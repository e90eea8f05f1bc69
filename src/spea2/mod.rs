//! Strength Pareto Evolutionary Algorithm 2 (SPEA2).
//!
//! A generational multi-objective search that keeps a bounded archive of
//! elite solutions. Every generation, offspring bred from the archive are
//! pooled with it, scored by strength-based fitness plus a k-th nearest
//! neighbor density, and the next archive is cut from the pool.
//!
//! # Submodules
//!
//! - [`config`]: Run parameters ([`Spea2Config`])
//! - [`fitness`]: Strength, raw fitness, density and rank assignment
//! - [`archive`]: Environmental selection and archive truncation
//! - [`selection`]: Binary tournament mating selection
//! - [`termination`]: Pluggable stopping criteria
//! - [`runner`]: The engine ([`Spea2`]) and one-call runner ([`Spea2Runner`])
//!
//! # References
//!
//! Zitzler, Laumanns & Thiele (2001), "SPEA2: Improving the Strength Pareto
//! Evolutionary Algorithm", TIK-Report 103, ETH Zurich.

pub mod archive;
pub mod config;
pub mod fitness;
pub mod runner;
pub mod selection;
pub mod termination;

pub use archive::{environmental_selection, truncate_by_density};
pub use config::Spea2Config;
pub use fitness::assign_fitness;
pub use runner::{RunState, Spea2, Spea2Result, Spea2Runner};
pub use selection::binary_tournament;
pub use termination::{
    AnyOf, Progress, StoppingByCancel, StoppingByEvaluations, StoppingByTime,
    TerminationCriterion,
};
