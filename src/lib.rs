//! Multi-objective evolutionary optimization.
//!
//! Provides a generic SPEA2 engine and the pieces it is built from:
//!
//! - **Model**: [`Solution`](model::Solution) with a closed record of
//!   algorithm metrics, and the [`Problem`](model::Problem) contract every
//!   formulation implements.
//! - **Comparator**: Pareto dominance and reference-point G-dominance, with
//!   constraint violation compared first.
//! - **Operators**: crossover and mutation behind the
//!   [`Crossover`](operators::Crossover) / [`Mutation`](operators::Mutation)
//!   traits, for binary, permutation and real-coded genomes.
//! - **SPEA2**: strength/density fitness, environmental selection with
//!   archive truncation, and a generational loop with pluggable termination.
//! - **Problems**: binary and permutation knapsack, and ZDT1.
//! - **I/O**: reference-front reader and front writers.
//!
//! # Example
//!
//! ```
//! use u_moea::operators::real::{PolynomialMutation, SbxCrossover};
//! use u_moea::problems::Zdt1;
//! use u_moea::spea2::{Spea2Config, Spea2Runner};
//!
//! let problem = Zdt1::new(10).unwrap();
//! let crossover = SbxCrossover::new(1.0, 20.0, problem.bounds()).unwrap();
//! let mutation = PolynomialMutation::new(0.1, 20.0, problem.bounds()).unwrap();
//! let config = Spea2Config::default()
//!     .with_population_size(20)
//!     .with_archive_size(20)
//!     .with_max_evaluations(400)
//!     .with_seed(42);
//!
//! let result = Spea2Runner::run(&problem, &crossover, &mutation, &config).unwrap();
//! assert_eq!(result.archive.len(), 20);
//! ```
//!
//! # Features
//!
//! - `parallel`: evaluate offspring with rayon when
//!   [`Spea2Config::parallel`](spea2::Spea2Config::parallel) is set
//! - `serde`: `Serialize`/`Deserialize` for configuration and solutions

pub mod comparator;
pub mod error;
pub mod io;
pub mod model;
pub mod operators;
pub mod problems;
pub mod random;
pub mod spea2;

pub use error::MoeaError;
