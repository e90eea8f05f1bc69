//! The contract between the search engine and a problem formulation.

use super::solution::Solution;
use rand::Rng;
use std::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Optimization direction of a single objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObjectiveDirection {
    #[default]
    Minimize,
    Maximize,
}

impl ObjectiveDirection {
    /// Factor that turns a value in this direction into minimization form.
    pub fn sign(self) -> f64 {
        match self {
            ObjectiveDirection::Minimize => 1.0,
            ObjectiveDirection::Maximize => -1.0,
        }
    }
}

/// Defines a multi-objective optimization problem.
///
/// A problem is a stateless factory and evaluator. It is constructed once
/// and shared read-only for a whole run; it never holds solutions.
///
/// Objective values are reported in their natural units. Directions are
/// declared by [`obj_directions`](Problem::obj_directions) and applied by the
/// comparators, not by the problem.
///
/// # Implementing
///
/// ```ignore
/// struct Schaffer;
///
/// impl Problem for Schaffer {
///     type Variable = f64;
///
///     fn name(&self) -> &str { "Schaffer" }
///     fn number_of_variables(&self) -> usize { 1 }
///     fn number_of_objectives(&self) -> usize { 2 }
///     fn number_of_constraints(&self) -> usize { 0 }
///     fn obj_directions(&self) -> &[ObjectiveDirection] {
///         &[ObjectiveDirection::Minimize, ObjectiveDirection::Minimize]
///     }
///
///     fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<f64> {
///         Solution::new(vec![rng.random_range(-10.0..10.0)], 2, 0)
///     }
///
///     fn evaluate(&self, solution: &mut Solution<f64>) {
///         let x = solution.variables()[0];
///         solution.objectives_mut().copy_from_slice(&[x * x, (x - 2.0).powi(2)]);
///     }
/// }
/// ```
///
/// # Thread Safety
///
/// `Problem` must be `Send + Sync` so offspring can be evaluated in parallel
/// when the `parallel` feature is enabled.
pub trait Problem: Send + Sync {
    /// Decision variable type (e.g. `bool`, `usize`, `f64`).
    type Variable: Clone + Debug + Send + Sync;

    /// Human-readable problem name.
    fn name(&self) -> &str;

    fn number_of_variables(&self) -> usize;

    fn number_of_objectives(&self) -> usize;

    fn number_of_constraints(&self) -> usize;

    /// One direction per objective.
    fn obj_directions(&self) -> &[ObjectiveDirection];

    /// Creates a random, unevaluated solution.
    fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<Self::Variable>;

    /// Computes objectives and constraints of `solution` in place.
    ///
    /// Previous objective and constraint values are overwritten, never
    /// accumulated. Infeasibility is expressed through negative constraint
    /// values and must not panic.
    fn evaluate(&self, solution: &mut Solution<Self::Variable>);
}
