//! ZDT1 continuous benchmark.
//!
//! Two minimized objectives over `n` variables in `[0, 1]`:
//!
//! - `f1 = x1`
//! - `g = 1 + 9 * sum(x2..xn) / (n - 1)`
//! - `f2 = g * (1 - sqrt(f1 / g))`
//!
//! The Pareto front is `f2 = 1 - sqrt(f1)`, reached when `x2..xn = 0`.
//!
//! Zitzler, Deb & Thiele (2000), "Comparison of Multiobjective Evolutionary
//! Algorithms: Empirical Results", *Evolutionary Computation* 8(2).

use crate::error::MoeaError;
use crate::model::{ObjectiveDirection, Problem, Solution};
use rand::Rng;

const DIRECTIONS: [ObjectiveDirection; 2] =
    [ObjectiveDirection::Minimize, ObjectiveDirection::Minimize];

#[derive(Debug, Clone)]
pub struct Zdt1 {
    number_of_variables: usize,
}

impl Default for Zdt1 {
    /// The standard 30-variable instance.
    fn default() -> Self {
        Self {
            number_of_variables: 30,
        }
    }
}

impl Zdt1 {
    /// Requires at least two variables.
    pub fn new(number_of_variables: usize) -> Result<Self, MoeaError> {
        if number_of_variables < 2 {
            return Err(MoeaError::InvalidConfig(
                "ZDT1 needs at least 2 variables".into(),
            ));
        }
        Ok(Self {
            number_of_variables,
        })
    }

    /// `[0, 1]` for every variable.
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(0.0, 1.0); self.number_of_variables]
    }
}

impl Problem for Zdt1 {
    type Variable = f64;

    fn name(&self) -> &str {
        "ZDT1"
    }

    fn number_of_variables(&self) -> usize {
        self.number_of_variables
    }

    fn number_of_objectives(&self) -> usize {
        2
    }

    fn number_of_constraints(&self) -> usize {
        0
    }

    fn obj_directions(&self) -> &[ObjectiveDirection] {
        &DIRECTIONS
    }

    fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<f64> {
        let x = (0..self.number_of_variables)
            .map(|_| rng.random_range(0.0..=1.0))
            .collect();
        Solution::new(x, 2, 0)
    }

    fn evaluate(&self, solution: &mut Solution<f64>) {
        let x = solution.variables();
        let f1 = x[0];
        let tail: f64 = x[1..].iter().sum();
        let g = 1.0 + 9.0 * tail / (x.len() - 1) as f64;
        let f2 = g * (1.0 - (f1 / g).sqrt());

        let objectives = solution.objectives_mut();
        objectives[0] = f1;
        objectives[1] = f2;
    }
}
