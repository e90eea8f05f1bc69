//! Variation operators.
//!
//! The engine consumes crossover and mutation only through the [`Crossover`]
//! and [`Mutation`] traits: it hands over parents, receives children, and
//! never looks at the numeric details. Each operator applies its own
//! `probability` internally; `distribution_index` is reported for logging.
//!
//! # Submodules
//!
//! - [`binary`]: Single-point crossover and bit-flip mutation for `bool` genomes
//! - [`permutation`]: PMX / OX crossover and swap mutation for `usize` permutations
//! - [`real`]: SBX crossover and polynomial mutation for bounded `f64` genomes

pub mod binary;
pub mod permutation;
pub mod real;

use crate::error::MoeaError;
use crate::model::Solution;
use rand::Rng;

/// Recombines two parents into one or more children.
pub trait Crossover<V>: Send + Sync {
    /// Probability of recombining a pair of parents.
    fn probability(&self) -> f64;

    /// Spread parameter for operators that have one.
    fn distribution_index(&self) -> Option<f64> {
        None
    }

    /// Operator name used in logs.
    fn name(&self) -> &str;

    /// Produces children from two parents.
    ///
    /// Children are independent copies; the parents are never modified.
    /// When recombination is skipped (by probability) the children are
    /// plain copies of the parents.
    fn execute<R: Rng>(
        &self,
        parent1: &Solution<V>,
        parent2: &Solution<V>,
        rng: &mut R,
    ) -> Vec<Solution<V>>;
}

/// Perturbs a solution in place.
pub trait Mutation<V>: Send + Sync {
    /// Per-variable or per-solution application rate, depending on the operator.
    fn probability(&self) -> f64;

    fn distribution_index(&self) -> Option<f64> {
        None
    }

    fn name(&self) -> &str;

    fn execute<R: Rng>(&self, solution: &mut Solution<V>, rng: &mut R);
}

/// Copies `parent` into an unevaluated child with no attached metrics.
pub(crate) fn offspring_of<V: Clone>(parent: &Solution<V>) -> Solution<V> {
    let mut child = parent.clone();
    child.attributes_mut().clear();
    child
}

pub(crate) fn check_probability(operator: &str, probability: f64) -> Result<f64, MoeaError> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(MoeaError::InvalidOperator(format!(
            "{operator}: probability must be in [0, 1], got {probability}"
        )));
    }
    Ok(probability)
}

pub(crate) fn check_distribution_index(operator: &str, index: f64) -> Result<f64, MoeaError> {
    if index.is_nan() || index < 0.0 {
        return Err(MoeaError::InvalidOperator(format!(
            "{operator}: distribution index must be non-negative, got {index}"
        )));
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attribute;

    #[test]
    fn test_check_probability() {
        assert!(check_probability("x", 0.0).is_ok());
        assert!(check_probability("x", 1.0).is_ok());
        assert!(check_probability("x", -0.1).is_err());
        assert!(check_probability("x", 1.1).is_err());
        assert!(check_probability("x", f64::NAN).is_err());
    }

    #[test]
    fn test_check_distribution_index() {
        assert!(check_distribution_index("x", 20.0).is_ok());
        assert!(check_distribution_index("x", -1.0).is_err());
        assert!(check_distribution_index("x", f64::NAN).is_err());
    }

    #[test]
    fn test_offspring_clears_attributes() {
        let mut parent = Solution::new(vec![1.0], 1, 0);
        parent.attributes_mut().set(Attribute::Fitness, 0.3);
        let child = offspring_of(&parent);
        assert_eq!(child.attribute(Attribute::Fitness), None);
        assert_eq!(parent.attribute(Attribute::Fitness), Some(0.3));
    }
}
