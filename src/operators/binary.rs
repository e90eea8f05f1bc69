//! Operators for binary (`bool`) genomes.

use super::{check_probability, offspring_of, Crossover, Mutation};
use crate::error::MoeaError;
use crate::model::Solution;
use rand::Rng;

/// Single-point crossover: children swap tails after a random cut.
#[derive(Debug, Clone)]
pub struct SinglePointCrossover {
    probability: f64,
}

impl SinglePointCrossover {
    pub fn new(probability: f64) -> Result<Self, MoeaError> {
        Ok(Self {
            probability: check_probability("SinglePointCrossover", probability)?,
        })
    }
}

impl Crossover<bool> for SinglePointCrossover {
    fn probability(&self) -> f64 {
        self.probability
    }

    fn name(&self) -> &str {
        "Single point crossover"
    }

    fn execute<R: Rng>(
        &self,
        parent1: &Solution<bool>,
        parent2: &Solution<bool>,
        rng: &mut R,
    ) -> Vec<Solution<bool>> {
        let mut child1 = offspring_of(parent1);
        let mut child2 = offspring_of(parent2);

        let n = parent1.number_of_variables().min(parent2.number_of_variables());
        if n < 2 || rng.random_range(0.0..1.0) >= self.probability {
            return vec![child1, child2];
        }

        let point = rng.random_range(1..n);
        child1.variables_mut()[point..n].copy_from_slice(&parent2.variables()[point..n]);
        child2.variables_mut()[point..n].copy_from_slice(&parent1.variables()[point..n]);

        vec![child1, child2]
    }
}

/// Bit-flip mutation: each bit flips independently with `probability`.
///
/// The conventional setting is `1 / number_of_bits`.
#[derive(Debug, Clone)]
pub struct BitFlipMutation {
    probability: f64,
}

impl BitFlipMutation {
    pub fn new(probability: f64) -> Result<Self, MoeaError> {
        Ok(Self {
            probability: check_probability("BitFlipMutation", probability)?,
        })
    }
}

impl Mutation<bool> for BitFlipMutation {
    fn probability(&self) -> f64 {
        self.probability
    }

    fn name(&self) -> &str {
        "Bit flip mutation"
    }

    fn execute<R: Rng>(&self, solution: &mut Solution<bool>, rng: &mut R) {
        for bit in solution.variables_mut() {
            if rng.random_range(0.0..1.0) < self.probability {
                *bit = !*bit;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn bits(v: &[bool]) -> Solution<bool> {
        Solution::new(v.to_vec(), 1, 1)
    }

    #[test]
    fn test_crossover_preserves_columns() {
        let p1 = bits(&[true; 8]);
        let p2 = bits(&[false; 8]);
        let op = SinglePointCrossover::new(1.0).unwrap();
        let mut rng = create_rng(42);

        for _ in 0..50 {
            let children = op.execute(&p1, &p2, &mut rng);
            assert_eq!(children.len(), 2);
            for i in 0..8 {
                // each column holds one bit from each parent
                assert_ne!(children[0].variables()[i], children[1].variables()[i]);
            }
            // child1 starts with parent1 and switches exactly once
            assert!(children[0].variables()[0]);
            let switches = children[0]
                .variables()
                .windows(2)
                .filter(|w| w[0] != w[1])
                .count();
            assert_eq!(switches, 1);
        }
    }

    #[test]
    fn test_crossover_probability_zero_copies() {
        let p1 = bits(&[true, false, true, false]);
        let p2 = bits(&[false, true, false, true]);
        let op = SinglePointCrossover::new(0.0).unwrap();
        let mut rng = create_rng(1);
        let children = op.execute(&p1, &p2, &mut rng);
        assert_eq!(children[0].variables(), p1.variables());
        assert_eq!(children[1].variables(), p2.variables());
    }

    #[test]
    fn test_bit_flip_extremes() {
        let mut rng = create_rng(42);
        let mut s = bits(&[true, false, true]);

        BitFlipMutation::new(0.0).unwrap().execute(&mut s, &mut rng);
        assert_eq!(s.variables(), &[true, false, true]);

        BitFlipMutation::new(1.0).unwrap().execute(&mut s, &mut rng);
        assert_eq!(s.variables(), &[false, true, false]);
    }

    #[test]
    fn test_invalid_probability() {
        assert!(SinglePointCrossover::new(1.5).is_err());
        assert!(BitFlipMutation::new(-0.2).is_err());
    }
}
