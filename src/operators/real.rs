//! Operators for bounded real-valued (`f64`) genomes.
//!
//! # References
//!
//! - Deb & Agrawal (1995), "Simulated Binary Crossover for Continuous Search Space"
//! - Deb & Goyal (1996), "A Combined Genetic Adaptive Search (GeneAS) for
//!   Engineering Design"

use super::{check_distribution_index, check_probability, offspring_of, Crossover, Mutation};
use crate::error::MoeaError;
use crate::model::Solution;
use rand::Rng;

const EPS: f64 = 1.0e-14;

fn check_bounds(operator: &str, bounds: &[(f64, f64)]) -> Result<(), MoeaError> {
    if let Some((i, (lo, hi))) = bounds.iter().enumerate().find(|(_, (lo, hi))| lo > hi) {
        return Err(MoeaError::InvalidOperator(format!(
            "{operator}: lower bound {lo} exceeds upper bound {hi} for variable {i}"
        )));
    }
    Ok(())
}

/// Simulated Binary Crossover (SBX).
///
/// `probability` is applied per parent pair; each variable is then
/// recombined with probability 0.5. Children are clamped to `bounds`.
#[derive(Debug, Clone)]
pub struct SbxCrossover {
    probability: f64,
    distribution_index: f64,
    bounds: Vec<(f64, f64)>,
}

impl SbxCrossover {
    pub fn new(
        probability: f64,
        distribution_index: f64,
        bounds: Vec<(f64, f64)>,
    ) -> Result<Self, MoeaError> {
        check_bounds("SbxCrossover", &bounds)?;
        Ok(Self {
            probability: check_probability("SbxCrossover", probability)?,
            distribution_index: check_distribution_index("SbxCrossover", distribution_index)?,
            bounds,
        })
    }

    /// Spread factor for one side of the pair.
    fn betaq(&self, beta: f64, u: f64) -> f64 {
        let alpha = 2.0 - beta.powf(-(self.distribution_index + 1.0));
        if u <= 1.0 / alpha {
            (u * alpha).powf(1.0 / (self.distribution_index + 1.0))
        } else {
            (1.0 / (2.0 - u * alpha)).powf(1.0 / (self.distribution_index + 1.0))
        }
    }
}

impl Crossover<f64> for SbxCrossover {
    fn probability(&self) -> f64 {
        self.probability
    }

    fn distribution_index(&self) -> Option<f64> {
        Some(self.distribution_index)
    }

    fn name(&self) -> &str {
        "SBX crossover"
    }

    fn execute<R: Rng>(
        &self,
        parent1: &Solution<f64>,
        parent2: &Solution<f64>,
        rng: &mut R,
    ) -> Vec<Solution<f64>> {
        let mut child1 = offspring_of(parent1);
        let mut child2 = offspring_of(parent2);

        if rng.random_range(0.0..1.0) > self.probability {
            return vec![child1, child2];
        }

        let n = parent1
            .number_of_variables()
            .min(parent2.number_of_variables())
            .min(self.bounds.len());

        for i in 0..n {
            let x1 = parent1.variables()[i];
            let x2 = parent2.variables()[i];
            if rng.random_range(0.0..1.0) > 0.5 || (x1 - x2).abs() <= EPS {
                continue;
            }

            let (y1, y2) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
            let (lower, upper) = self.bounds[i];
            let u = rng.random_range(0.0..1.0);

            let beta = 1.0 + 2.0 * (y1 - lower) / (y2 - y1);
            let c1 = 0.5 * (y1 + y2 - self.betaq(beta, u) * (y2 - y1));

            let beta = 1.0 + 2.0 * (upper - y2) / (y2 - y1);
            let c2 = 0.5 * (y1 + y2 + self.betaq(beta, u) * (y2 - y1));

            let c1 = c1.clamp(lower, upper);
            let c2 = c2.clamp(lower, upper);

            if rng.random_bool(0.5) {
                child1.variables_mut()[i] = c2;
                child2.variables_mut()[i] = c1;
            } else {
                child1.variables_mut()[i] = c1;
                child2.variables_mut()[i] = c2;
            }
        }

        vec![child1, child2]
    }
}

/// Polynomial mutation.
///
/// Each variable mutates independently with `probability`; the conventional
/// setting is `1 / number_of_variables`.
#[derive(Debug, Clone)]
pub struct PolynomialMutation {
    probability: f64,
    distribution_index: f64,
    bounds: Vec<(f64, f64)>,
}

impl PolynomialMutation {
    pub fn new(
        probability: f64,
        distribution_index: f64,
        bounds: Vec<(f64, f64)>,
    ) -> Result<Self, MoeaError> {
        check_bounds("PolynomialMutation", &bounds)?;
        Ok(Self {
            probability: check_probability("PolynomialMutation", probability)?,
            distribution_index: check_distribution_index("PolynomialMutation", distribution_index)?,
            bounds,
        })
    }
}

impl Mutation<f64> for PolynomialMutation {
    fn probability(&self) -> f64 {
        self.probability
    }

    fn distribution_index(&self) -> Option<f64> {
        Some(self.distribution_index)
    }

    fn name(&self) -> &str {
        "Polynomial mutation"
    }

    fn execute<R: Rng>(&self, solution: &mut Solution<f64>, rng: &mut R) {
        let eta = self.distribution_index;
        let mut_pow = 1.0 / (eta + 1.0);

        for (y, &(yl, yu)) in solution.variables_mut().iter_mut().zip(self.bounds.iter()) {
            if rng.random_range(0.0..1.0) >= self.probability {
                continue;
            }
            if yl == yu {
                *y = yl;
                continue;
            }

            let delta1 = (*y - yl) / (yu - yl);
            let delta2 = (yu - *y) / (yu - yl);
            let u = rng.random_range(0.0..1.0);

            let deltaq = if u <= 0.5 {
                let val = 2.0 * u + (1.0 - 2.0 * u) * (1.0 - delta1).powf(eta + 1.0);
                val.powf(mut_pow) - 1.0
            } else {
                let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * (1.0 - delta2).powf(eta + 1.0);
                1.0 - val.powf(mut_pow)
            };

            *y = (*y + deltaq * (yu - yl)).clamp(yl, yu);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn real(v: &[f64]) -> Solution<f64> {
        Solution::new(v.to_vec(), 2, 0)
    }

    #[test]
    fn test_sbx_children_within_bounds() {
        let bounds = vec![(0.0, 1.0); 5];
        let op = SbxCrossover::new(1.0, 20.0, bounds).unwrap();
        let mut rng = create_rng(42);
        let p1 = real(&[0.0, 0.2, 0.4, 0.9, 1.0]);
        let p2 = real(&[1.0, 0.3, 0.1, 0.95, 0.0]);

        for _ in 0..500 {
            for child in op.execute(&p1, &p2, &mut rng) {
                assert!(child.variables().iter().all(|&x| (0.0..=1.0).contains(&x)));
            }
        }
    }

    #[test]
    fn test_sbx_identical_parents_unchanged() {
        let op = SbxCrossover::new(1.0, 20.0, vec![(0.0, 1.0); 3]).unwrap();
        let mut rng = create_rng(3);
        let p = real(&[0.1, 0.5, 0.9]);
        let children = op.execute(&p, &p, &mut rng);
        assert_eq!(children[0].variables(), p.variables());
        assert_eq!(children[1].variables(), p.variables());
    }

    #[test]
    fn test_sbx_preserves_midpoint() {
        // SBX children are symmetric around the parents' midpoint before clamping
        let op = SbxCrossover::new(1.0, 20.0, vec![(-100.0, 100.0)]).unwrap();
        let mut rng = create_rng(11);
        let p1 = real(&[1.0]);
        let p2 = real(&[3.0]);
        for _ in 0..100 {
            let c = op.execute(&p1, &p2, &mut rng);
            let mid = 0.5 * (c[0].variables()[0] + c[1].variables()[0]);
            assert!((mid - 2.0).abs() < 1e-6, "midpoint drifted to {mid}");
        }
    }

    #[test]
    fn test_polynomial_within_bounds() {
        let op = PolynomialMutation::new(1.0, 20.0, vec![(0.0, 1.0); 4]).unwrap();
        let mut rng = create_rng(42);
        let mut s = real(&[0.0, 0.5, 0.999, 1.0]);
        for _ in 0..500 {
            op.execute(&mut s, &mut rng);
            assert!(s.variables().iter().all(|&x| (0.0..=1.0).contains(&x)));
        }
    }

    #[test]
    fn test_polynomial_probability_zero() {
        let op = PolynomialMutation::new(0.0, 20.0, vec![(0.0, 1.0); 2]).unwrap();
        let mut rng = create_rng(5);
        let mut s = real(&[0.25, 0.75]);
        op.execute(&mut s, &mut rng);
        assert_eq!(s.variables(), &[0.25, 0.75]);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(SbxCrossover::new(1.0, -1.0, vec![(0.0, 1.0)]).is_err());
        assert!(SbxCrossover::new(2.0, 20.0, vec![(0.0, 1.0)]).is_err());
        assert!(PolynomialMutation::new(0.1, 20.0, vec![(1.0, 0.0)]).is_err());
    }

    #[test]
    fn test_reports_parameters() {
        let op = PolynomialMutation::new(0.1, 20.0, vec![(0.0, 1.0)]).unwrap();
        assert_eq!(Mutation::probability(&op), 0.1);
        assert_eq!(Mutation::distribution_index(&op), Some(20.0));
    }
}
