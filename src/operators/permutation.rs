//! Operators for permutation (`usize`) genomes.
//!
//! # Crossover Operators
//!
//! - [`PmxCrossover`]: Goldberg & Lingle (1985), preserves absolute positions
//! - [`OrderCrossover`]: Davis (1985), preserves relative order
//!
//! # Mutation Operators
//!
//! - [`SwapMutation`]: exchange two random positions
//!
//! All operators keep children valid permutations of the parents' indices.

use super::{check_probability, offspring_of, Crossover, Mutation};
use crate::error::MoeaError;
use crate::model::Solution;
use rand::Rng;

/// Partially Mapped Crossover (PMX).
#[derive(Debug, Clone)]
pub struct PmxCrossover {
    probability: f64,
}

impl PmxCrossover {
    pub fn new(probability: f64) -> Result<Self, MoeaError> {
        Ok(Self {
            probability: check_probability("PmxCrossover", probability)?,
        })
    }
}

impl Crossover<usize> for PmxCrossover {
    fn probability(&self) -> f64 {
        self.probability
    }

    fn name(&self) -> &str {
        "Partially matched crossover"
    }

    fn execute<R: Rng>(
        &self,
        parent1: &Solution<usize>,
        parent2: &Solution<usize>,
        rng: &mut R,
    ) -> Vec<Solution<usize>> {
        recombine(parent1, parent2, self.probability, rng, pmx_child)
    }
}

/// Order Crossover (OX).
#[derive(Debug, Clone)]
pub struct OrderCrossover {
    probability: f64,
}

impl OrderCrossover {
    pub fn new(probability: f64) -> Result<Self, MoeaError> {
        Ok(Self {
            probability: check_probability("OrderCrossover", probability)?,
        })
    }
}

impl Crossover<usize> for OrderCrossover {
    fn probability(&self) -> f64 {
        self.probability
    }

    fn name(&self) -> &str {
        "Order crossover"
    }

    fn execute<R: Rng>(
        &self,
        parent1: &Solution<usize>,
        parent2: &Solution<usize>,
        rng: &mut R,
    ) -> Vec<Solution<usize>> {
        recombine(parent1, parent2, self.probability, rng, ox_child)
    }
}

/// Swap mutation: with `probability`, exchange two random positions.
#[derive(Debug, Clone)]
pub struct SwapMutation {
    probability: f64,
}

impl SwapMutation {
    pub fn new(probability: f64) -> Result<Self, MoeaError> {
        Ok(Self {
            probability: check_probability("SwapMutation", probability)?,
        })
    }
}

impl Mutation<usize> for SwapMutation {
    fn probability(&self) -> f64 {
        self.probability
    }

    fn name(&self) -> &str {
        "Swap mutation"
    }

    fn execute<R: Rng>(&self, solution: &mut Solution<usize>, rng: &mut R) {
        let perm = solution.variables_mut();
        let n = perm.len();
        if n < 2 || rng.random_range(0.0..1.0) >= self.probability {
            return;
        }
        let i = rng.random_range(0..n);
        let mut j = rng.random_range(0..n - 1);
        if j >= i {
            j += 1;
        }
        perm.swap(i, j);
    }
}

// ============================================================================
// Kernels
// ============================================================================

fn recombine<R: Rng>(
    parent1: &Solution<usize>,
    parent2: &Solution<usize>,
    probability: f64,
    rng: &mut R,
    build: fn(&[usize], &[usize], usize, usize) -> Vec<usize>,
) -> Vec<Solution<usize>> {
    let mut child1 = offspring_of(parent1);
    let mut child2 = offspring_of(parent2);

    let n = parent1.number_of_variables();
    if n < 2 || n != parent2.number_of_variables() || rng.random_range(0.0..1.0) >= probability {
        return vec![child1, child2];
    }

    let (start, end) = random_segment(n, rng);
    let p1 = parent1.variables();
    let p2 = parent2.variables();
    child1.variables_mut().copy_from_slice(&build(p1, p2, start, end));
    child2.variables_mut().copy_from_slice(&build(p2, p1, start, end));

    vec![child1, child2]
}

/// PMX child: segment `[start, end]` from `template`, the rest mapped from `donor`.
fn pmx_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![usize::MAX; n];
    let mut placed = vec![false; n];
    let mut donor_pos = vec![0usize; n];
    for (i, &v) in donor.iter().enumerate() {
        donor_pos[v] = i;
    }

    for i in start..=end {
        child[i] = template[i];
        placed[template[i]] = true;
    }

    // Values in the donor's segment that were displaced follow the mapping
    // chain until they land outside the segment.
    for i in start..=end {
        let value = donor[i];
        if placed[value] {
            continue;
        }
        let mut pos = i;
        loop {
            let next = donor_pos[template[pos]];
            if next < start || next > end {
                child[next] = value;
                placed[value] = true;
                break;
            }
            pos = next;
        }
    }

    for i in 0..n {
        if child[i] == usize::MAX {
            child[i] = donor[i];
        }
    }

    child
}

/// OX child: segment from `template`, remaining values in `donor` order
/// starting after the segment and wrapping around.
fn ox_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![usize::MAX; n];
    let mut in_segment = vec![false; n];

    for i in start..=end {
        child[i] = template[i];
        in_segment[template[i]] = true;
    }

    let mut pos = (end + 1) % n;
    for offset in 0..n {
        let value = donor[(end + 1 + offset) % n];
        if !in_segment[value] {
            child[pos] = value;
            pos = (pos + 1) % n;
        }
    }

    child
}

/// Random segment `[start, end]` within `0..n`, `start <= end`.
fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
