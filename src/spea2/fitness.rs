//! Strength-based fitness and k-th nearest neighbor density.
//!
//! For a set of `n` solutions:
//!
//! - **Strength** `S(i)`: number of solutions `i` dominates
//! - **Raw fitness** `R(i)`: sum of `S(j)` over all `j` dominating `i`
//!   (0 for non-dominated solutions)
//! - **Density** `D(i) = 1 / (sigma_k(i) + 2)`, where `sigma_k(i)` is the
//!   objective-space distance from `i` to its k-th nearest neighbor and
//!   `k = floor(sqrt(n))`
//! - **Fitness** `F(i) = R(i) + D(i)`, lower is better
//!
//! Since `D(i) < 1`, `F(i) < 1` exactly when `i` is non-dominated.
//!
//! # References
//!
//! Zitzler, Laumanns & Thiele (2001), "SPEA2: Improving the Strength Pareto
//! Evolutionary Algorithm", TIK-Report 103, ETH Zurich.

use crate::comparator::{Dominance, DominanceComparator};
use crate::model::{Attribute, Solution};

/// Offset in the density denominator; keeps density finite and below 1.
pub const DENSITY_OFFSET: f64 = 2.0;

/// Euclidean distance between two objective vectors.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Symmetric matrix of pairwise objective-space distances.
pub fn distance_matrix<V>(solutions: &[Solution<V>]) -> Vec<Vec<f64>> {
    let n = solutions.len();
    let mut d = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let dist = euclidean_distance(solutions[i].objectives(), solutions[j].objectives());
            d[i][j] = dist;
            d[j][i] = dist;
        }
    }
    d
}

/// Neighbor index used for density: `floor(sqrt(n))`, at most `n - 1`.
pub fn density_k(n: usize) -> usize {
    ((n as f64).sqrt() as usize).min(n.saturating_sub(1))
}

/// Assigns strength, raw fitness, density, fitness and rank to every solution.
///
/// Every solution must already be evaluated. The result does not depend on
/// the order of `solutions`.
pub fn assign_fitness<V>(solutions: &mut [Solution<V>], comparator: &DominanceComparator) {
    let n = solutions.len();
    if n == 0 {
        return;
    }

    let mut dominates: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];

    for i in 0..n {
        for j in (i + 1)..n {
            match comparator.compare(&solutions[i], &solutions[j]) {
                Dominance::Left => {
                    dominates[i].push(j);
                    dominated_by[j].push(i);
                }
                Dominance::Right => {
                    dominates[j].push(i);
                    dominated_by[i].push(j);
                }
                Dominance::Neither => {}
            }
        }
    }

    let strength: Vec<usize> = dominates.iter().map(Vec::len).collect();
    let ranks = front_ranks(&dominates, &dominated_by);

    let distances = distance_matrix(solutions);
    let k = density_k(n);

    for (i, solution) in solutions.iter_mut().enumerate() {
        let raw: usize = dominated_by[i].iter().map(|&j| strength[j]).sum();

        let mut row = distances[i].clone();
        row.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        // row[0] is the distance to itself
        let density = 1.0 / (row[k] + DENSITY_OFFSET);

        let attributes = solution.attributes_mut();
        attributes.set(Attribute::Strength, strength[i] as f64);
        attributes.set(Attribute::RawFitness, raw as f64);
        attributes.set(Attribute::Density, density);
        attributes.set(Attribute::Fitness, raw as f64 + density);
        attributes.set(Attribute::Rank, ranks[i] as f64);
    }
}

/// Front index of every solution by successive removal of non-dominated sets.
fn front_ranks(dominates: &[Vec<usize>], dominated_by: &[Vec<usize>]) -> Vec<usize> {
    let n = dominates.len();
    let mut remaining: Vec<usize> = dominated_by.iter().map(Vec::len).collect();
    let mut ranks = vec![0usize; n];
    let mut front: Vec<usize> = (0..n).filter(|&i| remaining[i] == 0).collect();
    let mut rank = 0;

    while !front.is_empty() {
        let mut next = Vec::new();
        for &i in &front {
            ranks[i] = rank;
            for &j in &dominates[i] {
                remaining[j] -= 1;
                if remaining[j] == 0 {
                    next.push(j);
                }
            }
        }
        front = next;
        rank += 1;
    }

    ranks
}

// ============================================================================
// Tests
// ============================================================================
