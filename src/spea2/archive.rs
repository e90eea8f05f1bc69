//! Environmental selection: building the next archive.
//!
//! 1. Every non-dominated solution (raw fitness < 1) is kept.
//! 2. If that is fewer than the capacity, the best dominated solutions by
//!    fitness fill the remaining slots.
//! 3. If it is more, solutions are removed one at a time by the archive
//!    truncation operator until the capacity is met exactly.

use super::fitness::distance_matrix;
use crate::model::{Attribute, Solution};
use log::debug;

/// Selects the next archive from fitness-scored `candidates`.
///
/// Candidates must carry [`Attribute::RawFitness`] and [`Attribute::Fitness`]
/// (see [`assign_fitness`](super::assign_fitness)); a missing value is
/// treated as the worst possible.
///
/// The result holds `min(capacity, candidates.len())` solutions.
/// Non-dominated solutions that fit are moved over unmodified.
pub fn environmental_selection<V>(candidates: Vec<Solution<V>>, capacity: usize) -> Vec<Solution<V>> {
    let (mut archive, mut dominated): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|s| s.attribute(Attribute::RawFitness).unwrap_or(f64::INFINITY) < 1.0);

    if archive.len() < capacity {
        dominated.sort_by(|a, b| {
            let fa = a.attribute(Attribute::Fitness).unwrap_or(f64::INFINITY);
            let fb = b.attribute(Attribute::Fitness).unwrap_or(f64::INFINITY);
            fa.partial_cmp(&fb).unwrap_or(std::cmp::Ordering::Equal)
        });
        let missing = capacity - archive.len();
        archive.extend(dominated.into_iter().take(missing));
    } else if archive.len() > capacity {
        debug!(
            "Truncating {} non-dominated solutions to archive size {}",
            archive.len(),
            capacity
        );
        let keep = truncate_by_density(&archive, capacity);
        let mut keep_mask = vec![false; archive.len()];
        for i in keep {
            keep_mask[i] = true;
        }
        archive = archive
            .into_iter()
            .zip(keep_mask)
            .filter_map(|(s, keep)| keep.then_some(s))
            .collect();
    }

    archive
}

/// Archive truncation operator.
///
/// Repeatedly removes the solution closest to its neighbors: solutions are
/// compared by their sorted distances to all other remaining solutions,
/// lexicographically (nearest neighbor first, ties broken by the next
/// nearest, and so on). Distances are re-evaluated after every removal.
/// A complete tie removes the earliest solution.
///
/// Returns the indices of the retained solutions in ascending order.
pub fn truncate_by_density<V>(solutions: &[Solution<V>], capacity: usize) -> Vec<usize> {
    truncation_order(solutions, capacity).1
}

/// Indices removed (in removal order) and retained (ascending).
pub(crate) fn truncation_order<V>(solutions: &[Solution<V>], capacity: usize) -> (Vec<usize>, Vec<usize>) {
    let n = solutions.len();
    if n <= capacity {
        return (Vec::new(), (0..n).collect());
    }

    let distances = distance_matrix(solutions);
    let mut alive = vec![true; n];
    let mut removed = Vec::with_capacity(n - capacity);

    while n - removed.len() > capacity {
        let mut victim: Option<(usize, Vec<f64>)> = None;

        for i in (0..n).filter(|&i| alive[i]) {
            let mut neighbors: Vec<f64> = (0..n)
                .filter(|&j| j != i && alive[j])
                .map(|j| distances[i][j])
                .collect();
            neighbors.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            let closer = match &victim {
                None => true,
                Some((_, best)) => neighbors < *best,
            };
            if closer {
                victim = Some((i, neighbors));
            }
        }

        let Some((i, _)) = victim else { break };
        alive[i] = false;
        removed.push(i);
    }

    let retained = (0..n).filter(|&i| alive[i]).collect();
    (removed, retained)
}

// ============================================================================
// Tests
// ============================================================================
