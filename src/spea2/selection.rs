//! Mating selection over the archive.

use crate::comparator::{Dominance, DominanceComparator};
use crate::model::{Attribute, Solution};
use rand::Rng;

/// Binary tournament: draws two distinct archive members uniformly and
/// returns the index of the winner. A single-member archive returns 0.
///
/// Dominance decides first; mutually non-dominated contestants are ranked
/// by combined fitness (lower wins), and remaining ties by a coin flip.
///
/// # Panics
/// Panics if `archive` is empty.
pub fn binary_tournament<V, R: Rng>(
    archive: &[Solution<V>],
    comparator: &DominanceComparator,
    rng: &mut R,
) -> usize {
    let n = archive.len();
    let i = rng.random_range(0..n);
    if n == 1 {
        return i;
    }
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }

    match comparator.compare(&archive[i], &archive[j]) {
        Dominance::Left => i,
        Dominance::Right => j,
        Dominance::Neither => {
            let fi = archive[i].attribute(Attribute::Fitness).unwrap_or(f64::INFINITY);
            let fj = archive[j].attribute(Attribute::Fitness).unwrap_or(f64::INFINITY);
            if fi < fj {
                i
            } else if fj < fi {
                j
            } else if rng.random_bool(0.5) {
                i
            } else {
                j
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectiveDirection;
    use crate::random::create_rng;

    fn solution(objs: [f64; 2], fitness: f64) -> Solution<f64> {
        let mut s = Solution::new(vec![0.0], 2, 0);
        s.objectives_mut().copy_from_slice(&objs);
        s.attributes_mut().set(Attribute::Fitness, fitness);
        s
    }

    fn comparator() -> DominanceComparator {
        DominanceComparator::pareto(vec![ObjectiveDirection::Minimize; 2])
    }

    #[test]
    fn test_dominated_never_wins() {
        // 0 dominates 1; a worse fitness on 0 must not matter
        let archive = vec![solution([1.0, 1.0], 5.0), solution([2.0, 2.0], 0.1)];
        let mut rng = create_rng(42);
        for _ in 0..200 {
            assert_eq!(binary_tournament(&archive, &comparator(), &mut rng), 0);
        }
    }

    #[test]
    fn test_fitness_breaks_non_dominated_tie() {
        let archive = vec![solution([1.0, 3.0], 0.4), solution([3.0, 1.0], 0.2)];
        let mut rng = create_rng(42);
        for _ in 0..200 {
            assert_eq!(binary_tournament(&archive, &comparator(), &mut rng), 1);
        }
    }

    #[test]
    fn test_full_tie_picks_both() {
        let archive = vec![solution([1.0, 3.0], 0.3), solution([3.0, 1.0], 0.3)];
        let mut rng = create_rng(42);
        let mut wins = [0usize; 2];
        for _ in 0..400 {
            wins[binary_tournament(&archive, &comparator(), &mut rng)] += 1;
        }
        assert!(wins[0] > 50 && wins[1] > 50, "wins {wins:?}");
    }

    #[test]
    fn test_contestants_are_distinct() {
        // 2 is dominated by both others and loses every pairing
        let archive = vec![
            solution([1.0, 1.0], 0.1),
            solution([2.0, 2.0], 1.1),
            solution([3.0, 3.0], 2.1),
        ];
        let mut rng = create_rng(9);
        let mut wins = [0usize; 3];
        for _ in 0..300 {
            wins[binary_tournament(&archive, &comparator(), &mut rng)] += 1;
        }
        assert_eq!(wins[2], 0, "wins {wins:?}");
        assert!(wins[0] > wins[1], "wins {wins:?}");
    }

    #[test]
    fn test_single_member() {
        let archive = vec![solution([1.0, 1.0], 0.5)];
        let mut rng = create_rng(1);
        assert_eq!(binary_tournament(&archive, &comparator(), &mut rng), 0);
    }
}
