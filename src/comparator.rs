//! Dominance comparison between solutions.
//!
//! [`DominanceComparator`] orders two solutions by constraint violation
//! first and then by Pareto dominance, optionally biased toward a reference
//! point (G-dominance).
//!
//! # References
//!
//! - Deb (2000), "An efficient constraint handling method for genetic algorithms"
//! - Molina et al. (2009), "g-dominance: Reference point based dominance for
//!   multiobjective metaheuristics", *EJOR* 197(2), 685–692

use crate::error::MoeaError;
use crate::model::{ObjectiveDirection, Solution};
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

impl Dominance {
    /// `-1` when left dominates, `+1` when right dominates, `0` otherwise.
    pub fn signum(self) -> i8 {
        match self {
            Dominance::Left => -1,
            Dominance::Right => 1,
            Dominance::Neither => 0,
        }
    }

    /// Ordering where the dominating solution sorts first.
    pub fn to_ordering(self) -> Ordering {
        match self {
            Dominance::Left => Ordering::Less,
            Dominance::Right => Ordering::Greater,
            Dominance::Neither => Ordering::Equal,
        }
    }

    /// The same relation seen from the other side.
    pub fn reverse(self) -> Self {
        match self {
            Dominance::Left => Dominance::Right,
            Dominance::Right => Dominance::Left,
            Dominance::Neither => Dominance::Neither,
        }
    }
}

/// Kind of dominance relation used by a [`DominanceComparator`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DominanceKind {
    /// Plain Pareto dominance.
    Pareto,
    /// G-dominance around a reference point given in natural objective units.
    GDominance { reference_point: Vec<f64> },
}

/// Compares solutions by constraint violation, then by (G-)dominance.
///
/// Objective values are read in natural units and converted to
/// minimization form with the configured directions. The comparator holds
/// only immutable configuration, so a comparison depends on nothing but
/// its two arguments.
///
/// # Examples
///
/// ```
/// use u_moea::comparator::{Dominance, DominanceComparator};
/// use u_moea::model::ObjectiveDirection;
///
/// let cmp = DominanceComparator::pareto(vec![ObjectiveDirection::Minimize; 2]);
/// assert_eq!(cmp.compare_objectives(&[1.0, 2.0], &[2.0, 2.0]), Dominance::Left);
/// assert_eq!(cmp.compare_objectives(&[1.0, 3.0], &[2.0, 2.0]), Dominance::Neither);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DominanceComparator {
    directions: Vec<ObjectiveDirection>,
    kind: DominanceKind,
}

impl DominanceComparator {
    /// Pareto dominance with the given objective directions.
    pub fn pareto(directions: Vec<ObjectiveDirection>) -> Self {
        Self {
            directions,
            kind: DominanceKind::Pareto,
        }
    }

    /// G-dominance with the given directions and reference point.
    ///
    /// Fails when the reference point and the directions differ in length.
    pub fn g_dominance(
        directions: Vec<ObjectiveDirection>,
        reference_point: Vec<f64>,
    ) -> Result<Self, MoeaError> {
        if reference_point.len() != directions.len() {
            return Err(MoeaError::InvalidConfig(format!(
                "reference point has {} values but the problem has {} objectives",
                reference_point.len(),
                directions.len()
            )));
        }
        Ok(Self {
            directions,
            kind: DominanceKind::GDominance { reference_point },
        })
    }

    pub fn kind(&self) -> &DominanceKind {
        &self.kind
    }

    pub fn directions(&self) -> &[ObjectiveDirection] {
        &self.directions
    }

    /// Compares two solutions.
    ///
    /// The solution with the smaller overall constraint violation wins
    /// outright; equal violations fall through to the objective test.
    pub fn compare<V>(&self, a: &Solution<V>, b: &Solution<V>) -> Dominance {
        let va = a.overall_constraint_violation();
        let vb = b.overall_constraint_violation();
        if va < vb {
            return Dominance::Left;
        }
        if vb < va {
            return Dominance::Right;
        }
        self.compare_objectives(a.objectives(), b.objectives())
    }

    /// Compares two objective vectors (natural units), ignoring constraints.
    pub fn compare_objectives(&self, a: &[f64], b: &[f64]) -> Dominance {
        if let DominanceKind::GDominance { reference_point } = &self.kind {
            let fa = self.g_flag(a, reference_point);
            let fb = self.g_flag(b, reference_point);
            if fa && !fb {
                return Dominance::Left;
            }
            if fb && !fa {
                return Dominance::Right;
            }
        }
        self.pareto_cmp(a, b)
    }

    /// Direction applied to objective `i`; missing entries default to minimize.
    fn sign(&self, i: usize) -> f64 {
        self.directions.get(i).copied().unwrap_or_default().sign()
    }

    fn pareto_cmp(&self, a: &[f64], b: &[f64]) -> Dominance {
        let mut a_better_in_some = false;
        let mut b_better_in_some = false;

        for (i, (&va, &vb)) in a.iter().zip(b.iter()).enumerate() {
            let s = self.sign(i);
            let (va, vb) = (s * va, s * vb);
            if va < vb {
                a_better_in_some = true;
            } else if vb < va {
                b_better_in_some = true;
            }
        }

        match (a_better_in_some, b_better_in_some) {
            (true, false) => Dominance::Left,
            (false, true) => Dominance::Right,
            _ => Dominance::Neither,
        }
    }

    /// A point is flagged when it weakly dominates the reference point or is
    /// weakly dominated by it.
    fn g_flag(&self, objectives: &[f64], reference_point: &[f64]) -> bool {
        let mut all_le = true;
        let mut all_ge = true;
        for (i, (&v, &r)) in objectives.iter().zip(reference_point.iter()).enumerate() {
            let s = self.sign(i);
            let (v, r) = (s * v, s * r);
            if v > r {
                all_le = false;
            }
            if v < r {
                all_ge = false;
            }
        }
        all_le || all_ge
    }
}

// ============================================================================
// Tests
// ============================================================================
