//! Candidate solutions and their algorithm-internal metrics.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Algorithm-internal metrics that can be attached to a [`Solution`].
///
/// The set is closed: selection algorithms record what they compute here
/// instead of in an open key/value map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Attribute {
    /// Number of solutions this one dominates.
    Strength,
    /// Sum of the strengths of all solutions dominating this one.
    RawFitness,
    /// Inverse k-th nearest neighbor distance in objective space.
    Density,
    /// `RawFitness + Density`. Lower is better.
    Fitness,
    /// Index of the non-dominated front (0 = Pareto front).
    Rank,
}

impl Attribute {
    /// Number of variants.
    pub const COUNT: usize = 5;

    /// All variants, in storage order.
    pub const ALL: [Attribute; Attribute::COUNT] = [
        Attribute::Strength,
        Attribute::RawFitness,
        Attribute::Density,
        Attribute::Fitness,
        Attribute::Rank,
    ];

    fn slot(self) -> usize {
        match self {
            Attribute::Strength => 0,
            Attribute::RawFitness => 1,
            Attribute::Density => 2,
            Attribute::Fitness => 3,
            Attribute::Rank => 4,
        }
    }
}

/// Typed record of [`Attribute`] values. Unset attributes read as `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attributes {
    values: [Option<f64>; Attribute::COUNT],
}

impl Attributes {
    /// Returns the value of `attribute`, if it has been set.
    pub fn get(&self, attribute: Attribute) -> Option<f64> {
        self.values[attribute.slot()]
    }

    /// Sets `attribute` to `value`, replacing any previous value.
    pub fn set(&mut self, attribute: Attribute, value: f64) {
        self.values[attribute.slot()] = Some(value);
    }

    /// Removes `attribute`.
    pub fn unset(&mut self, attribute: Attribute) {
        self.values[attribute.slot()] = None;
    }

    /// Removes every attribute.
    pub fn clear(&mut self) {
        self.values = [None; Attribute::COUNT];
    }
}

/// A candidate solution: decision variables, objective values, constraint
/// values and attached metrics.
///
/// The shape is fixed at construction. Variables are exposed as slices, so
/// their count can never change; objective and constraint vectors always
/// have the lengths declared by the problem that created the solution.
///
/// Constraint values follow the sign convention `>= 0` satisfied,
/// `< 0` violated by that amount.
///
/// Cloning a solution is a deep copy, which is how solutions move between
/// generations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution<V> {
    variables: Vec<V>,
    objectives: Vec<f64>,
    constraints: Vec<f64>,
    attributes: Attributes,
}

impl<V> Solution<V> {
    /// Creates an unevaluated solution with zeroed objectives and constraints.
    pub fn new(variables: Vec<V>, number_of_objectives: usize, number_of_constraints: usize) -> Self {
        Self {
            variables,
            objectives: vec![0.0; number_of_objectives],
            constraints: vec![0.0; number_of_constraints],
            attributes: Attributes::default(),
        }
    }

    pub fn variables(&self) -> &[V] {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut [V] {
        &mut self.variables
    }

    pub fn number_of_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    pub fn objectives_mut(&mut self) -> &mut [f64] {
        &mut self.objectives
    }

    pub fn number_of_objectives(&self) -> usize {
        self.objectives.len()
    }

    pub fn constraints(&self) -> &[f64] {
        &self.constraints
    }

    pub fn constraints_mut(&mut self) -> &mut [f64] {
        &mut self.constraints
    }

    pub fn number_of_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Shorthand for `attributes().get(attribute)`.
    pub fn attribute(&self, attribute: Attribute) -> Option<f64> {
        self.attributes.get(attribute)
    }

    /// Total amount by which constraints are violated (always `>= 0`).
    pub fn overall_constraint_violation(&self) -> f64 {
        self.constraints
            .iter()
            .filter(|&&c| c < 0.0)
            .map(|c| -c)
            .sum()
    }

    pub fn number_of_violated_constraints(&self) -> usize {
        self.constraints.iter().filter(|&&c| c < 0.0).count()
    }

    /// `true` when no constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.number_of_violated_constraints() == 0
    }
}
