//! 0/1 knapsack in two encodings.
//!
//! Both formulations maximize total profit under a single capacity
//! constraint (`capacity - total_weight`), but they treat over-capacity
//! selections differently:
//!
//! - [`Knapsack`] (binary): all-or-nothing. An over-capacity selection keeps
//!   its negative constraint value and reports a profit of zero, no matter
//!   how far capacity was exceeded.
//! - [`KnapsackPermutation`]: greedy truncation. Items are packed in
//!   permutation order and packing stops at the first item that does not
//!   fit; later items are never considered.
//!
//! # Instance file format
//!
//! ```text
//! <item count>
//! <capacity>
//! <weight> <profit>      (one line per item)
//! ```
//!
//! Blank lines are ignored.

use crate::error::MoeaError;
use crate::model::{ObjectiveDirection, Problem, Solution};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const DIRECTIONS: [ObjectiveDirection; 1] = [ObjectiveDirection::Maximize];

/// Where knapsack instance data comes from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InstanceSource {
    /// Data supplied directly.
    InMemory {
        capacity: f64,
        weights: Vec<f64>,
        profits: Vec<f64>,
    },
    /// Data read from an instance file.
    File { path: PathBuf },
}

/// Immutable knapsack data: capacity plus parallel weight and profit vectors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KnapsackInstance {
    capacity: f64,
    weights: Vec<f64>,
    profits: Vec<f64>,
}

impl KnapsackInstance {
    /// Builds an instance, checking that weights and profits line up.
    pub fn new(capacity: f64, weights: Vec<f64>, profits: Vec<f64>) -> Result<Self, MoeaError> {
        if weights.len() != profits.len() {
            return Err(MoeaError::InvalidInstance(format!(
                "{} weights but {} profits",
                weights.len(),
                profits.len()
            )));
        }
        if !capacity.is_finite() {
            return Err(MoeaError::InvalidInstance(format!(
                "capacity must be finite, got {capacity}"
            )));
        }
        if let Some((i, w)) = weights.iter().enumerate().find(|&(_, w)| !w.is_finite()) {
            return Err(MoeaError::InvalidInstance(format!(
                "weight of item {i} must be finite, got {w}"
            )));
        }
        if let Some((i, p)) = profits.iter().enumerate().find(|&(_, p)| !p.is_finite()) {
            return Err(MoeaError::InvalidInstance(format!(
                "profit of item {i} must be finite, got {p}"
            )));
        }
        Ok(Self {
            capacity,
            weights,
            profits,
        })
    }

    /// Resolves a source into instance data.
    pub fn resolve(source: InstanceSource) -> Result<Self, MoeaError> {
        match source {
            InstanceSource::InMemory {
                capacity,
                weights,
                profits,
            } => Self::new(capacity, weights, profits),
            InstanceSource::File { path } => Self::from_file(path),
        }
    }

    /// Reads an instance file.
    ///
    /// An empty path means no filename was supplied and yields
    /// [`MoeaError::MissingInstance`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MoeaError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(MoeaError::MissingInstance);
        }
        let text = std::fs::read_to_string(path).map_err(|e| MoeaError::io(path, e))?;
        let instance = Self::parse(&text)?;
        debug!(
            "Loaded knapsack instance {:?}: {} items, capacity {}",
            path,
            instance.number_of_items(),
            instance.capacity
        );
        Ok(instance)
    }

    /// Parses instance text (see the module docs for the format).
    pub fn parse(text: &str) -> Result<Self, MoeaError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.split_whitespace().collect::<Vec<_>>()))
            .filter(|(_, tokens)| !tokens.is_empty());

        let (line, tokens) = lines.next().ok_or_else(|| MoeaError::Parse {
            line: 1,
            message: "missing item count".into(),
        })?;
        let item_count: usize = parse_single(line, &tokens, "item count")?;

        let (line, tokens) = lines.next().ok_or_else(|| MoeaError::Parse {
            line: line + 1,
            message: "missing capacity".into(),
        })?;
        let capacity: f64 = parse_single(line, &tokens, "capacity")?;

        let mut weights = Vec::with_capacity(item_count);
        let mut profits = Vec::with_capacity(item_count);
        for (line, tokens) in lines {
            if tokens.len() != 2 {
                return Err(MoeaError::Parse {
                    line,
                    message: format!("expected `weight profit`, found {} fields", tokens.len()),
                });
            }
            weights.push(parse_token(line, tokens[0], "weight")?);
            profits.push(parse_token(line, tokens[1], "profit")?);
        }

        if weights.len() != item_count {
            return Err(MoeaError::InvalidInstance(format!(
                "header declares {item_count} items but {} were listed",
                weights.len()
            )));
        }

        Self::new(capacity, weights, profits)
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn profits(&self) -> &[f64] {
        &self.profits
    }

    pub fn number_of_items(&self) -> usize {
        self.weights.len()
    }
}

/// Parses a header line that must hold exactly one value.
fn parse_single<T: std::str::FromStr>(line: usize, tokens: &[&str], what: &str) -> Result<T, MoeaError> {
    if tokens.len() != 1 {
        return Err(MoeaError::Parse {
            line,
            message: format!("expected a single {what}, found {} fields", tokens.len()),
        });
    }
    parse_token(line, tokens[0], what)
}

fn parse_token<T: std::str::FromStr>(line: usize, token: &str, what: &str) -> Result<T, MoeaError> {
    token.parse().map_err(|_| MoeaError::Parse {
        line,
        message: format!("invalid {what} `{token}`"),
    })
}

/// Binary-encoded knapsack: `variables[i]` selects item `i`.
#[derive(Debug, Clone)]
pub struct Knapsack {
    instance: KnapsackInstance,
}

impl Knapsack {
    pub fn new(source: InstanceSource) -> Result<Self, MoeaError> {
        Ok(Self::from_instance(KnapsackInstance::resolve(source)?))
    }

    pub fn from_instance(instance: KnapsackInstance) -> Self {
        Self { instance }
    }

    pub fn instance(&self) -> &KnapsackInstance {
        &self.instance
    }
}

impl Problem for Knapsack {
    type Variable = bool;

    fn name(&self) -> &str {
        "Knapsack"
    }

    fn number_of_variables(&self) -> usize {
        self.instance.number_of_items()
    }

    fn number_of_objectives(&self) -> usize {
        1
    }

    fn number_of_constraints(&self) -> usize {
        1
    }

    fn obj_directions(&self) -> &[ObjectiveDirection] {
        &DIRECTIONS
    }

    fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<bool> {
        let bits = (0..self.instance.number_of_items())
            .map(|_| rng.random_bool(0.5))
            .collect();
        Solution::new(bits, 1, 1)
    }

    fn evaluate(&self, solution: &mut Solution<bool>) {
        let (mut profit, weight) = solution
            .variables()
            .iter()
            .zip(self.instance.weights.iter().zip(self.instance.profits.iter()))
            .filter(|&(&selected, _)| selected)
            .fold((0.0, 0.0), |(p, w), (_, (&wi, &pi))| (p + pi, w + wi));

        if weight > self.instance.capacity {
            profit = 0.0;
        }

        solution.constraints_mut()[0] = self.instance.capacity - weight;
        solution.objectives_mut()[0] = profit;
    }
}

/// Permutation-encoded knapsack: `variables` is a packing order over item indices.
#[derive(Debug, Clone)]
pub struct KnapsackPermutation {
    instance: KnapsackInstance,
}

impl KnapsackPermutation {
    pub fn new(source: InstanceSource) -> Result<Self, MoeaError> {
        Ok(Self::from_instance(KnapsackInstance::resolve(source)?))
    }

    pub fn from_instance(instance: KnapsackInstance) -> Self {
        Self { instance }
    }

    pub fn instance(&self) -> &KnapsackInstance {
        &self.instance
    }
}

impl Problem for KnapsackPermutation {
    type Variable = usize;

    fn name(&self) -> &str {
        "KnapsackPermutation"
    }

    fn number_of_variables(&self) -> usize {
        self.instance.number_of_items()
    }

    fn number_of_objectives(&self) -> usize {
        1
    }

    fn number_of_constraints(&self) -> usize {
        1
    }

    fn obj_directions(&self) -> &[ObjectiveDirection] {
        &DIRECTIONS
    }

    fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<usize> {
        let mut order: Vec<usize> = (0..self.instance.number_of_items()).collect();
        order.shuffle(rng);
        Solution::new(order, 1, 1)
    }

    fn evaluate(&self, solution: &mut Solution<usize>) {
        let mut profit = 0.0;
        let mut weight = 0.0;

        for &item in solution.variables() {
            let w = self.instance.weights[item];
            if weight + w > self.instance.capacity {
                break;
            }
            weight += w;
            profit += self.instance.profits[item];
        }

        solution.constraints_mut()[0] = self.instance.capacity - weight;
        solution.objectives_mut()[0] = profit;
    }
}

// ============================================================================
// Tests
// ============================================================================
