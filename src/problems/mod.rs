//! Concrete problem formulations.
//!
//! - [`Knapsack`]: binary-encoded 0/1 knapsack (all-or-nothing penalty)
//! - [`KnapsackPermutation`]: permutation-encoded knapsack (greedy truncation)
//! - [`Zdt1`]: continuous two-objective benchmark

mod knapsack;
mod zdt;

pub use knapsack::{InstanceSource, Knapsack, KnapsackInstance, KnapsackPermutation};
pub use zdt::Zdt1;
