//! SPEA2 configuration.
//!
//! [`Spea2Config`] holds all parameters that control the search loop.

use crate::error::MoeaError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for SPEA2.
///
/// # Defaults
///
/// ```
/// use u_moea::spea2::Spea2Config;
///
/// let config = Spea2Config::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.archive_size, 100);
/// assert_eq!(config.max_evaluations, 25_000);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_moea::spea2::Spea2Config;
///
/// let config = Spea2Config::default()
///     .with_population_size(40)
///     .with_archive_size(40)
///     .with_max_evaluations(25_000)
///     .with_reference_point(vec![0.4, 0.6])
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spea2Config {
    /// Number of offspring produced (and evaluated) per generation.
    ///
    /// This is also the size of the initial random population.
    pub population_size: usize,

    /// Capacity of the elite archive carried across generations.
    pub archive_size: usize,

    /// Evaluation budget. Checked once per generation, so a run may
    /// overshoot by at most one generation's worth of evaluations.
    pub max_evaluations: usize,

    /// Optional wall-clock limit in milliseconds, checked once per generation.
    pub time_limit_ms: Option<u64>,

    /// Reference point for G-dominance, in natural objective units.
    ///
    /// `None` uses plain Pareto dominance.
    pub reference_point: Option<Vec<f64>>,

    /// Whether to evaluate offspring in parallel using rayon.
    ///
    /// Only effective with the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for Spea2Config {
    fn default() -> Self {
        Self {
            population_size: 100,
            archive_size: 100,
            max_evaluations: 25_000,
            time_limit_ms: None,
            reference_point: None,
            parallel: true,
            seed: None,
        }
    }
}

impl Spea2Config {
    /// Sets the number of offspring per generation.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the archive capacity.
    pub fn with_archive_size(mut self, n: usize) -> Self {
        self.archive_size = n;
        self
    }

    /// Sets the evaluation budget.
    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = n;
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Switches the comparator to G-dominance around `point`.
    pub fn with_reference_point(mut self, point: Vec<f64>) -> Self {
        self.reference_point = Some(point);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), MoeaError> {
        if self.population_size == 0 {
            return Err(MoeaError::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        if self.archive_size == 0 {
            return Err(MoeaError::InvalidConfig(
                "archive_size must be at least 1".into(),
            ));
        }
        if self.max_evaluations == 0 {
            return Err(MoeaError::InvalidConfig(
                "max_evaluations must be positive".into(),
            ));
        }
        if self.time_limit_ms == Some(0) {
            return Err(MoeaError::InvalidConfig(
                "time_limit_ms must be positive or None".into(),
            ));
        }
        if let Some(point) = &self.reference_point {
            if point.is_empty() {
                return Err(MoeaError::InvalidConfig(
                    "reference_point must not be empty".into(),
                ));
            }
            if point.iter().any(|v| !v.is_finite()) {
                return Err(MoeaError::InvalidConfig(
                    "reference_point values must be finite".into(),
                ));
            }
        }
        Ok(())
    }
}
