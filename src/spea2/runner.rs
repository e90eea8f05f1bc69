//! SPEA2 search loop execution.
//!
//! [`Spea2`] is the engine as an explicit state machine
//! (`Initialized -> Running -> Terminated`); [`Spea2Runner`] is the one-call
//! entry point that seeds the RNG from the configuration and runs to the end.
//!
//! One generation is:
//! mating selection -> crossover -> mutation -> evaluation ->
//! fitness assignment over archive + offspring -> environmental selection.

use super::archive::environmental_selection;
use super::config::Spea2Config;
use super::fitness::assign_fitness;
use super::selection::binary_tournament;
use super::termination::{
    AnyOf, Progress, StoppingByCancel, StoppingByEvaluations, StoppingByTime,
    TerminationCriterion,
};
use crate::comparator::DominanceComparator;
use crate::error::MoeaError;
use crate::model::{Attribute, Problem, Solution};
use crate::operators::{offspring_of, Crossover, Mutation};
use crate::random::rng_from_option;
use log::{debug, info};
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Lifecycle of a [`Spea2`] engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed; no solution created yet.
    Initialized,
    /// Archive built; generations may run.
    Running,
    /// A termination criterion fired.
    Terminated,
}

/// Result of a SPEA2 run.
#[derive(Debug, Clone)]
pub struct Spea2Result<V> {
    /// Final archive, the approximation of the Pareto front.
    ///
    /// Members carry the fitness attributes of the last generation.
    pub archive: Vec<Solution<V>>,

    /// Total number of problem evaluations.
    pub evaluations: usize,

    /// Completed generations (initialization not counted).
    pub generations: usize,

    /// Whether the cancel flag was raised when the run stopped.
    ///
    /// Read at the generation boundary where termination fired; raising the
    /// flag after that does not change the result.
    pub cancelled: bool,

    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl<V> Spea2Result<V> {
    /// Archive members on the first non-dominated front.
    pub fn non_dominated(&self) -> impl Iterator<Item = &Solution<V>> {
        self.archive
            .iter()
            .filter(|s| s.attribute(Attribute::Rank) == Some(0.0))
    }
}

/// SPEA2 engine bound to one problem and one pair of variation operators.
///
/// # Usage
///
/// ```
/// use u_moea::operators::binary::{BitFlipMutation, SinglePointCrossover};
/// use u_moea::problems::{InstanceSource, Knapsack};
/// use u_moea::random::create_rng;
/// use u_moea::spea2::{RunState, Spea2, Spea2Config};
///
/// let problem = Knapsack::new(InstanceSource::InMemory {
///     capacity: 5.0,
///     weights: vec![2.0, 3.0, 4.0],
///     profits: vec![3.0, 4.0, 5.0],
/// })
/// .unwrap();
/// let crossover = SinglePointCrossover::new(0.9).unwrap();
/// let mutation = BitFlipMutation::new(1.0 / 3.0).unwrap();
/// let config = Spea2Config::default()
///     .with_population_size(10)
///     .with_archive_size(10)
///     .with_max_evaluations(200);
///
/// let mut engine = Spea2::new(&problem, &crossover, &mutation, &config).unwrap();
/// let mut rng = create_rng(42);
/// let result = engine.run(&mut rng);
/// assert_eq!(engine.state(), RunState::Terminated);
/// assert!(result.evaluations >= 200);
/// ```
pub struct Spea2<'a, P: Problem, X, M> {
    problem: &'a P,
    crossover: &'a X,
    mutation: &'a M,
    config: Spea2Config,
    comparator: DominanceComparator,
    termination: AnyOf,
    cancel: Option<StoppingByCancel>,
    cancelled: bool,
    archive: Vec<Solution<P::Variable>>,
    evaluations: usize,
    generations: usize,
    started: Option<Instant>,
    state: RunState,
}

impl<'a, P, X, M> Spea2<'a, P, X, M>
where
    P: Problem,
    X: Crossover<P::Variable>,
    M: Mutation<P::Variable>,
{
    /// Builds an engine in the [`RunState::Initialized`] state.
    ///
    /// The configuration is validated, and a reference point (if any) must
    /// have one value per objective. The evaluation budget and the optional
    /// time limit become termination criteria.
    pub fn new(
        problem: &'a P,
        crossover: &'a X,
        mutation: &'a M,
        config: &Spea2Config,
    ) -> Result<Self, MoeaError> {
        config.validate()?;

        let directions = problem.obj_directions().to_vec();
        if directions.len() != problem.number_of_objectives() {
            return Err(MoeaError::InvalidConfig(format!(
                "{} declares {} objective directions for {} objectives",
                problem.name(),
                directions.len(),
                problem.number_of_objectives()
            )));
        }
        let comparator = match &config.reference_point {
            Some(point) => DominanceComparator::g_dominance(directions, point.clone())?,
            None => DominanceComparator::pareto(directions),
        };

        let mut termination = AnyOf::new().or(StoppingByEvaluations::new(config.max_evaluations));
        if let Some(ms) = config.time_limit_ms {
            termination = termination.or(StoppingByTime::new(Duration::from_millis(ms)));
        }

        Ok(Self {
            problem,
            crossover,
            mutation,
            config: config.clone(),
            comparator,
            termination,
            cancel: None,
            cancelled: false,
            archive: Vec::new(),
            evaluations: 0,
            generations: 0,
            started: None,
            state: RunState::Initialized,
        })
    }

    /// Adds a termination criterion; the run stops when any criterion is met.
    pub fn with_termination(mut self, criterion: impl TerminationCriterion + 'static) -> Self {
        self.termination = std::mem::take(&mut self.termination).or(criterion);
        self
    }

    /// Stops the run at the next generation boundary once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        let cancel = StoppingByCancel::new(flag);
        self.termination = std::mem::take(&mut self.termination).or(cancel.clone());
        self.cancel = Some(cancel);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn archive(&self) -> &[Solution<P::Variable>] {
        &self.archive
    }

    pub fn comparator(&self) -> &DominanceComparator {
        &self.comparator
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn generations(&self) -> usize {
        self.generations
    }

    pub fn progress(&self) -> Progress {
        Progress {
            evaluations: self.evaluations,
            generations: self.generations,
            elapsed: self.started.map(|t| t.elapsed()).unwrap_or_default(),
        }
    }

    /// Creates and evaluates the initial population and builds the first
    /// archive from it. Calling it again restarts the run.
    pub fn init<R: Rng>(&mut self, rng: &mut R) {
        info!(
            "SPEA2 on {}: population {}, archive {}, budget {} evaluations",
            self.problem.name(),
            self.config.population_size,
            self.config.archive_size,
            self.config.max_evaluations
        );
        debug!(
            "Operators: {} (p = {}), {} (p = {})",
            self.crossover.name(),
            self.crossover.probability(),
            self.mutation.name(),
            self.mutation.probability()
        );

        self.started = Some(Instant::now());
        self.generations = 0;
        self.cancelled = false;

        let mut population: Vec<Solution<P::Variable>> = (0..self.config.population_size)
            .map(|_| self.problem.create_solution(rng))
            .collect();
        evaluate_all(self.problem, &mut population, self.config.parallel);
        self.evaluations = population.len();

        assign_fitness(&mut population, &self.comparator);
        self.archive = environmental_selection(population, self.config.archive_size);

        self.state = RunState::Running;
        self.poll_termination();
    }

    /// Runs one generation and returns the resulting state.
    ///
    /// An engine that has not been initialized is initialized first; a
    /// terminated engine is left untouched.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> RunState {
        match self.state {
            RunState::Terminated => return self.state,
            RunState::Initialized => {
                self.init(rng);
                if self.state == RunState::Terminated {
                    return self.state;
                }
            }
            RunState::Running => {}
        }

        let mut offspring = self.reproduce(rng);
        evaluate_all(self.problem, &mut offspring, self.config.parallel);
        self.evaluations += offspring.len();

        let mut union = std::mem::take(&mut self.archive);
        union.extend(offspring);
        assign_fitness(&mut union, &self.comparator);
        self.archive = environmental_selection(union, self.config.archive_size);
        self.generations += 1;

        debug!(
            "Generation {}: {} evaluations, {} non-dominated in archive",
            self.generations,
            self.evaluations,
            self.archive
                .iter()
                .filter(|s| s.attribute(Attribute::RawFitness) == Some(0.0))
                .count()
        );

        self.poll_termination();
        self.state
    }

    /// Runs generations until a termination criterion fires.
    pub fn run<R: Rng>(&mut self, rng: &mut R) -> Spea2Result<P::Variable> {
        if self.state == RunState::Initialized {
            self.init(rng);
        }
        while self.state == RunState::Running {
            self.step(rng);
        }

        let result = self.result();
        info!(
            "SPEA2 finished: {} evaluations, {} generations, {} non-dominated{}",
            result.evaluations,
            result.generations,
            result.non_dominated().count(),
            if result.cancelled { " (cancelled)" } else { "" }
        );
        result
    }

    /// Snapshot of the current archive and counters.
    pub fn result(&self) -> Spea2Result<P::Variable> {
        Spea2Result {
            archive: self.archive.clone(),
            evaluations: self.evaluations,
            generations: self.generations,
            cancelled: self.cancelled,
            elapsed: self.progress().elapsed,
        }
    }

    /// Produces `population_size` unevaluated offspring from the archive.
    fn reproduce<R: Rng>(&self, rng: &mut R) -> Vec<Solution<P::Variable>> {
        let n = self.config.population_size;
        let mut offspring = Vec::with_capacity(n);

        while offspring.len() < n {
            let p1 = binary_tournament(&self.archive, &self.comparator, rng);
            let p2 = binary_tournament(&self.archive, &self.comparator, rng);

            let mut children =
                self.crossover
                    .execute(&self.archive[p1], &self.archive[p2], rng);
            if children.is_empty() {
                children.push(offspring_of(&self.archive[p1]));
            }

            for mut child in children {
                if offspring.len() >= n {
                    break;
                }
                self.mutation.execute(&mut child, rng);
                offspring.push(child);
            }
        }

        offspring
    }

    fn poll_termination(&mut self) {
        if self.termination.is_met(&self.progress()) {
            self.cancelled = self.cancel.as_ref().is_some_and(StoppingByCancel::is_cancelled);
            self.state = RunState::Terminated;
        }
    }
}

/// One-call SPEA2 execution.
///
/// # Usage
///
/// ```ignore
/// let config = Spea2Config::default().with_seed(42);
/// let result = Spea2Runner::run(&problem, &crossover, &mutation, &config)?;
/// for s in result.non_dominated() {
///     println!("{:?}", s.objectives());
/// }
/// ```
pub struct Spea2Runner;

impl Spea2Runner {
    /// Runs SPEA2 with an RNG seeded from `config.seed`.
    pub fn run<P, X, M>(
        problem: &P,
        crossover: &X,
        mutation: &M,
        config: &Spea2Config,
    ) -> Result<Spea2Result<P::Variable>, MoeaError>
    where
        P: Problem,
        X: Crossover<P::Variable>,
        M: Mutation<P::Variable>,
    {
        Self::run_with_cancel(problem, crossover, mutation, config, None)
    }

    /// Runs SPEA2 with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops at
    /// the end of the current generation and returns the archive so far.
    pub fn run_with_cancel<P, X, M>(
        problem: &P,
        crossover: &X,
        mutation: &M,
        config: &Spea2Config,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<Spea2Result<P::Variable>, MoeaError>
    where
        P: Problem,
        X: Crossover<P::Variable>,
        M: Mutation<P::Variable>,
    {
        let mut engine = Spea2::new(problem, crossover, mutation, config)?;
        if let Some(flag) = cancel {
            engine = engine.with_cancel(flag);
        }
        let mut rng = rng_from_option(config.seed);
        Ok(engine.run(&mut rng))
    }
}

/// Evaluates every solution; all are evaluated before this returns.
#[cfg(feature = "parallel")]
fn evaluate_all<P: Problem>(problem: &P, solutions: &mut [Solution<P::Variable>], parallel: bool) {
    if parallel {
        solutions.par_iter_mut().for_each(|s| problem.evaluate(s));
    } else {
        solutions.iter_mut().for_each(|s| problem.evaluate(s));
    }
}

#[cfg(not(feature = "parallel"))]
fn evaluate_all<P: Problem>(problem: &P, solutions: &mut [Solution<P::Variable>], _parallel: bool) {
    solutions.iter_mut().for_each(|s| problem.evaluate(s));
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::binary::{BitFlipMutation, SinglePointCrossover};
    use crate::operators::permutation::{PmxCrossover, SwapMutation};
    use crate::operators::real::{PolynomialMutation, SbxCrossover};
    use crate::problems::{InstanceSource, Knapsack, KnapsackPermutation, Zdt1};
    use crate::random::create_rng;
    use std::sync::atomic::Ordering;

    fn small_instance() -> InstanceSource {
        InstanceSource::InMemory {
            capacity: 5.0,
            weights: vec![2.0, 3.0, 4.0, 5.0],
            profits: vec![3.0, 4.0, 5.0, 6.0],
        }
    }

    fn knapsack_config() -> Spea2Config {
        Spea2Config::default()
            .with_population_size(20)
            .with_archive_size(20)
            .with_max_evaluations(2_000)
            .with_parallel(false)
    }

    fn best_feasible_profit(archive: &[Solution<bool>]) -> f64 {
        archive
            .iter()
            .filter(|s| s.is_feasible())
            .map(|s| s.objectives()[0])
            .fold(f64::NEG_INFINITY, f64::max)
    }

    #[test]
    fn test_binary_knapsack_finds_optimum() {
        let problem = Knapsack::new(small_instance()).unwrap();
        let crossover = SinglePointCrossover::new(0.9).unwrap();
        let mutation = BitFlipMutation::new(0.25).unwrap();
        let config = knapsack_config().with_seed(42);

        let result = Spea2Runner::run(&problem, &crossover, &mutation, &config).unwrap();

        assert_eq!(result.archive.len(), 20);
        // items 0 and 1 fill the capacity exactly for a profit of 7
        assert_eq!(best_feasible_profit(&result.archive), 7.0);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_permutation_knapsack_runs() {
        let problem = KnapsackPermutation::new(small_instance()).unwrap();
        let crossover = PmxCrossover::new(0.9).unwrap();
        let mutation = SwapMutation::new(0.2).unwrap();
        let config = knapsack_config().with_seed(7);

        let result = Spea2Runner::run(&problem, &crossover, &mutation, &config).unwrap();

        let best = result
            .archive
            .iter()
            .map(|s| s.objectives()[0])
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(best, 7.0);
        for s in &result.archive {
            let mut sorted = s.variables().to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn test_zdt1_g_dominance_converges() {
        let problem = Zdt1::new(10).unwrap();
        let crossover = SbxCrossover::new(1.0, 20.0, problem.bounds()).unwrap();
        let mutation = PolynomialMutation::new(0.1, 20.0, problem.bounds()).unwrap();
        let config = Spea2Config::default()
            .with_population_size(40)
            .with_archive_size(40)
            .with_max_evaluations(8_000)
            .with_reference_point(vec![0.5, 0.5])
            .with_parallel(false)
            .with_seed(42);

        let result = Spea2Runner::run(&problem, &crossover, &mutation, &config).unwrap();

        assert_eq!(result.archive.len(), 40);
        // a random ZDT1 point has f2 around 5; a converged one lies near 1 - sqrt(f1)
        let mean_gap: f64 = result
            .archive
            .iter()
            .map(|s| {
                let f = s.objectives();
                f[1] - (1.0 - f[0].sqrt())
            })
            .sum::<f64>()
            / result.archive.len() as f64;
        assert!(mean_gap < 1.0, "mean distance to front {mean_gap}");
    }

    #[test]
    fn test_budget_respected() {
        let problem = Knapsack::new(small_instance()).unwrap();
        let crossover = SinglePointCrossover::new(0.9).unwrap();
        let mutation = BitFlipMutation::new(0.25).unwrap();
        let config = knapsack_config().with_max_evaluations(95);

        let mut engine = Spea2::new(&problem, &crossover, &mutation, &config).unwrap();
        let result = engine.run(&mut create_rng(1));

        // 20 initial + 4 generations of 20 = 100: checked at generation boundaries
        assert_eq!(result.evaluations, 100);
        assert_eq!(result.generations, 4);
        assert_eq!(engine.state(), RunState::Terminated);
    }

    #[test]
    fn test_state_machine() {
        let problem = Knapsack::new(small_instance()).unwrap();
        let crossover = SinglePointCrossover::new(0.9).unwrap();
        let mutation = BitFlipMutation::new(0.25).unwrap();
        let config = knapsack_config().with_max_evaluations(60);
        let mut rng = create_rng(3);

        let mut engine = Spea2::new(&problem, &crossover, &mutation, &config).unwrap();
        assert_eq!(engine.state(), RunState::Initialized);
        assert!(engine.archive().is_empty());

        engine.init(&mut rng);
        assert_eq!(engine.state(), RunState::Running);
        assert_eq!(engine.evaluations(), 20);
        assert_eq!(engine.archive().len(), 20);

        assert_eq!(engine.step(&mut rng), RunState::Running);
        assert_eq!(engine.step(&mut rng), RunState::Terminated);
        assert_eq!(engine.evaluations(), 60);

        // no further work once terminated
        assert_eq!(engine.step(&mut rng), RunState::Terminated);
        assert_eq!(engine.generations(), 2);
    }

    #[test]
    fn test_reproducible_with_seed() {
        let problem = Zdt1::new(5).unwrap();
        let crossover = SbxCrossover::new(0.9, 20.0, problem.bounds()).unwrap();
        let mutation = PolynomialMutation::new(0.2, 20.0, problem.bounds()).unwrap();
        let config = Spea2Config::default()
            .with_population_size(12)
            .with_archive_size(12)
            .with_max_evaluations(240)
            .with_parallel(false)
            .with_seed(99);

        let a = Spea2Runner::run(&problem, &crossover, &mutation, &config).unwrap();
        let b = Spea2Runner::run(&problem, &crossover, &mutation, &config).unwrap();
        assert_eq!(a.archive, b.archive);
        assert_eq!(a.evaluations, b.evaluations);
    }

    #[test]
    fn test_cancellation() {
        let problem = Knapsack::new(small_instance()).unwrap();
        let crossover = SinglePointCrossover::new(0.9).unwrap();
        let mutation = BitFlipMutation::new(0.25).unwrap();
        let config = knapsack_config().with_max_evaluations(1_000_000).with_seed(5);

        let flag = Arc::new(AtomicBool::new(true));
        let result =
            Spea2Runner::run_with_cancel(&problem, &crossover, &mutation, &config, Some(flag))
                .unwrap();

        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.evaluations, 20);
        assert_eq!(result.archive.len(), 20);
    }

    #[test]
    fn test_cancel_after_budget_not_reported() {
        let problem = Knapsack::new(small_instance()).unwrap();
        let crossover = SinglePointCrossover::new(0.9).unwrap();
        let mutation = BitFlipMutation::new(0.25).unwrap();
        let config = knapsack_config().with_max_evaluations(60);
        let flag = Arc::new(AtomicBool::new(false));

        let mut engine = Spea2::new(&problem, &crossover, &mutation, &config)
            .unwrap()
            .with_cancel(Arc::clone(&flag));
        let result = engine.run(&mut create_rng(4));
        assert!(!result.cancelled);

        // the budget stopped the run; a later flag must not rewrite that
        flag.store(true, Ordering::Relaxed);
        assert!(!engine.result().cancelled);
        assert_eq!(engine.evaluations(), 60);
    }

    #[test]
    fn test_cancel_mid_run() {
        struct AfterGenerations(usize, Arc<AtomicBool>);
        impl TerminationCriterion for AfterGenerations {
            fn is_met(&self, progress: &Progress) -> bool {
                if progress.generations >= self.0 {
                    self.1.store(true, Ordering::Relaxed);
                }
                false
            }
        }

        let problem = Knapsack::new(small_instance()).unwrap();
        let crossover = SinglePointCrossover::new(0.9).unwrap();
        let mutation = BitFlipMutation::new(0.25).unwrap();
        let config = knapsack_config().with_max_evaluations(1_000_000);
        let flag = Arc::new(AtomicBool::new(false));

        // the trigger criterion is polled before the cancel criterion
        let mut engine = Spea2::new(&problem, &crossover, &mutation, &config)
            .unwrap()
            .with_termination(AfterGenerations(3, Arc::clone(&flag)))
            .with_cancel(flag);
        let result = engine.run(&mut create_rng(11));

        assert!(result.cancelled);
        assert_eq!(result.generations, 3);
    }

    #[test]
    fn test_non_dominated_view() {
        let problem = Zdt1::new(4).unwrap();
        let crossover = SbxCrossover::new(0.9, 20.0, problem.bounds()).unwrap();
        let mutation = PolynomialMutation::new(0.25, 20.0, problem.bounds()).unwrap();
        let config = Spea2Config::default()
            .with_population_size(16)
            .with_archive_size(16)
            .with_max_evaluations(320)
            .with_parallel(false)
            .with_seed(8);

        let result = Spea2Runner::run(&problem, &crossover, &mutation, &config).unwrap();
        let front: Vec<&Solution<f64>> = result.non_dominated().collect();
        assert!(!front.is_empty());
        let cmp = DominanceComparator::pareto(problem.obj_directions().to_vec());
        for a in &front {
            for b in &result.archive {
                assert_ne!(cmp.compare(b, a), crate::comparator::Dominance::Left);
            }
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let problem = Zdt1::new(4).unwrap();
        let crossover = SbxCrossover::new(0.9, 20.0, problem.bounds()).unwrap();
        let mutation = PolynomialMutation::new(0.25, 20.0, problem.bounds()).unwrap();

        let zero = Spea2Config::default().with_archive_size(0);
        assert!(matches!(
            Spea2::new(&problem, &crossover, &mutation, &zero),
            Err(MoeaError::InvalidConfig(_))
        ));

        let wrong_point = Spea2Config::default().with_reference_point(vec![0.5, 0.5, 0.5]);
        assert!(matches!(
            Spea2::new(&problem, &crossover, &mutation, &wrong_point),
            Err(MoeaError::InvalidConfig(_))
        ));
    }
}
