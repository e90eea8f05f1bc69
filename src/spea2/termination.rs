//! Termination criteria.
//!
//! A criterion is a predicate over the run's [`Progress`], polled once at
//! every generation boundary and never in the middle of a generation.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Snapshot of a run, handed to termination criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    /// Problem evaluations performed so far.
    pub evaluations: usize,

    /// Completed generations (initialization not counted).
    pub generations: usize,

    /// Wall-clock time since initialization started.
    pub elapsed: Duration,
}

/// Decides when the search loop stops.
pub trait TerminationCriterion: Send + Sync {
    fn is_met(&self, progress: &Progress) -> bool;
}

/// Stops once the evaluation budget is used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoppingByEvaluations {
    pub max_evaluations: usize,
}

impl StoppingByEvaluations {
    pub fn new(max_evaluations: usize) -> Self {
        Self { max_evaluations }
    }
}

impl TerminationCriterion for StoppingByEvaluations {
    fn is_met(&self, progress: &Progress) -> bool {
        progress.evaluations >= self.max_evaluations
    }
}

/// Stops once the wall-clock limit has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoppingByTime {
    pub limit: Duration,
}

impl StoppingByTime {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }
}

impl TerminationCriterion for StoppingByTime {
    fn is_met(&self, progress: &Progress) -> bool {
        progress.elapsed >= self.limit
    }
}

/// Stops when a shared flag is raised, e.g. from another thread.
#[derive(Debug, Clone)]
pub struct StoppingByCancel(pub Arc<AtomicBool>);

impl StoppingByCancel {
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        Self(flag)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl TerminationCriterion for StoppingByCancel {
    fn is_met(&self, _progress: &Progress) -> bool {
        self.is_cancelled()
    }
}

/// Stops as soon as any of its criteria is met.
#[derive(Default)]
pub struct AnyOf(pub Vec<Box<dyn TerminationCriterion>>);

impl AnyOf {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a criterion.
    pub fn or(mut self, criterion: impl TerminationCriterion + 'static) -> Self {
        self.0.push(Box::new(criterion));
        self
    }
}

impl fmt::Debug for AnyOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyOf").field("criteria", &self.0.len()).finish()
    }
}

impl TerminationCriterion for AnyOf {
    fn is_met(&self, progress: &Progress) -> bool {
        self.0.iter().any(|c| c.is_met(progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(evaluations: usize, elapsed_ms: u64) -> Progress {
        Progress {
            evaluations,
            generations: 0,
            elapsed: Duration::from_millis(elapsed_ms),
        }
    }

    #[test]
    fn test_by_evaluations() {
        let c = StoppingByEvaluations::new(100);
        assert!(!c.is_met(&at(99, 0)));
        assert!(c.is_met(&at(100, 0)));
        assert!(c.is_met(&at(140, 0)));
    }

    #[test]
    fn test_by_time() {
        let c = StoppingByTime::new(Duration::from_millis(50));
        assert!(!c.is_met(&at(0, 49)));
        assert!(c.is_met(&at(0, 50)));
    }

    #[test]
    fn test_by_cancel() {
        let flag = Arc::new(AtomicBool::new(false));
        let c = StoppingByCancel::new(Arc::clone(&flag));
        assert!(!c.is_met(&at(0, 0)));
        flag.store(true, Ordering::Relaxed);
        assert!(c.is_met(&at(0, 0)));
    }

    #[test]
    fn test_any_of() {
        let c = AnyOf::new()
            .or(StoppingByEvaluations::new(100))
            .or(StoppingByTime::new(Duration::from_secs(1)));
        assert!(!c.is_met(&at(10, 10)));
        assert!(c.is_met(&at(100, 10)));
        assert!(c.is_met(&at(10, 1000)));
        assert!(!AnyOf::new().is_met(&at(usize::MAX, u64::MAX)));
    }
}
