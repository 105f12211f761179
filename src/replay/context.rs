use crate::replay::replay_model::ExpectationResult;

/// Tracks the execution state and results of a running replay.
#[derive(Debug, Clone, Default)]
pub struct ReplayContext {
    /// Engine events dispatched so far
    pub events_dispatched: u64,

    pub expectation_results: Vec<ExpectationResult>,
}

impl ReplayContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, results: Vec<ExpectationResult>) {
        self.expectation_results.extend(results);
    }

    pub fn all_passed(&self) -> bool {
        self.expectation_results.iter().all(|r| r.passed)
    }

    pub fn fail_count(&self) -> usize {
        self.expectation_results.iter().filter(|r| !r.passed).count()
    }
}
