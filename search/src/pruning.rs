//! Successor pruning.
//!
//! A [`PruningMethod`] filters the applicable-operator list of an
//! expanded state. The search wraps the configured method in a
//! [`Pruner`], which tracks how many successors went in and came out and
//! reports that at the end of the run.

use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::info;

use sequent_task::{OperatorId, PlanningTask};

use crate::registry::State;

pub trait PruningMethod {
    /// One-time setup before the search starts.
    fn initialize(&mut self, _task: &Rc<PlanningTask>) {}

    /// Remove operators from `op_ids`, keeping relative order of the
    /// survivors.
    fn prune(&mut self, state: &State, op_ids: &mut Vec<OperatorId>);

    /// True if this method never removes anything; lets the wrapper skip
    /// the bookkeeping entirely.
    fn is_noop(&self) -> bool {
        false
    }
}

/// Keeps every successor.
#[derive(Debug, Default)]
pub struct NullPruning;

impl NullPruning {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PruningMethod for NullPruning {
    fn prune(&mut self, _state: &State, _op_ids: &mut Vec<OperatorId>) {}

    fn is_noop(&self) -> bool {
        true
    }
}

/// Runs an inner method only while it pays off.
///
/// After `min_expansions` calls, the inner method is switched off for the
/// rest of the search unless it has pruned at least `min_pruning_ratio`
/// of all successors seen so far.
pub struct LimitedPruning {
    inner: Box<dyn PruningMethod>,
    min_pruning_ratio: f64,
    min_expansions: u64,
    num_calls: u64,
    num_successors_before: u64,
    num_successors_after: u64,
    disabled: bool,
}

impl LimitedPruning {
    #[must_use]
    pub fn new(
        inner: Box<dyn PruningMethod>,
        min_pruning_ratio: f64,
        min_expansions: u64,
    ) -> Self {
        Self {
            inner,
            min_pruning_ratio,
            min_expansions,
            num_calls: 0,
            num_successors_before: 0,
            num_successors_after: 0,
            disabled: false,
        }
    }
}

impl PruningMethod for LimitedPruning {
    fn initialize(&mut self, task: &Rc<PlanningTask>) {
        self.inner.initialize(task);
    }

    fn prune(&mut self, state: &State, op_ids: &mut Vec<OperatorId>) {
        if self.disabled {
            return;
        }
        if self.num_calls == self.min_expansions {
            #[allow(clippy::cast_precision_loss)]
            let pruned_ratio = if self.num_successors_before == 0 {
                0.0
            } else {
                1.0 - self.num_successors_after as f64 / self.num_successors_before as f64
            };
            if pruned_ratio < self.min_pruning_ratio {
                info!(
                    pruned_ratio,
                    threshold = self.min_pruning_ratio,
                    "pruning ratio too low, disabling pruning"
                );
                self.disabled = true;
                return;
            }
        }
        self.num_calls += 1;
        self.num_successors_before += op_ids.len() as u64;
        self.inner.prune(state, op_ids);
        self.num_successors_after += op_ids.len() as u64;
    }
}

/// The search-side wrapper: statistics around any [`PruningMethod`].
pub struct Pruner {
    method: Box<dyn PruningMethod>,
    num_successors_before: u64,
    num_successors_after: u64,
    time_spent: Duration,
}

impl Pruner {
    #[must_use]
    pub fn new(method: Box<dyn PruningMethod>) -> Self {
        Self {
            method,
            num_successors_before: 0,
            num_successors_after: 0,
            time_spent: Duration::ZERO,
        }
    }

    pub fn initialize(&mut self, task: &Rc<PlanningTask>) {
        self.method.initialize(task);
    }

    pub fn prune_operators(&mut self, state: &State, op_ids: &mut Vec<OperatorId>) {
        if self.method.is_noop() {
            return;
        }
        let start = Instant::now();
        self.num_successors_before += op_ids.len() as u64;
        self.method.prune(state, op_ids);
        self.num_successors_after += op_ids.len() as u64;
        self.time_spent += start.elapsed();
    }

    pub fn print_statistics(&self) {
        if self.method.is_noop() {
            return;
        }
        info!(
            "Successors before pruning: {}",
            self.num_successors_before
        );
        info!("Successors after pruning: {}", self.num_successors_after);
        info!("Time for pruning operators: {:?}", self.time_spent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StateRegistry;
    use sequent_task::{PlanningTask, VariableInfo};

    fn state() -> State {
        let task = Rc::new(
            PlanningTask::new(
                vec![VariableInfo {
                    name: "v".to_string(),
                    domain_size: 2,
                    axiom_layer: -1,
                }],
                vec![],
                vec![],
                vec![0],
                vec![],
            )
            .unwrap(),
        );
        StateRegistry::new(task).initial_state()
    }

    /// Drops every second operator; enough to exercise the wrappers.
    struct DropOdd;

    impl PruningMethod for DropOdd {
        fn prune(&mut self, _state: &State, op_ids: &mut Vec<OperatorId>) {
            op_ids.retain(|op| op.0 % 2 == 0);
        }
    }

    #[test]
    fn null_pruning_keeps_everything() {
        let mut pruner = Pruner::new(Box::new(NullPruning::new()));
        let state = state();
        let mut ops = vec![OperatorId(0), OperatorId(1)];
        pruner.prune_operators(&state, &mut ops);
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn pruner_counts_before_and_after() {
        let mut pruner = Pruner::new(Box::new(DropOdd));
        let state = state();
        let mut ops = vec![OperatorId(0), OperatorId(1), OperatorId(2)];
        pruner.prune_operators(&state, &mut ops);
        assert_eq!(ops, vec![OperatorId(0), OperatorId(2)]);
        assert_eq!(pruner.num_successors_before, 3);
        assert_eq!(pruner.num_successors_after, 2);
    }

    #[test]
    fn limited_pruning_disables_when_ratio_too_low() {
        // Inner method prunes nothing, so after min_expansions calls the
        // wrapper must switch off (and stop calling the inner method).
        let mut limited = LimitedPruning::new(Box::new(NullPruning::new()), 0.5, 2);
        let state = state();
        let mut ops = vec![OperatorId(0), OperatorId(1)];
        for _ in 0..5 {
            limited.prune(&state, &mut ops);
        }
        assert!(limited.disabled);
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn limited_pruning_stays_active_when_effective() {
        let mut limited = LimitedPruning::new(Box::new(DropOdd), 0.2, 1);
        let state = state();
        let mut ops = vec![OperatorId(0), OperatorId(1), OperatorId(2), OperatorId(3)];
        limited.prune(&state, &mut ops); // prunes half
        let mut more = vec![OperatorId(1), OperatorId(2)];
        limited.prune(&state, &mut more);
        assert!(!limited.disabled);
        assert_eq!(more, vec![OperatorId(2)]);
    }
}
