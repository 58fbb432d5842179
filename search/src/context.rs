//! Per-state evaluation memoization.
//!
//! An [`EvaluationContext`] is created for one state (with its g-value and
//! preferred flag) and lives for one round of evaluator lookups — one
//! open-list insertion, or one preferred-operator collection. All lookups
//! of the same evaluator through the same context hit the memo, so DAGs of
//! evaluators are computed once per state.
//!
//! The context also counts fresh evaluator computations; the search loop
//! drains that counter into [`SearchStatistics`] when it is done with the
//! context.
//!
//! [`SearchStatistics`]: crate::statistics::SearchStatistics

use std::collections::HashMap;

use sequent_task::OperatorId;

use crate::evaluator::{evaluator_key, EvaluationResult, EvaluatorRef, INFINITY};
use crate::registry::State;

pub struct EvaluationContext<'a> {
    state: &'a State,
    g: i64,
    preferred: bool,
    calculate_preferred: bool,
    cache: HashMap<*const (), (EvaluatorRef, EvaluationResult)>,
    evaluations: u64,
}

impl<'a> EvaluationContext<'a> {
    #[must_use]
    pub fn new(state: &'a State, g: i64, preferred: bool, calculate_preferred: bool) -> Self {
        Self {
            state,
            g,
            preferred,
            calculate_preferred,
            cache: HashMap::new(),
            evaluations: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &'a State {
        self.state
    }

    /// The g-value of the evaluated state on the path being considered.
    #[must_use]
    pub fn g(&self) -> i64 {
        self.g
    }

    /// Whether the state was reached via a preferred operator.
    #[must_use]
    pub fn is_preferred(&self) -> bool {
        self.preferred
    }

    /// Whether this round is collecting preferred operators.
    #[must_use]
    pub fn is_calculating_preferred(&self) -> bool {
        self.calculate_preferred
    }

    /// The memoized result of `evaluator` on this state.
    pub fn result(&mut self, evaluator: &EvaluatorRef) -> &EvaluationResult {
        self.ensure(evaluator);
        &self.cache[&evaluator_key(evaluator)].1
    }

    /// The evaluator's value; must be finite.
    ///
    /// # Panics
    ///
    /// Panics if the value is infinite. Call sites that tolerate dead ends
    /// use [`value_or_infinity`](Self::value_or_infinity).
    pub fn value(&mut self, evaluator: &EvaluatorRef) -> i64 {
        let value = self.result(evaluator).value();
        assert!(value != INFINITY, "expected finite evaluator value");
        value
    }

    pub fn value_or_infinity(&mut self, evaluator: &EvaluatorRef) -> i64 {
        self.result(evaluator).value()
    }

    pub fn is_infinite(&mut self, evaluator: &EvaluatorRef) -> bool {
        self.result(evaluator).is_infinite()
    }

    /// The preferred operators reported by `evaluator` on this state.
    pub fn preferred_operators(&mut self, evaluator: &EvaluatorRef) -> &[OperatorId] {
        self.ensure(evaluator);
        self.cache[&evaluator_key(evaluator)].1.preferred_operators()
    }

    /// Results memoized so far, for progress tracking and reporting.
    pub fn cached_results(&self) -> impl Iterator<Item = (&EvaluatorRef, &EvaluationResult)> {
        self.cache.values().map(|(evaluator, result)| (evaluator, result))
    }

    /// Drain the fresh-computation counter.
    pub fn take_evaluation_count(&mut self) -> u64 {
        std::mem::take(&mut self.evaluations)
    }

    fn ensure(&mut self, evaluator: &EvaluatorRef) {
        let key = evaluator_key(evaluator);
        if self.cache.contains_key(&key) {
            return;
        }
        let result = evaluator.compute_result(self);
        if result.count_evaluation() {
            self.evaluations += 1;
        }
        self.cache.insert(key, (evaluator.clone(), result));
    }
}
