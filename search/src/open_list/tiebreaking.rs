//! Lexicographic open list over several evaluators.
//!
//! The sort key is the tuple of all evaluator values, compared
//! lexicographically; FIFO within equal tuples. The dead-end rules follow
//! the classic, slightly asymmetric contract:
//!
//! - a reliable evaluator reporting infinity kills the state;
//! - with `allow_unsafe_pruning`, the *first* evaluator reporting
//!   infinity kills it too, reliable or not;
//! - otherwise the state only dies when every evaluator agrees.

use std::collections::{BTreeMap, VecDeque};

use crate::context::EvaluationContext;
use crate::evaluator::{EvaluatorRef, OrderedEvaluatorSet};
use crate::open_list::OpenList;
use crate::registry::StateId;

pub struct TieBreakingOpenList {
    buckets: BTreeMap<Vec<i64>, VecDeque<StateId>>,
    size: usize,
    evaluators: Vec<EvaluatorRef>,
    pref_only: bool,
    allow_unsafe_pruning: bool,
}

impl TieBreakingOpenList {
    /// # Panics
    ///
    /// Panics if `evaluators` is empty.
    #[must_use]
    pub fn new(
        evaluators: Vec<EvaluatorRef>,
        pref_only: bool,
        allow_unsafe_pruning: bool,
    ) -> Self {
        assert!(!evaluators.is_empty(), "tie-breaking over zero evaluators");
        Self {
            buckets: BTreeMap::new(),
            size: 0,
            evaluators,
            pref_only,
            allow_unsafe_pruning,
        }
    }
}

impl OpenList for TieBreakingOpenList {
    fn do_insertion(&mut self, ctx: &mut EvaluationContext<'_>, id: StateId) {
        let key: Vec<i64> = self
            .evaluators
            .iter()
            .map(|evaluator| ctx.value_or_infinity(evaluator))
            .collect();
        self.buckets.entry(key).or_default().push_back(id);
        self.size += 1;
    }

    fn remove_min(&mut self) -> StateId {
        assert!(self.size > 0, "remove_min on empty open list");
        let mut entry = self.buckets.first_entry().expect("size > 0");
        let bucket = entry.get_mut();
        let id = bucket.pop_front().expect("buckets are never left empty");
        if bucket.is_empty() {
            entry.remove();
        }
        self.size -= 1;
        id
    }

    fn empty(&self) -> bool {
        self.size == 0
    }

    fn clear(&mut self) {
        self.buckets.clear();
        self.size = 0;
    }

    fn collect_path_dependent(&self, out: &mut OrderedEvaluatorSet) {
        for evaluator in &self.evaluators {
            evaluator.collect_path_dependent(evaluator, out);
        }
    }

    fn is_dead_end(&self, ctx: &mut EvaluationContext<'_>) -> bool {
        if self.is_reliable_dead_end(ctx) {
            return true;
        }
        if self.allow_unsafe_pruning && ctx.is_infinite(&self.evaluators[0]) {
            return true;
        }
        self.evaluators
            .iter()
            .all(|evaluator| ctx.is_infinite(evaluator))
    }

    fn is_reliable_dead_end(&self, ctx: &mut EvaluationContext<'_>) -> bool {
        self.evaluators.iter().any(|evaluator| {
            ctx.is_infinite(evaluator) && evaluator.dead_ends_are_reliable()
        })
    }

    fn only_preferred(&self) -> bool {
        self.pref_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{EvaluationResult, Evaluator, INFINITY};
    use crate::registry::{State, StateRegistry};
    use sequent_task::{PlanningTask, VariableInfo};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Dial {
        value: Cell<i64>,
        reliable: bool,
    }

    impl Dial {
        fn new(value: i64, reliable: bool) -> Rc<Self> {
            Rc::new(Self {
                value: Cell::new(value),
                reliable,
            })
        }
    }

    impl Evaluator for Dial {
        fn description(&self) -> &str {
            "dial"
        }
        fn compute_result(&self, _ctx: &mut EvaluationContext<'_>) -> EvaluationResult {
            EvaluationResult::of(self.value.get())
        }
        fn dead_ends_are_reliable(&self) -> bool {
            self.reliable
        }
    }

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

    #[test]
    fn lexicographic_ordering_with_fifo_ties() {
        let primary = Dial::new(0, true);
        let secondary = Dial::new(0, true);
        let mut list = TieBreakingOpenList::new(
            vec![primary.clone() as EvaluatorRef, secondary.clone() as EvaluatorRef],
            false,
            false,
        );
        let state = state();

        let mut put = |a: i64, b: i64, id: usize| {
            primary.value.set(a);
            secondary.value.set(b);
            let mut ctx = EvaluationContext::new(&state, 0, false, false);
            list.insert(&mut ctx, StateId(id));
        };
        put(2, 9, 0);
        put(1, 5, 1);
        put(1, 3, 2);
        put(1, 3, 3);

        assert_eq!(list.remove_min(), StateId(2), "(1,3) before (1,5)");
        assert_eq!(list.remove_min(), StateId(3), "FIFO inside (1,3)");
        assert_eq!(list.remove_min(), StateId(1));
        assert_eq!(list.remove_min(), StateId(0));
    }

    #[test]
    fn reliable_infinity_is_dead_end() {
        let primary = Dial::new(1, true);
        let secondary = Dial::new(INFINITY, true);
        let list = TieBreakingOpenList::new(
            vec![primary as EvaluatorRef, secondary as EvaluatorRef],
            false,
            false,
        );
        let state = state();
        let mut ctx = EvaluationContext::new(&state, 0, false, false);
        assert!(list.is_dead_end(&mut ctx));
    }

    #[test]
    fn unreliable_infinity_needs_unanimity() {
        let primary = Dial::new(1, false);
        let secondary = Dial::new(INFINITY, false);
        let list = TieBreakingOpenList::new(
            vec![primary as EvaluatorRef, secondary as EvaluatorRef],
            false,
            false,
        );
        let state = state();
        let mut ctx = EvaluationContext::new(&state, 0, false, false);
        assert!(!list.is_dead_end(&mut ctx), "second evaluator is unreliable");
    }

    #[test]
    fn unsafe_pruning_trusts_first_evaluator() {
        let primary = Dial::new(INFINITY, false);
        let secondary = Dial::new(1, false);
        let list = TieBreakingOpenList::new(
            vec![primary as EvaluatorRef, secondary as EvaluatorRef],
            false,
            true,
        );
        let state = state();
        let mut ctx = EvaluationContext::new(&state, 0, false, false);
        assert!(list.is_dead_end(&mut ctx));
    }
}
