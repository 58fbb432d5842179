//! Single-evaluator open list with FIFO tie-breaking.
//!
//! Entries with equal key live in a double-ended queue ("bucket"); the
//! list maps keys to buckets in a `BTreeMap`. Push and pop within a
//! bucket are O(1), so insertion and removal cost O(log #buckets).

use std::collections::{BTreeMap, VecDeque};

use crate::context::EvaluationContext;
use crate::evaluator::{EvaluatorRef, OrderedEvaluatorSet};
use crate::open_list::OpenList;
use crate::registry::StateId;

pub struct BestFirstOpenList {
    buckets: BTreeMap<i64, VecDeque<StateId>>,
    size: usize,
    evaluator: EvaluatorRef,
    pref_only: bool,
}

impl BestFirstOpenList {
    #[must_use]
    pub fn new(evaluator: EvaluatorRef, pref_only: bool) -> Self {
        Self {
            buckets: BTreeMap::new(),
            size: 0,
            evaluator,
            pref_only,
        }
    }
}

impl OpenList for BestFirstOpenList {
    fn do_insertion(&mut self, ctx: &mut EvaluationContext<'_>, id: StateId) {
        let key = ctx.value(&self.evaluator);
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
        self.evaluator.collect_path_dependent(&self.evaluator, out);
    }

    fn is_dead_end(&self, ctx: &mut EvaluationContext<'_>) -> bool {
        ctx.is_infinite(&self.evaluator)
    }

    fn is_reliable_dead_end(&self, ctx: &mut EvaluationContext<'_>) -> bool {
        self.is_dead_end(ctx) && self.evaluator.dead_ends_are_reliable()
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

    /// Evaluator whose value is set from outside, for driving the list.
    struct Dial(Cell<i64>);

    impl Evaluator for Dial {
        fn description(&self) -> &str {
            "dial"
        }
        fn compute_result(&self, _ctx: &mut EvaluationContext<'_>) -> EvaluationResult {
            EvaluationResult::of(self.0.get())
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

    fn insert_with_value(
        list: &mut BestFirstOpenList,
        dial: &Rc<Dial>,
        state: &State,
        value: i64,
        id: usize,
    ) {
        dial.0.set(value);
        let mut ctx = EvaluationContext::new(state, 0, false, false);
        list.insert(&mut ctx, StateId(id));
    }

    #[test]
    fn pops_in_key_order_fifo_on_ties() {
        let dial = Rc::new(Dial(Cell::new(0)));
        let eval: EvaluatorRef = dial.clone();
        let mut list = BestFirstOpenList::new(eval, false);
        let state = state();

        insert_with_value(&mut list, &dial, &state, 5, 0);
        insert_with_value(&mut list, &dial, &state, 3, 1);
        insert_with_value(&mut list, &dial, &state, 3, 2);
        insert_with_value(&mut list, &dial, &state, 7, 3);

        assert_eq!(list.remove_min(), StateId(1));
        assert_eq!(list.remove_min(), StateId(2), "FIFO within key 3");
        assert_eq!(list.remove_min(), StateId(0));
        assert_eq!(list.remove_min(), StateId(3));
        assert!(list.empty());
    }

    #[test]
    fn dead_entries_not_inserted() {
        let dial = Rc::new(Dial(Cell::new(INFINITY)));
        let eval: EvaluatorRef = dial.clone();
        let mut list = BestFirstOpenList::new(eval, false);
        let state = state();

        let mut ctx = EvaluationContext::new(&state, 0, false, false);
        assert!(list.is_dead_end(&mut ctx));
        list.insert(&mut ctx, StateId(0));
        assert!(list.empty());
    }

    #[test]
    fn preferred_only_list_drops_non_preferred() {
        let dial = Rc::new(Dial(Cell::new(1)));
        let eval: EvaluatorRef = dial.clone();
        let mut list = BestFirstOpenList::new(eval, true);
        let state = state();

        let mut ctx = EvaluationContext::new(&state, 0, false, false);
        list.insert(&mut ctx, StateId(0));
        assert!(list.empty(), "non-preferred entry dropped");

        let mut ctx = EvaluationContext::new(&state, 0, true, false);
        list.insert(&mut ctx, StateId(1));
        assert_eq!(list.remove_min(), StateId(1));
    }
}
