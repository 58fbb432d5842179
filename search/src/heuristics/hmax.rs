//! The h^max heuristic: cost of the most expensive goal fact in the
//! delete relaxation.
//!
//! Per state: reset the relaxation graph, seed the exploration queue with
//! the state's facts at cost 0, run a Dijkstra-style sweep where a unary
//! operator's cost is the max over its precondition costs plus its base
//! cost, and read the answer off the goal propositions. Any unreached
//! goal means the state is a dead end under the relaxation — and hence a
//! real dead end, because h^max is admissible on tasks without axioms.

use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::rc::Rc;

use sequent_task::PlanningTask;

use crate::context::EvaluationContext;
use crate::error::SearchSetupError;
use crate::evaluator::{EvaluationResult, Evaluator, INFINITY};
use crate::heuristics::relaxation::{PropId, RelaxationGraph, UNREACHED};
use crate::heuristics::EstimateCache;
use crate::registry::{state_facts, State};

const DEAD_END: i64 = -1;

struct Exploration {
    graph: RelaxationGraph,
    /// Min-heap of (cost, proposition); stale entries skipped on pop.
    queue: BinaryHeap<Reverse<(i64, PropId)>>,
}

impl Exploration {
    fn enqueue_if_necessary(&mut self, prop: PropId, cost: i64) {
        debug_assert!(cost >= 0);
        let p = &mut self.graph.propositions[prop];
        if p.cost == UNREACHED || p.cost > cost {
            p.cost = cost;
            self.queue.push(Reverse((cost, prop)));
        }
    }

    fn setup(&mut self, state: &State) {
        self.queue.clear();
        for prop in &mut self.graph.propositions {
            prop.cost = UNREACHED;
        }
        for i in 0..self.graph.unary_operators.len() {
            let (num_preconditions, base_cost, effect) = {
                let op = &mut self.graph.unary_operators[i];
                op.unsatisfied_preconditions = op.num_preconditions;
                op.cost = op.base_cost;
                (op.num_preconditions, op.base_cost, op.effect)
            };
            if num_preconditions == 0 {
                self.enqueue_if_necessary(effect, base_cost);
            }
        }
        for fact in state_facts(state) {
            let prop = self.graph.prop_id(fact);
            self.enqueue_if_necessary(prop, 0);
        }
    }

    fn explore(&mut self) {
        let mut unsolved_goals = self.graph.goal_props.len();
        if unsolved_goals == 0 {
            return;
        }
        while let Some(Reverse((distance, prop))) = self.queue.pop() {
            let prop_cost = self.graph.propositions[prop].cost;
            debug_assert!(prop_cost >= 0 && prop_cost <= distance);
            if prop_cost < distance {
                continue; // stale entry
            }
            if self.graph.propositions[prop].is_goal {
                unsolved_goals -= 1;
                if unsolved_goals == 0 {
                    return;
                }
            }
            for i in 0..self.graph.precondition_of(prop).len() {
                let op_id = self.graph.precondition_of(prop)[i];
                let (effect, cost, satisfied) = {
                    let op = &mut self.graph.unary_operators[op_id];
                    op.cost = op.cost.max(op.base_cost + prop_cost);
                    debug_assert!(op.unsatisfied_preconditions > 0);
                    op.unsatisfied_preconditions -= 1;
                    (op.effect, op.cost, op.unsatisfied_preconditions == 0)
                };
                if satisfied {
                    self.enqueue_if_necessary(effect, cost);
                }
            }
        }
    }

    fn goal_cost(&self) -> i64 {
        let mut total = 0;
        for &goal in &self.graph.goal_props {
            let cost = self.graph.propositions[goal].cost;
            if cost == UNREACHED {
                return DEAD_END;
            }
            total = total.max(cost);
        }
        total
    }
}

/// The HSP max heuristic.
pub struct HspMaxHeuristic {
    exploration: RefCell<Exploration>,
    cache: RefCell<EstimateCache>,
    cache_estimates: bool,
}

impl std::fmt::Debug for HspMaxHeuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HspMaxHeuristic").finish_non_exhaustive()
    }
}

impl HspMaxHeuristic {
    /// Build the relaxation graph for `task`. Estimates are cached per
    /// state unless disabled via [`Self::with_cache`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchSetupError::UnsupportedFeature`] if the task has
    /// axioms; derived facts have no sound delete relaxation here.
    pub fn new(task: &Rc<PlanningTask>) -> Result<Self, SearchSetupError> {
        if task.has_axioms() {
            return Err(SearchSetupError::UnsupportedFeature {
                detail: "hmax does not support tasks with axioms".to_string(),
            });
        }
        Ok(Self {
            exploration: RefCell::new(Exploration {
                graph: RelaxationGraph::build(task),
                queue: BinaryHeap::new(),
            }),
            cache: RefCell::new(EstimateCache::new()),
            cache_estimates: true,
        })
    }

    #[must_use]
    pub fn with_cache(mut self, cache_estimates: bool) -> Self {
        self.cache_estimates = cache_estimates;
        self
    }

    fn compute(&self, state: &State) -> i64 {
        let mut exploration = self.exploration.borrow_mut();
        exploration.setup(state);
        exploration.explore();
        exploration.goal_cost()
    }
}

impl Evaluator for HspMaxHeuristic {
    fn description(&self) -> &str {
        "hmax"
    }

    fn compute_result(&self, ctx: &mut EvaluationContext<'_>) -> EvaluationResult {
        let state = ctx.state();
        if self.cache_estimates {
            if let Some(cached) = self.cache.borrow().get(state.id()) {
                return EvaluationResult::of(cached);
            }
        }
        let h = self.compute(state);
        let value = if h == DEAD_END { INFINITY } else { h };
        if self.cache_estimates {
            self.cache.borrow_mut().set(state.id(), value);
        }
        EvaluationResult::of(value).counting_evaluation(true)
    }

    fn does_cache_estimates(&self) -> bool {
        self.cache_estimates
    }

    fn is_estimate_cached(&self, state: &State) -> bool {
        self.cache.borrow().get(state.id()).is_some()
    }

    fn cached_estimate(&self, state: &State) -> i64 {
        self.cache
            .borrow()
            .get(state.id())
            .expect("estimate not cached; guard with is_estimate_cached")
    }
}
