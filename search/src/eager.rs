//! Eager best-first search.
//!
//! The loop: pop the best non-stale open entry, close it, test for the
//! goal, generate successors through the successor generator and pruning
//! method, evaluate new states, and handle cheaper-path rediscoveries
//! (reinsert open nodes, reopen closed ones when enabled). The search
//! carries two g-values per node — the adjusted one ordering the open
//! list and the real one enforcing the cost bound — and polls the
//! wall-clock deadline between steps.
//!
//! With a lazy evaluator configured, a popped node whose cached estimate
//! is out of date is re-inserted under its fresh key instead of being
//! expanded; the dead-end check deliberately goes through the open list
//! before the value comparison. Callers should not reorder that.

use std::rc::Rc;
use std::time::Duration;

use tracing::info;

use sequent_task::{OperatorCost, OperatorId, PlanningTask, TaskProxy};

use crate::collections::OrderedSet;
use crate::context::EvaluationContext;
use crate::error::SearchSetupError;
use crate::evaluator::{EvaluatorRef, OrderedEvaluatorSet, INFINITY};
use crate::limits::SearchTimer;
use crate::open_list::OpenList;
use crate::progress::SearchProgress;
use crate::pruning::{NullPruning, Pruner, PruningMethod};
use crate::registry::{StateId, StateRegistry};
use crate::space::{NodeStatus, SearchSpace};
use crate::statistics::SearchStatistics;
use crate::successor_generator::SuccessorGenerator;

/// Outcome of a search step or a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    InProgress,
    Solved,
    /// The reachable state space was exhausted without a solution.
    Failed,
    /// The wall-clock limit hit first.
    Timeout,
}

/// Configuration of an [`EagerSearch`].
pub struct EagerSearchOptions {
    pub open_list: Box<dyn OpenList>,
    pub reopen_closed: bool,
    /// Evaluated once per closed node, for jump statistics only.
    pub f_evaluator: Option<EvaluatorRef>,
    /// Evaluators whose preferred operators feed the open list boosts.
    pub preferred: Vec<EvaluatorRef>,
    pub pruning: Box<dyn PruningMethod>,
    /// Re-evaluated on pop; must cache its estimates.
    pub lazy_evaluator: Option<EvaluatorRef>,
    pub cost_type: OperatorCost,
    /// Upper cost bound; successors with `real_g + cost >= bound` are
    /// discarded.
    pub bound: Option<i64>,
    pub max_time: Option<Duration>,
}

impl EagerSearchOptions {
    /// Plain best-first search over `open_list` with defaults for
    /// everything else.
    #[must_use]
    pub fn new(open_list: Box<dyn OpenList>) -> Self {
        Self {
            open_list,
            reopen_closed: false,
            f_evaluator: None,
            preferred: Vec::new(),
            pruning: Box::new(NullPruning::new()),
            lazy_evaluator: None,
            cost_type: OperatorCost::Normal,
            bound: None,
            max_time: None,
        }
    }
}

pub struct EagerSearch {
    task: Rc<PlanningTask>,
    registry: StateRegistry,
    search_space: SearchSpace,
    successor_generator: SuccessorGenerator,
    statistics: SearchStatistics,
    progress: SearchProgress,

    open_list: Box<dyn OpenList>,
    reopen_closed_nodes: bool,
    f_evaluator: Option<EvaluatorRef>,
    preferred_operator_evaluators: Vec<EvaluatorRef>,
    lazy_evaluator: Option<EvaluatorRef>,
    path_dependent_evaluators: Vec<EvaluatorRef>,
    pruner: Pruner,

    cost_type: OperatorCost,
    is_unit_cost: bool,
    bound: i64,
    max_time: Option<Duration>,

    plan: Option<Vec<OperatorId>>,
}

impl std::fmt::Debug for EagerSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EagerSearch").finish_non_exhaustive()
    }
}

impl EagerSearch {
    /// Assemble a search. Fails fast on invalid configuration.
    ///
    /// # Errors
    ///
    /// [`SearchSetupError::InputError`] if a lazy evaluator is configured
    /// that does not cache its estimates.
    pub fn new(
        task: Rc<PlanningTask>,
        options: EagerSearchOptions,
    ) -> Result<Self, SearchSetupError> {
        if let Some(lazy) = &options.lazy_evaluator {
            if !lazy.does_cache_estimates() {
                return Err(SearchSetupError::InputError {
                    detail: "lazy evaluator must cache its estimates".to_string(),
                });
            }
        }
        let registry = StateRegistry::new(Rc::clone(&task));
        let successor_generator = SuccessorGenerator::new(&task);
        let is_unit_cost = task.is_unit_cost();
        Ok(Self {
            task,
            registry,
            search_space: SearchSpace::new(),
            successor_generator,
            statistics: SearchStatistics::new(),
            progress: SearchProgress::new(),
            open_list: options.open_list,
            reopen_closed_nodes: options.reopen_closed,
            f_evaluator: options.f_evaluator,
            preferred_operator_evaluators: options.preferred,
            lazy_evaluator: options.lazy_evaluator,
            path_dependent_evaluators: Vec::new(),
            pruner: Pruner::new(options.pruning),
            cost_type: options.cost_type,
            is_unit_cost,
            bound: options.bound.unwrap_or(INFINITY),
            max_time: options.max_time,
            plan: None,
        })
    }

    /// Run to completion (or to the deadline).
    pub fn search(&mut self) -> SearchStatus {
        let timer = SearchTimer::new(self.max_time);
        self.initialize();
        let mut status = self.step();
        while status == SearchStatus::InProgress {
            if timer.is_expired() {
                info!("Time limit reached. Abort search.");
                status = SearchStatus::Timeout;
                break;
            }
            status = self.step();
        }
        info!(elapsed = ?timer.elapsed(), "Search stopped: {status:?}");
        status
    }

    /// The plan found by the last [`search`](Self::search), if any.
    #[must_use]
    pub fn plan(&self) -> Option<&[OperatorId]> {
        self.plan.as_deref()
    }

    #[must_use]
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    #[must_use]
    pub fn num_registered_states(&self) -> usize {
        self.registry.size()
    }

    pub fn print_statistics(&self) {
        self.statistics.print_detailed_statistics();
        info!(
            "Number of registered states: {}",
            self.registry.size()
        );
        self.pruner.print_statistics();
    }

    fn initialize(&mut self) {
        info!(
            "Conducting best first search{} reopening closed nodes, (real) bound = {}",
            if self.reopen_closed_nodes {
                " with"
            } else {
                " without"
            },
            self.bound
        );

        let mut evals = OrderedEvaluatorSet::new();
        self.open_list.collect_path_dependent(&mut evals);
        // Preferred-operator evaluators may not appear in the open list.
        for evaluator in &self.preferred_operator_evaluators {
            evaluator.collect_path_dependent(evaluator, &mut evals);
        }
        if let Some(f_evaluator) = &self.f_evaluator {
            f_evaluator.collect_path_dependent(f_evaluator, &mut evals);
        }
        if let Some(lazy) = &self.lazy_evaluator {
            lazy.collect_path_dependent(lazy, &mut evals);
        }
        self.path_dependent_evaluators = evals.into_vec();

        let initial_state = self.registry.initial_state();
        for evaluator in &self.path_dependent_evaluators {
            evaluator.notify_initial_state(&initial_state);
        }

        // The initial state counts as reached by a preferred operator.
        let mut ctx = EvaluationContext::new(&initial_state, 0, true, false);
        self.statistics.inc_evaluated_states();

        if self.open_list.is_dead_end(&mut ctx) {
            info!("Initial state is a dead end.");
        } else {
            if self.progress.check_progress(&ctx) {
                self.statistics.print_checkpoint_line(0);
            }
            self.report_f_value(&mut ctx);
            let mut node = self.search_space.node(initial_state.id());
            node.open_initial();
            self.open_list.insert(&mut ctx, initial_state.id());
        }
        for (evaluator, result) in ctx.cached_results() {
            info!(
                "Initial evaluator value for {}: {}",
                evaluator.description(),
                result.value()
            );
        }
        self.statistics.inc_evaluations(ctx.take_evaluation_count());

        self.pruner.initialize(&self.task);
    }

    fn step(&mut self) -> SearchStatus {
        let Some(id) = self.fetch_next_node() else {
            info!("Completely explored state space -- no solution!");
            return SearchStatus::Failed;
        };
        self.expand(id)
    }

    /// Pop entries until one refers to a node we still want to expand,
    /// close that node, and hand it back.
    fn fetch_next_node(&mut self) -> Option<StateId> {
        loop {
            if self.open_list.empty() {
                return None;
            }
            let id = self.open_list.remove_min();
            let status = self.search_space.status(id);
            if status == NodeStatus::Closed {
                continue; // stale entry
            }
            let state = self.registry.lookup_state(id);
            let g = self.search_space.node(id).g();
            let mut ctx = EvaluationContext::new(&state, g, false, false);

            if let Some(lazy) = self.lazy_evaluator.clone() {
                // Only lazy evaluation can leave dead nodes in the open
                // list: a state inserted twice with a cached finite value
                // may be found dead on its first re-evaluation, and the
                // second entry still points at it.
                if status == NodeStatus::DeadEnd {
                    continue;
                }
                if lazy.is_estimate_cached(&state) {
                    let old_h = lazy.cached_estimate(&state);
                    let new_h = ctx.value_or_infinity(&lazy);
                    if self.open_list.is_dead_end(&mut ctx) {
                        self.search_space.node(id).mark_as_dead_end();
                        self.statistics.inc_dead_ends();
                        self.statistics.inc_evaluations(ctx.take_evaluation_count());
                        continue;
                    }
                    if new_h != old_h {
                        self.open_list.insert(&mut ctx, id);
                        self.statistics.inc_evaluations(ctx.take_evaluation_count());
                        continue;
                    }
                }
            }

            let mut node = self.search_space.node(id);
            debug_assert!(!node.is_dead_end());
            node.close();
            self.report_f_value(&mut ctx);
            self.statistics.inc_evaluations(ctx.take_evaluation_count());
            return Some(id);
        }
    }

    fn expand(&mut self, id: StateId) -> SearchStatus {
        self.statistics.inc_expanded();

        let state = self.registry.lookup_state(id);
        let task = Rc::clone(&self.task);
        let proxy = TaskProxy::new(&task);

        if proxy.goals().satisfied_by(state.values()) {
            let plan = self
                .search_space
                .trace_path(id)
                .expect("the expanded node was just closed");
            info!("Solution found!");
            self.plan = Some(plan);
            return SearchStatus::Solved;
        }

        let (node_g, node_real_g) = {
            let node = self.search_space.node(id);
            (node.g(), node.real_g())
        };

        let mut applicable = Vec::new();
        self.successor_generator
            .generate_applicable_ops(state.values(), &mut applicable);
        self.pruner.prune_operators(&state, &mut applicable);
        self.statistics.inc_generated_ops(applicable.len() as u64);

        // Evaluate the expanded state once more to collect its preferred
        // operators, deduplicated across evaluators in first-seen order.
        let mut preferred: OrderedSet<OperatorId> = OrderedSet::new();
        {
            let mut ctx = EvaluationContext::new(&state, node_g, false, true);
            for evaluator in &self.preferred_operator_evaluators {
                let ops: Vec<OperatorId> = ctx.preferred_operators(evaluator).to_vec();
                for op in ops {
                    preferred.insert(op);
                }
            }
            self.statistics.inc_evaluations(ctx.take_evaluation_count());
        }

        for op_id in applicable {
            let op = proxy.operators().get(op_id);
            let real_cost = i64::from(op.cost());
            if node_real_g + real_cost >= self.bound {
                continue;
            }

            let succ_state = self.registry.successor_state(&state, &op);
            self.statistics.inc_generated();
            for evaluator in &self.path_dependent_evaluators {
                evaluator.notify_state_transition(&state, op_id, &succ_state);
            }

            let succ_id = succ_state.id();
            let succ_status = self.search_space.status(succ_id);

            // Previously recognized dead end; do not re-evaluate.
            if succ_status == NodeStatus::DeadEnd {
                continue;
            }

            let is_preferred = preferred.contains(&op_id);
            let adjusted_cost = i64::from(self.cost_type.adjusted_cost(&op, self.is_unit_cost));
            let succ_g = node_g + adjusted_cost;

            if succ_status == NodeStatus::New {
                let mut ctx =
                    EvaluationContext::new(&succ_state, succ_g, is_preferred, false);
                self.statistics.inc_evaluated_states();

                if self.open_list.is_dead_end(&mut ctx) {
                    self.search_space.node(succ_id).mark_as_dead_end();
                    self.statistics.inc_dead_ends();
                    self.statistics.inc_evaluations(ctx.take_evaluation_count());
                    continue;
                }
                self.search_space.node(succ_id).open_new_node(
                    id,
                    op_id,
                    succ_g,
                    node_real_g + real_cost,
                );
                self.open_list.insert(&mut ctx, succ_id);
                if self.progress.check_progress(&ctx) {
                    self.statistics.print_checkpoint_line(succ_g);
                    self.reward_progress();
                }
                self.statistics.inc_evaluations(ctx.take_evaluation_count());
            } else if self.search_space.node(succ_id).g() > succ_g {
                // A new cheapest path to an open or closed state.
                if succ_status == NodeStatus::Open {
                    self.search_space.node(succ_id).update_open_node_parent(
                        id,
                        op_id,
                        succ_g,
                        node_real_g + real_cost,
                    );
                    // The old entry goes stale; insert under the new key.
                    let mut ctx =
                        EvaluationContext::new(&succ_state, succ_g, is_preferred, false);
                    self.open_list.insert(&mut ctx, succ_id);
                    self.statistics.inc_evaluations(ctx.take_evaluation_count());
                } else if self.reopen_closed_nodes {
                    debug_assert_eq!(succ_status, NodeStatus::Closed);
                    self.statistics.inc_reopened();
                    self.search_space.node(succ_id).reopen_closed_node(
                        id,
                        op_id,
                        succ_g,
                        node_real_g + real_cost,
                    );
                    let mut ctx =
                        EvaluationContext::new(&succ_state, succ_g, is_preferred, false);
                    self.open_list.insert(&mut ctx, succ_id);
                    self.statistics.inc_evaluations(ctx.take_evaluation_count());
                } else {
                    // Reopening disabled: adopt the better parent chain
                    // but keep the node closed and its g untouched.
                    debug_assert_eq!(succ_status, NodeStatus::Closed);
                    self.search_space
                        .node(succ_id)
                        .update_closed_node_parent(id, op_id);
                }
            }
        }

        SearchStatus::InProgress
    }

    /// Boost preferred-operator open lists whenever a heuristic finds a
    /// state with a new best value.
    fn reward_progress(&mut self) {
        self.open_list.boost_preferred();
    }

    fn report_f_value(&mut self, ctx: &mut EvaluationContext<'_>) {
        if let Some(f_evaluator) = &self.f_evaluator {
            let f = ctx.value_or_infinity(f_evaluator);
            if f != INFINITY {
                self.statistics.report_f_value_progress(f);
            }
        }
    }
}
