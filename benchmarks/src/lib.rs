//! Shared helpers for sequent benchmark suites.

use std::rc::Rc;

use sequent_search::evaluators::{GEvaluator, SumEvaluator};
use sequent_search::{
    BestFirstOpenList, EagerSearch, EagerSearchOptions, EvaluatorRef, HspMaxHeuristic,
};
use sequent_task::{Effect, Fact, Operator, PlanningTask, VariableInfo};

/// A grid-walk task: `width` position variables over `height` values,
/// each advanced independently by unit-cost operators, goal in the far
/// corner. State space is `height^width`, so it scales smoothly.
///
/// # Panics
///
/// Panics if the dimensions are degenerate (benchmark setup failures are
/// fatal).
#[must_use]
pub fn grid_walk_task(width: usize, height: u32) -> Rc<PlanningTask> {
    assert!(width > 0 && height > 1);
    let variables = (0..width)
        .map(|i| VariableInfo {
            name: format!("pos{i}"),
            domain_size: height,
            axiom_layer: -1,
        })
        .collect();
    let mut operators = Vec::new();
    for var in 0..width {
        for value in 0..height - 1 {
            operators.push(Operator {
                name: format!("advance-{var}-{value}"),
                preconditions: vec![Fact::new(var, value)],
                effects: vec![Effect::unconditional(var, value + 1)],
                cost: 1,
            });
        }
    }
    let goals = (0..width).map(|var| Fact::new(var, height - 1)).collect();
    Rc::new(
        PlanningTask::new(variables, operators, vec![], vec![0; width], goals)
            .expect("grid task is well-formed"),
    )
}

/// An A* search (f = g + h^max) over `task`, ready to run.
///
/// # Panics
///
/// Panics if the configuration is rejected; benchmark setup failures are
/// fatal.
#[must_use]
pub fn prepare_astar(task: &Rc<PlanningTask>) -> EagerSearch {
    let heuristic: EvaluatorRef =
        Rc::new(HspMaxHeuristic::new(task).expect("task has no axioms"));
    let g: EvaluatorRef = Rc::new(GEvaluator::new());
    let f: EvaluatorRef = Rc::new(SumEvaluator::new(vec![g, heuristic]));
    let mut options =
        EagerSearchOptions::new(Box::new(BestFirstOpenList::new(Rc::clone(&f), false)));
    options.reopen_closed = true;
    options.f_evaluator = Some(f);
    EagerSearch::new(Rc::clone(task), options).expect("valid configuration")
}
