//! Programmatic sample tasks for scenario tests and benchmarks.

use std::rc::Rc;

use sequent_task::{Effect, Fact, Operator, PlanningTask, VariableInfo};

fn variable(name: &str, domain_size: u32) -> VariableInfo {
    VariableInfo {
        name: name.to_string(),
        domain_size,
        axiom_layer: -1,
    }
}

/// One variable walking `0 → 1 → ... → length`, one unit-cost operator
/// per step.
///
/// # Panics
///
/// Panics if `length` is 0.
#[must_use]
pub fn chain(length: u32) -> Rc<PlanningTask> {
    assert!(length > 0);
    let operators = (0..length)
        .map(|v| Operator {
            name: format!("step-{v}-{}", v + 1),
            preconditions: vec![Fact::new(0, v)],
            effects: vec![Effect::unconditional(0, v + 1)],
            cost: 1,
        })
        .collect();
    Rc::new(
        PlanningTask::new(
            vec![variable("pos", length + 1)],
            operators,
            vec![],
            vec![0],
            vec![Fact::new(0, length)],
        )
        .expect("chain task is well-formed"),
    )
}

/// The two-step chain `0 → 1 → 2` plus a direct `0 → 2` operator of cost
/// 5; the cheapest plan takes the two steps.
#[must_use]
pub fn chain_with_shortcut() -> Rc<PlanningTask> {
    Rc::new(
        PlanningTask::new(
            vec![variable("pos", 3)],
            vec![
                Operator {
                    name: "step-0-1".to_string(),
                    preconditions: vec![Fact::new(0, 0)],
                    effects: vec![Effect::unconditional(0, 1)],
                    cost: 1,
                },
                Operator {
                    name: "step-1-2".to_string(),
                    preconditions: vec![Fact::new(0, 1)],
                    effects: vec![Effect::unconditional(0, 2)],
                    cost: 1,
                },
                Operator {
                    name: "jump-0-2".to_string(),
                    preconditions: vec![Fact::new(0, 0)],
                    effects: vec![Effect::unconditional(0, 2)],
                    cost: 5,
                },
            ],
            vec![],
            vec![0],
            vec![Fact::new(0, 2)],
        )
        .expect("shortcut task is well-formed"),
    )
}

/// A goal with no operators at all: unsolvable.
#[must_use]
pub fn unsolvable() -> Rc<PlanningTask> {
    Rc::new(
        PlanningTask::new(
            vec![variable("v", 2)],
            vec![],
            vec![],
            vec![0],
            vec![Fact::new(0, 1)],
        )
        .expect("unsolvable task is well-formed"),
    )
}

/// Two independent boolean goals, one unit-cost setter each.
#[must_use]
pub fn independent_pair() -> Rc<PlanningTask> {
    Rc::new(
        PlanningTask::new(
            vec![variable("a", 2), variable("b", 2)],
            vec![
                Operator {
                    name: "set-a".to_string(),
                    preconditions: vec![Fact::new(0, 0)],
                    effects: vec![Effect::unconditional(0, 1)],
                    cost: 1,
                },
                Operator {
                    name: "set-b".to_string(),
                    preconditions: vec![Fact::new(1, 0)],
                    effects: vec![Effect::unconditional(1, 1)],
                    cost: 1,
                },
            ],
            vec![],
            vec![0, 0],
            vec![Fact::new(0, 1), Fact::new(1, 1)],
        )
        .expect("pair task is well-formed"),
    )
}

/// One operator whose only effect is conditional on `x = 0`.
#[must_use]
pub fn conditional_effect() -> Rc<PlanningTask> {
    Rc::new(
        PlanningTask::new(
            vec![variable("x", 2), variable("y", 2)],
            vec![Operator {
                name: "fire".to_string(),
                preconditions: vec![Fact::new(0, 0)],
                effects: vec![Effect {
                    fact: Fact::new(1, 1),
                    conditions: vec![Fact::new(0, 0)],
                }],
                cost: 1,
            }],
            vec![],
            vec![0, 0],
            vec![Fact::new(1, 1)],
        )
        .expect("conditional task is well-formed"),
    )
}
