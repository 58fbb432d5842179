//! The proposition / unary-operator graph of delete-relaxation heuristics.
//!
//! Built once per task:
//!
//! - One [`Proposition`] per (variable, value) pair.
//! - One [`UnaryOperator`] per (operator effect): the multi-effect
//!   operator is decomposed, each effect's conditions joining the
//!   operator's preconditions.
//!
//! Each proposition knows the unary operators it is a precondition of, as
//! a slice into one shared pool — millions of tiny per-proposition
//! vectors would otherwise dominate construction.

use std::rc::Rc;

use sequent_task::{Fact, PlanningTask};

pub(crate) type PropId = usize;
pub(crate) type UnaryOpId = usize;

/// Cost value for "not reached yet".
pub(crate) const UNREACHED: i64 = -1;

#[derive(Debug, Clone)]
pub(crate) struct Proposition {
    /// Current exploration cost; [`UNREACHED`] before discovery.
    pub(crate) cost: i64,
    pub(crate) is_goal: bool,
    pool_start: usize,
    pool_len: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct UnaryOperator {
    pub(crate) effect: PropId,
    pub(crate) base_cost: i64,
    pub(crate) num_preconditions: u32,
    /// Working copy, reset per exploration.
    pub(crate) unsatisfied_preconditions: u32,
    /// Working cost, reset to `base_cost` per exploration.
    pub(crate) cost: i64,
}

#[derive(Debug)]
pub(crate) struct RelaxationGraph {
    /// Proposition index of (var, 0), per variable.
    prop_offsets: Vec<usize>,
    pub(crate) propositions: Vec<Proposition>,
    pub(crate) unary_operators: Vec<UnaryOperator>,
    precondition_of_pool: Vec<UnaryOpId>,
    pub(crate) goal_props: Vec<PropId>,
}

impl RelaxationGraph {
    pub(crate) fn build(task: &Rc<PlanningTask>) -> Self {
        let mut prop_offsets = Vec::with_capacity(task.num_variables());
        let mut num_props = 0;
        for var in task.variables() {
            prop_offsets.push(num_props);
            num_props += var.domain_size as usize;
        }

        let prop_id = |fact: Fact| prop_offsets[fact.var.0] + fact.value as usize;

        let mut propositions = vec![
            Proposition {
                cost: UNREACHED,
                is_goal: false,
                pool_start: 0,
                pool_len: 0,
            };
            num_props
        ];

        let mut goal_props = Vec::with_capacity(task.goals().len());
        for &goal in task.goals() {
            let prop = prop_id(goal);
            propositions[prop].is_goal = true;
            goal_props.push(prop);
        }

        // Decompose operators into unary operators and collect, per
        // proposition, the unary operators it preconditions.
        let mut unary_operators = Vec::new();
        let mut precondition_of: Vec<Vec<UnaryOpId>> = vec![Vec::new(); num_props];
        for op in task.operators() {
            for effect in &op.effects {
                let mut precondition_props: Vec<PropId> = op
                    .preconditions
                    .iter()
                    .chain(effect.conditions.iter())
                    .map(|&fact| prop_id(fact))
                    .collect();
                precondition_props.sort_unstable();
                precondition_props.dedup();

                let unary_id = unary_operators.len();
                #[allow(clippy::cast_possible_truncation)]
                unary_operators.push(UnaryOperator {
                    effect: prop_id(effect.fact),
                    base_cost: i64::from(op.cost),
                    num_preconditions: precondition_props.len() as u32,
                    unsatisfied_preconditions: 0,
                    cost: 0,
                });
                for prop in precondition_props {
                    precondition_of[prop].push(unary_id);
                }
            }
        }

        // Flatten the per-proposition lists into the shared pool.
        let mut precondition_of_pool = Vec::new();
        for (prop, ops) in precondition_of.into_iter().enumerate() {
            propositions[prop].pool_start = precondition_of_pool.len();
            propositions[prop].pool_len = ops.len();
            precondition_of_pool.extend(ops);
        }

        Self {
            prop_offsets,
            propositions,
            unary_operators,
            precondition_of_pool,
            goal_props,
        }
    }

    pub(crate) fn prop_id(&self, fact: Fact) -> PropId {
        self.prop_offsets[fact.var.0] + fact.value as usize
    }

    /// Unary operators with `prop` among their preconditions.
    pub(crate) fn precondition_of(&self, prop: PropId) -> &[UnaryOpId] {
        let p = &self.propositions[prop];
        &self.precondition_of_pool[p.pool_start..p.pool_start + p.pool_len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequent_task::{Effect, Operator, PlanningTask, VariableInfo};

    fn var(name: &str, domain_size: u32) -> VariableInfo {
        VariableInfo {
            name: name.to_string(),
            domain_size,
            axiom_layer: -1,
        }
    }

    #[test]
    fn graph_shape_for_simple_task() {
        let task = Rc::new(
            PlanningTask::new(
                vec![var("a", 2), var("b", 3)],
                vec![Operator {
                    name: "op".to_string(),
                    preconditions: vec![Fact::new(0, 0)],
                    effects: vec![
                        Effect::unconditional(0, 1),
                        Effect::unconditional(1, 2),
                    ],
                    cost: 4,
                }],
                vec![],
                vec![0, 0],
                vec![Fact::new(1, 2)],
            )
            .unwrap(),
        );
        let graph = RelaxationGraph::build(&task);

        assert_eq!(graph.propositions.len(), 5);
        // Two effects, so two unary operators, both preconditioned on a=0.
        assert_eq!(graph.unary_operators.len(), 2);
        let a0 = graph.prop_id(Fact::new(0, 0));
        assert_eq!(graph.precondition_of(a0), &[0, 1]);
        assert_eq!(graph.unary_operators[0].base_cost, 4);
        assert_eq!(graph.goal_props, vec![graph.prop_id(Fact::new(1, 2))]);
        assert!(graph.propositions[graph.prop_id(Fact::new(1, 2))].is_goal);
    }

    #[test]
    fn effect_conditions_join_preconditions() {
        let task = Rc::new(
            PlanningTask::new(
                vec![var("x", 2), var("y", 2)],
                vec![Operator {
                    name: "cond".to_string(),
                    preconditions: vec![Fact::new(0, 0)],
                    effects: vec![Effect {
                        fact: Fact::new(1, 1),
                        conditions: vec![Fact::new(1, 0)],
                    }],
                    cost: 1,
                }],
                vec![],
                vec![0, 0],
                vec![Fact::new(1, 1)],
            )
            .unwrap(),
        );
        let graph = RelaxationGraph::build(&task);
        assert_eq!(graph.unary_operators[0].num_preconditions, 2);
    }

    #[test]
    fn duplicate_precondition_facts_counted_once() {
        let task = Rc::new(
            PlanningTask::new(
                vec![var("x", 2)],
                vec![Operator {
                    name: "dup".to_string(),
                    preconditions: vec![Fact::new(0, 0)],
                    effects: vec![Effect {
                        fact: Fact::new(0, 1),
                        conditions: vec![Fact::new(0, 0)],
                    }],
                    cost: 1,
                }],
                vec![],
                vec![0],
                vec![Fact::new(0, 1)],
            )
            .unwrap(),
        );
        let graph = RelaxationGraph::build(&task);
        assert_eq!(graph.unary_operators[0].num_preconditions, 1);
    }
}
