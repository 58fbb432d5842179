//! Read-only proxy views over a [`PlanningTask`].
//!
//! Proxies are cheap `Copy` handles pairing the task reference with a dense
//! id. Search-side code never touches the raw vectors; it goes through
//! these views, which keeps the indexing in one place.

use crate::task::{
    Axiom, AxiomId, Effect, Fact, Operator, OperatorId, PlanningTask, VariableId, VariableInfo,
};

/// Entry point for proxy access to a task.
#[derive(Debug, Clone, Copy)]
pub struct TaskProxy<'a> {
    task: &'a PlanningTask,
}

impl<'a> TaskProxy<'a> {
    #[must_use]
    pub fn new(task: &'a PlanningTask) -> Self {
        Self { task }
    }

    #[must_use]
    pub fn variables(self) -> VariablesProxy<'a> {
        VariablesProxy { task: self.task }
    }

    #[must_use]
    pub fn operators(self) -> OperatorsProxy<'a> {
        OperatorsProxy { task: self.task }
    }

    #[must_use]
    pub fn axioms(self) -> impl ExactSizeIterator<Item = AxiomProxy<'a>> {
        let task = self.task;
        (0..task.axioms().len()).map(move |i| AxiomProxy {
            task,
            id: AxiomId(i),
        })
    }

    #[must_use]
    pub fn goals(self) -> GoalsProxy<'a> {
        GoalsProxy { task: self.task }
    }

    #[must_use]
    pub fn initial_state_values(self) -> &'a [u32] {
        self.task.initial_state_values()
    }
}

/// View over all variables.
#[derive(Debug, Clone, Copy)]
pub struct VariablesProxy<'a> {
    task: &'a PlanningTask,
}

impl<'a> VariablesProxy<'a> {
    #[must_use]
    pub fn len(self) -> usize {
        self.task.num_variables()
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// # Panics
    ///
    /// Panics if `id` is out of range; task validation guarantees every
    /// fact in the task is in range.
    #[must_use]
    pub fn get(self, id: VariableId) -> VariableProxy<'a> {
        assert!(id.0 < self.len(), "variable id out of range: {id}");
        VariableProxy {
            info: &self.task.variables()[id.0],
            id,
        }
    }

    pub fn iter(self) -> impl ExactSizeIterator<Item = VariableProxy<'a>> {
        self.task
            .variables()
            .iter()
            .enumerate()
            .map(|(i, info)| VariableProxy {
                info,
                id: VariableId(i),
            })
    }
}

/// A single variable.
#[derive(Debug, Clone, Copy)]
pub struct VariableProxy<'a> {
    info: &'a VariableInfo,
    id: VariableId,
}

impl<'a> VariableProxy<'a> {
    #[must_use]
    pub fn id(self) -> VariableId {
        self.id
    }

    #[must_use]
    pub fn name(self) -> &'a str {
        &self.info.name
    }

    #[must_use]
    pub fn domain_size(self) -> u32 {
        self.info.domain_size
    }

    #[must_use]
    pub fn axiom_layer(self) -> i32 {
        self.info.axiom_layer
    }

    #[must_use]
    pub fn is_derived(self) -> bool {
        self.info.is_derived()
    }
}

/// A fact paired with its task, for name lookups.
#[derive(Debug, Clone, Copy)]
pub struct FactProxy<'a> {
    task: &'a PlanningTask,
    fact: Fact,
}

impl<'a> FactProxy<'a> {
    #[must_use]
    pub fn fact(self) -> Fact {
        self.fact
    }

    #[must_use]
    pub fn variable(self) -> VariableProxy<'a> {
        VariablesProxy { task: self.task }.get(self.fact.var)
    }
}

/// View over all operators.
#[derive(Debug, Clone, Copy)]
pub struct OperatorsProxy<'a> {
    task: &'a PlanningTask,
}

impl<'a> OperatorsProxy<'a> {
    #[must_use]
    pub fn len(self) -> usize {
        self.task.operators().len()
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[must_use]
    pub fn get(self, id: OperatorId) -> OperatorProxy<'a> {
        assert!(id.0 < self.len(), "operator id out of range: {id}");
        OperatorProxy {
            task: self.task,
            op: &self.task.operators()[id.0],
            id,
        }
    }

    pub fn iter(self) -> impl ExactSizeIterator<Item = OperatorProxy<'a>> {
        let task = self.task;
        task.operators()
            .iter()
            .enumerate()
            .map(move |(i, op)| OperatorProxy {
                task,
                op,
                id: OperatorId(i),
            })
    }
}

/// A single operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorProxy<'a> {
    task: &'a PlanningTask,
    op: &'a Operator,
    id: OperatorId,
}

impl<'a> OperatorProxy<'a> {
    #[must_use]
    pub fn id(self) -> OperatorId {
        self.id
    }

    #[must_use]
    pub fn name(self) -> &'a str {
        &self.op.name
    }

    #[must_use]
    pub fn cost(self) -> u32 {
        self.op.cost
    }

    /// Preconditions, sorted by variable id.
    #[must_use]
    pub fn preconditions(self) -> &'a [Fact] {
        &self.op.preconditions
    }

    #[must_use]
    pub fn effects(self) -> &'a [Effect] {
        &self.op.effects
    }

    #[must_use]
    pub fn fact_proxy(self, fact: Fact) -> FactProxy<'a> {
        FactProxy {
            task: self.task,
            fact,
        }
    }
}

/// A single axiom.
#[derive(Debug, Clone, Copy)]
pub struct AxiomProxy<'a> {
    task: &'a PlanningTask,
    id: AxiomId,
}

impl<'a> AxiomProxy<'a> {
    #[must_use]
    pub fn id(self) -> AxiomId {
        self.id
    }

    #[must_use]
    pub fn conditions(self) -> &'a [Fact] {
        &self.axiom().conditions
    }

    #[must_use]
    pub fn effect(self) -> Fact {
        self.axiom().effect
    }

    /// Layer on which this axiom is evaluated: the layer of its head.
    #[must_use]
    pub fn layer(self) -> i32 {
        let head = self.axiom().effect.var;
        self.task.variables()[head.0].axiom_layer
    }

    fn axiom(self) -> &'a Axiom {
        &self.task.axioms()[self.id.0]
    }
}

/// The goal as a partial assignment.
#[derive(Debug, Clone, Copy)]
pub struct GoalsProxy<'a> {
    task: &'a PlanningTask,
}

impl<'a> GoalsProxy<'a> {
    #[must_use]
    pub fn len(self) -> usize {
        self.task.goals().len()
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    pub fn iter(self) -> impl ExactSizeIterator<Item = Fact> + 'a {
        self.task.goals().iter().copied()
    }

    /// True iff every goal fact holds in `values` (one value per variable).
    #[must_use]
    pub fn satisfied_by(self, values: &[u32]) -> bool {
        self.task
            .goals()
            .iter()
            .all(|goal| values[goal.var.0] == goal.value)
    }
}
