//! Core task types and load-time validation.
//!
//! A [`PlanningTask`] is a grounded planning problem: finite-domain state
//! variables, operators with (possibly conditional) effects, stratified
//! axioms, an initial assignment, and a partial goal assignment.
//!
//! All invariants that make the search side panic-free — facts in range,
//! dense ids, one precondition per variable — are enforced here, once, by
//! [`PlanningTask::new`]. After construction the task is immutable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dense index of a state variable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VariableId(pub usize);

/// Dense index of an operator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct OperatorId(pub usize);

/// Dense index of an axiom.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AxiomId(pub usize);

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var{}", self.0)
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op{}", self.0)
    }
}

/// A (variable, value) pair.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Fact {
    pub var: VariableId,
    pub value: u32,
}

impl Fact {
    #[must_use]
    pub const fn new(var: usize, value: u32) -> Self {
        Self {
            var: VariableId(var),
            value,
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.var, self.value)
    }
}

/// A state variable: finite domain plus axiom stratification layer.
///
/// `axiom_layer == -1` marks an ordinary (non-derived) variable. Derived
/// variables carry the layer on which their defining axioms are evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    pub domain_size: u32,
    pub axiom_layer: i32,
}

impl VariableInfo {
    /// True if the variable is set by axioms rather than operators.
    #[must_use]
    pub const fn is_derived(&self) -> bool {
        self.axiom_layer >= 0
    }
}

/// One operator effect: the fact to set, guarded by effect conditions.
///
/// An empty condition list means the effect always fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub fact: Fact,
    pub conditions: Vec<Fact>,
}

impl Effect {
    #[must_use]
    pub fn unconditional(var: usize, value: u32) -> Self {
        Self {
            fact: Fact::new(var, value),
            conditions: Vec::new(),
        }
    }
}

/// A grounded operator.
///
/// Preconditions are sorted by variable id with at most one fact per
/// variable (normalized by [`PlanningTask::new`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub name: String,
    pub preconditions: Vec<Fact>,
    pub effects: Vec<Effect>,
    pub cost: u32,
}

/// A grounded axiom: a condition list deriving a single fact.
///
/// The effect variable must be derived; the axiom is evaluated on that
/// variable's stratification layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axiom {
    pub conditions: Vec<Fact>,
    pub effect: Fact,
}

/// Typed failure while validating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// A variable was declared with an empty domain.
    EmptyDomain { var: VariableId },

    /// `initial_state_values` does not have one entry per variable.
    InitialStateLength { expected: usize, actual: usize },

    /// A fact references a variable id outside the task.
    UnknownVariable { var: VariableId, context: String },

    /// A fact's value lies outside its variable's domain.
    ValueOutOfDomain {
        fact: Fact,
        domain_size: u32,
        context: String,
    },

    /// An operator lists two preconditions on the same variable.
    ConflictingPreconditions { op: String, var: VariableId },

    /// An axiom's effect variable is not derived.
    AxiomOnBasicVariable { axiom: AxiomId, var: VariableId },

    /// The goal constrains the same variable twice.
    DuplicateGoalVariable { var: VariableId },
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDomain { var } => write!(f, "{var} has an empty domain"),
            Self::InitialStateLength { expected, actual } => write!(
                f,
                "initial state has {actual} values, task has {expected} variables"
            ),
            Self::UnknownVariable { var, context } => {
                write!(f, "{context}: unknown variable {var}")
            }
            Self::ValueOutOfDomain {
                fact,
                domain_size,
                context,
            } => write!(
                f,
                "{context}: fact {fact} outside domain of size {domain_size}"
            ),
            Self::ConflictingPreconditions { op, var } => {
                write!(f, "operator {op:?} has two preconditions on {var}")
            }
            Self::AxiomOnBasicVariable { axiom, var } => write!(
                f,
                "axiom {} sets {var}, which is not a derived variable",
                axiom.0
            ),
            Self::DuplicateGoalVariable { var } => {
                write!(f, "goal constrains {var} more than once")
            }
        }
    }
}

impl std::error::Error for TaskError {}

/// A validated, immutable planning task.
///
/// Construct via [`PlanningTask::new`]; the fields are private so every
/// task in circulation has passed validation. Deliberately `Serialize`
/// only — deserializing would bypass validation, so task files are read
/// through a raw shape and revalidated. Read access goes through the
/// accessors here or the proxy views in [`crate::proxy`].
#[derive(Debug, Clone, Serialize)]
pub struct PlanningTask {
    variables: Vec<VariableInfo>,
    operators: Vec<Operator>,
    axioms: Vec<Axiom>,
    initial_state_values: Vec<u32>,
    goals: Vec<Fact>,
}

impl PlanningTask {
    /// Validate and freeze a task.
    ///
    /// Operator preconditions are normalized: sorted by variable id.
    ///
    /// # Errors
    ///
    /// Returns a [`TaskError`] describing the first malformed piece of
    /// input found.
    pub fn new(
        variables: Vec<VariableInfo>,
        mut operators: Vec<Operator>,
        axioms: Vec<Axiom>,
        initial_state_values: Vec<u32>,
        goals: Vec<Fact>,
    ) -> Result<Self, TaskError> {
        for (i, var) in variables.iter().enumerate() {
            if var.domain_size == 0 {
                return Err(TaskError::EmptyDomain {
                    var: VariableId(i),
                });
            }
        }

        if initial_state_values.len() != variables.len() {
            return Err(TaskError::InitialStateLength {
                expected: variables.len(),
                actual: initial_state_values.len(),
            });
        }
        for (i, &value) in initial_state_values.iter().enumerate() {
            check_fact(
                &variables,
                Fact::new(i, value),
                "initial state",
            )?;
        }

        for op in &mut operators {
            for &fact in &op.preconditions {
                check_fact(&variables, fact, &format!("operator {:?}", op.name))?;
            }
            op.preconditions.sort_by_key(|fact| fact.var);
            for window in op.preconditions.windows(2) {
                if window[0].var == window[1].var {
                    return Err(TaskError::ConflictingPreconditions {
                        op: op.name.clone(),
                        var: window[0].var,
                    });
                }
            }
            for effect in &op.effects {
                check_fact(&variables, effect.fact, &format!("operator {:?}", op.name))?;
                for &cond in &effect.conditions {
                    check_fact(
                        &variables,
                        cond,
                        &format!("effect condition of {:?}", op.name),
                    )?;
                }
            }
        }

        for (i, axiom) in axioms.iter().enumerate() {
            let id = AxiomId(i);
            check_fact(&variables, axiom.effect, &format!("axiom {i}"))?;
            let head = axiom.effect.var;
            if !variables[head.0].is_derived() {
                return Err(TaskError::AxiomOnBasicVariable { axiom: id, var: head });
            }
            for &cond in &axiom.conditions {
                check_fact(&variables, cond, &format!("axiom {i}"))?;
            }
        }

        let mut goal_vars: Vec<VariableId> = goals.iter().map(|fact| fact.var).collect();
        goal_vars.sort_unstable();
        for window in goal_vars.windows(2) {
            if window[0] == window[1] {
                return Err(TaskError::DuplicateGoalVariable { var: window[0] });
            }
        }
        for &fact in &goals {
            check_fact(&variables, fact, "goal")?;
        }

        Ok(Self {
            variables,
            operators,
            axioms,
            initial_state_values,
            goals,
        })
    }

    #[must_use]
    pub fn variables(&self) -> &[VariableInfo] {
        &self.variables
    }

    #[must_use]
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    #[must_use]
    pub fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }

    #[must_use]
    pub fn initial_state_values(&self) -> &[u32] {
        &self.initial_state_values
    }

    #[must_use]
    pub fn goals(&self) -> &[Fact] {
        &self.goals
    }

    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    #[must_use]
    pub fn has_axioms(&self) -> bool {
        !self.axioms.is_empty()
    }

    /// True if every operator has cost 1 (under the original cost function).
    #[must_use]
    pub fn is_unit_cost(&self) -> bool {
        self.operators.iter().all(|op| op.cost == 1)
    }
}

fn check_fact(
    variables: &[VariableInfo],
    fact: Fact,
    context: &str,
) -> Result<(), TaskError> {
    let Some(info) = variables.get(fact.var.0) else {
        return Err(TaskError::UnknownVariable {
            var: fact.var,
            context: context.to_string(),
        });
    };
    if fact.value >= info.domain_size {
        return Err(TaskError::ValueOutOfDomain {
            fact,
            domain_size: info.domain_size,
            context: context.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, domain_size: u32) -> VariableInfo {
        VariableInfo {
            name: name.to_string(),
            domain_size,
            axiom_layer: -1,
        }
    }

    fn op(name: &str, pre: Vec<Fact>, effects: Vec<Effect>, cost: u32) -> Operator {
        Operator {
            name: name.to_string(),
            preconditions: pre,
            effects,
            cost,
        }
    }

    #[test]
    fn minimal_task_validates() {
        let task = PlanningTask::new(
            vec![var("v", 3)],
            vec![op(
                "advance",
                vec![Fact::new(0, 0)],
                vec![Effect::unconditional(0, 1)],
                1,
            )],
            vec![],
            vec![0],
            vec![Fact::new(0, 2)],
        )
        .unwrap();
        assert_eq!(task.num_variables(), 1);
        assert!(task.is_unit_cost());
    }

    #[test]
    fn initial_state_length_mismatch_rejected() {
        let err = PlanningTask::new(vec![var("v", 2)], vec![], vec![], vec![0, 0], vec![])
            .unwrap_err();
        assert_eq!(
            err,
            TaskError::InitialStateLength {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn out_of_domain_goal_rejected() {
        let err = PlanningTask::new(
            vec![var("v", 2)],
            vec![],
            vec![],
            vec![0],
            vec![Fact::new(0, 5)],
        )
        .unwrap_err();
        assert!(matches!(err, TaskError::ValueOutOfDomain { .. }));
    }

    #[test]
    fn preconditions_are_sorted_by_variable() {
        let task = PlanningTask::new(
            vec![var("a", 2), var("b", 2)],
            vec![op(
                "both",
                vec![Fact::new(1, 0), Fact::new(0, 0)],
                vec![Effect::unconditional(0, 1)],
                1,
            )],
            vec![],
            vec![0, 0],
            vec![],
        )
        .unwrap();
        let pre = &task.operators()[0].preconditions;
        assert_eq!(pre[0].var, VariableId(0));
        assert_eq!(pre[1].var, VariableId(1));
    }

    #[test]
    fn conflicting_preconditions_rejected() {
        let err = PlanningTask::new(
            vec![var("v", 3)],
            vec![op(
                "bad",
                vec![Fact::new(0, 0), Fact::new(0, 1)],
                vec![],
                1,
            )],
            vec![],
            vec![0],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, TaskError::ConflictingPreconditions { .. }));
    }

    #[test]
    fn axiom_on_basic_variable_rejected() {
        let err = PlanningTask::new(
            vec![var("v", 2)],
            vec![],
            vec![Axiom {
                conditions: vec![],
                effect: Fact::new(0, 1),
            }],
            vec![0],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, TaskError::AxiomOnBasicVariable { .. }));
    }

    #[test]
    fn duplicate_goal_variable_rejected() {
        let err = PlanningTask::new(
            vec![var("v", 3)],
            vec![],
            vec![],
            vec![0],
            vec![Fact::new(0, 1), Fact::new(0, 2)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TaskError::DuplicateGoalVariable {
                var: VariableId(0)
            }
        );
    }

    #[test]
    fn non_unit_cost_detected() {
        let task = PlanningTask::new(
            vec![var("v", 2)],
            vec![op(
                "jump",
                vec![],
                vec![Effect::unconditional(0, 1)],
                5,
            )],
            vec![],
            vec![0],
            vec![],
        )
        .unwrap();
        assert!(!task.is_unit_cost());
    }

    #[test]
    fn task_serializes_with_stable_field_names() {
        let task = PlanningTask::new(
            vec![var("v", 3)],
            vec![op(
                "advance",
                vec![Fact::new(0, 0)],
                vec![Effect::unconditional(0, 1)],
                2,
            )],
            vec![],
            vec![0],
            vec![Fact::new(0, 2)],
        )
        .unwrap();
        let json: serde_json::Value = serde_json::to_value(&task).unwrap();
        assert_eq!(json["variables"][0]["domain_size"], 3);
        assert_eq!(json["operators"][0]["name"], "advance");
        assert_eq!(json["operators"][0]["cost"], 2);
        assert_eq!(json["initial_state_values"][0], 0);
        assert_eq!(json["goals"][0]["var"], 0);
        assert_eq!(json["goals"][0]["value"], 2);
    }
}
