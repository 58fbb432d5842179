//! Applicable-operator enumeration via a precondition decision tree.
//!
//! Built once per task. Internal nodes switch on one variable: one child
//! per value plus a don't-care branch for operators unconstrained by that
//! variable. Operators whose preconditions are exhausted sit at their
//! node as "immediate" hits. Queries touch only the branches selected by
//! the state, so enumeration cost scales with the number of matched
//! preconditions, not with the operator count.
//!
//! Operators are emitted in ascending id order along every root-to-leaf
//! traversal, keeping successor order deterministic.

use std::rc::Rc;

use sequent_task::{Fact, OperatorId, PlanningTask, VariableId};

#[derive(Debug)]
enum GeneratorNode {
    /// No operators below this point.
    Empty,
    /// Operators applicable regardless of further preconditions.
    Leaf(Vec<OperatorId>),
    Switch {
        var: VariableId,
        /// Operators with no remaining preconditions at this node.
        immediate: Vec<OperatorId>,
        /// One branch per value of `var`.
        value_branches: Vec<GeneratorNode>,
        /// Operators that do not constrain `var`.
        dont_care: Box<GeneratorNode>,
    },
}

/// Per-task applicable-operator index.
#[derive(Debug)]
pub struct SuccessorGenerator {
    root: GeneratorNode,
}

/// An operator plus a cursor into its (sorted) precondition list.
#[derive(Clone, Copy)]
struct OpCursor {
    id: OperatorId,
    next_precondition: usize,
}

impl SuccessorGenerator {
    #[must_use]
    pub fn new(task: &Rc<PlanningTask>) -> Self {
        let cursors: Vec<OpCursor> = (0..task.operators().len())
            .map(|i| OpCursor {
                id: OperatorId(i),
                next_precondition: 0,
            })
            .collect();
        let root = construct(task, cursors);
        Self { root }
    }

    /// Append all operators applicable in `values` to `out`, in id order
    /// per branch.
    pub fn generate_applicable_ops(&self, values: &[u32], out: &mut Vec<OperatorId>) {
        generate(&self.root, values, out);
    }
}

fn precondition(task: &PlanningTask, cursor: OpCursor) -> Option<Fact> {
    task.operators()[cursor.id.0]
        .preconditions
        .get(cursor.next_precondition)
        .copied()
}

fn construct(task: &Rc<PlanningTask>, cursors: Vec<OpCursor>) -> GeneratorNode {
    if cursors.is_empty() {
        return GeneratorNode::Empty;
    }

    // Operators out of preconditions are applicable here.
    let mut immediate = Vec::new();
    let mut remaining = Vec::new();
    for cursor in cursors {
        if precondition(task, cursor).is_none() {
            immediate.push(cursor.id);
        } else {
            remaining.push(cursor);
        }
    }

    if remaining.is_empty() {
        return GeneratorNode::Leaf(immediate);
    }

    // Switch on the smallest variable constrained next by any operator.
    // Preconditions are sorted per operator, so every operator's next
    // precondition is its smallest remaining one.
    let switch_var = remaining
        .iter()
        .map(|&cursor| precondition(task, cursor).expect("filtered above").var)
        .min()
        .expect("remaining is nonempty");

    let domain_size = task.variables()[switch_var.0].domain_size as usize;
    let mut per_value: Vec<Vec<OpCursor>> = vec![Vec::new(); domain_size];
    let mut dont_care = Vec::new();
    for cursor in remaining {
        let fact = precondition(task, cursor).expect("filtered above");
        if fact.var == switch_var {
            per_value[fact.value as usize].push(OpCursor {
                id: cursor.id,
                next_precondition: cursor.next_precondition + 1,
            });
        } else {
            dont_care.push(cursor);
        }
    }

    let value_branches = per_value
        .into_iter()
        .map(|cursors| construct(task, cursors))
        .collect();

    GeneratorNode::Switch {
        var: switch_var,
        immediate,
        value_branches,
        dont_care: Box::new(construct(task, dont_care)),
    }
}

fn generate(node: &GeneratorNode, values: &[u32], out: &mut Vec<OperatorId>) {
    match node {
        GeneratorNode::Empty => {}
        GeneratorNode::Leaf(ops) => out.extend_from_slice(ops),
        GeneratorNode::Switch {
            var,
            immediate,
            value_branches,
            dont_care,
        } => {
            out.extend_from_slice(immediate);
            generate(&value_branches[values[var.0] as usize], values, out);
            generate(dont_care, values, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequent_task::{Effect, Operator, PlanningTask, TaskProxy, VariableInfo};

    fn var(name: &str, domain_size: u32) -> VariableInfo {
        VariableInfo {
            name: name.to_string(),
            domain_size,
            axiom_layer: -1,
        }
    }

    fn op(name: &str, pre: Vec<Fact>, effect_var: usize, effect_value: u32) -> Operator {
        Operator {
            name: name.to_string(),
            preconditions: pre,
            effects: vec![Effect::unconditional(effect_var, effect_value)],
            cost: 1,
        }
    }

    fn applicable(task: &Rc<PlanningTask>, values: &[u32]) -> Vec<OperatorId> {
        let generator = SuccessorGenerator::new(task);
        let mut out = Vec::new();
        generator.generate_applicable_ops(values, &mut out);
        out
    }

    #[test]
    fn only_applicable_operators_returned() {
        let task = Rc::new(
            PlanningTask::new(
                vec![var("a", 3), var("b", 2)],
                vec![
                    op("needs-a0", vec![Fact::new(0, 0)], 0, 1),
                    op("needs-a1", vec![Fact::new(0, 1)], 0, 2),
                    op("needs-a0-b1", vec![Fact::new(0, 0), Fact::new(1, 1)], 1, 0),
                    op("free", vec![], 1, 1),
                ],
                vec![],
                vec![0, 0],
                vec![],
            )
            .unwrap(),
        );

        assert_eq!(
            applicable(&task, &[0, 0]),
            vec![OperatorId(3), OperatorId(0)]
        );
        assert_eq!(
            applicable(&task, &[0, 1]),
            vec![OperatorId(3), OperatorId(0), OperatorId(2)]
        );
        assert_eq!(
            applicable(&task, &[1, 0]),
            vec![OperatorId(3), OperatorId(1)]
        );
        assert_eq!(applicable(&task, &[2, 0]), vec![OperatorId(3)]);
    }

    #[test]
    fn all_returned_operators_satisfy_preconditions() {
        // Cross-check the tree against a naive scan on every state of a
        // small task.
        let task = Rc::new(
            PlanningTask::new(
                vec![var("a", 3), var("b", 3), var("c", 2)],
                vec![
                    op("o0", vec![Fact::new(0, 2)], 0, 0),
                    op("o1", vec![Fact::new(1, 1), Fact::new(2, 1)], 1, 0),
                    op("o2", vec![Fact::new(0, 1), Fact::new(1, 2)], 2, 1),
                    op("o3", vec![], 2, 0),
                    op("o4", vec![Fact::new(2, 0)], 0, 1),
                ],
                vec![],
                vec![0, 0, 0],
                vec![],
            )
            .unwrap(),
        );
        let generator = SuccessorGenerator::new(&task);
        let proxy = TaskProxy::new(&task);

        for a in 0..3u32 {
            for b in 0..3u32 {
                for c in 0..2u32 {
                    let values = [a, b, c];
                    let mut from_tree = Vec::new();
                    generator.generate_applicable_ops(&values, &mut from_tree);

                    let mut naive: Vec<OperatorId> = proxy
                        .operators()
                        .iter()
                        .filter(|op| {
                            op.preconditions()
                                .iter()
                                .all(|pre| values[pre.var.0] == pre.value)
                        })
                        .map(sequent_task::OperatorProxy::id)
                        .collect();

                    from_tree.sort();
                    naive.sort();
                    assert_eq!(from_tree, naive, "state {values:?}");
                }
            }
        }
    }

    #[test]
    fn no_operators_means_no_hits() {
        let task = Rc::new(
            PlanningTask::new(vec![var("a", 2)], vec![], vec![], vec![0], vec![]).unwrap(),
        );
        assert!(applicable(&task, &[0]).is_empty());
    }
}
