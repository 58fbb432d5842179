//! Plan representation and textual output.
//!
//! The textual form is one operator name per line, parenthesized, closed
//! by a cost comment:
//!
//! ```text
//! (unstack b a)
//! (put-down b)
//! ; cost = 2 (unit cost)
//! ```
//!
//! "unit cost" is printed iff every operator of the task costs 1 under
//! the original cost function; the `cost_type` used for search ordering
//! does not change the label.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use sequent_task::{OperatorId, PlanningTask, TaskProxy};

/// Total cost of `plan` under the task's original cost function.
#[must_use]
pub fn calculate_plan_cost(task: &PlanningTask, plan: &[OperatorId]) -> i64 {
    let proxy = TaskProxy::new(task);
    plan.iter()
        .map(|&op| i64::from(proxy.operators().get(op).cost()))
        .sum()
}

/// Render `plan` in the textual output form.
#[must_use]
pub fn plan_to_text(task: &PlanningTask, plan: &[OperatorId]) -> String {
    let proxy = TaskProxy::new(task);
    let mut out = String::new();
    for &op in plan {
        let _ = writeln!(out, "({})", proxy.operators().get(op).name());
    }
    let cost = calculate_plan_cost(task, plan);
    let kind = if task.is_unit_cost() {
        "unit cost"
    } else {
        "general cost"
    };
    let _ = writeln!(out, "; cost = {cost} ({kind})");
    out
}

/// Writes numbered plan files (`plan`, `plan.2`, `plan.3`, ...).
#[derive(Debug, Clone)]
pub struct PlanManager {
    plan_filename: PathBuf,
    num_generated_plans: usize,
}

impl PlanManager {
    #[must_use]
    pub fn new(plan_filename: impl Into<PathBuf>) -> Self {
        Self {
            plan_filename: plan_filename.into(),
            num_generated_plans: 0,
        }
    }

    /// The filename the next plan will be written to.
    #[must_use]
    pub fn next_plan_filename(&self) -> PathBuf {
        if self.num_generated_plans == 0 {
            self.plan_filename.clone()
        } else {
            let mut name = self.plan_filename.as_os_str().to_owned();
            name.push(format!(".{}", self.num_generated_plans + 1));
            PathBuf::from(name)
        }
    }

    /// Write `plan` to the next numbered file.
    ///
    /// # Errors
    ///
    /// Propagates the underlying write failure.
    pub fn save_plan(
        &mut self,
        task: &PlanningTask,
        plan: &[OperatorId],
    ) -> io::Result<PathBuf> {
        let path = self.next_plan_filename();
        std::fs::write(&path, plan_to_text(task, plan))?;
        self.num_generated_plans += 1;
        Ok(path)
    }

    #[must_use]
    pub fn plan_filename(&self) -> &Path {
        &self.plan_filename
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequent_task::{Effect, Fact, Operator, VariableInfo};

    fn two_op_task(costs: [u32; 2]) -> PlanningTask {
        PlanningTask::new(
            vec![VariableInfo {
                name: "v".to_string(),
                domain_size: 3,
                axiom_layer: -1,
            }],
            vec![
                Operator {
                    name: "pick up a".to_string(),
                    preconditions: vec![Fact::new(0, 0)],
                    effects: vec![Effect::unconditional(0, 1)],
                    cost: costs[0],
                },
                Operator {
                    name: "stack a b".to_string(),
                    preconditions: vec![Fact::new(0, 1)],
                    effects: vec![Effect::unconditional(0, 2)],
                    cost: costs[1],
                },
            ],
            vec![],
            vec![0],
            vec![Fact::new(0, 2)],
        )
        .unwrap()
    }

    #[test]
    fn unit_cost_text_form() {
        let task = two_op_task([1, 1]);
        let text = plan_to_text(&task, &[OperatorId(0), OperatorId(1)]);
        assert_eq!(text, "(pick up a)\n(stack a b)\n; cost = 2 (unit cost)\n");
    }

    #[test]
    fn general_cost_text_form() {
        let task = two_op_task([3, 4]);
        let text = plan_to_text(&task, &[OperatorId(0), OperatorId(1)]);
        assert_eq!(text, "(pick up a)\n(stack a b)\n; cost = 7 (general cost)\n");
    }

    #[test]
    fn plan_cost_uses_original_costs() {
        let task = two_op_task([3, 4]);
        assert_eq!(calculate_plan_cost(&task, &[OperatorId(1)]), 4);
        assert_eq!(
            calculate_plan_cost(&task, &[OperatorId(0), OperatorId(1)]),
            7
        );
    }

    #[test]
    fn plan_files_are_numbered() {
        let manager = PlanManager::new("sas_plan");
        assert_eq!(manager.next_plan_filename(), PathBuf::from("sas_plan"));

        let mut manager = manager;
        manager.num_generated_plans = 1;
        assert_eq!(manager.next_plan_filename(), PathBuf::from("sas_plan.2"));
    }
}
