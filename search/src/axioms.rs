//! Layered axiom evaluation.
//!
//! Derived variables are stratified into layers. Closure resets every
//! derived variable to its default value (its value in the task's initial
//! assignment), then fires each layer in ascending order until the layer
//! produces no change. A rule on a higher layer may read the results of
//! all lower layers.

use std::rc::Rc;

use sequent_task::{Fact, PlanningTask};

#[derive(Debug, Clone)]
struct Rule {
    conditions: Vec<Fact>,
    effect: Fact,
}

/// Evaluates the task's axioms to closure over an unpacked assignment.
#[derive(Debug)]
pub struct AxiomEvaluator {
    /// Rules grouped by layer, ascending.
    layers: Vec<Vec<Rule>>,
    /// (variable index, default value) for every derived variable.
    derived_defaults: Vec<(usize, u32)>,
}

impl AxiomEvaluator {
    #[must_use]
    pub fn new(task: &Rc<PlanningTask>) -> Self {
        let mut max_layer = -1;
        for var in task.variables() {
            max_layer = max_layer.max(var.axiom_layer);
        }
        #[allow(clippy::cast_sign_loss)]
        let num_layers = (max_layer + 1) as usize;

        let mut layers = vec![Vec::new(); num_layers];
        for axiom in task.axioms() {
            let layer = task.variables()[axiom.effect.var.0].axiom_layer;
            debug_assert!(layer >= 0, "validated at task construction");
            #[allow(clippy::cast_sign_loss)]
            layers[layer as usize].push(Rule {
                conditions: axiom.conditions.clone(),
                effect: axiom.effect,
            });
        }

        let derived_defaults = task
            .variables()
            .iter()
            .enumerate()
            .filter(|(_, info)| info.is_derived())
            .map(|(i, _)| (i, task.initial_state_values()[i]))
            .collect();

        Self {
            layers,
            derived_defaults,
        }
    }

    #[must_use]
    pub fn has_axioms(&self) -> bool {
        !self.layers.is_empty()
    }

    /// Close `values` under the axioms, in place.
    pub fn evaluate(&self, values: &mut [u32]) {
        if self.layers.is_empty() {
            return;
        }
        for &(var, default) in &self.derived_defaults {
            values[var] = default;
        }
        for layer in &self.layers {
            loop {
                let mut changed = false;
                for rule in layer {
                    if values[rule.effect.var.0] != rule.effect.value
                        && rule
                            .conditions
                            .iter()
                            .all(|cond| values[cond.var.0] == cond.value)
                    {
                        values[rule.effect.var.0] = rule.effect.value;
                        changed = true;
                    }
                }
                if !changed {
                    break;
                }
            }
        }
    }
}
