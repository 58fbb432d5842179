//! Sequent Task: the frozen task model of the Sequent planner.
//!
//! A [`PlanningTask`] is read once, validated, and never mutated afterwards.
//! Search-side code reads it through the lightweight proxy views in
//! [`proxy`], which address variables, operators, and axioms by dense
//! integer ids.
//!
//! # Module Dependency Direction
//!
//! `task` ← `proxy` ← `cost`
//!
//! One-way only. `task` depends on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cost;
pub mod proxy;
pub mod task;

pub use cost::OperatorCost;
pub use proxy::{
    AxiomProxy, FactProxy, GoalsProxy, OperatorProxy, OperatorsProxy, TaskProxy, VariableProxy,
    VariablesProxy,
};
pub use task::{
    Axiom, AxiomId, Effect, Fact, Operator, OperatorId, PlanningTask, TaskError, VariableId,
    VariableInfo,
};
