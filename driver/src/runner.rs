//! Orchestration: run an eager search on a task, report, and map the
//! outcome to an exit code.

use std::fmt;
use std::io;
use std::rc::Rc;

use serde::Serialize;
use tracing::info;

use sequent_search::{
    EagerSearch, EagerSearchOptions, SearchSetupError, SearchStatistics, SearchStatus,
};
use sequent_task::{OperatorId, PlanningTask, TaskProxy};

use crate::exit_code::ExitCode;
use crate::memory::peak_memory_in_kb;
use crate::plan::{calculate_plan_cost, PlanManager};

/// Failure of the driver itself (as opposed to a searched-and-failed
/// outcome, which is a normal [`RunOutcome`]).
#[derive(Debug)]
pub enum DriverError {
    Setup(SearchSetupError),
    PlanWrite(io::Error),
}

impl DriverError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Setup(error) => ExitCode::from(error),
            Self::PlanWrite(_) => ExitCode::InputError,
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup(error) => write!(f, "search setup failed: {error}"),
            Self::PlanWrite(error) => write!(f, "cannot write plan: {error}"),
        }
    }
}

impl std::error::Error for DriverError {}

impl From<SearchSetupError> for DriverError {
    fn from(error: SearchSetupError) -> Self {
        Self::Setup(error)
    }
}

/// What a finished run looks like to the caller.
#[derive(Debug)]
pub struct RunOutcome {
    pub status: SearchStatus,
    pub exit_code: ExitCode,
    pub plan: Option<Vec<OperatorId>>,
    pub plan_cost: Option<i64>,
    pub statistics: SearchStatistics,
}

/// Machine-readable summary of a run.
#[derive(Debug, Serialize)]
pub struct SearchReport {
    pub outcome: String,
    pub plan: Option<Vec<String>>,
    pub plan_cost: Option<i64>,
    pub statistics: SearchStatistics,
    pub peak_memory_kb: Option<u64>,
}

impl SearchReport {
    #[must_use]
    pub fn new(task: &PlanningTask, outcome: &RunOutcome) -> Self {
        let proxy = TaskProxy::new(task);
        let plan = outcome.plan.as_ref().map(|plan| {
            plan.iter()
                .map(|&op| proxy.operators().get(op).name().to_string())
                .collect()
        });
        Self {
            outcome: format!("{:?}", outcome.status),
            plan,
            plan_cost: outcome.plan_cost,
            statistics: outcome.statistics.clone(),
            peak_memory_kb: peak_memory_in_kb(),
        }
    }

    /// # Errors
    ///
    /// Serialization of the report cannot practically fail; the error is
    /// propagated for uniformity.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Build the search, run it to completion, report statistics, optionally
/// write the plan file.
///
/// # Errors
///
/// [`DriverError::Setup`] if the configuration is rejected;
/// [`DriverError::PlanWrite`] if the plan file cannot be written.
pub fn run_search(
    task: &Rc<PlanningTask>,
    options: EagerSearchOptions,
    mut plan_manager: Option<&mut PlanManager>,
) -> Result<RunOutcome, DriverError> {
    let mut search = EagerSearch::new(Rc::clone(task), options)?;
    let status = search.search();
    search.print_statistics();
    if let Some(peak) = peak_memory_in_kb() {
        info!("Peak memory: {peak} KB");
    }

    let (exit_code, plan, plan_cost) = match status {
        SearchStatus::Solved => {
            let plan = search.plan().expect("solved search has a plan").to_vec();
            let cost = calculate_plan_cost(task, &plan);
            info!("Plan length: {} step(s).", plan.len());
            info!("Plan cost: {cost}");
            if let Some(manager) = plan_manager.as_deref_mut() {
                let path = manager
                    .save_plan(task, &plan)
                    .map_err(DriverError::PlanWrite)?;
                info!("Plan written to {}", path.display());
            }
            info!("Solution found.");
            (ExitCode::Success, Some(plan), Some(cost))
        }
        SearchStatus::Failed => {
            info!("No solution - FAILED");
            (ExitCode::Unsolvable, None, None)
        }
        SearchStatus::Timeout => {
            info!("Search out of time - FAILED");
            (ExitCode::OutOfResources, None, None)
        }
        SearchStatus::InProgress => unreachable!("search() runs to completion"),
    };

    Ok(RunOutcome {
        status,
        exit_code,
        plan,
        plan_cost,
        statistics: search.statistics().clone(),
    })
}
