//! Reading and writing tasks as JSON files.
//!
//! The JSON form is the serde representation of [`PlanningTask`]; reading
//! revalidates through [`PlanningTask::new`] so a hand-edited file cannot
//! smuggle an out-of-domain fact past the constructor.

use std::fmt;
use std::io;
use std::path::Path;

use serde::Deserialize;

use sequent_task::{Axiom, Fact, Operator, PlanningTask, TaskError, VariableInfo};

/// Failure while loading a task file.
#[derive(Debug)]
pub enum TaskIoError {
    Io(io::Error),
    Parse(serde_json::Error),
    Invalid(TaskError),
}

impl fmt::Display for TaskIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(error) => write!(f, "cannot read task file: {error}"),
            Self::Parse(error) => write!(f, "malformed task file: {error}"),
            Self::Invalid(error) => write!(f, "invalid task: {error}"),
        }
    }
}

impl std::error::Error for TaskIoError {}

/// Raw shape of a task file, before validation.
#[derive(Deserialize)]
struct RawTask {
    variables: Vec<VariableInfo>,
    operators: Vec<Operator>,
    #[serde(default)]
    axioms: Vec<Axiom>,
    initial_state_values: Vec<u32>,
    goals: Vec<Fact>,
}

/// Load and validate a task from a JSON file.
///
/// # Errors
///
/// I/O, JSON, and task-validation failures, each under its own variant.
pub fn read_task(path: &Path) -> Result<PlanningTask, TaskIoError> {
    let text = std::fs::read_to_string(path).map_err(TaskIoError::Io)?;
    let raw: RawTask = serde_json::from_str(&text).map_err(TaskIoError::Parse)?;
    PlanningTask::new(
        raw.variables,
        raw.operators,
        raw.axioms,
        raw.initial_state_values,
        raw.goals,
    )
    .map_err(TaskIoError::Invalid)
}

/// Write a task as pretty-printed JSON.
///
/// # Errors
///
/// Propagates the underlying write failure.
pub fn write_task(path: &Path, task: &PlanningTask) -> io::Result<()> {
    let json = serde_json::to_string_pretty(task).map_err(io::Error::other)?;
    std::fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let task = crate::tasks::chain(3);
        let path = std::env::temp_dir().join(format!(
            "sequent-task-io-{}.json",
            std::process::id()
        ));
        write_task(&path, &task).unwrap();
        let back = read_task(&path).unwrap();
        assert_eq!(back.operators(), task.operators());
        assert_eq!(back.goals(), task.goals());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn invalid_task_file_is_rejected() {
        let path = std::env::temp_dir().join(format!(
            "sequent-task-io-bad-{}.json",
            std::process::id()
        ));
        // Goal value 5 is outside the domain; must fail validation, not
        // deserialization.
        std::fs::write(
            &path,
            r#"{
                "variables": [{"name": "v", "domain_size": 2, "axiom_layer": -1}],
                "operators": [],
                "initial_state_values": [0],
                "goals": [{"var": 0, "value": 5}]
            }"#,
        )
        .unwrap();
        let err = read_task(&path).unwrap_err();
        assert!(matches!(err, TaskIoError::Invalid(_)));
        std::fs::remove_file(&path).unwrap();
    }
}
