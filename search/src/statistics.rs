//! Search counters and f-value progress tracking.
//!
//! One instance per search run. Counters for expanded, evaluated, and
//! generated states provide uniform reporting; the f-value "jump"
//! tracking notices whenever the expanded f-value exceeds everything seen
//! before, which for admissible consistent heuristics marks points whose
//! counters are independent of tie-breaking.

use serde::Serialize;
use tracing::info;

/// Accumulated counters of one search run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SearchStatistics {
    /// States for which successors were generated.
    expanded_states: u64,
    /// States for which an evaluator value was computed or fetched.
    evaluated_states: u64,
    /// Individual (non-cached) evaluator computations.
    evaluations: u64,
    /// States created, including duplicates of already-registered states.
    generated_states: u64,
    /// Closed states moved back to open.
    reopened_states: u64,
    dead_end_states: u64,
    /// Operators returned as applicable.
    generated_ops: u64,

    lastjump_f_value: Option<i64>,
    lastjump_expanded_states: u64,
    lastjump_reopened_states: u64,
    lastjump_evaluated_states: u64,
    lastjump_generated_states: u64,
}

impl SearchStatistics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_expanded(&mut self) {
        self.expanded_states += 1;
    }

    pub fn inc_evaluated_states(&mut self) {
        self.evaluated_states += 1;
    }

    pub fn inc_evaluations(&mut self, count: u64) {
        self.evaluations += count;
    }

    pub fn inc_generated(&mut self) {
        self.generated_states += 1;
    }

    pub fn inc_reopened(&mut self) {
        self.reopened_states += 1;
    }

    pub fn inc_dead_ends(&mut self) {
        self.dead_end_states += 1;
    }

    pub fn inc_generated_ops(&mut self, count: u64) {
        self.generated_ops += count;
    }

    #[must_use]
    pub fn expanded(&self) -> u64 {
        self.expanded_states
    }

    #[must_use]
    pub fn evaluated_states(&self) -> u64 {
        self.evaluated_states
    }

    #[must_use]
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    #[must_use]
    pub fn generated(&self) -> u64 {
        self.generated_states
    }

    #[must_use]
    pub fn reopened(&self) -> u64 {
        self.reopened_states
    }

    #[must_use]
    pub fn dead_ends(&self) -> u64 {
        self.dead_end_states
    }

    /// Report the f-value of a node about to be expanded. Logs a line on
    /// every jump (a new maximum) and snapshots the counters at that
    /// point.
    pub fn report_f_value_progress(&mut self, f: i64) {
        if self.lastjump_f_value.is_none_or(|last| f > last) {
            self.lastjump_f_value = Some(f);
            self.print_f_line();
            self.lastjump_expanded_states = self.expanded_states;
            self.lastjump_reopened_states = self.reopened_states;
            self.lastjump_evaluated_states = self.evaluated_states;
            self.lastjump_generated_states = self.generated_states;
        }
    }

    fn print_f_line(&self) {
        if let Some(f) = self.lastjump_f_value {
            info!(
                f,
                evaluated = self.evaluated_states,
                expanded = self.expanded_states,
                "f = {f}"
            );
        }
    }

    /// Log a progress checkpoint (new best heuristic value found).
    pub fn print_checkpoint_line(&self, g: i64) {
        info!(
            g,
            evaluated = self.evaluated_states,
            expanded = self.expanded_states,
            "checkpoint"
        );
    }

    pub fn print_detailed_statistics(&self) {
        info!("Expanded {} state(s).", self.expanded_states);
        info!("Reopened {} state(s).", self.reopened_states);
        info!("Evaluated {} state(s).", self.evaluated_states);
        info!("Evaluations: {}", self.evaluations);
        info!("Generated {} state(s).", self.generated_states);
        info!("Dead ends: {} state(s).", self.dead_end_states);
        info!("Generated {} operator(s).", self.generated_ops);
        if self.lastjump_f_value.is_some() {
            info!(
                "Expanded until last jump: {} state(s).",
                self.lastjump_expanded_states
            );
            info!(
                "Reopened until last jump: {} state(s).",
                self.lastjump_reopened_states
            );
            info!(
                "Evaluated until last jump: {} state(s).",
                self.lastjump_evaluated_states
            );
            info!(
                "Generated until last jump: {} state(s).",
                self.lastjump_generated_states
            );
        }
    }
}
