//! Wall-clock limit enforcement.
//!
//! The deadline is polled between search steps; nothing is preempted
//! mid-step.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct SearchTimer {
    start: Instant,
    deadline: Option<Instant>,
}

impl SearchTimer {
    #[must_use]
    pub fn new(max_time: Option<Duration>) -> Self {
        let start = Instant::now();
        Self {
            start,
            deadline: max_time.map(|limit| start + limit),
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
