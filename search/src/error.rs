//! Typed configuration-time errors of the search core.
//!
//! Everything here is raised before the first node is expanded. Runtime
//! outcomes (no plan, timeout) are statuses, not errors; invariant
//! violations are assertions.

use std::fmt;

/// Failure while assembling a search configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchSetupError {
    /// Invalid configuration, e.g. a lazy evaluator that does not cache
    /// its estimates.
    InputError { detail: String },

    /// The task uses a construct a selected component cannot handle.
    UnsupportedFeature { detail: String },
}

impl fmt::Display for SearchSetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputError { detail } => write!(f, "input error: {detail}"),
            Self::UnsupportedFeature { detail } => {
                write!(f, "unsupported feature: {detail}")
            }
        }
    }
}

impl std::error::Error for SearchSetupError {}
