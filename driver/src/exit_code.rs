//! Process exit codes.
//!
//! The codes are part of the external interface: wrapper scripts key on
//! them to tell "no plan exists" from "ran out of resources".

use sequent_search::SearchSetupError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// A plan was found.
    Success = 0,
    /// Search completed and proved there is no plan (within the bound).
    Unsolvable = 11,
    /// Timeout or memory limit before a plan was found.
    OutOfResources = 12,
    /// Malformed task or configuration.
    InputError = 22,
    /// The task uses a construct an involved component cannot handle.
    UnsupportedFeature = 23,
}

impl ExitCode {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Terminate the process with this code.
    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }
}

impl From<&SearchSetupError> for ExitCode {
    fn from(error: &SearchSetupError) -> Self {
        match error {
            SearchSetupError::InputError { .. } => Self::InputError,
            SearchSetupError::UnsupportedFeature { .. } => Self::UnsupportedFeature,
        }
    }
}
