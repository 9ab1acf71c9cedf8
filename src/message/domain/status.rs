//! Processing status of an execution-context record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dispatch status of a message.
///
/// Starts at [`ProcessingStatus::NotRun`] and moves strictly forward during
/// pipeline execution; terminal states are never left. Transitions are
/// driven by pipeline-internal code, not by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessingStatus {
    /// The message has been constructed but no handler has run.
    NotRun,
    /// A handler is currently executing.
    Running,
    /// The handler finished without error.
    Completed,
    /// The handler ran and returned an error.
    Failed,
    /// No handler could be resolved; the message never ran.
    Rejected,
    /// A stored record could not be fully reconstructed by an adapter.
    Corrupted,
}

impl ProcessingStatus {
    /// Returns `true` once the message can no longer change status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::NotRun | Self::Running)
    }

    /// Returns `true` for the unsuccessful terminal states.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Rejected | Self::Corrupted)
    }

    /// Returns `true` when moving from `self` to `next` goes strictly
    /// forward. Terminal states admit no further movement.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        next.rank() > self.rank()
    }

    const fn rank(self) -> u8 {
        match self {
            Self::NotRun => 0,
            Self::Running => 1,
            Self::Completed | Self::Failed | Self::Rejected | Self::Corrupted => 2,
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotRun => "not-run",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Rejected => "rejected",
            Self::Corrupted => "corrupted",
        };
        write!(f, "{name}")
    }
}
