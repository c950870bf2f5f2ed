//! Status enums for the order submission lifecycle.

use serde::{Deserialize, Serialize};

/// Where a session's order submission currently stands.
///
/// `Succeeded` and `Failed` are display states, not terminal ones: the next
/// submission starts again from either of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Nothing submitted yet (or a pending submission was cancelled).
    #[default]
    Idle,
    /// Waiting for the simulated backend to answer.
    Pending,
    /// The last order was placed.
    Succeeded,
    /// The last placement attempt failed; cart and form were kept for retry.
    Failed,
}

impl SubmissionStatus {
    /// Whether a new submission may start from this state.
    #[must_use]
    pub const fn accepts_submit(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pending => write!(f, "pending"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Answer from the (simulated) order backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderOutcome {
    Succeeded,
    Failed,
}

impl From<OrderOutcome> for SubmissionStatus {
    fn from(outcome: OrderOutcome) -> Self {
        match outcome {
            OrderOutcome::Succeeded => Self::Succeeded,
            OrderOutcome::Failed => Self::Failed,
        }
    }
}
