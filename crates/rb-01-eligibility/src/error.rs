//! Error types for submitter eligibility

use shared_types::SeatIndex;
use thiserror::Error;

/// Eligibility errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EligibilityError {
    /// Seat is outside the currently eligible arc
    #[error("Submitter not eligible")]
    SubmitterNotEligible { seat: SeatIndex },

    /// Seat is not within `[1, group_size]`
    #[error("Invalid submitter index")]
    InvalidSubmitterIndex { seat: SeatIndex },

    /// Window requested for an empty group
    #[error("Group size must be greater than zero")]
    EmptyGroup,

    /// Per-seat delay of zero blocks
    #[error("Eligibility delay must be greater than zero")]
    ZeroDelay,
}

/// Result type for eligibility operations
pub type EligibilityResult<T> = Result<T, EligibilityError>;
