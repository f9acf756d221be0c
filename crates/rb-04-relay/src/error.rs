//! Error types for the relay entry subsystem

use rb_01_eligibility::EligibilityError;
use thiserror::Error;

/// Relay errors. Display strings are the protocol's revert reasons.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("Another relay request in progress")]
    RequestInProgress { request_id: u64 },

    #[error("No relay request in progress")]
    NoRequestInProgress,

    #[error("Relay request timed out")]
    TimedOut { request_id: u64 },

    #[error("Relay request did not time out")]
    NotTimedOut { request_id: u64 },

    #[error("Invalid entry")]
    InvalidEntry,

    #[error(transparent)]
    Eligibility(#[from] EligibilityError),
}

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;
