//! Error types for the group registry

use shared_types::Hash;
use thiserror::Error;

/// Group registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    /// A group with this public key has already been approved
    #[error("group was already activated")]
    AlreadyActivated { group_id: Hash },

    /// No group registered under this public key
    #[error("Group with this public key does not exist")]
    UnknownGroup { group_id: Hash },

    /// Index past the end of the sequence
    #[error("Group does not exist: index {index}")]
    UnknownGroupIndex { index: usize },

    /// Candidate was discarded before it could be activated
    #[error("Group was terminated")]
    GroupTerminated { index: usize },

    /// Operation requires a candidate that has not been approved
    #[error("Group is not pending")]
    NotPending { index: usize },

    /// Every registered group is expired, terminated or still pending
    #[error("No active groups")]
    NoActiveGroups,
}

/// Result type for registry operations
pub type GroupResult<T> = Result<T, GroupError>;
