//! Error types for DKG result validation and the DKG round

use thiserror::Error;

/// Reasons a DKG result is rejected by the validator.
///
/// Display strings are the protocol's rejection reasons.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Malformed group public key")]
    MalformedGroupPublicKey { expected: usize, actual: usize },

    #[error("Too many members misbehaving during DKG")]
    TooManyMisbehaving { count: usize, max: usize },

    #[error("Corrupted misbehaved members indices")]
    CorruptedMisbehavedIndices,

    #[error("No signatures provided")]
    NoSignatures,

    #[error("Malformed signatures array")]
    MalformedSignatures { length: usize },

    #[error("Unexpected signatures count")]
    UnexpectedSignaturesCount { signatures: usize, indices: usize },

    #[error("Too few signatures")]
    TooFewSignatures { count: usize, threshold: usize },

    #[error("Too many signatures")]
    TooManySignatures { count: usize, group_size: usize },

    #[error("Corrupted signing member indices")]
    CorruptedSigningIndices,

    #[error("Invalid members hash")]
    InvalidMembersHash,

    #[error("Invalid group members")]
    InvalidGroupMembers,

    #[error("Invalid signatures")]
    InvalidSignatures,
}

/// DKG round errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DkgError {
    #[error("current state is not IDLE")]
    NotIdle,

    #[error("current state is not AWAITING_RESULT")]
    NotAwaitingResult,

    #[error("current state is not CHALLENGE")]
    NotChallenge,

    #[error("dkg timeout already passed")]
    TimeoutPassed,

    #[error("dkg has not timed out")]
    NotTimedOut,

    #[error("challenge period has not passed yet")]
    ChallengePeriodNotPassed,

    #[error("challenge period has already passed")]
    ChallengePeriodPassed,

    #[error("Only the DKG result submitter can approve the result at this moment")]
    SubmitterPrecedence,

    #[error("result is different than the submitted one")]
    ResultMismatch,

    #[error("unjustified challenge")]
    UnjustifiedChallenge,
}

/// Result type for DKG operations
pub type DkgRoundResult<T> = Result<T, DkgError>;
