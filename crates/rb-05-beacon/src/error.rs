//! Error types for the beacon service
//!
//! Lower-layer errors are wrapped transparently so their protocol reason
//! strings surface unchanged.

use crate::config::ConfigError;
use crate::ports::{CallbackError, StakingError};
use rb_01_eligibility::EligibilityError;
use rb_02_group_registry::GroupError;
use rb_03_dkg::{DkgError, PoolError, ValidationError};
use rb_04_relay::RelayError;
use thiserror::Error;

/// Beacon service errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BeaconError {
    #[error("Not awaiting genesis")]
    NotAwaitingGenesis,

    #[error("Requester must be authorized")]
    RequesterNotAuthorized,

    #[error("Authorization below the minimum")]
    AuthorizationBelowMinimum,

    #[error("Unexpected submitter index")]
    UnexpectedSubmitterIndex,

    #[error("Operator not in the sortition pool")]
    OperatorNotInPool,

    #[error("Relay request in progress")]
    RelayRequestInProgress,

    #[error(transparent)]
    Group(#[from] GroupError),

    #[error(transparent)]
    Dkg(#[from] DkgError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Eligibility(#[from] EligibilityError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Staking(#[from] StakingError),

    #[error(transparent)]
    Callback(#[from] CallbackError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for beacon operations
pub type BeaconResult<T> = Result<T, BeaconError>;
