//! Driven Ports (SPI - Outbound Dependencies)
//!
//! The sortition pool is an external weighted-sampling structure. The beacon
//! consumes it as a black box: sampling a roster for a seed, mapping operator
//! ids to addresses, and locking the roster while a DKG round is open.

use shared_crypto::CryptoError;
use shared_types::{Address, Hash, OperatorId, U256};
use thiserror::Error;

/// Sortition pool failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("Sortition pool locked")]
    Locked,

    #[error("Unknown operator: {0}")]
    UnknownOperator(OperatorId),

    #[error("Operator not registered: {0:?}")]
    UnknownAddress(Address),

    #[error("Not enough operators in pool: have {available}, need {required}")]
    NotEnoughOperators { available: usize, required: usize },

    #[error("Sortition pool error: {0}")]
    Backend(String),
}

/// Weighted sortition pool of staked operators.
pub trait SortitionPool: Send + Sync {
    /// Sample `group_size` seats for `seed`. Deterministic for a locked pool.
    fn select_group(&self, group_size: usize, seed: &U256) -> Result<Vec<OperatorId>, PoolError>;

    /// Pool id of `operator`, if it ever joined.
    fn operator_id(&self, operator: &Address) -> Option<OperatorId>;

    /// Addresses of `ids`, in order.
    fn operator_addresses(&self, ids: &[OperatorId]) -> Result<Vec<Address>, PoolError>;

    /// Current sampling weight of `operator`, `None` if not in the pool.
    fn weight(&self, operator: &Address) -> Option<U256>;

    /// Add `operator` with `weight`, returning its id.
    fn insert_operator(&self, operator: &Address, weight: U256) -> Result<OperatorId, PoolError>;

    /// Re-weight an operator already in the pool.
    fn update_operator(&self, operator: &Address, weight: U256) -> Result<(), PoolError>;

    /// Remove operators from sampling.
    fn remove_operators(&self, ids: &[OperatorId]) -> Result<(), PoolError>;

    /// Exclude operators from pool rewards until `until` (unix seconds).
    fn set_rewards_ineligible(&self, ids: &[OperatorId], until: u64) -> Result<(), PoolError>;

    /// Freeze the roster.
    fn lock(&self);

    /// Unfreeze the roster.
    fn unlock(&self);

    /// Whether the roster is frozen.
    fn is_locked(&self) -> bool;
}

/// Recovers the address that signed a DKG result digest.
pub trait SignerRecovery: Send + Sync {
    /// Address that produced `signature` over `digest`.
    fn recover_signer(&self, digest: &Hash, signature: &[u8]) -> Result<Address, CryptoError>;
}
