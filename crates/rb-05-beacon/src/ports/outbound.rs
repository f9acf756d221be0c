//! Driven Ports (SPI - Outbound Dependencies)
//!
//! The staking ledger, the requester's callback and the block clock are
//! external to the beacon. Sortition pool, signer recovery and entry
//! verification ports are defined next to the domains that consume them.

use crate::events::BeaconEvent;
use shared_types::{Address, BlockContext, BlockNumber, U256};
use thiserror::Error;

/// Staking ledger failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakingError {
    #[error("slashing rejected: {0}")]
    SlashingRejected(String),

    #[error("staking backend unavailable: {0}")]
    Unavailable(String),
}

/// Token staking ledger.
pub trait Staking: Send + Sync {
    /// Slash `amount` from each of `operators`.
    fn slash(&self, amount: U256, operators: &[Address]) -> Result<(), StakingError>;

    /// Stake `operator` has authorized for the beacon.
    fn authorized_stake(&self, operator: &Address) -> U256;
}

/// Failure reported by a requester's callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    #[error("callback reverted: {0}")]
    Reverted(String),
}

/// Requester hook invoked once a relay entry is accepted.
pub trait RelayCallback: Send + Sync {
    /// Receives the new beacon value and the block it was accepted in.
    fn on_relay_entry(&self, entry: U256, block: BlockNumber) -> Result<(), CallbackError>;
}

/// Sink for beacon events.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: BeaconEvent);
}

/// Source of the block an operation executes in.
pub trait BlockClock: Send + Sync {
    fn current(&self) -> BlockContext;
}
