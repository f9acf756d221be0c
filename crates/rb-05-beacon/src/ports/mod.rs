//! Ports module for the beacon service

pub mod inbound;
pub mod outbound;

pub use inbound::RandomBeaconApi;
pub use outbound::{
    BlockClock, CallbackError, EventSink, RelayCallback, Staking, StakingError,
};
pub use rb_03_dkg::{PoolError, SignerRecovery, SortitionPool};
pub use rb_04_relay::EntryVerifier;
