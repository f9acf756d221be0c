//! # rb-05-beacon
//!
//! The random beacon service: it wires the group registry, DKG round, relay
//! and eligibility rules to the sortition pool, staking ledger, requester
//! callbacks and an event sink.
//!
//! ## Lifecycle
//!
//! ```text
//!  genesis ──→ DKG round ──approve──→ group active ──┐
//!                 ↑                                   │
//!                 │  every `group_creation_frequency` ▼
//!                 └───────────────────────── relay entry requested
//!                                                     │
//!                          entry = BLS_sign(group, previous_entry)
//!                                                     │
//!                                    callback(keccak(entry), block)
//! ```
//!
//! ## Ports
//!
//! | Port | Adapter |
//! |------|---------|
//! | `SortitionPool` | `InMemorySortitionPool` |
//! | `SignerRecovery` | `rb_03_dkg::EcdsaSignerRecovery` |
//! | `EntryVerifier` | `rb_04_relay::Bls12381EntryVerifier` |
//! | `Staking` | `InMemoryStaking` |
//! | `EventSink` | `InMemoryEventSink`, `TracingEventSink` |
//! | `BlockClock` | `ManualBlockClock` |

pub mod adapters;
pub mod config;
pub mod error;
pub mod events;
pub mod ports;
pub mod service;
mod state;

pub use adapters::{
    InMemoryEventSink, InMemorySortitionPool, InMemoryStaking, ManualBlockClock, SlashRecord,
    TracingEventSink,
};
pub use config::{
    AuthorizationParameters, BeaconConfig, ConfigError, GroupCreationParameters,
    RelayEntryParameters, RewardParameters, SlashingParameters, GENESIS_SEED,
};
pub use error::{BeaconError, BeaconResult};
pub use events::BeaconEvent;
pub use ports::{
    BlockClock, CallbackError, EntryVerifier, EventSink, PoolError, RandomBeaconApi,
    RelayCallback, SignerRecovery, SortitionPool, Staking, StakingError,
};
pub use service::{BeaconDependencies, RandomBeaconService};
