//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-process implementations of the beacon's outbound ports: a manually
//! driven block clock, event sinks, a deterministic weighted sortition pool
//! and a staking ledger.

mod clock;
mod event_sink;
mod sortition_pool;
mod staking;

pub use clock::{ManualBlockClock, SECONDS_PER_BLOCK};
pub use event_sink::{InMemoryEventSink, TracingEventSink};
pub use sortition_pool::InMemorySortitionPool;
pub use staking::{InMemoryStaking, SlashRecord};
