//! Ports module for group creation

pub mod outbound;

pub use outbound::{PoolError, SignerRecovery, SortitionPool};
