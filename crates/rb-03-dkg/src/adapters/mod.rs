//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits with concrete cryptography.

mod ecdsa_recovery;

pub use ecdsa_recovery::EcdsaSignerRecovery;
