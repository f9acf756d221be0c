//! # Adapters Layer (Hexagonal Architecture)

mod bls_verifier;

pub use bls_verifier::Bls12381EntryVerifier;
