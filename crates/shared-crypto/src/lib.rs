//! # Shared Crypto - Beacon Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | Keccak-256, ABI words | Roster hashes, seeds, DKG result digests |
//! | `ecdsa` | secp256k1 | DKG result signatures (signer recovery) |
//! | `bls` | BLS12-381 (min-sig) | Relay entry signatures |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic nonces, recovery ids 0/1/27/28
//! - **Recovery**: malformed scalars surface as `CryptoError`, never a panic
//! - **BLS**: proof-of-possession ciphersuite, subgroup checks on every parse

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bls;
pub mod ecdsa;
pub mod errors;
pub mod hashing;

// Re-exports
pub use bls::{BlsKeyPair, BlsPublicKey, BlsSignature};
pub use ecdsa::{address_from_pubkey, recover_address, Secp256k1KeyPair, SIGNATURE_LENGTH};
pub use errors::CryptoError;
pub use hashing::{abi_encode_u32_array, abi_word, eth_signed_message_hash, keccak256};

