//! # Core Domain Entities
//!
//! Identifiers and value types used throughout the beacon.
//!
//! ## Clusters
//!
//! - **Chain**: `Hash`, `Address`, `BlockNumber`, `BlockContext`
//! - **Operators**: `OperatorId`, `SeatIndex`
//! - **Arithmetic**: `U256`, `WAD`

use serde::{Deserialize, Serialize};

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// A 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// Block height.
pub type BlockNumber = u64;

/// Height and timestamp of the block an operation executes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockContext {
    /// Block height.
    pub number: BlockNumber,
    /// Unix timestamp of the block in seconds.
    pub timestamp: u64,
}

impl BlockContext {
    /// Create a new block context.
    pub fn new(number: BlockNumber, timestamp: u64) -> Self {
        Self { number, timestamp }
    }
}

// =============================================================================
// CLUSTER B: OPERATORS
// =============================================================================

/// Sortition pool identifier of a staked operator.
///
/// Encoded as `uint32` wherever rosters are hashed.
pub type OperatorId = u32;

/// 1-based position of a member within a group roster.
pub type SeatIndex = usize;

// =============================================================================
// CLUSTER C: ARITHMETIC
// =============================================================================

/// Fixed-point unit (1e18) used for fractional factors.
pub const WAD: u64 = 1_000_000_000_000_000_000;

/// Interpret a 32-byte digest as a big-endian unsigned integer.
pub fn u256_from_hash(hash: &Hash) -> U256 {
    U256::from_big_endian(hash)
}

/// Big-endian 32-byte representation of a `U256`.
pub fn u256_to_bytes(value: &U256) -> [u8; 32] {
    let mut out = [0u8; 32];
    value.to_big_endian(&mut out);
    out
}
