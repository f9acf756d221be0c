//! # Keccak-256 and ABI Encoding
//!
//! Every digest the beacon commits to is Keccak-256 over an Ethereum ABI
//! style encoding, so identical inputs hash identically on any platform.
//!
//! - `abi_word`: a value left-padded to a 32-byte big-endian word
//! - `abi_encode_u32_array`: `abi.encode(uint32[])` (offset, length, elements)
//! - `eth_signed_message_hash`: the `"\x19Ethereum Signed Message:\n32"` digest

use sha3::{Digest, Keccak256};

/// Keccak-256 output.
pub type Hash = [u8; 32];

const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode an unsigned integer as a 32-byte big-endian word.
pub fn abi_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Encode a `uint32[]` exactly as `abi.encode` does for a single dynamic
/// array argument.
pub fn abi_encode_u32_array(values: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(64 + values.len() * 32);
    out.extend_from_slice(&abi_word(32));
    out.extend_from_slice(&abi_word(values.len() as u64));
    for value in values {
        out.extend_from_slice(&abi_word(u64::from(*value)));
    }
    out
}

/// Digest signed by wallets for a 32-byte message (EIP-191 personal sign).
pub fn eth_signed_message_hash(message: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(ETH_SIGNED_MESSAGE_PREFIX);
    hasher.update(message);
    hasher.finalize().into()
}
