//! secp256k1 signer recovery adapter
//!
//! Implements `SignerRecovery` over 65-byte `r || s || v` signatures.

use crate::ports::outbound::SignerRecovery;
use shared_crypto::{recover_address, CryptoError};
use shared_types::{Address, Hash};

/// Recovers Ethereum addresses with `k256`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EcdsaSignerRecovery;

impl EcdsaSignerRecovery {
    /// Create a new recovery adapter.
    pub fn new() -> Self {
        Self
    }
}

impl SignerRecovery for EcdsaSignerRecovery {
    fn recover_signer(&self, digest: &Hash, signature: &[u8]) -> Result<Address, CryptoError> {
        recover_address(digest, signature)
    }
}
