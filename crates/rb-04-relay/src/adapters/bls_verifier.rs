//! BLS12-381 entry verification backed by `blst`.

use crate::ports::EntryVerifier;
use shared_crypto::{BlsPublicKey, BlsSignature};

/// Verifies entries as min-sig BLS signatures: 48-byte G1 entries under
/// 96-byte G2 group keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bls12381EntryVerifier;

impl Bls12381EntryVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl EntryVerifier for Bls12381EntryVerifier {
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        let Ok(public_key) = BlsPublicKey::from_bytes(public_key) else {
            tracing::debug!(len = public_key.len(), "malformed group public key");
            return false;
        };
        let Ok(signature) = BlsSignature::from_bytes(signature) else {
            tracing::debug!(len = signature.len(), "malformed relay entry");
            return false;
        };
        public_key.verify(message, &signature)
    }
}
