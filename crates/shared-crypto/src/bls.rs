//! BLS12-381 Signature Implementation
//!
//! Relay entries are threshold BLS signatures over the previous entry. The
//! beacon only verifies them; key generation and share combination happen
//! off-chain. This module uses the min-sig variant so entries stay short:
//! - Signatures (relay entries): 48-byte compressed G1 points
//! - Public keys (group keys): 96-byte compressed G2 points

use blst::min_sig::{PublicKey, SecretKey, Signature};
use blst::BLST_ERROR;
use rand::RngCore;

use crate::CryptoError;

/// Domain separation tag for relay entry signatures
const DST: &[u8] = b"BLS_SIG_BLS12381G1_XMD:SHA-256_SSWU_RO_POP_";

/// Compressed public key length (G2)
pub const PUBLIC_KEY_LENGTH: usize = 96;

/// Compressed signature length (G1)
pub const SIGNATURE_LENGTH: usize = 48;

/// BLS public key (96 bytes compressed)
#[derive(Clone, Debug)]
pub struct BlsPublicKey(PublicKey);

impl PartialEq for BlsPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsPublicKey {}

/// BLS signature (48 bytes compressed)
#[derive(Clone, Debug)]
pub struct BlsSignature(Signature);

impl PartialEq for BlsSignature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsSignature {}

/// BLS key pair standing in for a group's combined signing key
pub struct BlsKeyPair {
    secret: SecretKey,
    public: BlsPublicKey,
}

impl BlsKeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Result<Self, CryptoError> {
        let mut ikm = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut ikm);
        Self::from_ikm(&ikm)
    }

    /// Derive a key pair from input keying material (at least 32 bytes)
    pub fn from_ikm(ikm: &[u8]) -> Result<Self, CryptoError> {
        let secret = SecretKey::key_gen(ikm, &[])
            .map_err(|e| CryptoError::KeyGenerationFailed(format!("{:?}", e)))?;
        let public = BlsPublicKey(secret.sk_to_pk());
        Ok(Self { secret, public })
    }

    /// Sign a message
    pub fn sign(&self, message: &[u8]) -> BlsSignature {
        BlsSignature(self.secret.sign(message, DST, &[]))
    }

    /// Get the public key
    pub fn public_key(&self) -> BlsPublicKey {
        self.public.clone()
    }
}

impl BlsPublicKey {
    /// Verify a signature against this public key
    pub fn verify(&self, message: &[u8], signature: &BlsSignature) -> bool {
        signature.0.verify(true, message, DST, &[], &self.0, true) == BLST_ERROR::BLST_SUCCESS
    }

    /// Parse a compressed or serialized public key
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        PublicKey::from_bytes(bytes)
            .map(BlsPublicKey)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Serialize to 96-byte compressed form
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0.compress()
    }
}

impl BlsSignature {
    /// Parse a compressed or serialized signature
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Signature::from_bytes(bytes)
            .map(BlsSignature)
            .map_err(|_| CryptoError::InvalidSignature)
    }

    /// Serialize to 48-byte compressed form
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0.compress()
    }
}
