//! # ECDSA Signer Recovery (secp256k1)
//!
//! DKG results are signed by group members with their operator keys. The
//! beacon never holds those public keys; it recovers the signer address from
//! each 65-byte `r || s || v` signature and compares it with the roster.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Recovery ids accepted as 0/1 or 27/28
//! - Zero or out-of-range scalars are rejected as `InvalidSignatureFormat`

use crate::hashing::keccak256;
use crate::CryptoError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use zeroize::Zeroize;

/// Byte length of a recoverable signature (`r || s || v`).
pub const SIGNATURE_LENGTH: usize = 65;

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// Recover the address that produced `signature` over `prehash`.
pub fn recover_address(prehash: &[u8; 32], signature: &[u8]) -> Result<Address, CryptoError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(CryptoError::InvalidSignatureLength {
            expected: SIGNATURE_LENGTH,
            actual: signature.len(),
        });
    }

    let recovery_id = parse_recovery_id(signature[64])?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes.copy_from_slice(&signature[..64]);
    let parsed = Signature::from_slice(&sig_bytes);
    sig_bytes.zeroize();
    let sig = parsed.map_err(|_| CryptoError::InvalidSignatureFormat)?;

    let recovered = VerifyingKey::recover_from_prehash(prehash, &sig, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;

    Ok(address_from_pubkey(&recovered))
}

/// Derive the Ethereum address of a public key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let encoded = public_key.to_encoded_point(false);

    // Keccak256 of the uncompressed key without the 0x04 prefix
    let hash = keccak256(&encoded.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

fn parse_recovery_id(v: u8) -> Result<RecoveryId, CryptoError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(CryptoError::InvalidRecoveryId(v)),
    };

    RecoveryId::try_from(id).map_err(|_| CryptoError::InvalidRecoveryId(v))
}

/// secp256k1 operator key pair.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Address controlled by this key.
    pub fn address(&self) -> Address {
        address_from_pubkey(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte digest, returning `r || s || v` with `v` in {27, 28}.
    pub fn sign_prehash(&self, prehash: &[u8; 32]) -> Result<[u8; SIGNATURE_LENGTH], CryptoError> {
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(prehash)
            .map_err(|_| CryptoError::InvalidSignature)?;

        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..64].copy_from_slice(&sig.to_bytes());
        out[64] = recid.to_byte() + 27;
        Ok(out)
    }
}

impl Drop for Secp256k1KeyPair {
    fn drop(&mut self) {
        let mut bytes: [u8; 32] = self.signing_key.to_bytes().into();
        bytes.zeroize();
    }
}
