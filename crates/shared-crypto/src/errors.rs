//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Signature has the wrong byte length
    #[error("Invalid signature length: expected {expected}, got {actual}")]
    InvalidSignatureLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Recovery byte is not one of 0, 1, 27, 28
    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// r or s is zero or not below the curve order
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// No public key could be recovered from the signature
    #[error("Signer recovery failed")]
    RecoveryFailed,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Invalid signature
    #[error("Invalid signature")]
    InvalidSignature,

    /// Key generation failed
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),
}
