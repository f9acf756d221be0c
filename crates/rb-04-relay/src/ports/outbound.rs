//! Outbound ports for the relay subsystem

/// Threshold signature verification for relay entries.
///
/// Implementations must return `false` for malformed keys or signatures
/// rather than failing.
pub trait EntryVerifier: Send + Sync {
    /// Whether `signature` is a valid signature over `message` under the
    /// group's `public_key`.
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool;
}
