//! Group shape and DKG timing parameters

use serde::{Deserialize, Serialize};
use shared_crypto::SIGNATURE_LENGTH;

/// Shape of a group produced by DKG.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupParameters {
    /// Seats per group (N)
    pub group_size: usize,
    /// Minimum DKG result signatures (T)
    pub signature_threshold: usize,
    /// Minimum seats that must complete DKG; at most `N - active_threshold`
    /// seats may be marked misbehaved
    pub active_threshold: usize,
    /// Byte length of an aggregate group public key
    pub public_key_length: usize,
    /// Byte length of each member signature
    pub signature_byte_size: usize,
}

impl GroupParameters {
    /// Parameters where the active threshold equals the signature threshold.
    pub fn new(group_size: usize, signature_threshold: usize) -> Self {
        Self {
            group_size,
            signature_threshold,
            active_threshold: signature_threshold,
            public_key_length: 128,
            signature_byte_size: SIGNATURE_LENGTH,
        }
    }

    /// Require at least `active_threshold` seats to complete DKG.
    pub fn with_active_threshold(mut self, active_threshold: usize) -> Self {
        self.active_threshold = active_threshold;
        self
    }

    /// Expect group public keys of `length` bytes.
    pub fn with_public_key_length(mut self, length: usize) -> Self {
        self.public_key_length = length;
        self
    }

    /// Largest number of misbehaved seats a result may report.
    pub fn max_misbehaved(&self) -> usize {
        self.group_size.saturating_sub(self.active_threshold)
    }
}

impl Default for GroupParameters {
    fn default() -> Self {
        Self::new(64, 33).with_active_threshold(58)
    }
}

/// Timing of a DKG round, in blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DkgTimeParameters {
    /// Blocks reserved for the off-chain protocol after the round starts
    pub offchain_dkg_time: u64,
    /// Blocks a submitted result can be challenged
    pub result_challenge_period_length: u64,
    /// Blocks after the challenge period during which only the submitter
    /// may approve
    pub submitter_precedence_period_length: u64,
    /// Blocks between consecutive seats becoming eligible to submit
    pub submitter_eligibility_delay: u64,
}

impl Default for DkgTimeParameters {
    fn default() -> Self {
        Self {
            offchain_dkg_time: 5 * (1 + 5) + 2 * (1 + 10) + 20,
            result_challenge_period_length: 11_520,
            submitter_precedence_period_length: 20,
            submitter_eligibility_delay: 10,
        }
    }
}
