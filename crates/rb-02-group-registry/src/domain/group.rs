//! Stored group record

use serde::{Deserialize, Serialize};
use shared_crypto::keccak256;
use shared_types::{BlockNumber, Hash, OperatorId};

/// Group identity: Keccak-256 of the group public key.
pub type GroupId = Hash;

/// Identity of the group holding `public_key`.
pub fn group_id(public_key: &[u8]) -> GroupId {
    keccak256(public_key)
}

/// A threshold signing group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Keccak-256 of `public_key`
    pub id: GroupId,
    /// Aggregate BLS public key bytes
    pub public_key: Vec<u8>,
    /// Full DKG roster, one entry per seat
    pub members: Vec<OperatorId>,
    /// Hash of the roster with misbehaved seats removed
    pub members_hash: Hash,
    /// Block at which the candidate was registered
    pub registration_height: BlockNumber,
    /// Approval time; `None` while the group is a pending candidate
    pub activation_timestamp: Option<u64>,
    /// Set on relay timeout or when a candidate is discarded
    pub terminated: bool,
}

impl Group {
    /// Whether the group's DKG result has been approved.
    pub fn is_activated(&self) -> bool {
        self.activation_timestamp.is_some()
    }

    /// Approved and never terminated. Expiration is tracked by the registry.
    pub fn is_operational(&self) -> bool {
        self.is_activated() && !self.terminated
    }

    /// Registered, not approved, not discarded.
    pub fn is_pending(&self) -> bool {
        !self.is_activated() && !self.terminated
    }

    /// Number of seats.
    pub fn size(&self) -> usize {
        self.members.len()
    }
}
