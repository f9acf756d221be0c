//! Events published by the beacon
//!
//! Serialized with an `event` tag; byte fields are hex strings and 256-bit
//! values `0x`-prefixed hex.

use crate::config::{
    AuthorizationParameters, GroupCreationParameters, RelayEntryParameters, RewardParameters,
    SlashingParameters,
};
use rb_03_dkg::DkgTimeParameters;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::{Address, BlockNumber, Hash, OperatorId, U256};

/// Everything off-chain indexers can observe.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum BeaconEvent {
    // === Group creation ===
    DkgStarted {
        seed: U256,
    },
    DkgResultSubmitted {
        #[serde_as(as = "Hex")]
        result_hash: Hash,
        #[serde_as(as = "Hex")]
        group_public_key: Vec<u8>,
        #[serde_as(as = "Hex")]
        submitter: Address,
    },
    DkgResultApproved {
        #[serde_as(as = "Hex")]
        result_hash: Hash,
        #[serde_as(as = "Hex")]
        approver: Address,
    },
    DkgResultChallenged {
        #[serde_as(as = "Hex")]
        result_hash: Hash,
        #[serde_as(as = "Hex")]
        challenger: Address,
        reason: String,
    },
    DkgTimedOut,
    DkgMaliciousResultSlashed {
        #[serde_as(as = "Hex")]
        result_hash: Hash,
        slashing_amount: U256,
        #[serde_as(as = "Hex")]
        malicious_submitter: Address,
    },
    DkgMaliciousResultSlashingFailed {
        #[serde_as(as = "Hex")]
        result_hash: Hash,
        slashing_amount: U256,
        #[serde_as(as = "Hex")]
        malicious_submitter: Address,
    },
    MisbehavedMembersBanFailed {
        #[serde_as(as = "Hex")]
        result_hash: Hash,
        operators: Vec<OperatorId>,
    },

    // === Groups ===
    CandidateGroupRegistered {
        #[serde_as(as = "Hex")]
        group_public_key: Vec<u8>,
    },
    CandidateGroupRemoved {
        #[serde_as(as = "Hex")]
        group_public_key: Vec<u8>,
    },
    GroupActivated {
        group_index: usize,
        #[serde_as(as = "Hex")]
        group_public_key: Vec<u8>,
    },

    // === Relay ===
    RelayEntryRequested {
        request_id: u64,
        group_index: usize,
        #[serde_as(as = "Hex")]
        previous_entry: Vec<u8>,
    },
    RelayEntrySubmitted {
        request_id: u64,
        #[serde_as(as = "Hex")]
        submitter: Address,
        #[serde_as(as = "Hex")]
        entry: Vec<u8>,
    },
    RelayEntryTimedOut {
        request_id: u64,
        terminated_group_index: usize,
    },
    RelayEntryDelaySlashed {
        request_id: u64,
        slashing_amount: U256,
        #[serde_as(as = "Vec<Hex>")]
        operators: Vec<Address>,
    },
    RelayEntryDelaySlashingFailed {
        request_id: u64,
        slashing_amount: U256,
        #[serde_as(as = "Vec<Hex>")]
        operators: Vec<Address>,
    },
    RelayEntryTimeoutSlashed {
        request_id: u64,
        slashing_amount: U256,
        #[serde_as(as = "Vec<Hex>")]
        operators: Vec<Address>,
    },
    RelayEntryTimeoutSlashingFailed {
        request_id: u64,
        slashing_amount: U256,
        #[serde_as(as = "Vec<Hex>")]
        operators: Vec<Address>,
    },
    InactiveMembersRemoved {
        request_id: u64,
        group_index: usize,
        operators: Vec<OperatorId>,
    },
    CallbackFailed {
        entry: U256,
        entry_submitted_block: BlockNumber,
    },

    // === Operators ===
    OperatorJoinedSortitionPool {
        #[serde_as(as = "Hex")]
        operator: Address,
        operator_id: OperatorId,
    },
    OperatorStatusUpdated {
        #[serde_as(as = "Hex")]
        operator: Address,
        operator_id: OperatorId,
        weight: U256,
    },
    RequesterAuthorizationUpdated {
        #[serde_as(as = "Hex")]
        requester: Address,
        is_authorized: bool,
    },

    // === Parameters ===
    AuthorizationParametersUpdated(AuthorizationParameters),
    DkgParametersUpdated(DkgTimeParameters),
    GroupCreationParametersUpdated(GroupCreationParameters),
    RelayEntryParametersUpdated(RelayEntryParameters),
    RewardParametersUpdated(RewardParameters),
    SlashingParametersUpdated(SlashingParameters),
}

impl BeaconEvent {
    /// Variant name, as it appears in the `event` tag.
    pub fn name(&self) -> &'static str {
        match self {
            BeaconEvent::DkgStarted { .. } => "DkgStarted",
            BeaconEvent::DkgResultSubmitted { .. } => "DkgResultSubmitted",
            BeaconEvent::DkgResultApproved { .. } => "DkgResultApproved",
            BeaconEvent::DkgResultChallenged { .. } => "DkgResultChallenged",
            BeaconEvent::DkgTimedOut => "DkgTimedOut",
            BeaconEvent::DkgMaliciousResultSlashed { .. } => "DkgMaliciousResultSlashed",
            BeaconEvent::DkgMaliciousResultSlashingFailed { .. } => {
                "DkgMaliciousResultSlashingFailed"
            }
            BeaconEvent::MisbehavedMembersBanFailed { .. } => "MisbehavedMembersBanFailed",
            BeaconEvent::CandidateGroupRegistered { .. } => "CandidateGroupRegistered",
            BeaconEvent::CandidateGroupRemoved { .. } => "CandidateGroupRemoved",
            BeaconEvent::GroupActivated { .. } => "GroupActivated",
            BeaconEvent::RelayEntryRequested { .. } => "RelayEntryRequested",
            BeaconEvent::RelayEntrySubmitted { .. } => "RelayEntrySubmitted",
            BeaconEvent::RelayEntryTimedOut { .. } => "RelayEntryTimedOut",
            BeaconEvent::RelayEntryDelaySlashed { .. } => "RelayEntryDelaySlashed",
            BeaconEvent::RelayEntryDelaySlashingFailed { .. } => "RelayEntryDelaySlashingFailed",
            BeaconEvent::RelayEntryTimeoutSlashed { .. } => "RelayEntryTimeoutSlashed",
            BeaconEvent::RelayEntryTimeoutSlashingFailed { .. } => {
                "RelayEntryTimeoutSlashingFailed"
            }
            BeaconEvent::InactiveMembersRemoved { .. } => "InactiveMembersRemoved",
            BeaconEvent::CallbackFailed { .. } => "CallbackFailed",
            BeaconEvent::OperatorJoinedSortitionPool { .. } => "OperatorJoinedSortitionPool",
            BeaconEvent::OperatorStatusUpdated { .. } => "OperatorStatusUpdated",
            BeaconEvent::RequesterAuthorizationUpdated { .. } => "RequesterAuthorizationUpdated",
            BeaconEvent::AuthorizationParametersUpdated(_) => "AuthorizationParametersUpdated",
            BeaconEvent::DkgParametersUpdated(_) => "DkgParametersUpdated",
            BeaconEvent::GroupCreationParametersUpdated(_) => "GroupCreationParametersUpdated",
            BeaconEvent::RelayEntryParametersUpdated(_) => "RelayEntryParametersUpdated",
            BeaconEvent::RewardParametersUpdated(_) => "RewardParametersUpdated",
            BeaconEvent::SlashingParametersUpdated(_) => "SlashingParametersUpdated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_hex_serialization() {
        let event = BeaconEvent::RelayEntryRequested {
            request_id: 3,
            group_index: 1,
            previous_entry: vec![0xab, 0xcd],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "RelayEntryRequested");
        assert_eq!(json["previous_entry"], "abcd");
        assert_eq!(json["request_id"], 3);
    }

    #[test]
    fn test_u256_and_address_lists() {
        let event = BeaconEvent::RelayEntryDelaySlashed {
            request_id: 1,
            slashing_amount: U256::from(255u64),
            operators: vec![[0x01; 20]],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["slashing_amount"], "0xff");
        assert_eq!(json["operators"][0], "01".repeat(20));

        let back: BeaconEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_name_matches_tag() {
        let events = [
            BeaconEvent::DkgTimedOut,
            BeaconEvent::CallbackFailed {
                entry: U256::one(),
                entry_submitted_block: 9,
            },
            BeaconEvent::RewardParametersUpdated(RewardParameters {
                sortition_pool_rewards_ban_duration: 1,
            }),
        ];
        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["event"], event.name());
        }
    }
}
