//! Submitted DKG result

use serde::{Deserialize, Serialize};
use shared_crypto::{abi_word, eth_signed_message_hash, keccak256};
use shared_types::{BlockNumber, Hash, OperatorId, SeatIndex};

/// Outcome of an off-chain DKG round, as submitted by one member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DkgResult {
    /// Seat (1-based) of the member submitting the result
    pub submitter_member_index: SeatIndex,
    /// Aggregate public key of the new group
    pub group_public_key: Vec<u8>,
    /// Seats (1-based, ascending) excluded for misbehaving off-chain
    pub misbehaved_members_indices: Vec<SeatIndex>,
    /// Concatenated fixed-width member signatures
    pub signatures: Vec<u8>,
    /// Seats (1-based, ascending) that produced `signatures`, in order
    pub signing_members_indices: Vec<SeatIndex>,
    /// Full DKG roster
    pub members: Vec<OperatorId>,
    /// Hash of `members` without the misbehaved seats
    pub members_hash: Hash,
}

impl DkgResult {
    /// Identity of the result: Keccak-256 over its ABI-style encoding.
    pub fn hash(&self) -> Hash {
        let mut encoded = Vec::new();
        encoded.extend_from_slice(&abi_word(self.submitter_member_index as u64));
        push_bytes(&mut encoded, &self.group_public_key);
        push_words(&mut encoded, self.misbehaved_members_indices.iter().map(|i| *i as u64));
        push_bytes(&mut encoded, &self.signatures);
        push_words(&mut encoded, self.signing_members_indices.iter().map(|i| *i as u64));
        push_words(&mut encoded, self.members.iter().map(|m| u64::from(*m)));
        encoded.extend_from_slice(&self.members_hash);
        keccak256(&encoded)
    }

    /// Signature `i` (0-based) of `width` bytes, if present.
    pub fn signature(&self, i: usize, width: usize) -> Option<&[u8]> {
        self.signatures.get(i * width..(i + 1) * width)
    }

    /// Operators at the misbehaved seats.
    pub fn misbehaved_operators(&self) -> Vec<OperatorId> {
        self.misbehaved_members_indices
            .iter()
            .filter_map(|seat| seat.checked_sub(1).and_then(|i| self.members.get(i)))
            .copied()
            .collect()
    }
}

fn push_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&abi_word(bytes.len() as u64));
    out.extend_from_slice(bytes);
}

fn push_words(out: &mut Vec<u8>, values: impl ExactSizeIterator<Item = u64>) {
    out.extend_from_slice(&abi_word(values.len() as u64));
    for value in values {
        out.extend_from_slice(&abi_word(value));
    }
}

/// Digest each signing member signs:
/// `personal_sign(keccak256(chainId ‖ groupPubKey ‖ misbehaved[] ‖ startBlock))`.
pub fn signing_digest(
    chain_id: u64,
    group_public_key: &[u8],
    misbehaved: &[SeatIndex],
    start_block: BlockNumber,
) -> Hash {
    let mut packed = Vec::with_capacity(64 + group_public_key.len() + misbehaved.len() * 32);
    packed.extend_from_slice(&abi_word(chain_id));
    packed.extend_from_slice(group_public_key);
    for seat in misbehaved {
        packed.extend_from_slice(&abi_word(*seat as u64));
    }
    packed.extend_from_slice(&abi_word(start_block));
    eth_signed_message_hash(&keccak256(&packed))
}
