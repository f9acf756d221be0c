//! Roster canonicalisation
//!
//! A group's members hash commits to the roster that actually holds key
//! shares: the DKG roster with misbehaved seats removed. The surviving
//! members keep their original relative order, and the result is hashed as
//! an ABI-encoded `uint32[]` so the digest matches the one signed off-chain.

use shared_crypto::{abi_encode_u32_array, keccak256};
use shared_types::{Hash, OperatorId, SeatIndex};

/// Remove misbehaved seats (1-based, ascending) from `members`.
///
/// Seats are removed from the highest down so each removal leaves the
/// positions of the not-yet-processed seats untouched. Out-of-range seats are
/// ignored; callers validate indices first.
pub fn filter_out_misbehaved(members: &[OperatorId], misbehaved: &[SeatIndex]) -> Vec<OperatorId> {
    let mut roster = members.to_vec();
    for seat in misbehaved.iter().rev() {
        if *seat >= 1 && *seat <= roster.len() {
            roster.remove(seat - 1);
        }
    }
    roster
}

/// Keccak-256 of `abi.encode(uint32[] members)`.
pub fn hash_members(members: &[OperatorId]) -> Hash {
    keccak256(&abi_encode_u32_array(members))
}

/// Hash of `members` after removing `misbehaved` seats.
pub fn members_hash(members: &[OperatorId], misbehaved: &[SeatIndex]) -> Hash {
    hash_members(&filter_out_misbehaved(members, misbehaved))
}
