//! DKG result validator
//!
//! `validate` short-circuits through four stages:
//!
//! ```text
//!  validate_fields ──→ members hash ──→ validate_group_members ──→ validate_signatures
//!  (shape, counts,     (roster minus    (roster == pool sample     (each signing seat's
//!   index ordering)     misbehaved)      for the round's seed)      key signed the digest)
//! ```

use super::parameters::GroupParameters;
use super::result::{signing_digest, DkgResult};
use crate::error::ValidationError;
use crate::ports::outbound::{SignerRecovery, SortitionPool};
use rayon::prelude::*;
use rb_02_group_registry::members_hash;
use shared_types::{BlockNumber, SeatIndex, U256};
use std::sync::Arc;
use tracing::debug;

/// Validates submitted DKG results against the sortition pool.
pub struct DkgResultValidator<P, R>
where
    P: SortitionPool,
    R: SignerRecovery,
{
    pool: Arc<P>,
    recovery: Arc<R>,
    params: GroupParameters,
    chain_id: u64,
}

impl<P, R> DkgResultValidator<P, R>
where
    P: SortitionPool,
    R: SignerRecovery,
{
    /// Create a validator for groups shaped by `params` on chain `chain_id`.
    pub fn new(pool: Arc<P>, recovery: Arc<R>, params: GroupParameters, chain_id: u64) -> Self {
        Self {
            pool,
            recovery,
            params,
            chain_id,
        }
    }

    /// Group shape enforced by this validator.
    pub fn parameters(&self) -> &GroupParameters {
        &self.params
    }

    /// Replace the enforced group shape.
    pub fn set_parameters(&mut self, params: GroupParameters) {
        self.params = params;
    }

    /// Full validation of `result` for a round seeded with `seed` that
    /// started at `start_block`.
    pub fn validate(
        &self,
        result: &DkgResult,
        seed: &U256,
        start_block: BlockNumber,
    ) -> Result<(), ValidationError> {
        self.validate_fields(result)?;

        let expected_hash = members_hash(&result.members, &result.misbehaved_members_indices);
        if expected_hash != result.members_hash {
            return Err(ValidationError::InvalidMembersHash);
        }

        if !self.validate_group_members(result, seed) {
            return Err(ValidationError::InvalidGroupMembers);
        }

        if !self.validate_signatures(result, start_block) {
            return Err(ValidationError::InvalidSignatures);
        }

        Ok(())
    }

    /// Structural checks that need neither the pool nor signature recovery.
    pub fn validate_fields(&self, result: &DkgResult) -> Result<(), ValidationError> {
        let n = self.params.group_size;
        let width = self.params.signature_byte_size;

        if result.group_public_key.len() != self.params.public_key_length {
            return Err(ValidationError::MalformedGroupPublicKey {
                expected: self.params.public_key_length,
                actual: result.group_public_key.len(),
            });
        }

        let misbehaved = result.misbehaved_members_indices.len();
        if misbehaved > self.params.max_misbehaved() {
            return Err(ValidationError::TooManyMisbehaving {
                count: misbehaved,
                max: self.params.max_misbehaved(),
            });
        }
        if !strictly_ascending_within(&result.misbehaved_members_indices, n) {
            return Err(ValidationError::CorruptedMisbehavedIndices);
        }

        if result.signatures.is_empty() {
            return Err(ValidationError::NoSignatures);
        }
        if result.signatures.len() % width != 0 {
            return Err(ValidationError::MalformedSignatures {
                length: result.signatures.len(),
            });
        }

        let count = result.signatures.len() / width;
        if count != result.signing_members_indices.len() {
            return Err(ValidationError::UnexpectedSignaturesCount {
                signatures: count,
                indices: result.signing_members_indices.len(),
            });
        }
        if count < self.params.signature_threshold {
            return Err(ValidationError::TooFewSignatures {
                count,
                threshold: self.params.signature_threshold,
            });
        }
        if count > n {
            return Err(ValidationError::TooManySignatures {
                count,
                group_size: n,
            });
        }

        if !strictly_ascending_within(&result.signing_members_indices, n) {
            return Err(ValidationError::CorruptedSigningIndices);
        }

        Ok(())
    }

    /// Whether `result.members` is exactly the roster the pool samples for
    /// `seed`.
    pub fn validate_group_members(&self, result: &DkgResult, seed: &U256) -> bool {
        match self.pool.select_group(self.params.group_size, seed) {
            Ok(expected) => expected == result.members,
            Err(err) => {
                debug!(error = %err, "sortition pool could not sample group");
                false
            }
        }
    }

    /// Whether every claimed signing seat produced its signature over the
    /// round digest.
    pub fn validate_signatures(&self, result: &DkgResult, start_block: BlockNumber) -> bool {
        let addresses = match self.pool.operator_addresses(&result.members) {
            Ok(addresses) => addresses,
            Err(err) => {
                debug!(error = %err, "could not resolve member addresses");
                return false;
            }
        };

        let digest = signing_digest(
            self.chain_id,
            &result.group_public_key,
            &result.misbehaved_members_indices,
            start_block,
        );
        let width = self.params.signature_byte_size;

        result
            .signing_members_indices
            .par_iter()
            .enumerate()
            .all(|(i, seat)| {
                let expected = match seat.checked_sub(1).and_then(|k| addresses.get(k)) {
                    Some(address) => address,
                    None => return false,
                };
                let signature = match result.signature(i, width) {
                    Some(signature) => signature,
                    None => return false,
                };
                match self.recovery.recover_signer(&digest, signature) {
                    Ok(signer) => signer == *expected,
                    Err(err) => {
                        debug!(seat, error = %err, "signature recovery failed");
                        false
                    }
                }
            })
    }
}

/// Strictly ascending and within `[1, n]`.
fn strictly_ascending_within(indices: &[SeatIndex], n: usize) -> bool {
    let ordered = indices.windows(2).all(|pair| pair[0] < pair[1]);
    let in_range = match (indices.first(), indices.last()) {
        (Some(first), Some(last)) => *first >= 1 && *last <= n,
        _ => true,
    };
    ordered && in_range
}
