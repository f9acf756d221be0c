//! Relay request lifecycle
//!
//! ```text
//!  request ──→ [IN PROGRESS] ──submit (valid entry)──→ previous_entry = entry
//!                   │
//!                   └── block > start + soft + hard ──→ report timeout
//!                                                       ├── live groups left: retry (same id)
//!                                                       └── none left: cleanup
//! ```

use super::parameters::RelayParameters;
use super::request::RelayRequest;
use crate::error::{RelayError, RelayResult};
use crate::ports::EntryVerifier;
use rb_01_eligibility::EligibilityWindow;
use shared_crypto::keccak256;
use shared_types::{u256_from_hash, BlockNumber, U256};

/// Relay entry state: the latest entry and the single in-flight request.
#[derive(Clone, Debug)]
pub struct Relay {
    params: RelayParameters,
    current: Option<RelayRequest>,
    request_count: u64,
    previous_entry: Vec<u8>,
}

impl Relay {
    /// Relay seeded with the genesis entry.
    pub fn new(params: RelayParameters, genesis_entry: Vec<u8>) -> Self {
        Self {
            params,
            current: None,
            request_count: 0,
            previous_entry: genesis_entry,
        }
    }

    pub fn parameters(&self) -> &RelayParameters {
        &self.params
    }

    pub fn set_parameters(&mut self, params: RelayParameters) {
        self.params = params;
    }

    /// Latest accepted entry.
    pub fn previous_entry(&self) -> &[u8] {
        &self.previous_entry
    }

    /// Number of requests opened so far.
    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    pub fn current_request(&self) -> Option<&RelayRequest> {
        self.current.as_ref()
    }

    pub fn is_request_in_progress(&self) -> bool {
        self.current.is_some()
    }

    /// Beacon value used to pick the serving group.
    pub fn selection_beacon(&self) -> U256 {
        u256_from_hash(&keccak256(&self.previous_entry))
    }

    /// Open a new request served by `group_index`.
    pub fn begin_request(
        &mut self,
        group_index: usize,
        block: BlockNumber,
    ) -> RelayResult<&RelayRequest> {
        if let Some(current) = &self.current {
            return Err(RelayError::RequestInProgress {
                request_id: current.id,
            });
        }

        self.request_count += 1;
        let request = RelayRequest {
            id: self.request_count,
            group_index,
            start_block: block,
            previous_entry: self.previous_entry.clone(),
        };
        tracing::debug!(
            request_id = request.id,
            group_index,
            start_block = block,
            "relay request opened"
        );
        Ok(&*self.current.insert(request))
    }

    /// Whether the in-flight request has passed its hard timeout.
    pub fn has_timed_out(&self, block: BlockNumber) -> bool {
        match &self.current {
            Some(request) => self
                .params
                .timeouts()
                .is_timed_out(request.start_block, block),
            None => false,
        }
    }

    /// The in-flight request, provided it can still be served at `block`.
    pub fn ensure_submittable(&self, block: BlockNumber) -> RelayResult<&RelayRequest> {
        let request = self
            .current
            .as_ref()
            .ok_or(RelayError::NoRequestInProgress)?;
        if self.has_timed_out(block) {
            return Err(RelayError::TimedOut {
                request_id: request.id,
            });
        }
        Ok(request)
    }

    /// The in-flight request, provided it has timed out at `block`.
    pub fn ensure_timed_out(&self, block: BlockNumber) -> RelayResult<&RelayRequest> {
        let request = self
            .current
            .as_ref()
            .ok_or(RelayError::NoRequestInProgress)?;
        if !self.has_timed_out(block) {
            return Err(RelayError::NotTimedOut {
                request_id: request.id,
            });
        }
        Ok(request)
    }

    /// Seats allowed to submit `entry` at `block`. The rotation's first seat
    /// is derived from the entry itself.
    pub fn submission_window(
        &self,
        entry: &[u8],
        block: BlockNumber,
    ) -> RelayResult<EligibilityWindow> {
        let request = self
            .current
            .as_ref()
            .ok_or(RelayError::NoRequestInProgress)?;
        let window = EligibilityWindow::compute(
            &u256_from_hash(&keccak256(entry)),
            request.start_block,
            block,
            self.params.relay_entry_submission_eligibility_delay,
            self.params.group_size,
        );
        Ok(window?)
    }

    /// Check `entry` is the group's signature over the requested entry.
    pub fn verify_entry<V: EntryVerifier + ?Sized>(
        &self,
        verifier: &V,
        group_public_key: &[u8],
        entry: &[u8],
    ) -> RelayResult<()> {
        let request = self
            .current
            .as_ref()
            .ok_or(RelayError::NoRequestInProgress)?;
        if !verifier.verify(group_public_key, &request.previous_entry, entry) {
            return Err(RelayError::InvalidEntry);
        }
        Ok(())
    }

    /// Fraction of the relay failure penalty owed for submitting at `block`.
    pub fn slashing_factor(&self, block: BlockNumber) -> U256 {
        match &self.current {
            Some(request) => self.params.timeouts().factor_at(request.start_block, block),
            None => U256::zero(),
        }
    }

    /// Accept `entry` and close the in-flight request.
    pub fn complete(&mut self, entry: Vec<u8>) -> Option<RelayRequest> {
        self.previous_entry = entry;
        self.current.take()
    }

    /// Hand the in-flight request to another group, keeping its id.
    pub fn retry(&mut self, group_index: usize, block: BlockNumber) -> Option<&RelayRequest> {
        let request = self.current.as_mut()?;
        request.group_index = group_index;
        request.start_block = block;
        Some(&*request)
    }

    /// Drop the in-flight request without an entry.
    pub fn cleanup(&mut self) -> Option<RelayRequest> {
        self.current.take()
    }
}
