//! DKG round state machine
//!
//! ```text
//!          start(seed)                 block > start + offchain
//!  [IDLE] ────────────→ [KEY_GENERATION] ────────────────────→ [AWAITING_RESULT]
//!    ↑                                                            │        ↑
//!    │                                              record_submission   reopen (challenge)
//!    │                                                            ↓        │
//!    └──────────────── complete (approve / timeout) ─────────── [CHALLENGE]
//! ```
//!
//! The state is never stored; it is derived from the recorded start block,
//! submission and the block the caller is executing in.

use super::parameters::DkgTimeParameters;
use crate::error::{DkgError, DkgRoundResult};
use rb_01_eligibility::{EligibilityResult, EligibilityWindow};
use serde::{Deserialize, Serialize};
use shared_types::{Address, BlockNumber, Hash, SeatIndex, U256};
use std::fmt;

/// Externally visible group creation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DkgState {
    Idle,
    KeyGeneration,
    AwaitingResult,
    Challenge,
}

impl fmt::Display for DkgState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DkgState::Idle => "IDLE",
            DkgState::KeyGeneration => "KEY_GENERATION",
            DkgState::AwaitingResult => "AWAITING_RESULT",
            DkgState::Challenge => "CHALLENGE",
        };
        f.write_str(name)
    }
}

/// Result accepted for the challenge period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedResult {
    pub hash: Hash,
    pub submitter: Address,
    pub submitter_index: SeatIndex,
    pub block: BlockNumber,
}

/// State of the group creation round.
#[derive(Clone, Debug)]
pub struct DkgRound {
    params: DkgTimeParameters,
    group_size: usize,
    seed: Option<U256>,
    start_block: BlockNumber,
    /// Blocks added to the submission start after a successful challenge
    submission_offset: u64,
    submitted: Option<SubmittedResult>,
}

impl DkgRound {
    /// Idle round for groups of `group_size` seats.
    pub fn new(params: DkgTimeParameters, group_size: usize) -> Self {
        Self {
            params,
            group_size,
            seed: None,
            start_block: 0,
            submission_offset: 0,
            submitted: None,
        }
    }

    /// State at `block`.
    pub fn state(&self, block: BlockNumber) -> DkgState {
        if self.seed.is_none() {
            return DkgState::Idle;
        }
        if block <= self.start_block + self.params.offchain_dkg_time {
            return DkgState::KeyGeneration;
        }
        if self.submitted.is_none() {
            return DkgState::AwaitingResult;
        }
        DkgState::Challenge
    }

    /// Open a round for `seed` at `block`.
    pub fn start(&mut self, seed: U256, block: BlockNumber) -> DkgRoundResult<()> {
        if self.seed.is_some() {
            return Err(DkgError::NotIdle);
        }
        self.seed = Some(seed);
        self.start_block = block;
        self.submission_offset = 0;
        self.submitted = None;
        Ok(())
    }

    /// Seed of the open round.
    pub fn seed(&self) -> Option<U256> {
        self.seed
    }

    /// Block the open round started at.
    pub fn start_block(&self) -> BlockNumber {
        self.start_block
    }

    /// Result currently under challenge, if any.
    pub fn submitted(&self) -> Option<&SubmittedResult> {
        self.submitted.as_ref()
    }

    /// Whether a round is open.
    pub fn is_in_progress(&self) -> bool {
        self.seed.is_some()
    }

    /// First block at which seat rotation for result submission begins.
    pub fn submission_start_block(&self) -> BlockNumber {
        self.start_block + self.params.offchain_dkg_time + self.submission_offset
    }

    /// Whether no result can be submitted any more.
    pub fn has_timed_out(&self, block: BlockNumber) -> bool {
        if self.state(block) != DkgState::AwaitingResult {
            return false;
        }
        let timeout =
            self.submission_start_block() + self.group_size as u64 * self.params.submitter_eligibility_delay;
        block > timeout
    }

    /// Results may be submitted at `block`.
    pub fn ensure_accepting_results(&self, block: BlockNumber) -> DkgRoundResult<()> {
        if self.state(block) != DkgState::AwaitingResult {
            return Err(DkgError::NotAwaitingResult);
        }
        if self.has_timed_out(block) {
            return Err(DkgError::TimeoutPassed);
        }
        Ok(())
    }

    /// Seats allowed to submit at `block`. Rotation starts from seat 1.
    pub fn submission_window(&self, block: BlockNumber) -> EligibilityResult<EligibilityWindow> {
        EligibilityWindow::compute(
            &U256::zero(),
            self.submission_start_block(),
            block,
            self.params.submitter_eligibility_delay,
            self.group_size,
        )
    }

    /// Move to CHALLENGE with `hash` submitted by `submitter`.
    pub fn record_submission(
        &mut self,
        hash: Hash,
        submitter: Address,
        submitter_index: SeatIndex,
        block: BlockNumber,
    ) {
        self.submitted = Some(SubmittedResult {
            hash,
            submitter,
            submitter_index,
            block,
        });
    }

    /// Approval preconditions for `hash` proposed by `approver`.
    pub fn ensure_approvable(
        &self,
        hash: &Hash,
        approver: &Address,
        block: BlockNumber,
    ) -> DkgRoundResult<()> {
        let submitted = self.submitted_in_challenge(hash, block)?;

        let challenge_end = submitted.block + self.params.result_challenge_period_length;
        if block <= challenge_end {
            return Err(DkgError::ChallengePeriodNotPassed);
        }
        if *approver != submitted.submitter
            && block <= challenge_end + self.params.submitter_precedence_period_length
        {
            return Err(DkgError::SubmitterPrecedence);
        }
        Ok(())
    }

    /// Challenge preconditions for `hash`.
    pub fn ensure_challengeable(&self, hash: &Hash, block: BlockNumber) -> DkgRoundResult<()> {
        let submitted = self.submitted_in_challenge(hash, block)?;

        if block > submitted.block + self.params.result_challenge_period_length {
            return Err(DkgError::ChallengePeriodPassed);
        }
        Ok(())
    }

    fn submitted_in_challenge(
        &self,
        hash: &Hash,
        block: BlockNumber,
    ) -> DkgRoundResult<&SubmittedResult> {
        if self.state(block) != DkgState::Challenge {
            return Err(DkgError::NotChallenge);
        }
        let submitted = self.submitted.as_ref().ok_or(DkgError::NotChallenge)?;
        if submitted.hash != *hash {
            return Err(DkgError::ResultMismatch);
        }
        Ok(submitted)
    }

    /// Drop the challenged result and restart submission rotation at `block`.
    pub fn reopen(&mut self, block: BlockNumber) {
        self.submission_offset = block
            .saturating_sub(self.start_block)
            .saturating_sub(self.params.offchain_dkg_time);
        self.submitted = None;
    }

    /// Close the round.
    pub fn complete(&mut self) {
        self.seed = None;
        self.start_block = 0;
        self.submission_offset = 0;
        self.submitted = None;
    }

    /// Timing parameters.
    pub fn parameters(&self) -> &DkgTimeParameters {
        &self.params
    }

    /// Replace timing parameters and group size for subsequent checks.
    pub fn set_parameters(&mut self, params: DkgTimeParameters, group_size: usize) {
        self.params = params;
        self.group_size = group_size;
    }
}
