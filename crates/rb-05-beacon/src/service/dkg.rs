//! Group creation operations

use super::RandomBeaconService;
use crate::config::GENESIS_SEED;
use crate::error::{BeaconError, BeaconResult};
use crate::events::BeaconEvent;
use crate::ports::{EntryVerifier, EventSink, SignerRecovery, SortitionPool, Staking};
use crate::state::BeaconState;
use beacon_telemetry::log_dkg_event;
use rb_03_dkg::{DkgError, DkgResult, DkgState, ValidationError};
use shared_crypto::{abi_word, keccak256};
use shared_types::{u256_from_hash, u256_to_bytes, Address, BlockNumber, Hash, U256};
use tracing::{debug, warn};

/// Seed of the genesis round started at `block`.
pub(crate) fn genesis_seed(block: BlockNumber) -> U256 {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(&u256_to_bytes(&GENESIS_SEED));
    preimage[32..].copy_from_slice(&abi_word(block));
    u256_from_hash(&keccak256(&preimage))
}

impl<P, R, V, S, E> RandomBeaconService<P, R, V, S, E>
where
    P: SortitionPool,
    R: SignerRecovery,
    V: EntryVerifier,
    S: Staking,
    E: EventSink,
{
    /// Start creating the first group. Only possible while no group is live.
    pub fn genesis(&self) -> BeaconResult<U256> {
        let block = self.clock.current();
        let mut events = Vec::new();

        let seed = {
            let mut state = self.state.write();
            if state.dkg.state(block.number) != DkgState::Idle {
                return Err(DkgError::NotIdle.into());
            }
            state.registry.expire_old_groups(block.number);
            if state.registry.number_of_active_groups() > 0 {
                return Err(BeaconError::NotAwaitingGenesis);
            }

            let seed = genesis_seed(block.number);
            self.start_dkg(&mut state, seed, block.number, &mut events)?;
            seed
        };

        self.publish(events);
        Ok(seed)
    }

    /// Open a round for `seed` and freeze the pool roster.
    pub(super) fn start_dkg(
        &self,
        state: &mut BeaconState,
        seed: U256,
        block: BlockNumber,
        events: &mut Vec<BeaconEvent>,
    ) -> BeaconResult<()> {
        state.dkg.start(seed, block)?;
        self.pool.lock();
        log_dkg_event!(info, "group creation started", block, seed = %seed);
        events.push(BeaconEvent::DkgStarted { seed });
        Ok(())
    }

    /// Accept a DKG result for the challenge period.
    pub fn submit_dkg_result(&self, caller: &Address, result: DkgResult) -> BeaconResult<Hash> {
        let block = self.clock.current();
        let mut events = Vec::new();
        let seat = result.submitter_member_index;

        let hash = {
            let mut state = self.state.write();

            state.dkg.ensure_accepting_results(block.number)?;
            self.validator.validate_fields(&result).map_err(|reason| {
                debug!(%reason, "dkg result rejected");
                reason
            })?;
            self.ensure_submitter_seat(
                caller,
                &result.members,
                seat,
                self.validator.parameters().group_size,
            )?;
            state
                .dkg
                .submission_window(block.number)?
                .ensure_eligible(seat)?;

            let index = state.registry.add_group(
                result.group_public_key.clone(),
                result.members.clone(),
                &result.misbehaved_members_indices,
                block.number,
            )?;
            events.push(BeaconEvent::CandidateGroupRegistered {
                group_public_key: result.group_public_key.clone(),
            });

            let hash = result.hash();
            state
                .dkg
                .record_submission(hash, *caller, seat, block.number);

            log_dkg_event!(
                info,
                "dkg result submitted",
                state.dkg.start_block(),
                group_index = index,
                submitter_index = seat
            );
            events.push(BeaconEvent::DkgResultSubmitted {
                result_hash: hash,
                group_public_key: result.group_public_key,
                submitter: *caller,
            });
            hash
        };

        self.publish(events);
        Ok(hash)
    }

    /// Activate the group of an unchallenged result. Returns its index.
    pub fn approve_dkg_result(&self, caller: &Address, result: &DkgResult) -> BeaconResult<usize> {
        let block = self.clock.current();
        let mut events = Vec::new();
        let hash = result.hash();

        let index = {
            let mut state = self.state.write();
            state.dkg.ensure_approvable(&hash, caller, block.number)?;

            let misbehaved = result.misbehaved_operators();
            if !misbehaved.is_empty() {
                let until = block
                    .timestamp
                    .saturating_add(state.config.rewards.sortition_pool_rewards_ban_duration);
                match self.pool.set_rewards_ineligible(&misbehaved, until) {
                    Ok(()) => debug!(
                        count = misbehaved.len(),
                        until,
                        "misbehaved members banned from rewards"
                    ),
                    Err(err) => {
                        warn!(error = %err, "misbehaved members could not be banned from rewards");
                        events.push(BeaconEvent::MisbehavedMembersBanFailed {
                            result_hash: hash,
                            operators: misbehaved,
                        });
                    }
                }
            }

            let index = state
                .registry
                .activate_group(&result.group_public_key, block.timestamp)?;
            events.push(BeaconEvent::GroupActivated {
                group_index: index,
                group_public_key: result.group_public_key.clone(),
            });

            log_dkg_event!(info, "dkg result approved", state.dkg.start_block(), group_index = index);
            state.dkg.complete();
            self.pool.unlock();

            events.push(BeaconEvent::DkgResultApproved {
                result_hash: hash,
                approver: *caller,
            });
            index
        };

        self.publish(events);
        Ok(index)
    }

    /// Prove the submitted result invalid. Returns the reason it failed
    /// validation; a valid result makes the challenge fail.
    pub fn challenge_dkg_result(
        &self,
        caller: &Address,
        result: &DkgResult,
    ) -> BeaconResult<ValidationError> {
        let block = self.clock.current();
        let mut events = Vec::new();
        let hash = result.hash();

        let reason = {
            let mut state = self.state.write();
            state.dkg.ensure_challengeable(&hash, block.number)?;

            let seed = state.dkg.seed().ok_or(DkgError::NotChallenge)?;
            let submitter = state
                .dkg
                .submitted()
                .map(|submitted| submitted.submitter)
                .ok_or(DkgError::NotChallenge)?;

            let reason = match self
                .validator
                .validate(result, &seed, state.dkg.start_block())
            {
                Ok(()) => return Err(DkgError::UnjustifiedChallenge.into()),
                Err(reason) => reason,
            };

            state.registry.discard_candidate(&result.group_public_key)?;
            events.push(BeaconEvent::CandidateGroupRemoved {
                group_public_key: result.group_public_key.clone(),
            });

            let amount = state.config.slashing.malicious_dkg_result_slashing_amount;
            match self.staking.slash(amount, &[submitter]) {
                Ok(()) => events.push(BeaconEvent::DkgMaliciousResultSlashed {
                    result_hash: hash,
                    slashing_amount: amount,
                    malicious_submitter: submitter,
                }),
                Err(err) => {
                    warn!(error = %err, "malicious dkg result submitter could not be slashed");
                    events.push(BeaconEvent::DkgMaliciousResultSlashingFailed {
                        result_hash: hash,
                        slashing_amount: amount,
                        malicious_submitter: submitter,
                    });
                }
            }

            state.dkg.reopen(block.number);
            log_dkg_event!(
                warn,
                "dkg result challenged",
                state.dkg.start_block(),
                reason = %reason
            );
            events.push(BeaconEvent::DkgResultChallenged {
                result_hash: hash,
                challenger: *caller,
                reason: reason.to_string(),
            });
            reason
        };

        self.publish(events);
        Ok(reason)
    }

    /// Abandon a round whose submission window has fully elapsed.
    pub fn notify_dkg_timeout(&self, caller: &Address) -> BeaconResult<()> {
        let block = self.clock.current();
        {
            let mut state = self.state.write();
            if !state.dkg.has_timed_out(block.number) {
                return Err(DkgError::NotTimedOut.into());
            }
            log_dkg_event!(
                warn,
                "dkg timed out",
                state.dkg.start_block(),
                notifier = ?caller
            );
            state.dkg.complete();
            self.pool.unlock();
        }

        self.publish(vec![BeaconEvent::DkgTimedOut]);
        Ok(())
    }

    pub fn group_creation_state(&self) -> DkgState {
        let block = self.clock.current();
        self.state.read().dkg.state(block.number)
    }

    pub fn is_dkg_in_progress(&self) -> bool {
        self.group_creation_state() != DkgState::Idle
    }

    pub fn has_dkg_timed_out(&self) -> bool {
        let block = self.clock.current();
        self.state.read().dkg.has_timed_out(block.number)
    }

    /// Seed of the open round, if any.
    pub fn dkg_seed(&self) -> Option<U256> {
        self.state.read().dkg.seed()
    }

    /// Block the open round started at.
    pub fn dkg_start_block(&self) -> Option<BlockNumber> {
        let state = self.state.read();
        state.dkg.seed().map(|_| state.dkg.start_block())
    }
}
