//! Relay entry operations

use super::RandomBeaconService;
use crate::error::{BeaconError, BeaconResult};
use crate::events::BeaconEvent;
use crate::ports::{
    EntryVerifier, EventSink, RelayCallback, SignerRecovery, SortitionPool, Staking,
};
use beacon_telemetry::log_relay_event;
use rb_01_eligibility::slashing_amount;
use rb_02_group_registry::GroupError;
use rb_03_dkg::DkgState;
use rb_04_relay::{RelayError, RelayRequest};
use shared_crypto::keccak256;
use shared_types::{u256_from_hash, Address, OperatorId, SeatIndex, U256};
use std::sync::Arc;
use tracing::{debug, warn};

impl<P, R, V, S, E> RandomBeaconService<P, R, V, S, E>
where
    P: SortitionPool,
    R: SignerRecovery,
    V: EntryVerifier,
    S: Staking,
    E: EventSink,
{
    /// Ask the beacon for a new entry. Returns the request id.
    pub fn request_relay_entry(
        &self,
        requester: &Address,
        callback: Option<Arc<dyn RelayCallback>>,
    ) -> BeaconResult<u64> {
        let block = self.clock.current();

        let request = {
            let mut state = self.state.write();
            if !state.authorized_requesters.contains(requester) {
                debug!(requester = ?requester, "relay request from unauthorized requester");
                return Err(BeaconError::RequesterNotAuthorized);
            }
            if let Some(current) = state.relay.current_request() {
                return Err(RelayError::RequestInProgress {
                    request_id: current.id,
                }
                .into());
            }

            let beacon_value = state.relay.selection_beacon();
            let group_index = state.registry.select_group(&beacon_value, block.number)?;
            let request = state.relay.begin_request(group_index, block.number)?.clone();
            state.callback = callback;

            log_relay_event!(info, "relay entry requested", request.id, group_index);
            request
        };

        let request_id = request.id;
        self.publish(vec![BeaconEvent::RelayEntryRequested {
            request_id,
            group_index: request.group_index,
            previous_entry: request.previous_entry,
        }]);
        Ok(request_id)
    }

    /// Submit the group signature over the previous entry.
    pub fn submit_relay_entry(
        &self,
        caller: &Address,
        submitter_index: SeatIndex,
        entry: Vec<u8>,
    ) -> BeaconResult<()> {
        let block = self.clock.current();
        let mut events = Vec::new();

        let callback = {
            let mut state = self.state.write();

            let request = state.relay.ensure_submittable(block.number)?.clone();
            let group = state
                .registry
                .group(request.group_index)
                .cloned()
                .ok_or(GroupError::UnknownGroupIndex {
                    index: request.group_index,
                })?;

            self.ensure_submitter_seat(
                caller,
                &group.members,
                submitter_index,
                group.members.len(),
            )?;
            let window = state.relay.submission_window(&entry, block.number)?;
            window.ensure_eligible(submitter_index)?;
            state
                .relay
                .verify_entry(self.verifier.as_ref(), &group.public_key, &entry)?;

            // Accepted; everything below is bookkeeping for the entry.
            self.remove_inactive_members(
                &request,
                &group.members,
                window.inactive_members(submitter_index),
                &mut events,
            );

            let factor = state.relay.slashing_factor(block.number);
            if !factor.is_zero() {
                let amount = slashing_amount(
                    state
                        .config
                        .slashing
                        .relay_entry_submission_failure_slashing_amount,
                    factor,
                );
                let (operators, slashed) = self.slash_members(amount, &group.members);
                events.push(if slashed {
                    BeaconEvent::RelayEntryDelaySlashed {
                        request_id: request.id,
                        slashing_amount: amount,
                        operators,
                    }
                } else {
                    BeaconEvent::RelayEntryDelaySlashingFailed {
                        request_id: request.id,
                        slashing_amount: amount,
                        operators,
                    }
                });
            }

            state.relay.complete(entry.clone());
            let callback = state.callback.take();
            log_relay_event!(
                info,
                "relay entry submitted",
                request.id,
                request.group_index,
                submitter_index
            );
            events.push(BeaconEvent::RelayEntrySubmitted {
                request_id: request.id,
                submitter: *caller,
                entry: entry.clone(),
            });

            let frequency = state.config.group_creation.group_creation_frequency;
            if request.id % frequency == 0 && state.dkg.state(block.number) == DkgState::Idle {
                let seed = u256_from_hash(&keccak256(&entry));
                if let Err(err) = self.start_dkg(&mut state, seed, block.number, &mut events) {
                    warn!(error = %err, "group creation could not be started");
                }
            }

            callback
        };

        self.publish(events);

        if let Some(callback) = callback {
            let value = u256_from_hash(&keccak256(&entry));
            if let Err(err) = callback.on_relay_entry(value, block.number) {
                warn!(error = %err, block = block.number, "relay entry callback failed");
                self.events.publish(BeaconEvent::CallbackFailed {
                    entry: value,
                    entry_submitted_block: block.number,
                });
            }
        }
        Ok(())
    }

    /// Members that let their turn pass are dropped from the pool.
    fn remove_inactive_members(
        &self,
        request: &RelayRequest,
        members: &[OperatorId],
        seats: Vec<SeatIndex>,
        events: &mut Vec<BeaconEvent>,
    ) {
        if seats.is_empty() {
            return;
        }
        let mut operators: Vec<OperatorId> = seats
            .iter()
            .filter_map(|seat| members.get(seat - 1).copied())
            .collect();
        operators.sort_unstable();
        operators.dedup();

        match self.pool.remove_operators(&operators) {
            Ok(()) => events.push(BeaconEvent::InactiveMembersRemoved {
                request_id: request.id,
                group_index: request.group_index,
                operators,
            }),
            Err(err) => warn!(
                error = %err,
                request_id = request.id,
                count = operators.len(),
                "inactive members could not be removed"
            ),
        }
    }

    /// Punish the group that failed to produce an entry and hand the request
    /// to another live group, if one exists.
    pub fn report_relay_entry_timeout(&self, caller: &Address) -> BeaconResult<()> {
        let block = self.clock.current();
        let mut events = Vec::new();

        {
            let mut state = self.state.write();
            let request = state.relay.ensure_timed_out(block.number)?.clone();
            let members = state
                .registry
                .group(request.group_index)
                .map(|group| group.members.clone())
                .ok_or(GroupError::UnknownGroupIndex {
                    index: request.group_index,
                })?;

            state.registry.terminate_group(request.group_index)?;

            let amount = state
                .config
                .slashing
                .relay_entry_submission_failure_slashing_amount;
            let (operators, slashed) = self.slash_members(amount, &members);
            events.push(if slashed {
                BeaconEvent::RelayEntryTimeoutSlashed {
                    request_id: request.id,
                    slashing_amount: amount,
                    operators,
                }
            } else {
                BeaconEvent::RelayEntryTimeoutSlashingFailed {
                    request_id: request.id,
                    slashing_amount: amount,
                    operators,
                }
            });

            log_relay_event!(
                warn,
                "relay entry timed out",
                request.id,
                request.group_index,
                reporter = ?caller
            );
            events.push(BeaconEvent::RelayEntryTimedOut {
                request_id: request.id,
                terminated_group_index: request.group_index,
            });

            let beacon_value = state.relay.selection_beacon();
            match state.registry.select_group(&beacon_value, block.number) {
                Ok(group_index) => {
                    if let Some(retried) = state.relay.retry(group_index, block.number) {
                        log_relay_event!(
                            info,
                            "relay entry re-requested",
                            retried.id,
                            group_index
                        );
                        events.push(BeaconEvent::RelayEntryRequested {
                            request_id: retried.id,
                            group_index,
                            previous_entry: retried.previous_entry.clone(),
                        });
                    }
                }
                Err(_) => {
                    debug!(request_id = request.id, "no live group left, relay request dropped");
                    state.relay.cleanup();
                    state.callback = None;
                }
            }
        }

        self.publish(events);
        Ok(())
    }

    pub fn is_relay_request_in_progress(&self) -> bool {
        self.state.read().relay.is_request_in_progress()
    }

    pub fn current_request(&self) -> Option<RelayRequest> {
        self.state.read().relay.current_request().cloned()
    }

    /// Id of the in-flight request, or 0 when none is open.
    pub fn current_request_id(&self) -> u64 {
        self.current_request().map(|request| request.id).unwrap_or(0)
    }

    pub fn previous_entry(&self) -> Vec<u8> {
        self.state.read().relay.previous_entry().to_vec()
    }

    /// Whether the in-flight request can no longer be served.
    pub fn has_relay_request_timed_out(&self) -> bool {
        let block = self.clock.current();
        self.state.read().relay.has_timed_out(block.number)
    }

    /// Current beacon value: keccak of the latest entry.
    pub fn beacon_value(&self) -> U256 {
        u256_from_hash(&keccak256(self.state.read().relay.previous_entry()))
    }
}
