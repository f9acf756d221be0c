//! Random Beacon Service - Core business logic
//!
//! # Execution model
//! - Every operation reads the block clock once and runs under the state
//!   write lock, so operations are applied in one global order.
//! - All checks run before the first mutation; a rejected call leaves no
//!   trace.
//! - Events are buffered and published after the lock is released.
//! - The relay requester's callback runs last, outside the lock. Its failure
//!   is reported as an event and never undoes the accepted entry.

mod dkg;
mod governance;
mod operators;
mod relay;


use crate::config::{
    AuthorizationParameters, BeaconConfig, GroupCreationParameters, RelayEntryParameters,
    RewardParameters, SlashingParameters,
};
use crate::error::{BeaconError, BeaconResult};
use crate::events::BeaconEvent;
use crate::ports::{
    BlockClock, EntryVerifier, EventSink, RandomBeaconApi, RelayCallback, SignerRecovery,
    SortitionPool, Staking,
};
use crate::state::BeaconState;
use parking_lot::RwLock;
use rb_01_eligibility::EligibilityError;
use rb_02_group_registry::{Group, GroupError, GroupId};
use rb_03_dkg::{DkgResult, DkgResultValidator, DkgState, DkgTimeParameters, ValidationError};
use rb_04_relay::RelayRequest;
use shared_types::{Address, Hash, OperatorId, SeatIndex, U256};
use std::sync::Arc;
use tracing::warn;

/// Random Beacon Service
pub struct RandomBeaconService<P, R, V, S, E>
where
    P: SortitionPool,
    R: SignerRecovery,
    V: EntryVerifier,
    S: Staking,
    E: EventSink,
{
    pool: Arc<P>,
    validator: DkgResultValidator<P, R>,
    verifier: Arc<V>,
    staking: Arc<S>,
    events: Arc<E>,
    clock: Arc<dyn BlockClock>,
    state: RwLock<BeaconState>,
}

/// Dependencies for RandomBeaconService
pub struct BeaconDependencies<P, R, V, S, E> {
    pub pool: Arc<P>,
    pub recovery: Arc<R>,
    pub verifier: Arc<V>,
    pub staking: Arc<S>,
    pub events: Arc<E>,
    pub clock: Arc<dyn BlockClock>,
    pub config: BeaconConfig,
}

impl<P, R, V, S, E> RandomBeaconService<P, R, V, S, E>
where
    P: SortitionPool,
    R: SignerRecovery,
    V: EntryVerifier,
    S: Staking,
    E: EventSink,
{
    /// Create a service seeded with the configured genesis entry.
    pub fn new(deps: BeaconDependencies<P, R, V, S, E>) -> BeaconResult<Self> {
        deps.config.validate()?;

        let validator = DkgResultValidator::new(
            Arc::clone(&deps.pool),
            deps.recovery,
            deps.config.group,
            deps.config.chain_id,
        );

        Ok(Self {
            pool: deps.pool,
            validator,
            verifier: deps.verifier,
            staking: deps.staking,
            events: deps.events,
            clock: deps.clock,
            state: RwLock::new(BeaconState::new(deps.config)),
        })
    }

    /// Snapshot of the active configuration.
    pub fn config(&self) -> BeaconConfig {
        self.state.read().config.clone()
    }

    // === HELPERS ===

    fn publish(&self, events: Vec<BeaconEvent>) {
        for event in events {
            self.events.publish(event);
        }
    }

    /// Seat range check followed by the caller-to-seat check.
    fn ensure_submitter_seat(
        &self,
        caller: &Address,
        members: &[OperatorId],
        seat: SeatIndex,
        group_size: usize,
    ) -> BeaconResult<()> {
        if seat == 0 || seat > group_size {
            return Err(EligibilityError::InvalidSubmitterIndex { seat }.into());
        }
        let expected = members
            .get(seat - 1)
            .ok_or(BeaconError::UnexpectedSubmitterIndex)?;
        match self.pool.operator_id(caller) {
            Some(id) if id == *expected => Ok(()),
            _ => Err(BeaconError::UnexpectedSubmitterIndex),
        }
    }

    /// Slash `amount` from each member of `members`. Returns the resolved
    /// addresses and whether the ledger accepted the slash.
    fn slash_members(&self, amount: U256, members: &[OperatorId]) -> (Vec<Address>, bool) {
        let addresses = match self.pool.operator_addresses(members) {
            Ok(addresses) => addresses,
            Err(err) => {
                warn!(error = %err, "could not resolve group member addresses");
                return (Vec::new(), false);
            }
        };
        match self.staking.slash(amount, &addresses) {
            Ok(()) => (addresses, true),
            Err(err) => {
                warn!(error = %err, %amount, "slashing failed");
                (addresses, false)
            }
        }
    }

    // === GROUP QUERIES ===

    pub fn get_group(&self, id: &GroupId) -> Option<Group> {
        self.state.read().registry.group_by_id(id).cloned()
    }

    pub fn get_group_by_index(&self, index: usize) -> Option<Group> {
        self.state.read().registry.group(index).cloned()
    }

    pub fn get_groups(&self) -> Vec<Group> {
        self.state.read().registry.groups().to_vec()
    }

    /// Live groups as of the last expiration pass.
    pub fn number_of_active_groups(&self) -> usize {
        self.state.read().registry.number_of_active_groups()
    }

    pub fn active_terminated_groups(&self) -> Vec<usize> {
        self.state.read().registry.active_terminated_groups().to_vec()
    }

    pub fn expired_group_offset(&self) -> usize {
        self.state.read().registry.expired_offset()
    }

    /// Whether members of group `id` may forget it.
    pub fn is_stale_group(&self, id: &GroupId) -> BeaconResult<bool> {
        let block = self.clock.current();
        let state = self.state.read();
        let index = state
            .registry
            .index_of(id)
            .ok_or(GroupError::UnknownGroup { group_id: *id })?;
        let timeout = state.config.relay_entry_timeout();
        Ok(state.registry.is_stale_group(index, block.number, timeout)?)
    }
}

impl<P, R, V, S, E> RandomBeaconApi for RandomBeaconService<P, R, V, S, E>
where
    P: SortitionPool,
    R: SignerRecovery,
    V: EntryVerifier,
    S: Staking,
    E: EventSink,
{
    fn genesis(&self) -> BeaconResult<U256> {
        RandomBeaconService::genesis(self)
    }

    fn submit_dkg_result(&self, caller: &Address, result: DkgResult) -> BeaconResult<Hash> {
        RandomBeaconService::submit_dkg_result(self, caller, result)
    }

    fn approve_dkg_result(&self, caller: &Address, result: &DkgResult) -> BeaconResult<usize> {
        RandomBeaconService::approve_dkg_result(self, caller, result)
    }

    fn challenge_dkg_result(
        &self,
        caller: &Address,
        result: &DkgResult,
    ) -> BeaconResult<ValidationError> {
        RandomBeaconService::challenge_dkg_result(self, caller, result)
    }

    fn notify_dkg_timeout(&self, caller: &Address) -> BeaconResult<()> {
        RandomBeaconService::notify_dkg_timeout(self, caller)
    }

    fn group_creation_state(&self) -> DkgState {
        RandomBeaconService::group_creation_state(self)
    }

    fn is_dkg_in_progress(&self) -> bool {
        RandomBeaconService::is_dkg_in_progress(self)
    }

    fn has_dkg_timed_out(&self) -> bool {
        RandomBeaconService::has_dkg_timed_out(self)
    }

    fn request_relay_entry(
        &self,
        requester: &Address,
        callback: Option<Arc<dyn RelayCallback>>,
    ) -> BeaconResult<u64> {
        RandomBeaconService::request_relay_entry(self, requester, callback)
    }

    fn submit_relay_entry(
        &self,
        caller: &Address,
        submitter_index: SeatIndex,
        entry: Vec<u8>,
    ) -> BeaconResult<()> {
        RandomBeaconService::submit_relay_entry(self, caller, submitter_index, entry)
    }

    fn report_relay_entry_timeout(&self, caller: &Address) -> BeaconResult<()> {
        RandomBeaconService::report_relay_entry_timeout(self, caller)
    }

    fn is_relay_request_in_progress(&self) -> bool {
        RandomBeaconService::is_relay_request_in_progress(self)
    }

    fn current_request(&self) -> Option<RelayRequest> {
        RandomBeaconService::current_request(self)
    }

    fn previous_entry(&self) -> Vec<u8> {
        RandomBeaconService::previous_entry(self)
    }

    fn get_group(&self, id: &GroupId) -> Option<Group> {
        RandomBeaconService::get_group(self, id)
    }

    fn get_group_by_index(&self, index: usize) -> Option<Group> {
        RandomBeaconService::get_group_by_index(self, index)
    }

    fn get_groups(&self) -> Vec<Group> {
        RandomBeaconService::get_groups(self)
    }

    fn number_of_active_groups(&self) -> usize {
        RandomBeaconService::number_of_active_groups(self)
    }

    fn active_terminated_groups(&self) -> Vec<usize> {
        RandomBeaconService::active_terminated_groups(self)
    }

    fn is_stale_group(&self, id: &GroupId) -> BeaconResult<bool> {
        RandomBeaconService::is_stale_group(self, id)
    }

    fn join_sortition_pool(&self, operator: &Address) -> BeaconResult<OperatorId> {
        RandomBeaconService::join_sortition_pool(self, operator)
    }

    fn update_operator_status(&self, operator: &Address) -> BeaconResult<()> {
        RandomBeaconService::update_operator_status(self, operator)
    }

    fn is_operator_in_pool(&self, operator: &Address) -> bool {
        RandomBeaconService::is_operator_in_pool(self, operator)
    }

    fn set_requester_authorization(&self, requester: &Address, is_authorized: bool) {
        RandomBeaconService::set_requester_authorization(self, requester, is_authorized)
    }

    fn update_authorization_parameters(
        &self,
        params: AuthorizationParameters,
    ) -> BeaconResult<()> {
        RandomBeaconService::update_authorization_parameters(self, params)
    }

    fn update_dkg_parameters(&self, params: DkgTimeParameters) -> BeaconResult<()> {
        RandomBeaconService::update_dkg_parameters(self, params)
    }

    fn update_group_creation_parameters(
        &self,
        params: GroupCreationParameters,
    ) -> BeaconResult<()> {
        RandomBeaconService::update_group_creation_parameters(self, params)
    }

    fn update_relay_entry_parameters(&self, params: RelayEntryParameters) -> BeaconResult<()> {
        RandomBeaconService::update_relay_entry_parameters(self, params)
    }

    fn update_reward_parameters(&self, params: RewardParameters) -> BeaconResult<()> {
        RandomBeaconService::update_reward_parameters(self, params)
    }

    fn update_slashing_parameters(&self, params: SlashingParameters) -> BeaconResult<()> {
        RandomBeaconService::update_slashing_parameters(self, params)
    }
}
