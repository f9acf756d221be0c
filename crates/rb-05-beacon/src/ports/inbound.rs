//! Driving Ports (API - Inbound)
//!
//! Every mutating call names its caller; the service checks the caller
//! against rosters and authorization tables.

use crate::config::{
    AuthorizationParameters, GroupCreationParameters, RelayEntryParameters, RewardParameters,
    SlashingParameters,
};
use crate::error::BeaconResult;
use crate::ports::RelayCallback;
use rb_02_group_registry::{Group, GroupId};
use rb_03_dkg::{DkgResult, DkgState, DkgTimeParameters, ValidationError};
use rb_04_relay::RelayRequest;
use shared_types::{Address, Hash, OperatorId, SeatIndex, U256};
use std::sync::Arc;

/// Random beacon API
pub trait RandomBeaconApi: Send + Sync {
    // === Group creation ===

    /// Start creating the first group.
    fn genesis(&self) -> BeaconResult<U256>;

    /// Submit a DKG result; returns its hash.
    fn submit_dkg_result(&self, caller: &Address, result: DkgResult) -> BeaconResult<Hash>;

    /// Approve the submitted result; returns the activated group index.
    fn approve_dkg_result(&self, caller: &Address, result: &DkgResult) -> BeaconResult<usize>;

    /// Challenge the submitted result; returns why it was invalid.
    fn challenge_dkg_result(
        &self,
        caller: &Address,
        result: &DkgResult,
    ) -> BeaconResult<ValidationError>;

    /// Abandon a round nobody submitted a result for in time.
    fn notify_dkg_timeout(&self, caller: &Address) -> BeaconResult<()>;

    fn group_creation_state(&self) -> DkgState;

    fn is_dkg_in_progress(&self) -> bool;

    fn has_dkg_timed_out(&self) -> bool;

    // === Relay ===

    /// Request a new entry; returns the request id.
    fn request_relay_entry(
        &self,
        requester: &Address,
        callback: Option<Arc<dyn RelayCallback>>,
    ) -> BeaconResult<u64>;

    /// Submit the entry for the in-flight request.
    fn submit_relay_entry(
        &self,
        caller: &Address,
        submitter_index: SeatIndex,
        entry: Vec<u8>,
    ) -> BeaconResult<()>;

    /// Report the in-flight request as timed out.
    fn report_relay_entry_timeout(&self, caller: &Address) -> BeaconResult<()>;

    fn is_relay_request_in_progress(&self) -> bool;

    fn current_request(&self) -> Option<RelayRequest>;

    fn previous_entry(&self) -> Vec<u8>;

    // === Groups ===

    fn get_group(&self, id: &GroupId) -> Option<Group>;

    fn get_group_by_index(&self, index: usize) -> Option<Group>;

    fn get_groups(&self) -> Vec<Group>;

    fn number_of_active_groups(&self) -> usize;

    fn active_terminated_groups(&self) -> Vec<usize>;

    fn is_stale_group(&self, id: &GroupId) -> BeaconResult<bool>;

    // === Operators ===

    fn join_sortition_pool(&self, operator: &Address) -> BeaconResult<OperatorId>;

    fn update_operator_status(&self, operator: &Address) -> BeaconResult<()>;

    fn is_operator_in_pool(&self, operator: &Address) -> bool;

    // === Governance ===

    fn set_requester_authorization(&self, requester: &Address, is_authorized: bool);

    fn update_authorization_parameters(&self, params: AuthorizationParameters)
        -> BeaconResult<()>;

    fn update_dkg_parameters(&self, params: DkgTimeParameters) -> BeaconResult<()>;

    fn update_group_creation_parameters(
        &self,
        params: GroupCreationParameters,
    ) -> BeaconResult<()>;

    fn update_relay_entry_parameters(&self, params: RelayEntryParameters) -> BeaconResult<()>;

    fn update_reward_parameters(&self, params: RewardParameters) -> BeaconResult<()>;

    fn update_slashing_parameters(&self, params: SlashingParameters) -> BeaconResult<()>;
}
