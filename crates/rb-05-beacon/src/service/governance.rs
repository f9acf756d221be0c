//! Parameter updates and requester authorization
//!
//! Updates are applied atomically: the whole configuration is revalidated
//! with the new section before anything changes.

use super::RandomBeaconService;
use crate::config::{
    AuthorizationParameters, BeaconConfig, GroupCreationParameters, RelayEntryParameters,
    RewardParameters, SlashingParameters,
};
use crate::error::{BeaconError, BeaconResult};
use crate::events::BeaconEvent;
use crate::ports::{EntryVerifier, EventSink, SignerRecovery, SortitionPool, Staking};
use crate::state::BeaconState;
use rb_03_dkg::{DkgError, DkgState, DkgTimeParameters};
use shared_types::Address;
use tracing::info;

impl<P, R, V, S, E> RandomBeaconService<P, R, V, S, E>
where
    P: SortitionPool,
    R: SignerRecovery,
    V: EntryVerifier,
    S: Staking,
    E: EventSink,
{
    /// Grant or revoke the right to request relay entries.
    pub fn set_requester_authorization(&self, requester: &Address, is_authorized: bool) {
        {
            let mut state = self.state.write();
            if is_authorized {
                state.authorized_requesters.insert(*requester);
            } else {
                state.authorized_requesters.remove(requester);
            }
        }
        info!(requester = ?requester, is_authorized, "requester authorization updated");
        self.publish(vec![BeaconEvent::RequesterAuthorizationUpdated {
            requester: *requester,
            is_authorized,
        }]);
    }

    pub fn is_requester_authorized(&self, requester: &Address) -> bool {
        self.state.read().authorized_requesters.contains(requester)
    }

    pub fn update_authorization_parameters(
        &self,
        params: AuthorizationParameters,
    ) -> BeaconResult<()> {
        self.apply_update(
            |_| Ok(()),
            |config| config.authorization = params,
            |_| {},
            BeaconEvent::AuthorizationParametersUpdated(params),
        )
    }

    /// Only while no group is being created.
    pub fn update_dkg_parameters(&self, params: DkgTimeParameters) -> BeaconResult<()> {
        let block = self.clock.current();
        self.apply_update(
            |state| {
                if state.dkg.state(block.number) != DkgState::Idle {
                    return Err(DkgError::NotIdle.into());
                }
                Ok(())
            },
            |config| config.dkg = params,
            |state| {
                let group_size = state.config.group.group_size;
                state.dkg.set_parameters(params, group_size);
            },
            BeaconEvent::DkgParametersUpdated(params),
        )
    }

    pub fn update_group_creation_parameters(
        &self,
        params: GroupCreationParameters,
    ) -> BeaconResult<()> {
        self.apply_update(
            |_| Ok(()),
            |config| config.group_creation = params,
            |state| state.registry.set_group_lifetime(params.group_lifetime),
            BeaconEvent::GroupCreationParametersUpdated(params),
        )
    }

    /// Only while no relay request is in flight.
    pub fn update_relay_entry_parameters(&self, params: RelayEntryParameters) -> BeaconResult<()> {
        self.apply_update(
            |state| {
                if state.relay.is_request_in_progress() {
                    return Err(BeaconError::RelayRequestInProgress);
                }
                Ok(())
            },
            |config| config.relay = params,
            |state| {
                let relay = state.config.relay_parameters();
                state.relay.set_parameters(relay);
            },
            BeaconEvent::RelayEntryParametersUpdated(params),
        )
    }

    pub fn update_reward_parameters(&self, params: RewardParameters) -> BeaconResult<()> {
        self.apply_update(
            |_| Ok(()),
            |config| config.rewards = params,
            |_| {},
            BeaconEvent::RewardParametersUpdated(params),
        )
    }

    pub fn update_slashing_parameters(&self, params: SlashingParameters) -> BeaconResult<()> {
        self.apply_update(
            |_| Ok(()),
            |config| config.slashing = params,
            |_| {},
            BeaconEvent::SlashingParametersUpdated(params),
        )
    }

    /// Check `precondition`, validate the edited config, then commit it and
    /// propagate it to the domain objects with `propagate`.
    fn apply_update(
        &self,
        precondition: impl FnOnce(&BeaconState) -> BeaconResult<()>,
        edit: impl FnOnce(&mut BeaconConfig),
        propagate: impl FnOnce(&mut BeaconState),
        event: BeaconEvent,
    ) -> BeaconResult<()> {
        {
            let mut state = self.state.write();
            precondition(&*state)?;

            let mut config = state.config.clone();
            edit(&mut config);
            config.validate()?;

            state.config = config;
            propagate(&mut *state);
        }

        info!(update = event.name(), "beacon parameters updated");
        self.publish(vec![event]);
        Ok(())
    }
}
