//! Sortition pool membership

use super::RandomBeaconService;
use crate::error::{BeaconError, BeaconResult};
use crate::events::BeaconEvent;
use crate::ports::{
    EntryVerifier, EventSink, PoolError, SignerRecovery, SortitionPool, Staking,
};
use beacon_telemetry::log_event;
use shared_types::{Address, OperatorId, U256};

impl<P, R, V, S, E> RandomBeaconService<P, R, V, S, E>
where
    P: SortitionPool,
    R: SignerRecovery,
    V: EntryVerifier,
    S: Staking,
    E: EventSink,
{
    /// Enter the pool with weight equal to the authorized stake.
    pub fn join_sortition_pool(&self, operator: &Address) -> BeaconResult<OperatorId> {
        let operator_id = {
            let state = self.state.write();
            if self.pool.is_locked() {
                return Err(PoolError::Locked.into());
            }

            let stake = self.staking.authorized_stake(operator);
            if stake < state.config.authorization.minimum_authorization {
                return Err(BeaconError::AuthorizationBelowMinimum);
            }

            let operator_id = self.pool.insert_operator(operator, stake)?;
            log_event!(
                info,
                "operators",
                "operator joined sortition pool",
                operator_id,
                weight = %stake
            );
            operator_id
        };

        self.publish(vec![BeaconEvent::OperatorJoinedSortitionPool {
            operator: *operator,
            operator_id,
        }]);
        Ok(operator_id)
    }

    /// Re-weight an operator after its authorization changed. Operators
    /// below the minimum leave the pool.
    pub fn update_operator_status(&self, operator: &Address) -> BeaconResult<()> {
        let event = {
            let state = self.state.write();
            if self.pool.is_locked() {
                return Err(PoolError::Locked.into());
            }

            let operator_id = self
                .pool
                .operator_id(operator)
                .ok_or(BeaconError::OperatorNotInPool)?;
            if self.pool.weight(operator).is_none() {
                return Err(BeaconError::OperatorNotInPool);
            }

            let stake = self.staking.authorized_stake(operator);
            let weight = if stake < state.config.authorization.minimum_authorization {
                self.pool.remove_operators(&[operator_id])?;
                log_event!(info, "operators", "operator left sortition pool", operator_id);
                U256::zero()
            } else {
                self.pool.update_operator(operator, stake)?;
                log_event!(
                    debug,
                    "operators",
                    "operator re-weighted",
                    operator_id,
                    weight = %stake
                );
                stake
            };

            BeaconEvent::OperatorStatusUpdated {
                operator: *operator,
                operator_id,
                weight,
            }
        };

        self.publish(vec![event]);
        Ok(())
    }

    /// Whether `operator` is currently eligible for sampling.
    pub fn is_operator_in_pool(&self, operator: &Address) -> bool {
        self.pool.weight(operator).is_some()
    }

    /// Whether `operator` is up to date with its authorized stake.
    pub fn is_operator_up_to_date(&self, operator: &Address) -> bool {
        let stake = self.staking.authorized_stake(operator);
        let minimum = self.state.read().config.authorization.minimum_authorization;
        match self.pool.weight(operator) {
            Some(weight) => weight == stake && stake >= minimum,
            None => stake < minimum,
        }
    }
}
