//! # Relay Flows
//!
//! Requests answered with BLS threshold signatures over the previous entry,
//! group rotation, slashing on late or missing entries, and the periodic
//! start of new group creation.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use parking_lot::Mutex;
    use rb_03_dkg::DkgState;
    use rb_04_relay::{Bls12381EntryVerifier, EntryVerifier, RelayError};
    use rb_05_beacon::{BeaconEvent, BlockClock, CallbackError, RelayCallback};
    use shared_crypto::keccak256;
    use shared_types::{u256_from_hash, BlockNumber, U256};
    use std::sync::Arc;

    #[derive(Default)]
    struct BeaconConsumer {
        received: Mutex<Vec<(U256, BlockNumber)>>,
    }

    impl RelayCallback for BeaconConsumer {
        fn on_relay_entry(&self, entry: U256, block: BlockNumber) -> Result<(), CallbackError> {
            self.received.lock().push((entry, block));
            Ok(())
        }
    }

    #[test]
    fn test_entries_chain_under_group_key() {
        let network = BeaconNetwork::new(12);
        let group_index = network.bootstrap();
        network.authorize_requester();

        let public_key = network
            .service
            .get_group_by_index(group_index)
            .unwrap()
            .public_key;
        let verifier = Bls12381EntryVerifier::new();

        let mut previous = network.service.previous_entry();
        for _ in 0..2 {
            let entry = network.serve_request();
            assert!(verifier.verify(&public_key, &previous, &entry));
            assert_eq!(
                network.service.beacon_value(),
                u256_from_hash(&keccak256(&entry))
            );
            previous = entry;
        }
        assert_eq!(network.events.count("RelayEntrySubmitted"), 2);
    }

    #[test]
    fn test_consumer_receives_beacon_value() {
        let network = BeaconNetwork::new(12);
        let group_index = network.bootstrap();
        network.authorize_requester();

        let consumer = Arc::new(BeaconConsumer::default());
        let callback: Arc<dyn RelayCallback> = consumer.clone();
        let request_id = network
            .service
            .request_relay_entry(&REQUESTER, Some(callback))
            .unwrap();
        assert_eq!(request_id, 1);

        let entry = network.sign_entry(group_index);
        let seat = first_eligible_seat(&entry, GROUP_SIZE);
        network
            .service
            .submit_relay_entry(&network.member_address(group_index, seat), seat, entry.clone())
            .unwrap();

        let expected = (
            u256_from_hash(&keccak256(&entry)),
            network.clock.current().number,
        );
        assert_eq!(*consumer.received.lock(), vec![expected]);

        // The callback is consumed by the request it was registered with
        network.serve_request();
        assert_eq!(consumer.received.lock().len(), 1);
    }

    #[test]
    fn test_entry_from_another_key_rejected() {
        let network = BeaconNetwork::new(12);
        let group_index = network.bootstrap();
        network.authorize_requester();
        network
            .service
            .request_relay_entry(&REQUESTER, None)
            .unwrap();

        let entry = group_key(99)
            .sign(&network.service.previous_entry())
            .to_bytes()
            .to_vec();
        let seat = first_eligible_seat(&entry, GROUP_SIZE);
        assert_eq!(
            network.service.submit_relay_entry(
                &network.member_address(group_index, seat),
                seat,
                entry
            ),
            Err(RelayError::InvalidEntry.into())
        );
        assert!(network.service.is_relay_request_in_progress());
    }

    #[test]
    fn test_group_creation_follows_frequency() {
        let network = BeaconNetwork::new(12);
        network.bootstrap();
        network.authorize_requester();

        network.serve_request();
        assert_eq!(network.service.group_creation_state(), DkgState::Idle);

        let entry = network.serve_request();
        assert_eq!(
            network.service.group_creation_state(),
            DkgState::KeyGeneration
        );
        assert_eq!(
            network.service.dkg_seed(),
            Some(u256_from_hash(&keccak256(&entry)))
        );

        // Requests keep flowing while the next group forms
        network.serve_request();
        network.complete_dkg(2);
        assert_eq!(network.service.number_of_active_groups(), 2);
    }

    #[test]
    fn test_late_entry_partially_slashes_group() {
        let network = BeaconNetwork::new(12);
        let group_index = network.bootstrap();
        network.authorize_requester();
        network
            .service
            .request_relay_entry(&REQUESTER, None)
            .unwrap();
        let start = network.clock.current().number;

        let entry = network.sign_entry(group_index);
        let first = first_eligible_seat(&entry, GROUP_SIZE);
        let quarter = RELAY_HARD_TIMEOUT / 4;
        network
            .clock
            .advance_to(start + RELAY_SOFT_TIMEOUT + quarter);

        network
            .service
            .submit_relay_entry(&network.member_address(group_index, first), first, entry)
            .unwrap();

        let slashed: Vec<_> = network
            .staking
            .slashings()
            .into_iter()
            .map(|record| record.amount)
            .collect();
        assert_eq!(slashed, vec![U256::from(RELAY_FAILURE_SLASHING / 4)]);
        assert_eq!(network.events.count("RelayEntryDelaySlashed"), 1);
        assert_eq!(network.events.count("InactiveMembersRemoved"), 0);
    }

    #[test]
    fn test_timeout_moves_request_to_surviving_group() {
        let network = BeaconNetwork::new(16);
        network.bootstrap();
        network.authorize_requester();
        network.serve_request();
        network.serve_request();
        network.complete_dkg(2);
        assert_eq!(network.service.number_of_active_groups(), 2);

        let request_id = network
            .service
            .request_relay_entry(&REQUESTER, None)
            .unwrap();
        let failed = network.service.current_request().unwrap();
        let failing_members = network
            .service
            .get_group_by_index(failed.group_index)
            .unwrap()
            .members;

        network
            .clock
            .advance(RELAY_SOFT_TIMEOUT + RELAY_HARD_TIMEOUT + 1);
        network
            .service
            .report_relay_entry_timeout(&THIRD_PARTY)
            .unwrap();

        let retried = network.service.current_request().unwrap();
        assert_eq!(retried.id, request_id);
        assert_ne!(retried.group_index, failed.group_index);
        assert_eq!(retried.previous_entry, failed.previous_entry);

        let penalty = U256::from(RELAY_FAILURE_SLASHING);
        for id in failing_members {
            let operator = network.operator_address(id);
            assert!(network.staking.total_slashed(&operator) >= penalty);
        }

        // The surviving group answers the retried request
        let entry = network.sign_entry(retried.group_index);
        let seat = first_eligible_seat(&entry, GROUP_SIZE);
        network
            .service
            .submit_relay_entry(
                &network.member_address(retried.group_index, seat),
                seat,
                entry,
            )
            .unwrap();
        assert!(!network.service.is_relay_request_in_progress());
        assert!(network
            .events
            .events()
            .contains(&BeaconEvent::RelayEntryTimedOut {
                request_id,
                terminated_group_index: failed.group_index,
            }));
    }

    #[test]
    fn test_expired_groups_stop_serving() {
        let network = BeaconNetwork::new(12);
        let group_index = network.bootstrap();
        network.authorize_requester();
        let group = network.service.get_group_by_index(group_index).unwrap();

        network
            .clock
            .advance_to(group.registration_height + GROUP_LIFETIME - 1);
        network.serve_request();

        network
            .clock
            .advance_to(group.registration_height + GROUP_LIFETIME);
        assert!(network
            .service
            .request_relay_entry(&REQUESTER, None)
            .is_err());
        assert_eq!(network.service.expired_group_offset(), 1);
    }
}
