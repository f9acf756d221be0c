//! # Group Creation Flows
//!
//! Genesis, submission, challenge and approval of DKG results with real
//! secp256k1 member signatures and BLS group keys.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use rb_02_group_registry::members_hash;
    use rb_03_dkg::{DkgError, DkgState, ValidationError};
    use rb_03_dkg::SortitionPool;
    use rb_05_beacon::{BeaconError, BeaconEvent, BlockClock, RandomBeaconApi};
    use rb_01_eligibility::EligibilityError;
    use shared_types::U256;

    #[test]
    fn test_genesis_to_first_group() {
        let network = BeaconNetwork::new(12);
        assert!(network.service.get_groups().is_empty());

        let index = network.bootstrap();
        let group = network.service.get_group_by_index(index).unwrap();

        assert_eq!(index, 0);
        assert_eq!(group.public_key, group_key(1).public_key().to_bytes().to_vec());
        assert_eq!(group.members.len(), GROUP_SIZE);
        assert!(group.activation_timestamp.is_some());
        assert_eq!(network.service.number_of_active_groups(), 1);
        assert_eq!(network.service.group_creation_state(), DkgState::Idle);
        assert!(!network.pool.is_locked());

        let json: Vec<_> = network
            .events
            .events()
            .iter()
            .map(|event| serde_json::to_value(event).unwrap())
            .collect();
        let tags: Vec<_> = json
            .iter()
            .map(|value| value["event"].as_str().unwrap().to_string())
            .filter(|tag| tag != "OperatorJoinedSortitionPool")
            .collect();
        assert_eq!(
            tags,
            [
                "DkgStarted",
                "CandidateGroupRegistered",
                "DkgResultSubmitted",
                "GroupActivated",
                "DkgResultApproved",
            ]
        );
    }

    #[test]
    fn test_later_seat_submits_after_rotation() {
        let network = BeaconNetwork::new(12);
        network.service.genesis().unwrap();
        let start = network.service.dkg_start_block().unwrap();

        let key = group_key(3);
        let signers: Vec<_> = (1..=GROUP_SIZE).collect();
        let result = network.dkg_result(&key, 4, &[], &signers);
        let submitter = network.submitter_of(&result);

        // Seats 1..=4 become eligible one block apart
        network
            .clock
            .advance_to(start + OFFCHAIN_DKG_TIME + 3 * DKG_ELIGIBILITY_DELAY - 1);
        assert_eq!(
            network.service.submit_dkg_result(&submitter, result.clone()),
            Err(EligibilityError::SubmitterNotEligible { seat: 4 }.into())
        );

        network.clock.advance(1);
        network
            .service
            .submit_dkg_result(&submitter, result)
            .unwrap();
        assert_eq!(network.service.group_creation_state(), DkgState::Challenge);
    }

    #[test]
    fn test_misbehaved_members_excluded_and_banned() {
        let network = BeaconNetwork::new(12);
        network.service.genesis().unwrap();
        network.advance_to_submission();

        let key = group_key(4);
        let misbehaved = [GROUP_SIZE - 1, GROUP_SIZE];
        let result = network.dkg_result(&key, 1, &misbehaved, &[1, 2, 3, 4, 5]);
        let submitter = network.submitter_of(&result);
        network
            .service
            .submit_dkg_result(&submitter, result.clone())
            .unwrap();

        network.clock.advance(CHALLENGE_PERIOD + 1);
        let index = network
            .service
            .approve_dkg_result(&submitter, &result)
            .unwrap();

        let group = network.service.get_group_by_index(index).unwrap();
        assert_eq!(group.members_hash, members_hash(&result.members, &misbehaved));

        let until = network.clock.current().timestamp + 50;
        for seat in misbehaved {
            let id = result.members[seat - 1];
            assert_eq!(network.pool.rewards_ineligible_until(id), Some(until));
        }
    }

    #[test]
    fn test_too_many_misbehaved_rejected_at_submission() {
        let network = BeaconNetwork::new(12);
        network.service.genesis().unwrap();
        network.advance_to_submission();

        let result = network.dkg_result(&group_key(4), 1, &[6, 7, 8], &[1, 2, 3, 4, 5]);
        let submitter = network.submitter_of(&result);
        assert_eq!(
            network.service.submit_dkg_result(&submitter, result),
            Err(ValidationError::TooManyMisbehaving { count: 3, max: 2 }.into())
        );
    }

    #[test]
    fn test_forged_signature_challenged_and_replaced() {
        let network = BeaconNetwork::new(12);
        network.service.genesis().unwrap();
        network.advance_to_submission();

        let key = group_key(5);
        let mut forged = network.honest_result(&key);
        let digest = [0x42; 32];
        let impostor = operator_key(10_000).sign_prehash(&digest).unwrap();
        forged.signatures[..impostor.len()].copy_from_slice(&impostor);

        let submitter = network.submitter_of(&forged);
        network
            .service
            .submit_dkg_result(&submitter, forged.clone())
            .unwrap();

        let reason = network
            .service
            .challenge_dkg_result(&THIRD_PARTY, &forged)
            .unwrap();
        assert_eq!(reason, ValidationError::InvalidSignatures);
        assert_eq!(
            network.staking.total_slashed(&submitter),
            U256::from(MALICIOUS_RESULT_SLASHING)
        );
        assert_eq!(network.service.group_creation_state(), DkgState::AwaitingResult);
        assert!(network.pool.is_locked());

        // An honest member answers from seat 1 in the next block
        network.clock.advance(1);
        let honest = network.honest_result(&key);
        let submitter = network.submitter_of(&honest);
        network
            .service
            .submit_dkg_result(&submitter, honest.clone())
            .unwrap();
        network.clock.advance(CHALLENGE_PERIOD + 1);
        let index = network
            .service
            .approve_dkg_result(&submitter, &honest)
            .unwrap();

        assert_eq!(index, 1);
        assert!(network.service.get_group_by_index(0).unwrap().terminated);
        assert_eq!(network.service.number_of_active_groups(), 1);
        assert!(!network.pool.is_locked());
    }

    #[test]
    fn test_wrong_roster_challenged() {
        let network = BeaconNetwork::new(12);
        network.service.genesis().unwrap();
        network.advance_to_submission();

        let mut result = network.dkg_result(&group_key(6), 1, &[], &[1, 2, 3, 4, 5]);
        let replaced = result.members[GROUP_SIZE - 1];
        result.members[GROUP_SIZE - 1] = replaced % 12 + 1;
        result.members_hash = members_hash(&result.members, &[]);

        let submitter = network.submitter_of(&result);
        network
            .service
            .submit_dkg_result(&submitter, result.clone())
            .unwrap();

        let reason = network
            .service
            .challenge_dkg_result(&THIRD_PARTY, &result)
            .unwrap();
        assert_eq!(reason, ValidationError::InvalidGroupMembers);
        match network.events.last() {
            Some(BeaconEvent::DkgResultChallenged { reason, .. }) => {
                assert_eq!(reason, "Invalid group members")
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_honest_result_survives_challenge() {
        let network = BeaconNetwork::new(12);
        network.service.genesis().unwrap();
        network.advance_to_submission();

        let result = network.honest_result(&group_key(7));
        let submitter = network.submitter_of(&result);
        network
            .service
            .submit_dkg_result(&submitter, result.clone())
            .unwrap();

        assert_eq!(
            network.service.challenge_dkg_result(&THIRD_PARTY, &result),
            Err(DkgError::UnjustifiedChallenge.into())
        );
        assert_eq!(network.staking.slashings(), vec![]);
        assert_eq!(network.service.group_creation_state(), DkgState::Challenge);
    }

    #[test]
    fn test_timeout_unlocks_pool_for_new_operators() {
        let network = BeaconNetwork::new(12);
        network.service.genesis().unwrap();
        let start = network.service.dkg_start_block().unwrap();

        let newcomer = operator_key(500).address();
        network
            .staking
            .set_authorized_stake(newcomer, U256::from(MINIMUM_AUTHORIZATION));
        assert!(matches!(
            network.service.join_sortition_pool(&newcomer),
            Err(BeaconError::Pool(_))
        ));

        network.clock.advance_to(
            start + OFFCHAIN_DKG_TIME + GROUP_SIZE as u64 * DKG_ELIGIBILITY_DELAY + 1,
        );
        let api: &dyn RandomBeaconApi = &network.service;
        api.notify_dkg_timeout(&THIRD_PARTY).unwrap();

        assert!(api.join_sortition_pool(&newcomer).is_ok());
        assert_eq!(network.pool.operators_in_pool(), 13);
    }
}
