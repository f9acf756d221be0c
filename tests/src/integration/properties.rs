//! # Randomized Properties
//!
//! Seeded random checks of the pure arithmetic the protocol relies on:
//! eligibility windows, group selection over terminated holes, and the
//! slashing ramp.

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rb_01_eligibility::{slashing_amount, EligibilityWindow, RelayTimeouts};
    use rb_02_group_registry::GroupRegistry;
    use shared_types::{U256, WAD};

    fn random_u256(rng: &mut StdRng) -> U256 {
        U256([rng.gen(), rng.gen(), rng.gen(), rng.gen()])
    }

    #[test]
    fn test_window_grows_one_seat_per_delay() {
        let mut rng = StdRng::seed_from_u64(0xBEAC);

        for _ in 0..500 {
            let group_size = rng.gen_range(1..=64usize);
            let delay = rng.gen_range(1..=20u64);
            let start = rng.gen_range(0..1_000_000u64);
            let elapsed = rng.gen_range(0..(delay * group_size as u64 * 2));
            let seed = random_u256(&mut rng);

            let window =
                EligibilityWindow::compute(&seed, start, start + elapsed, delay, group_size)
                    .unwrap();

            let expected = ((elapsed / delay) as usize + 1).min(group_size);
            let eligible = (1..=group_size).filter(|seat| window.contains(*seat)).count();
            assert_eq!(eligible, expected);
            assert!(window.contains(window.first()));
            assert!(window.contains(window.last()));

            // Everyone between the first seat and an eligible submitter passed
            for submitter in (1..=group_size).filter(|seat| window.contains(*seat)) {
                let inactive = window.inactive_members(submitter);
                assert!(inactive.len() < expected);
                assert!(inactive.iter().all(|seat| window.contains(*seat)));
                assert!(!inactive.contains(&submitter));
            }
        }
    }

    #[test]
    fn test_selection_matches_naive_scan() {
        let mut rng = StdRng::seed_from_u64(0x5E1E);
        let mut registry = GroupRegistry::new(1_000_000);

        for round in 0..300u64 {
            let key = round.to_be_bytes().repeat(12);
            registry
                .add_group(key.clone(), vec![1, 2, 3], &[], round)
                .unwrap();
            // Some candidates never get approved
            if rng.gen_bool(0.9) {
                registry.activate_group(&key, round).unwrap();
            }
            if round > 0 && rng.gen_bool(0.3) {
                let victim = rng.gen_range(0..registry.groups().len());
                registry.terminate_group(victim).unwrap();
            }

            let live: Vec<usize> = registry
                .groups()
                .iter()
                .enumerate()
                .filter(|(_, group)| group.is_activated() && !group.terminated)
                .map(|(index, _)| index)
                .collect();
            assert_eq!(registry.number_of_active_groups(), live.len());
            if live.is_empty() {
                continue;
            }

            let beacon = random_u256(&mut rng);
            let expected = live[(beacon % U256::from(live.len() as u64)).low_u64() as usize];
            assert_eq!(registry.select_group(&beacon, round).unwrap(), expected);
        }
    }

    #[test]
    fn test_slashing_ramp_is_monotonic_and_capped() {
        let mut rng = StdRng::seed_from_u64(0x51A5);

        for _ in 0..200 {
            let group_size = rng.gen_range(1..=64usize);
            let delay = rng.gen_range(1..=10u64);
            let hard = rng.gen_range(1..=6_000u64);
            let timeouts = RelayTimeouts::new(group_size, delay, hard);
            let start = rng.gen_range(0..1_000_000u64);
            let base = U256::from(rng.gen_range(1..=u64::MAX));

            let mut steps = [0, 1, hard / 3, hard / 2, hard];
            steps.sort_unstable();

            let mut previous = U256::zero();
            for step in steps {
                let block = start + timeouts.soft + step;
                let factor = timeouts.factor_at(start, block);
                assert!(factor <= U256::from(WAD));
                assert!(factor >= previous);
                assert!(slashing_amount(base, factor) <= base);
                previous = factor;
            }
            assert_eq!(previous, U256::from(WAD));
            assert_eq!(timeouts.factor_at(start, start + timeouts.soft), U256::zero());
        }
    }
}
