//! # Random Beacon Benchmarks
//!
//! | Area | Operation | Shape |
//! |------|-----------|-------|
//! | rb-02 Group Registry | `select_group` | 10k groups, every other one terminated |
//! | rb-03 DKG | `validate` | 64 seats, 33 and 64 signatures |
//! | rb-04 Relay | BLS entry verification | 96-byte key, 48-byte entry |
//! | rb-01 Eligibility | window computation | 64 seats |

// Allow excessive nesting in benchmark code
#![allow(clippy::excessive_nesting)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use rb_01_eligibility::EligibilityWindow;
use rb_02_group_registry::{members_hash, GroupRegistry};
use rb_03_dkg::{
    signing_digest, DkgResult, DkgResultValidator, EcdsaSignerRecovery, GroupParameters,
    SortitionPool,
};
use rb_04_relay::{Bls12381EntryVerifier, EntryVerifier};
use rb_05_beacon::InMemorySortitionPool;
use rb_tests::fixtures::{group_key, operator_key};
use shared_types::U256;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// rb-02: Group selection over terminated holes
// ============================================================================

fn bench_group_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("rb-02-group-selection");

    for total in [100usize, 1_000, 10_000] {
        let mut registry = GroupRegistry::new(u64::MAX);
        for i in 0..total {
            let key = (i as u64).to_be_bytes().repeat(12);
            registry.add_group(key.clone(), vec![1], &[], 0).unwrap();
            registry.activate_group(&key, 0).unwrap();
            if i % 2 == 1 {
                registry.terminate_group(i).unwrap();
            }
        }

        let beacons: Vec<U256> = (0..64)
            .map(|_| U256::from(rand::thread_rng().gen::<u64>()))
            .collect();

        group.throughput(Throughput::Elements(beacons.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("select_group", total),
            &beacons,
            |b, beacons| {
                b.iter(|| {
                    for beacon in beacons {
                        black_box(registry.select_group(beacon, 1).unwrap());
                    }
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// rb-03: DKG result validation
// ============================================================================

const CHAIN_ID: u64 = 1;
const START_BLOCK: u64 = 1_000;

fn bench_dkg_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("rb-03-dkg-validation");
    group.measurement_time(Duration::from_secs(10));

    let pool = Arc::new(InMemorySortitionPool::new());
    let mut keys = HashMap::new();
    for n in 0..100 {
        let key = operator_key(n);
        let id = pool
            .insert_operator(&key.address(), U256::from(1_000 + n as u64))
            .unwrap();
        keys.insert(id, key);
    }

    let params = GroupParameters::default().with_public_key_length(96);
    let validator = DkgResultValidator::new(
        Arc::clone(&pool),
        Arc::new(EcdsaSignerRecovery::new()),
        params,
        CHAIN_ID,
    );

    let seed = U256::from(0x5eed_u64);
    let members = pool.select_group(params.group_size, &seed).unwrap();
    let public_key = group_key(1).public_key().to_bytes().to_vec();
    let digest = signing_digest(CHAIN_ID, &public_key, &[], START_BLOCK);

    for signers in [params.signature_threshold, params.group_size] {
        let signing: Vec<usize> = (1..=signers).collect();
        let mut signatures = Vec::new();
        for seat in &signing {
            let signature = keys[&members[seat - 1]].sign_prehash(&digest).unwrap();
            signatures.extend_from_slice(&signature);
        }
        let result = DkgResult {
            submitter_member_index: 1,
            group_public_key: public_key.clone(),
            misbehaved_members_indices: vec![],
            signatures,
            signing_members_indices: signing,
            members: members.clone(),
            members_hash: members_hash(&members, &[]),
        };
        assert!(validator.validate(&result, &seed, START_BLOCK).is_ok());

        group.throughput(Throughput::Elements(signers as u64));
        group.bench_with_input(
            BenchmarkId::new("validate", signers),
            &result,
            |b, result| b.iter(|| black_box(validator.validate(result, &seed, START_BLOCK))),
        );
    }

    group.finish();
}

// ============================================================================
// rb-04: Relay entry verification
// ============================================================================

fn bench_entry_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("rb-04-relay-entry");

    let key = group_key(2);
    let public_key = key.public_key().to_bytes();
    let previous = vec![0xAB; 48];
    let entry = key.sign(&previous).to_bytes();
    let verifier = Bls12381EntryVerifier::new();

    group.bench_function("bls_verify_entry", |b| {
        b.iter(|| black_box(verifier.verify(&public_key, &previous, &entry)))
    });

    group.finish();
}

// ============================================================================
// rb-01: Eligibility windows
// ============================================================================

fn bench_eligibility_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("rb-01-eligibility");
    let seed = U256::from(rand::thread_rng().gen::<u64>());

    group.bench_function("compute_window_64", |b| {
        b.iter(|| {
            let window =
                EligibilityWindow::compute(&seed, 100, black_box(400), 10, 64).unwrap();
            black_box(window.inactive_members(window.last()))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_group_selection,
    bench_dkg_validation,
    bench_entry_verification,
    bench_eligibility_window
);
criterion_main!(benches);
