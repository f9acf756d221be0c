//! # Beacon Network Fixture
//!
//! A beacon service wired to in-memory adapters, a funded operator set
//! with secp256k1 keys and a table of BLS group keys, so tests can play
//! every off-chain role: sign DKG results and produce relay entries.

use parking_lot::Mutex;
use rb_02_group_registry::members_hash;
use rb_03_dkg::{
    signing_digest, DkgResult, DkgTimeParameters, EcdsaSignerRecovery, GroupParameters,
    SortitionPool,
};
use rb_04_relay::Bls12381EntryVerifier;
use rb_05_beacon::{
    BeaconConfig, BeaconDependencies, GroupCreationParameters, InMemoryEventSink,
    InMemorySortitionPool, InMemoryStaking, ManualBlockClock, RandomBeaconService,
    RelayEntryParameters, SlashingParameters,
};
use shared_crypto::{keccak256, BlsKeyPair, Secp256k1KeyPair};
use shared_types::{u256_from_hash, Address, OperatorId, SeatIndex, U256};
use std::collections::HashMap;
use std::sync::Arc;

pub const GROUP_SIZE: usize = 8;
pub const SIGNATURE_THRESHOLD: usize = 5;
pub const ACTIVE_THRESHOLD: usize = 6;
pub const CHAIN_ID: u64 = 31_337;
pub const OFFCHAIN_DKG_TIME: u64 = 4;
pub const CHALLENGE_PERIOD: u64 = 6;
pub const PRECEDENCE_PERIOD: u64 = 2;
pub const DKG_ELIGIBILITY_DELAY: u64 = 1;
pub const RELAY_ELIGIBILITY_DELAY: u64 = 1;
pub const RELAY_SOFT_TIMEOUT: u64 = GROUP_SIZE as u64 * RELAY_ELIGIBILITY_DELAY;
pub const RELAY_HARD_TIMEOUT: u64 = 8;
pub const GROUP_CREATION_FREQUENCY: u64 = 2;
pub const GROUP_LIFETIME: u64 = 500;
pub const RELAY_FAILURE_SLASHING: u64 = 800;
pub const MALICIOUS_RESULT_SLASHING: u64 = 5_000;
pub const MINIMUM_AUTHORIZATION: u64 = 1_000;

pub const REQUESTER: Address = [0xB0; 20];
pub const THIRD_PARTY: Address = [0x3D; 20];

pub type BeaconService = RandomBeaconService<
    InMemorySortitionPool,
    EcdsaSignerRecovery,
    Bls12381EntryVerifier,
    InMemoryStaking,
    InMemoryEventSink,
>;

/// Configuration sized for fast protocol runs.
pub fn network_config() -> BeaconConfig {
    let mut config = BeaconConfig::default();
    config.chain_id = CHAIN_ID;
    config.group = GroupParameters::new(GROUP_SIZE, SIGNATURE_THRESHOLD)
        .with_active_threshold(ACTIVE_THRESHOLD)
        .with_public_key_length(shared_crypto::bls::PUBLIC_KEY_LENGTH);
    config.dkg = DkgTimeParameters {
        offchain_dkg_time: OFFCHAIN_DKG_TIME,
        result_challenge_period_length: CHALLENGE_PERIOD,
        submitter_precedence_period_length: PRECEDENCE_PERIOD,
        submitter_eligibility_delay: DKG_ELIGIBILITY_DELAY,
    };
    config.group_creation = GroupCreationParameters {
        group_creation_frequency: GROUP_CREATION_FREQUENCY,
        group_lifetime: GROUP_LIFETIME,
    };
    config.relay = RelayEntryParameters {
        relay_entry_submission_eligibility_delay: RELAY_ELIGIBILITY_DELAY,
        relay_entry_hard_timeout: RELAY_HARD_TIMEOUT,
    };
    config.slashing = SlashingParameters {
        relay_entry_submission_failure_slashing_amount: U256::from(RELAY_FAILURE_SLASHING),
        malicious_dkg_result_slashing_amount: U256::from(MALICIOUS_RESULT_SLASHING),
    };
    config.rewards.sortition_pool_rewards_ban_duration = 50;
    config.authorization.minimum_authorization = U256::from(MINIMUM_AUTHORIZATION);
    config
}

/// Deterministic operator key for operator number `n` (0-based).
pub fn operator_key(n: usize) -> Secp256k1KeyPair {
    let secret = keccak256(&(n as u64).to_be_bytes());
    Secp256k1KeyPair::from_bytes(secret).expect("keccak output is a valid scalar")
}

/// Deterministic BLS group key.
pub fn group_key(tag: u8) -> BlsKeyPair {
    BlsKeyPair::from_ikm(&[tag; 32]).expect("32-byte ikm")
}

/// Seat the relay rotation starts from for a submission of `entry`.
pub fn first_eligible_seat(entry: &[u8], group_size: usize) -> SeatIndex {
    (u256_from_hash(&keccak256(entry)) % U256::from(group_size as u64)).low_u64() as usize + 1
}

pub struct BeaconNetwork {
    pub service: BeaconService,
    pub pool: Arc<InMemorySortitionPool>,
    pub staking: Arc<InMemoryStaking>,
    pub events: Arc<InMemoryEventSink>,
    pub clock: Arc<ManualBlockClock>,
    operators: HashMap<Address, Secp256k1KeyPair>,
    group_keys: Mutex<HashMap<Vec<u8>, BlsKeyPair>>,
}

impl BeaconNetwork {
    /// Network with `operators` staked operators already in the pool.
    pub fn new(operators: usize) -> Self {
        Self::with_config(operators, network_config())
    }

    pub fn with_config(operators: usize, config: BeaconConfig) -> Self {
        let pool = Arc::new(InMemorySortitionPool::new());
        let staking = Arc::new(InMemoryStaking::new());
        let events = Arc::new(InMemoryEventSink::new());
        let clock = Arc::new(ManualBlockClock::new(1_000, 1_700_000_000));

        let service = RandomBeaconService::new(BeaconDependencies {
            pool: Arc::clone(&pool),
            recovery: Arc::new(EcdsaSignerRecovery::new()),
            verifier: Arc::new(Bls12381EntryVerifier::new()),
            staking: Arc::clone(&staking),
            events: Arc::clone(&events),
            clock: clock.clone(),
            config,
        })
        .expect("valid network config");

        let mut keys = HashMap::new();
        for n in 0..operators {
            let key = operator_key(n);
            let address = key.address();
            staking.set_authorized_stake(address, U256::from(MINIMUM_AUTHORIZATION + n as u64));
            service
                .join_sortition_pool(&address)
                .expect("fresh operator joins");
            keys.insert(address, key);
        }

        Self {
            service,
            pool,
            staking,
            events,
            clock,
            operators: keys,
            group_keys: Mutex::new(HashMap::new()),
        }
    }

    pub fn operator_address(&self, id: OperatorId) -> Address {
        self.pool
            .operator_addresses(&[id])
            .expect("known operator")[0]
    }

    /// Build a DKG result for the open round, signed by `signers` and
    /// submitted from `submitter` seat.
    pub fn dkg_result(
        &self,
        key: &BlsKeyPair,
        submitter: SeatIndex,
        misbehaved: &[SeatIndex],
        signers: &[SeatIndex],
    ) -> DkgResult {
        let seed = self.service.dkg_seed().expect("round in progress");
        let start = self.service.dkg_start_block().expect("round in progress");
        let group_size = self.service.config().group.group_size;
        let members = self
            .pool
            .select_group(group_size, &seed)
            .expect("pool can sample group");

        let public_key = key.public_key().to_bytes().to_vec();
        let digest = signing_digest(CHAIN_ID, &public_key, misbehaved, start);

        let mut signatures = Vec::new();
        for seat in signers {
            let address = self.operator_address(members[seat - 1]);
            let signature = self.operators[&address]
                .sign_prehash(&digest)
                .expect("prehash signing");
            signatures.extend_from_slice(&signature);
        }

        DkgResult {
            submitter_member_index: submitter,
            group_public_key: public_key,
            misbehaved_members_indices: misbehaved.to_vec(),
            signatures,
            signing_members_indices: signers.to_vec(),
            members_hash: members_hash(&members, misbehaved),
            members,
        }
    }

    /// Fully signed result with no misbehaved seats, submitted from seat 1.
    pub fn honest_result(&self, key: &BlsKeyPair) -> DkgResult {
        let group_size = self.service.config().group.group_size;
        let signers: Vec<SeatIndex> = (1..=group_size).collect();
        self.dkg_result(key, 1, &[], &signers)
    }

    pub fn submitter_of(&self, result: &DkgResult) -> Address {
        self.operator_address(result.members[result.submitter_member_index - 1])
    }

    /// Move to the first block that accepts results from seat 1.
    pub fn advance_to_submission(&self) {
        let start = self.service.dkg_start_block().expect("round in progress");
        let offchain = self.service.config().dkg.offchain_dkg_time;
        self.clock.advance_to(start + offchain + 1);
    }

    /// Remember `key` so relay entries for its group can be produced.
    pub fn register_group_key(&self, key: BlsKeyPair) {
        let public_key = key.public_key().to_bytes().to_vec();
        self.group_keys.lock().insert(public_key, key);
    }

    /// Drive the open round to an approved group signed with key `tag`.
    pub fn complete_dkg(&self, tag: u8) -> usize {
        let key = group_key(tag);
        self.advance_to_submission();
        let result = self.honest_result(&key);
        let submitter = self.submitter_of(&result);
        self.service
            .submit_dkg_result(&submitter, result.clone())
            .expect("honest result accepted");
        self.register_group_key(key);

        let challenge = self.service.config().dkg.result_challenge_period_length;
        self.clock.advance(challenge + 1);
        self.service
            .approve_dkg_result(&submitter, &result)
            .expect("unchallenged result approved")
    }

    /// Genesis followed by the first group.
    pub fn bootstrap(&self) -> usize {
        self.service.genesis().expect("genesis");
        self.complete_dkg(1)
    }

    pub fn authorize_requester(&self) {
        self.service.set_requester_authorization(&REQUESTER, true);
    }

    /// Group `group_index`'s BLS signature over the previous entry.
    pub fn sign_entry(&self, group_index: usize) -> Vec<u8> {
        let group = self
            .service
            .get_group_by_index(group_index)
            .expect("known group");
        let keys = self.group_keys.lock();
        let key = keys
            .get(&group.public_key)
            .expect("group key registered");
        key.sign(&self.service.previous_entry()).to_bytes().to_vec()
    }

    pub fn member_address(&self, group_index: usize, seat: SeatIndex) -> Address {
        let group = self
            .service
            .get_group_by_index(group_index)
            .expect("known group");
        self.operator_address(group.members[seat - 1])
    }

    /// Request an entry and have the first eligible member answer at once.
    pub fn serve_request(&self) -> Vec<u8> {
        self.service
            .request_relay_entry(&REQUESTER, None)
            .expect("request accepted");
        let request = self.service.current_request().expect("request open");
        let entry = self.sign_entry(request.group_index);
        let group_size = self.service.config().group.group_size;
        let seat = first_eligible_seat(&entry, group_size);
        self.service
            .submit_relay_entry(
                &self.member_address(request.group_index, seat),
                seat,
                entry.clone(),
            )
            .expect("first eligible member submits");
        entry
    }
}
