//! Mutable beacon state, guarded as one unit by the service.

use crate::config::BeaconConfig;
use crate::ports::RelayCallback;
use rb_02_group_registry::GroupRegistry;
use rb_03_dkg::DkgRound;
use rb_04_relay::Relay;
use shared_types::Address;
use std::collections::HashSet;
use std::sync::Arc;

/// Everything a beacon operation reads or writes.
pub(crate) struct BeaconState {
    pub config: BeaconConfig,
    pub registry: GroupRegistry,
    pub dkg: DkgRound,
    pub relay: Relay,
    /// Callback of the in-flight relay request
    pub callback: Option<Arc<dyn RelayCallback>>,
    pub authorized_requesters: HashSet<Address>,
}

impl BeaconState {
    pub fn new(config: BeaconConfig) -> Self {
        Self {
            registry: GroupRegistry::new(config.group_creation.group_lifetime),
            dkg: DkgRound::new(config.dkg, config.group.group_size),
            relay: Relay::new(config.relay_parameters(), config.genesis_entry.clone()),
            callback: None,
            authorized_requesters: HashSet::new(),
            config,
        }
    }
}
