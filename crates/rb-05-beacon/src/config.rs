//! Beacon configuration
//!
//! Defaults are the protocol's reference parameters. Every section can be
//! overridden from `BEACON_*` environment variables or loaded from JSON, and
//! is validated as a whole before the service accepts it.

use rb_03_dkg::{DkgTimeParameters, GroupParameters};
use rb_04_relay::RelayParameters;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::{u256_to_bytes, U256, WAD};
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Seed of the genesis group: the first 77 digits of π.
///
/// 31415926535897932384626433832795028841971693993751058209749445923078164062862
pub const GENESIS_SEED: U256 = U256([
    0x900b_df40_2152_228e,
    0xc60c_3838_d9da_d993,
    0xd28f_7e46_7dac_97b5,
    0x4574_c8c7_5d6e_88ac,
]);

/// Configuration rejected by validation or environment parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid parameter {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("cannot parse {var}={value}")]
    Parse { var: &'static str, value: String },

    #[error("malformed config JSON: {0}")]
    Json(String),
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}

/// Cadence and lifetime of groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCreationParameters {
    /// A new group is created after every this many relay entries
    pub group_creation_frequency: u64,
    /// Blocks a group stays eligible for selection after registration
    pub group_lifetime: u64,
}

/// Relay entry submission timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayEntryParameters {
    pub relay_entry_submission_eligibility_delay: u64,
    pub relay_entry_hard_timeout: u64,
}

/// Slashing amounts, in token base units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashingParameters {
    /// Per-member penalty for a relay entry that is late or never submitted
    pub relay_entry_submission_failure_slashing_amount: U256,
    /// Penalty for the submitter of a successfully challenged DKG result
    pub malicious_dkg_result_slashing_amount: U256,
}

/// Sortition pool reward parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardParameters {
    /// Seconds misbehaved DKG members are excluded from pool rewards
    pub sortition_pool_rewards_ban_duration: u64,
}

/// Staking requirements for joining the sortition pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationParameters {
    pub minimum_authorization: U256,
}

/// Complete beacon configuration.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconConfig {
    /// Chain identifier mixed into DKG result digests
    pub chain_id: u64,
    pub group: GroupParameters,
    pub dkg: DkgTimeParameters,
    pub group_creation: GroupCreationParameters,
    pub relay: RelayEntryParameters,
    pub slashing: SlashingParameters,
    pub rewards: RewardParameters,
    pub authorization: AuthorizationParameters,
    /// Entry the first relay request signs
    #[serde_as(as = "Hex")]
    pub genesis_entry: Vec<u8>,
}

fn tokens(whole: u64) -> U256 {
    U256::from(whole) * U256::from(WAD)
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            group: GroupParameters::default(),
            dkg: DkgTimeParameters::default(),
            group_creation: GroupCreationParameters {
                group_creation_frequency: 10,
                group_lifetime: 403_200,
            },
            relay: RelayEntryParameters {
                relay_entry_submission_eligibility_delay: 10,
                relay_entry_hard_timeout: 5_760,
            },
            slashing: SlashingParameters {
                relay_entry_submission_failure_slashing_amount: tokens(1_000),
                malicious_dkg_result_slashing_amount: tokens(50_000),
            },
            rewards: RewardParameters {
                sortition_pool_rewards_ban_duration: 1_209_600,
            },
            authorization: AuthorizationParameters {
                minimum_authorization: tokens(100_000),
            },
            genesis_entry: u256_to_bytes(&GENESIS_SEED).to_vec(),
        }
    }
}

impl BeaconConfig {
    /// Defaults overridden by `BEACON_*` environment variables.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `BEACON_CHAIN_ID` | `chain_id` |
    /// | `BEACON_GROUP_SIZE` | `group.group_size` |
    /// | `BEACON_SIGNATURE_THRESHOLD` | `group.signature_threshold` |
    /// | `BEACON_ACTIVE_THRESHOLD` | `group.active_threshold` |
    /// | `BEACON_GROUP_PUBKEY_LENGTH` | `group.public_key_length` |
    /// | `BEACON_OFFCHAIN_DKG_TIME` | `dkg.offchain_dkg_time` |
    /// | `BEACON_DKG_CHALLENGE_PERIOD` | `dkg.result_challenge_period_length` |
    /// | `BEACON_DKG_SUBMITTER_PRECEDENCE` | `dkg.submitter_precedence_period_length` |
    /// | `BEACON_DKG_ELIGIBILITY_DELAY` | `dkg.submitter_eligibility_delay` |
    /// | `BEACON_GROUP_CREATION_FREQUENCY` | `group_creation.group_creation_frequency` |
    /// | `BEACON_GROUP_LIFETIME` | `group_creation.group_lifetime` |
    /// | `BEACON_RELAY_ELIGIBILITY_DELAY` | `relay.relay_entry_submission_eligibility_delay` |
    /// | `BEACON_RELAY_HARD_TIMEOUT` | `relay.relay_entry_hard_timeout` |
    /// | `BEACON_RELAY_FAILURE_SLASHING` | `slashing.relay_entry_submission_failure_slashing_amount` |
    /// | `BEACON_MALICIOUS_DKG_SLASHING` | `slashing.malicious_dkg_result_slashing_amount` |
    /// | `BEACON_REWARDS_BAN_DURATION` | `rewards.sortition_pool_rewards_ban_duration` |
    /// | `BEACON_MINIMUM_AUTHORIZATION` | `authorization.minimum_authorization` |
    ///
    /// Amounts are decimal base units.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        override_from_env("BEACON_CHAIN_ID", &mut config.chain_id)?;

        override_from_env("BEACON_GROUP_SIZE", &mut config.group.group_size)?;
        override_from_env(
            "BEACON_SIGNATURE_THRESHOLD",
            &mut config.group.signature_threshold,
        )?;
        override_from_env("BEACON_ACTIVE_THRESHOLD", &mut config.group.active_threshold)?;
        override_from_env(
            "BEACON_GROUP_PUBKEY_LENGTH",
            &mut config.group.public_key_length,
        )?;

        override_from_env("BEACON_OFFCHAIN_DKG_TIME", &mut config.dkg.offchain_dkg_time)?;
        override_from_env(
            "BEACON_DKG_CHALLENGE_PERIOD",
            &mut config.dkg.result_challenge_period_length,
        )?;
        override_from_env(
            "BEACON_DKG_SUBMITTER_PRECEDENCE",
            &mut config.dkg.submitter_precedence_period_length,
        )?;
        override_from_env(
            "BEACON_DKG_ELIGIBILITY_DELAY",
            &mut config.dkg.submitter_eligibility_delay,
        )?;

        override_from_env(
            "BEACON_GROUP_CREATION_FREQUENCY",
            &mut config.group_creation.group_creation_frequency,
        )?;
        override_from_env(
            "BEACON_GROUP_LIFETIME",
            &mut config.group_creation.group_lifetime,
        )?;

        override_from_env(
            "BEACON_RELAY_ELIGIBILITY_DELAY",
            &mut config.relay.relay_entry_submission_eligibility_delay,
        )?;
        override_from_env(
            "BEACON_RELAY_HARD_TIMEOUT",
            &mut config.relay.relay_entry_hard_timeout,
        )?;

        override_amount_from_env(
            "BEACON_RELAY_FAILURE_SLASHING",
            &mut config.slashing.relay_entry_submission_failure_slashing_amount,
        )?;
        override_amount_from_env(
            "BEACON_MALICIOUS_DKG_SLASHING",
            &mut config.slashing.malicious_dkg_result_slashing_amount,
        )?;
        override_from_env(
            "BEACON_REWARDS_BAN_DURATION",
            &mut config.rewards.sortition_pool_rewards_ban_duration,
        )?;
        override_amount_from_env(
            "BEACON_MINIMUM_AUTHORIZATION",
            &mut config.authorization.minimum_authorization,
        )?;

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject inconsistent parameter combinations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let group = &self.group;
        if group.group_size == 0 {
            return Err(invalid("group_size", "must be positive"));
        }
        if group.group_size > u32::MAX as usize {
            return Err(invalid("group_size", "exceeds uint32"));
        }
        if group.signature_threshold == 0 || group.signature_threshold > group.group_size {
            return Err(invalid(
                "signature_threshold",
                format!("must be within [1, {}]", group.group_size),
            ));
        }
        if group.active_threshold < group.signature_threshold
            || group.active_threshold > group.group_size
        {
            return Err(invalid(
                "active_threshold",
                format!(
                    "must be within [{}, {}]",
                    group.signature_threshold, group.group_size
                ),
            ));
        }
        if group.public_key_length == 0 {
            return Err(invalid("public_key_length", "must be positive"));
        }
        if group.signature_byte_size == 0 {
            return Err(invalid("signature_byte_size", "must be positive"));
        }

        if self.dkg.submitter_eligibility_delay == 0 {
            return Err(invalid("dkg.submitter_eligibility_delay", "must be positive"));
        }
        if self.dkg.result_challenge_period_length == 0 {
            return Err(invalid(
                "dkg.result_challenge_period_length",
                "must be positive",
            ));
        }

        if self.group_creation.group_creation_frequency == 0 {
            return Err(invalid("group_creation_frequency", "must be positive"));
        }
        if self.group_creation.group_lifetime == 0 {
            return Err(invalid("group_lifetime", "must be positive"));
        }

        if self.relay.relay_entry_submission_eligibility_delay == 0 {
            return Err(invalid(
                "relay_entry_submission_eligibility_delay",
                "must be positive",
            ));
        }
        if self.relay.relay_entry_hard_timeout == 0 {
            return Err(invalid("relay_entry_hard_timeout", "must be positive"));
        }

        if self.genesis_entry.is_empty() {
            return Err(invalid("genesis_entry", "must not be empty"));
        }
        Ok(())
    }

    /// Relay timing for the configured group size.
    pub fn relay_parameters(&self) -> RelayParameters {
        RelayParameters {
            relay_entry_submission_eligibility_delay: self
                .relay
                .relay_entry_submission_eligibility_delay,
            relay_entry_hard_timeout: self.relay.relay_entry_hard_timeout,
            group_size: self.group.group_size,
        }
    }

    /// Blocks a relay request may stay open: soft plus hard timeout.
    pub fn relay_entry_timeout(&self) -> u64 {
        self.relay_parameters().timeouts().total()
    }
}

fn override_from_env<T: FromStr>(var: &'static str, field: &mut T) -> Result<(), ConfigError> {
    if let Ok(value) = env::var(var) {
        *field = value.trim().parse().map_err(|_| ConfigError::Parse {
            var,
            value: value.clone(),
        })?;
    }
    Ok(())
}

fn override_amount_from_env(var: &'static str, field: &mut U256) -> Result<(), ConfigError> {
    if let Ok(value) = env::var(var) {
        *field = U256::from_dec_str(value.trim()).map_err(|_| ConfigError::Parse {
            var,
            value: value.clone(),
        })?;
    }
    Ok(())
}
