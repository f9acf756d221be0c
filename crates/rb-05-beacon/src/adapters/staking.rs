//! In-memory staking ledger.

use crate::ports::{Staking, StakingError};
use parking_lot::{Mutex, RwLock};
use shared_types::{Address, U256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// One executed slashing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashRecord {
    pub amount: U256,
    pub operators: Vec<Address>,
}

/// Ledger of authorized stakes that records every slash.
#[derive(Debug, Default)]
pub struct InMemoryStaking {
    stakes: RwLock<HashMap<Address, U256>>,
    slashings: Mutex<Vec<SlashRecord>>,
    reject_slashing: AtomicBool,
}

impl InMemoryStaking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_authorized_stake(&self, operator: Address, amount: U256) {
        self.stakes.write().insert(operator, amount);
    }

    /// Make subsequent `slash` calls fail.
    pub fn set_reject_slashing(&self, reject: bool) {
        self.reject_slashing.store(reject, Ordering::SeqCst);
    }

    pub fn slashings(&self) -> Vec<SlashRecord> {
        self.slashings.lock().clone()
    }

    /// Sum slashed from `operator` across all calls.
    pub fn total_slashed(&self, operator: &Address) -> U256 {
        self.slashings
            .lock()
            .iter()
            .map(|record| {
                let hits = record.operators.iter().filter(|op| *op == operator).count();
                record.amount * U256::from(hits as u64)
            })
            .fold(U256::zero(), |acc, amount| acc.saturating_add(amount))
    }
}

impl Staking for InMemoryStaking {
    fn slash(&self, amount: U256, operators: &[Address]) -> Result<(), StakingError> {
        if self.reject_slashing.load(Ordering::SeqCst) {
            return Err(StakingError::SlashingRejected(
                "ledger rejected slashing".into(),
            ));
        }

        let mut stakes = self.stakes.write();
        for operator in operators {
            if let Some(stake) = stakes.get_mut(operator) {
                *stake = stake.saturating_sub(amount);
            }
        }
        self.slashings.lock().push(SlashRecord {
            amount,
            operators: operators.to_vec(),
        });
        Ok(())
    }

    fn authorized_stake(&self, operator: &Address) -> U256 {
        self.stakes
            .read()
            .get(operator)
            .copied()
            .unwrap_or_default()
    }
}
