//! Deterministic weighted sortition pool held in memory.
//!
//! Seat `i` of a roster for `seed` is drawn by reducing
//! `keccak256(seed ‖ i)` modulo the total weight and walking the cumulative
//! weights of the operators in join order. Operators may be drawn for more
//! than one seat.

use crate::ports::{PoolError, SortitionPool};
use parking_lot::RwLock;
use shared_crypto::keccak256;
use shared_types::{u256_from_hash, u256_to_bytes, Address, OperatorId, U256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone)]
struct PoolOperator {
    address: Address,
    weight: U256,
    in_pool: bool,
    rewards_ineligible_until: Option<u64>,
}

#[derive(Debug, Default)]
struct PoolState {
    /// Indexed by `id - 1`
    operators: Vec<PoolOperator>,
    ids: HashMap<Address, OperatorId>,
}

impl PoolState {
    fn operator(&self, id: OperatorId) -> Option<&PoolOperator> {
        (id as usize).checked_sub(1).and_then(|i| self.operators.get(i))
    }

    fn operator_mut(&mut self, id: OperatorId) -> Option<&mut PoolOperator> {
        (id as usize)
            .checked_sub(1)
            .and_then(|i| self.operators.get_mut(i))
    }
}

/// In-memory sortition pool. Operator ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemorySortitionPool {
    state: RwLock<PoolState>,
    locked: AtomicBool,
}

impl InMemorySortitionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operators currently eligible for sampling.
    pub fn operators_in_pool(&self) -> usize {
        self.state
            .read()
            .operators
            .iter()
            .filter(|op| op.in_pool)
            .count()
    }

    /// Reward ban expiry recorded for `id`.
    pub fn rewards_ineligible_until(&self, id: OperatorId) -> Option<u64> {
        self.state
            .read()
            .operator(id)
            .and_then(|op| op.rewards_ineligible_until)
    }

    fn ensure_unlocked(&self) -> Result<(), PoolError> {
        if self.is_locked() {
            return Err(PoolError::Locked);
        }
        Ok(())
    }
}

impl SortitionPool for InMemorySortitionPool {
    fn select_group(&self, group_size: usize, seed: &U256) -> Result<Vec<OperatorId>, PoolError> {
        let state = self.state.read();
        let candidates: Vec<(OperatorId, U256)> = state
            .operators
            .iter()
            .enumerate()
            .filter(|(_, op)| op.in_pool && !op.weight.is_zero())
            .map(|(i, op)| (i as OperatorId + 1, op.weight))
            .collect();

        if candidates.is_empty() {
            return Err(PoolError::NotEnoughOperators {
                available: 0,
                required: group_size,
            });
        }

        let total = candidates
            .iter()
            .fold(U256::zero(), |acc, (_, w)| acc.saturating_add(*w));
        let seed_word = u256_to_bytes(seed);

        let mut roster = Vec::with_capacity(group_size);
        for seat in 0..group_size {
            let mut preimage = [0u8; 64];
            preimage[..32].copy_from_slice(&seed_word);
            preimage[32..].copy_from_slice(&u256_to_bytes(&U256::from(seat as u64)));
            let mut ticket = u256_from_hash(&keccak256(&preimage)) % total;

            let mut chosen = candidates[candidates.len() - 1].0;
            for (id, weight) in &candidates {
                if ticket < *weight {
                    chosen = *id;
                    break;
                }
                ticket -= *weight;
            }
            roster.push(chosen);
        }
        Ok(roster)
    }

    fn operator_id(&self, operator: &Address) -> Option<OperatorId> {
        self.state.read().ids.get(operator).copied()
    }

    fn operator_addresses(&self, ids: &[OperatorId]) -> Result<Vec<Address>, PoolError> {
        let state = self.state.read();
        ids.iter()
            .map(|id| {
                state
                    .operator(*id)
                    .map(|op| op.address)
                    .ok_or(PoolError::UnknownOperator(*id))
            })
            .collect()
    }

    fn weight(&self, operator: &Address) -> Option<U256> {
        let state = self.state.read();
        let id = state.ids.get(operator)?;
        state
            .operator(*id)
            .filter(|op| op.in_pool)
            .map(|op| op.weight)
    }

    fn insert_operator(&self, operator: &Address, weight: U256) -> Result<OperatorId, PoolError> {
        self.ensure_unlocked()?;
        let mut state = self.state.write();

        if let Some(&id) = state.ids.get(operator) {
            let existing = state
                .operator_mut(id)
                .ok_or(PoolError::UnknownOperator(id))?;
            if existing.in_pool {
                return Err(PoolError::Backend("operator is already registered".into()));
            }
            existing.in_pool = true;
            existing.weight = weight;
            return Ok(id);
        }

        let id = state.operators.len() as OperatorId + 1;
        state.operators.push(PoolOperator {
            address: *operator,
            weight,
            in_pool: true,
            rewards_ineligible_until: None,
        });
        state.ids.insert(*operator, id);
        Ok(id)
    }

    fn update_operator(&self, operator: &Address, weight: U256) -> Result<(), PoolError> {
        self.ensure_unlocked()?;
        let mut state = self.state.write();
        let id = *state
            .ids
            .get(operator)
            .ok_or(PoolError::UnknownAddress(*operator))?;
        match state.operator_mut(id) {
            Some(op) if op.in_pool => {
                op.weight = weight;
                Ok(())
            }
            _ => Err(PoolError::UnknownAddress(*operator)),
        }
    }

    /// Ids that are unknown or already out of the pool are skipped.
    fn remove_operators(&self, ids: &[OperatorId]) -> Result<(), PoolError> {
        self.ensure_unlocked()?;
        let mut state = self.state.write();
        for id in ids {
            if let Some(op) = state.operator_mut(*id) {
                op.in_pool = false;
            }
        }
        Ok(())
    }

    fn set_rewards_ineligible(&self, ids: &[OperatorId], until: u64) -> Result<(), PoolError> {
        let mut state = self.state.write();
        if let Some(unknown) = ids.iter().find(|id| state.operator(**id).is_none()) {
            return Err(PoolError::UnknownOperator(*unknown));
        }
        for id in ids {
            if let Some(op) = state.operator_mut(*id) {
                op.rewards_ineligible_until = Some(until);
            }
        }
        Ok(())
    }

    fn lock(&self) {
        self.locked.store(true, Ordering::SeqCst);
    }

    fn unlock(&self) {
        self.locked.store(false, Ordering::SeqCst);
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }
}
