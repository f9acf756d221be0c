//! Late-submission slashing schedule
//!
//! Reference point for relay requests:
//! - soft timeout: every seat has become eligible (`N · delay` blocks)
//! - hard timeout: `hard` blocks after the soft timeout, request abandoned

use serde::{Deserialize, Serialize};
use shared_types::{BlockNumber, U256, WAD};

/// Fraction of the full penalty, scaled by 1e18, for a submission landing
/// `elapsed_past_soft` blocks after the soft timeout.
pub fn slashing_factor(elapsed_past_soft: u64, hard_timeout: u64) -> U256 {
    if hard_timeout == 0 {
        return U256::from(WAD);
    }
    let capped = elapsed_past_soft.min(hard_timeout);
    U256::from(capped) * U256::from(WAD) / U256::from(hard_timeout)
}

/// `base · factor / 1e18`
pub fn slashing_amount(base: U256, factor: U256) -> U256 {
    base.saturating_mul(factor) / U256::from(WAD)
}

/// Soft and hard timeout of a relay request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayTimeouts {
    /// Blocks until every seat is eligible
    pub soft: u64,
    /// Blocks after the soft timeout until the request is abandoned
    pub hard: u64,
}

impl RelayTimeouts {
    /// Timeouts for a group of `group_size` seats rotating every
    /// `per_seat_delay` blocks.
    pub fn new(group_size: usize, per_seat_delay: u64, hard: u64) -> Self {
        Self {
            soft: group_size as u64 * per_seat_delay,
            hard,
        }
    }

    /// Total blocks a request may stay open.
    pub fn total(&self) -> u64 {
        self.soft + self.hard
    }

    /// Whether a request opened at `start` can no longer be served.
    pub fn is_timed_out(&self, start: BlockNumber, current: BlockNumber) -> bool {
        current > start + self.total()
    }

    /// Slashing factor for a submission at `current`; zero before the soft
    /// timeout.
    pub fn factor_at(&self, start: BlockNumber, current: BlockNumber) -> U256 {
        let elapsed = current.saturating_sub(start);
        if elapsed <= self.soft {
            return U256::zero();
        }
        slashing_factor(elapsed - self.soft, self.hard)
    }
}
