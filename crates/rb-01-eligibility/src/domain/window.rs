//! Rotating submitter eligibility window
//!
//! Seats are 1-based. The window is the circular arc `first ..= last`, where
//! `first` is fixed by the seed and `last` advances one seat every
//! `per_seat_delay` blocks until the arc covers the whole group.

use crate::error::{EligibilityError, EligibilityResult};
use serde::{Deserialize, Serialize};
use shared_types::{BlockNumber, SeatIndex, U256};

/// Currently eligible arc of seats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityWindow {
    first: SeatIndex,
    last: SeatIndex,
    group_size: usize,
}

impl EligibilityWindow {
    /// Compute the window at `current_block` for a round that opened at
    /// `start_block`.
    pub fn compute(
        seed: &U256,
        start_block: BlockNumber,
        current_block: BlockNumber,
        per_seat_delay: u64,
        group_size: usize,
    ) -> EligibilityResult<Self> {
        if group_size == 0 {
            return Err(EligibilityError::EmptyGroup);
        }
        if per_seat_delay == 0 {
            return Err(EligibilityError::ZeroDelay);
        }

        let first = first_eligible_seat(seed, group_size);
        let elapsed = current_block.saturating_sub(start_block);
        let shift = (elapsed / per_seat_delay).min(group_size as u64 - 1) as usize;
        let last = (first - 1 + shift) % group_size + 1;

        Ok(Self {
            first,
            last,
            group_size,
        })
    }

    /// First eligible seat (fixed for the round).
    pub fn first(&self) -> SeatIndex {
        self.first
    }

    /// Last currently eligible seat.
    pub fn last(&self) -> SeatIndex {
        self.last
    }

    /// Number of seats in the group.
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Whether `seat` lies on the eligible arc.
    pub fn contains(&self, seat: SeatIndex) -> bool {
        seat >= 1 && seat <= self.group_size && is_eligible(seat, self.first, self.last)
    }

    /// Fail with the protocol reason when `seat` may not submit yet.
    pub fn ensure_eligible(&self, seat: SeatIndex) -> EligibilityResult<()> {
        if seat == 0 || seat > self.group_size {
            return Err(EligibilityError::InvalidSubmitterIndex { seat });
        }
        if !self.contains(seat) {
            tracing::debug!(
                seat,
                first = self.first,
                last = self.last,
                "submission rejected outside eligibility window"
            );
            return Err(EligibilityError::SubmitterNotEligible { seat });
        }
        Ok(())
    }

    /// Seats that had their turn before `submitter` and let it pass.
    pub fn inactive_members(&self, submitter: SeatIndex) -> Vec<SeatIndex> {
        inactive_members(submitter, self.first, self.group_size)
    }
}

/// `(seed mod N) + 1`
fn first_eligible_seat(seed: &U256, group_size: usize) -> SeatIndex {
    let offset = *seed % U256::from(group_size as u64);
    offset.low_u64() as usize + 1
}

/// True iff `seat` is on the circular arc from `first` to `last` inclusive.
pub fn is_eligible(seat: SeatIndex, first: SeatIndex, last: SeatIndex) -> bool {
    if first <= last {
        seat >= first && seat <= last
    } else {
        // Wrapped arc: [first, N] ∪ [1, last]
        seat >= first || seat <= last
    }
}

/// Seats from `first` (inclusive) up to `submitter` (exclusive) along the
/// rotation. Empty when the first eligible seat submitted.
pub fn inactive_members(
    submitter: SeatIndex,
    first: SeatIndex,
    group_size: usize,
) -> Vec<SeatIndex> {
    if group_size == 0 {
        return Vec::new();
    }

    let mut seats = Vec::new();
    let mut seat = first;
    while seat != submitter && seats.len() < group_size {
        seats.push(seat);
        seat = seat % group_size + 1;
    }
    seats
}
