//! Relay timing parameters

use rb_01_eligibility::RelayTimeouts;
use serde::{Deserialize, Serialize};

/// Timing of relay entry submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayParameters {
    /// Blocks between consecutive seats becoming eligible
    pub relay_entry_submission_eligibility_delay: u64,
    /// Blocks after the soft timeout until the request is abandoned
    pub relay_entry_hard_timeout: u64,
    /// Seats per group
    pub group_size: usize,
}

impl RelayParameters {
    pub fn timeouts(&self) -> RelayTimeouts {
        RelayTimeouts::new(
            self.group_size,
            self.relay_entry_submission_eligibility_delay,
            self.relay_entry_hard_timeout,
        )
    }
}

impl Default for RelayParameters {
    fn default() -> Self {
        Self {
            relay_entry_submission_eligibility_delay: 10,
            relay_entry_hard_timeout: 5_760,
            group_size: 64,
        }
    }
}
