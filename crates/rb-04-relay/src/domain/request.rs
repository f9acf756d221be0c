//! The in-flight relay request

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::BlockNumber;

/// Request for the next beacon entry, served by one group.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayRequest {
    /// Monotonic request counter value
    pub id: u64,
    /// Registry index of the group that must sign
    pub group_index: usize,
    /// Block the request (or its latest retry) was opened at
    pub start_block: BlockNumber,
    /// Entry the group must sign
    #[serde_as(as = "Hex")]
    pub previous_entry: Vec<u8>,
}
