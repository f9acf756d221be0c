//! Append-only group registry
//!
//! ```text
//!  index:   0    1    2    3    4    5    6    7
//!          [E]  [E]  [A]  [T]  [A]  [A]  [T]  [P]
//!                     ^
//!                     expired_offset (cursor)
//!
//!  active_terminated = {3, 6}     pending_live = 1 (index 7)
//!  live = (8 - 2) - 2 - 1 = 3     → indices 2, 4, 5
//! ```
//!
//! - Indices are permanent. Groups are never removed or reordered.
//! - The cursor only moves forward, and only past groups whose age
//!   (`height - registration_height`) reached `group_lifetime`.
//! - Terminated groups at or above the cursor are kept in an ascending list so
//!   selection can skip them without scanning the whole sequence.

use super::group::{group_id, Group, GroupId};
use super::members::members_hash;
use crate::error::{GroupError, GroupResult};
use shared_types::{BlockNumber, OperatorId, SeatIndex, U256};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Registry of every group ever registered.
#[derive(Debug, Clone)]
pub struct GroupRegistry {
    groups: Vec<Group>,
    /// Latest index registered under each group id
    index_by_id: HashMap<GroupId, usize>,
    /// First index not known to be expired
    expired_offset: usize,
    /// Terminated indices `>= expired_offset`, ascending
    active_terminated: Vec<usize>,
    /// Pending, non-terminated candidates `>= expired_offset`
    pending_live: usize,
    group_lifetime: u64,
}

impl GroupRegistry {
    /// Create an empty registry whose groups live for `group_lifetime` blocks.
    pub fn new(group_lifetime: u64) -> Self {
        Self {
            groups: Vec::new(),
            index_by_id: HashMap::new(),
            expired_offset: 0,
            active_terminated: Vec::new(),
            pending_live: 0,
            group_lifetime,
        }
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Register a candidate group produced by a DKG round.
    ///
    /// A pending candidate with the same key may coexist; lookups by key then
    /// resolve to the newest one.
    pub fn add_group(
        &mut self,
        public_key: Vec<u8>,
        members: Vec<OperatorId>,
        misbehaved: &[SeatIndex],
        height: BlockNumber,
    ) -> GroupResult<usize> {
        let id = group_id(&public_key);

        if let Some(&existing) = self.index_by_id.get(&id) {
            if self.groups[existing].is_activated() {
                return Err(GroupError::AlreadyActivated { group_id: id });
            }
        }

        let index = self.groups.len();
        let hash = members_hash(&members, misbehaved);
        self.groups.push(Group {
            id,
            public_key,
            members,
            members_hash: hash,
            registration_height: height,
            activation_timestamp: None,
            terminated: false,
        });
        self.index_by_id.insert(id, index);
        self.pending_live += 1;

        info!(index, height, "candidate group registered");
        Ok(index)
    }

    /// Approve the newest candidate registered under `public_key`.
    pub fn activate_group(&mut self, public_key: &[u8], timestamp: u64) -> GroupResult<usize> {
        let id = group_id(public_key);
        let index = *self
            .index_by_id
            .get(&id)
            .ok_or(GroupError::UnknownGroup { group_id: id })?;

        let group = &mut self.groups[index];
        if group.is_activated() {
            return Err(GroupError::AlreadyActivated { group_id: id });
        }
        if group.terminated {
            return Err(GroupError::GroupTerminated { index });
        }

        group.activation_timestamp = Some(timestamp);
        if index >= self.expired_offset {
            self.pending_live -= 1;
        }

        info!(index, timestamp, "group activated");
        Ok(index)
    }

    /// Mark a group terminated. Terminating twice is a no-op.
    pub fn terminate_group(&mut self, index: usize) -> GroupResult<()> {
        let cursor = self.expired_offset;
        let group = self
            .groups
            .get_mut(index)
            .ok_or(GroupError::UnknownGroupIndex { index })?;

        if group.terminated {
            return Ok(());
        }
        let was_pending = group.is_pending();
        group.terminated = true;

        if index >= cursor {
            if was_pending {
                self.pending_live -= 1;
            }
            if let Err(position) = self.active_terminated.binary_search(&index) {
                self.active_terminated.insert(position, index);
            }
        }

        warn!(index, "group terminated");
        Ok(())
    }

    /// Discard the newest pending candidate registered under `public_key`.
    ///
    /// The index stays allocated and the entry is marked terminated.
    pub fn discard_candidate(&mut self, public_key: &[u8]) -> GroupResult<usize> {
        let id = group_id(public_key);
        let index = *self
            .index_by_id
            .get(&id)
            .ok_or(GroupError::UnknownGroup { group_id: id })?;

        if !self.groups[index].is_pending() {
            return Err(GroupError::NotPending { index });
        }

        self.terminate_group(index)?;
        info!(index, "candidate group discarded");
        Ok(index)
    }

    /// Advance the expiration cursor past every group aged `group_lifetime`
    /// or more at `height`. Returns how many groups were passed.
    pub fn expire_old_groups(&mut self, height: BlockNumber) -> usize {
        let start = self.expired_offset;

        while let Some(group) = self.groups.get(self.expired_offset) {
            let age = height.saturating_sub(group.registration_height);
            if age < self.group_lifetime {
                break;
            }
            if group.is_pending() {
                self.pending_live -= 1;
            }
            self.expired_offset += 1;
        }

        let cursor = self.expired_offset;
        let pruned = self.active_terminated.partition_point(|index| *index < cursor);
        self.active_terminated.drain(..pruned);

        let expired = cursor - start;
        if expired > 0 {
            debug!(expired, cursor, height, "groups expired");
        }
        expired
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Pick the live group for `beacon_value`, expiring old groups first.
    ///
    /// The `beacon_value mod live`-th live index counted from the cursor wins.
    pub fn select_group(&mut self, beacon_value: &U256, height: BlockNumber) -> GroupResult<usize> {
        self.expire_old_groups(height);

        let live = self.number_of_active_groups();
        if live == 0 {
            return Err(GroupError::NoActiveGroups);
        }

        let mut remaining = (*beacon_value % U256::from(live as u64)).low_u64() as usize;
        let mut terminated = self.active_terminated.iter().peekable();

        for index in self.expired_offset..self.groups.len() {
            if terminated.peek() == Some(&&index) {
                terminated.next();
                continue;
            }
            if !self.groups[index].is_activated() {
                continue;
            }
            if remaining == 0 {
                debug!(index, live, "group selected");
                return Ok(index);
            }
            remaining -= 1;
        }

        Err(GroupError::NoActiveGroups)
    }

    /// Groups neither expired, terminated nor pending, as of the last
    /// expiration pass.
    pub fn number_of_active_groups(&self) -> usize {
        (self.groups.len() - self.expired_offset) - self.active_terminated.len() - self.pending_live
    }

    /// Whether a group can be forgotten by its members: terminated, or
    /// expired long enough ago that no relay request can still target it.
    pub fn is_stale_group(
        &self,
        index: usize,
        height: BlockNumber,
        relay_entry_timeout: u64,
    ) -> GroupResult<bool> {
        let group = self
            .groups
            .get(index)
            .ok_or(GroupError::UnknownGroupIndex { index })?;

        if group.terminated {
            return Ok(true);
        }

        let expired = index < self.expired_offset;
        let sunset = group.registration_height + self.group_lifetime + relay_entry_timeout;
        Ok(expired && sunset < height)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Group at `index`.
    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    /// Newest group registered under `id`.
    pub fn group_by_id(&self, id: &GroupId) -> Option<&Group> {
        self.index_of(id).and_then(|index| self.groups.get(index))
    }

    /// Newest group registered under `public_key`.
    pub fn group_by_public_key(&self, public_key: &[u8]) -> Option<&Group> {
        self.group_by_id(&group_id(public_key))
    }

    /// Index of the newest group registered under `id`.
    pub fn index_of(&self, id: &GroupId) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// Every group, in registration order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Terminated groups not yet passed by the expiration cursor.
    pub fn active_terminated_groups(&self) -> &[usize] {
        &self.active_terminated
    }

    /// Expiration cursor.
    pub fn expired_offset(&self) -> usize {
        self.expired_offset
    }

    /// Number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group was ever registered.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Lifetime of a group in blocks.
    pub fn group_lifetime(&self) -> u64 {
        self.group_lifetime
    }

    /// Change the lifetime applied by future expiration passes.
    pub fn set_group_lifetime(&mut self, group_lifetime: u64) {
        self.group_lifetime = group_lifetime;
    }
}
