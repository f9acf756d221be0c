//! Domain layer for the group registry
//!
//! - `group`: the stored group record
//! - `members`: roster canonicalisation and hashing
//! - `registry`: lifecycle and selection over the append-only sequence

pub mod group;
pub mod members;
pub mod registry;

pub use group::{group_id, Group, GroupId};
pub use members::{filter_out_misbehaved, hash_members, members_hash};
pub use registry::GroupRegistry;
