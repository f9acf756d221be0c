//! # rb-02-group-registry
//!
//! Registry of threshold signing groups and the live-group selection rule.
//!
//! ## Lifecycle
//!
//! ```text
//!   add_group ──→ [PENDING] ──activate_group──→ [ACTIVE] ──age ≥ lifetime──→ [EXPIRED]
//!                     │                            │
//!            discard_candidate              terminate_group
//!                     │                            │
//!                     └────────→ [TERMINATED] ←────┘
//! ```
//!
//! Groups are held in an append-only sequence; an index, once assigned, is
//! never reused. Expiration is lazy: a single cursor moves forward over groups
//! whose age reached the lifetime, and terminated groups above the cursor are
//! kept in a sorted side list so selection can step over them.
//!
//! ## Selection
//!
//! `select_group(beacon_value)` returns the `(beacon_value mod live)`-th live
//! group counted from the cursor. The result depends only on registry state
//! and the beacon value.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rb_02_group_registry::GroupRegistry;
//!
//! let mut registry = GroupRegistry::new(403_200);
//! let index = registry.add_group(public_key.clone(), members, &misbehaved, block)?;
//! registry.activate_group(&public_key, timestamp)?;
//! let selected = registry.select_group(&beacon_value, block)?;
//! ```

pub mod domain;
pub mod error;

pub use domain::{
    filter_out_misbehaved, group_id, hash_members, members_hash, Group, GroupId, GroupRegistry,
};
pub use error::{GroupError, GroupResult};
