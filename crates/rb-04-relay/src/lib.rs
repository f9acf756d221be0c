//! # rb-04-relay
//!
//! Relay entries: each entry is the active group's threshold BLS signature
//! over the previous entry.
//!
//! ```text
//!  previous_entry ──keccak──→ select_group ──→ group g
//!        │                                      │
//!        └────────── group g signs ─────────────┴──→ entry ──verify(pk_g)──→ previous_entry
//! ```
//!
//! One request is in flight at a time. Seats become eligible to submit one
//! every `relay_entry_submission_eligibility_delay` blocks; submissions after
//! the soft timeout are slashed linearly up to the hard timeout.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

pub use adapters::Bls12381EntryVerifier;
pub use domain::{Relay, RelayParameters, RelayRequest};
pub use error::{RelayError, RelayResult};
pub use ports::EntryVerifier;
