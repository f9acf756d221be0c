//! # rb-01-eligibility
//!
//! Who may submit a DKG result or relay entry, and what a late submission costs.
//!
//! ## Overview
//!
//! Both DKG results and relay entries are submitted by exactly one group member.
//! To avoid every member racing for the same transaction, seats become eligible
//! one at a time, starting from a seed-derived first seat:
//!
//! ```text
//!  block:   start        +delay        +2·delay       ...   +(N-1)·delay
//!  seats:   [f]          [f, f+1]      [f .. f+2]     ...   [all N seats]
//!                    (indices wrap modulo N, 1-based)
//! ```
//!
//! Seats that were eligible before the actual submitter but did not submit are
//! *inactive* and may be penalised.
//!
//! ## Slashing Schedule
//!
//! ```text
//!  factor
//!  1e18 ┤                 ┌──────────── (hard timeout: request abandoned)
//!       │               ╱
//!       │            ╱
//!     0 ┼─────────╱
//!       └─────────┬───────┬──────────→ blocks since request
//!               soft    soft+hard
//! ```
//!
//! All functions are pure. Nothing here reads a clock or holds state.

pub mod domain;
pub mod error;

pub use domain::slashing::{slashing_amount, slashing_factor, RelayTimeouts};
pub use domain::window::{inactive_members, is_eligible, EligibilityWindow};
pub use error::{EligibilityError, EligibilityResult};
