//! # Shared Types Crate
//!
//! Primitive types shared across the random beacon subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifiers used by more than one crate live here.
//! - **Fixed Widths**: hashes and addresses are plain byte arrays so they can be
//!   hashed, compared and serialized without allocation.
//! - **256-bit Arithmetic**: seeds, beacon values and token amounts are `U256`.

pub mod entities;

pub use entities::*;
