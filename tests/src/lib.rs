//! # Random Beacon Test Suite
//!
//! Cross-crate test crate.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Operator set, BLS group keys, DKG result builder
//! └── integration/      # Full protocol flows through the beacon service
//!     ├── dkg_flow.rs
//!     ├── relay_flow.rs
//!     └── properties.rs # Randomized checks of the selection arithmetic
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p rb-tests
//!
//! # By flow
//! cargo test -p rb-tests integration::dkg_flow
//! cargo test -p rb-tests integration::relay_flow
//!
//! # Benchmarks
//! cargo bench -p rb-tests
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod integration;
